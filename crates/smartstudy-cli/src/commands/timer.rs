use std::io::Write;
use std::time::Duration;

use chrono::Local;
use clap::{Subcommand, ValueEnum};
use smartstudy_core::storage::DocumentStore;
use smartstudy_core::timer::sync;
use smartstudy_core::{AuthService, Config, Event, PomodoroMode, SqliteStore, Task, TimerEngine};

use super::{print_json, runtime, CliResult};

const ENGINE_KEY: &str = "timer_engine";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start or resume the count-down
    Start,
    /// Pause the count-down
    Pause,
    /// Start when stopped, pause when running
    Toggle,
    /// Stop and refill the current mode
    Reset,
    /// Switch mode by hand (turns auto-sync off)
    Mode {
        /// focus, shortBreak or longBreak
        mode: PomodoroMode,
    },
    /// Pick a task or project to work on; omit the id to clear
    Select {
        id: Option<String>,
    },
    /// Follow the schedule automatically
    AutoSync {
        #[arg(value_enum)]
        state: Switch,
    },
    /// Run one schedule-sync poll now
    Sync,
    /// Print current timer state as JSON
    Status,
    /// Keep ticking every second and syncing with the schedule until Ctrl-C
    Watch {
        /// Seconds between schedule polls
        #[arg(long, default_value = "60")]
        sync_every: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

/// Restore the persisted engine. Read errors propagate so a stored session is
/// never overwritten by a fresh one; only undecodable state falls back.
fn load_engine(db: &dyn DocumentStore, config: &Config) -> Result<TimerEngine, Box<dyn std::error::Error>> {
    if let Some(json) = db.kv_get(ENGINE_KEY)? {
        match serde_json::from_str::<TimerEngine>(&json) {
            Ok(mut engine) => {
                engine.set_durations(config.timer.durations());
                return Ok(engine);
            }
            Err(e) => tracing::warn!(error = %e, "discarding unreadable timer state"),
        }
    }
    Ok(TimerEngine::new(config.timer.durations(), config.timer.auto_sync))
}

fn save_engine(db: &SqliteStore, engine: &TimerEngine) -> CliResult {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

/// Tasks of the logged-in user; none when nobody is logged in.
fn session_tasks(db: &SqliteStore) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
    Ok(AuthService::new(db)
        .current_user()?
        .map(|u| u.data.tasks)
        .unwrap_or_default())
}

fn emit(event: &Event, config: &Config) -> CliResult {
    println!("{}", serde_json::to_string(event)?);
    if let Event::TimerCompleted { .. } = event {
        if config.notifications.enabled && config.notifications.sound {
            eprint!("\x07");
        }
    }
    Ok(())
}

pub fn run(action: TimerAction) -> CliResult {
    let db = SqliteStore::open()?;
    let config = Config::load_or_default();

    if let TimerAction::Watch { sync_every } = action {
        return watch(&db, &config, sync_every);
    }

    let mut engine = load_engine(&db, &config)?;
    // Flush time elapsed since the last invocation.
    if let Some(event) = engine.tick() {
        emit(&event, &config)?;
    }

    let event = match action {
        TimerAction::Start => engine.start(),
        TimerAction::Pause => engine.pause(),
        TimerAction::Toggle => engine.toggle(),
        TimerAction::Reset => engine.reset(),
        TimerAction::Mode { mode } => engine.set_mode(mode),
        TimerAction::Select { id } => {
            let tasks = session_tasks(&db)?;
            Some(sync::select(&mut engine, &tasks, id.as_deref()))
        }
        TimerAction::AutoSync { state } => {
            engine.set_auto_sync(matches!(state, Switch::On));
            Some(engine.snapshot())
        }
        TimerAction::Sync => {
            let tasks = session_tasks(&db)?;
            sync::sync(&mut engine, &tasks, Local::now().naive_local())
        }
        TimerAction::Status | TimerAction::Watch { .. } => None,
    };

    save_engine(&db, &engine)?;
    match event {
        Some(event) => emit(&event, &config)?,
        None => print_json(&engine.snapshot())?,
    }
    Ok(())
}

/// Drive the persisted engine: tick every second, poll the schedule every
/// `sync_every` seconds, stop on Ctrl-C.
fn watch(db: &SqliteStore, config: &Config, sync_every: u64) -> CliResult {
    let rt = runtime()?;
    rt.block_on(async {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        let mut poller = tokio::time::interval(Duration::from_secs(sync_every.max(1)));
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        loop {
            tokio::select! {
                _ = &mut ctrl_c => break,
                _ = ticker.tick() => {
                    let mut engine = load_engine(db, config)?;
                    if let Some(event) = engine.tick() {
                        emit(&event, config)?;
                    }
                    save_engine(db, &engine)?;
                    eprint!("\r{} {:<10}", engine.display(), engine.mode().label());
                    std::io::stderr().flush()?;
                }
                _ = poller.tick() => {
                    let mut engine = load_engine(db, config)?;
                    let tasks = session_tasks(db)?;
                    if let Some(event) = sync::sync(&mut engine, &tasks, Local::now().naive_local()) {
                        save_engine(db, &engine)?;
                        eprintln!();
                        emit(&event, config)?;
                    }
                }
            }
        }
        eprintln!();
        tracing::debug!("timer watch stopped");
        Ok::<_, Box<dyn std::error::Error>>(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use smartstudy_core::error::Result as StoreResult;
    use smartstudy_core::{CoreError, DatabaseError};

    /// Stored engine JSON; `None` makes every kv read fail.
    struct KvOnly(Option<Option<String>>);

    impl DocumentStore for KvOnly {
        fn put(&self, _: &str, _: &str, _: &Value) -> StoreResult<()> {
            Ok(())
        }
        fn get(&self, _: &str, _: &str) -> StoreResult<Option<Value>> {
            Ok(None)
        }
        fn delete(&self, _: &str, _: &str) -> StoreResult<bool> {
            Ok(false)
        }
        fn list(&self, _: &str) -> StoreResult<Vec<(String, Value)>> {
            Ok(Vec::new())
        }
        fn kv_get(&self, _: &str) -> StoreResult<Option<String>> {
            self.0.clone().ok_or(CoreError::Database(DatabaseError::Locked))
        }
        fn kv_set(&self, _: &str, _: &str) -> StoreResult<()> {
            Ok(())
        }
        fn kv_delete(&self, _: &str) -> StoreResult<()> {
            Ok(())
        }
    }

    #[test]
    fn read_error_is_not_replaced_by_fresh_engine() {
        let store = KvOnly(None);
        assert!(load_engine(&store, &Config::default()).is_err());
    }

    #[test]
    fn unreadable_state_falls_back_to_fresh_engine() {
        let config = Config::default();
        let store = KvOnly(Some(Some("not an engine".into())));
        let engine = load_engine(&store, &config).unwrap();
        assert_eq!(engine.mode(), PomodoroMode::Focus);

        let empty = KvOnly(Some(None));
        assert!(load_engine(&empty, &config).is_ok());
    }

    #[test]
    fn stored_engine_is_restored() {
        let config = Config::default();
        let mut engine = TimerEngine::new(config.timer.durations(), false);
        engine.set_mode(PomodoroMode::LongBreak);
        let store = KvOnly(Some(Some(serde_json::to_string(&engine).unwrap())));
        let restored = load_engine(&store, &config).unwrap();
        assert_eq!(restored.mode(), PomodoroMode::LongBreak);
    }
}
