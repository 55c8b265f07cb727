mod engine;
pub mod sync;

use serde::{Deserialize, Serialize};

pub use engine::{TimerEngine, TimerState};
pub use sync::{active_task, mode_for_task};

/// Pomodoro timer mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PomodoroMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl PomodoroMode {
    pub const ALL: [PomodoroMode; 3] = [
        PomodoroMode::Focus,
        PomodoroMode::ShortBreak,
        PomodoroMode::LongBreak,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PomodoroMode::Focus => "Tập trung",
            PomodoroMode::ShortBreak => "Nghỉ ngắn",
            PomodoroMode::LongBreak => "Nghỉ dài",
        }
    }
}

impl std::str::FromStr for PomodoroMode {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "focus" => Ok(PomodoroMode::Focus),
            "shortBreak" | "short-break" | "short" => Ok(PomodoroMode::ShortBreak),
            "longBreak" | "long-break" | "long" => Ok(PomodoroMode::LongBreak),
            other => Err(crate::error::ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("'{other}' is not one of focus, shortBreak, longBreak"),
            }),
        }
    }
}

/// Minutes per mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeDurations {
    pub focus_min: u32,
    pub short_break_min: u32,
    pub long_break_min: u32,
}

impl Default for ModeDurations {
    fn default() -> Self {
        Self {
            focus_min: 25,
            short_break_min: 5,
            long_break_min: 15,
        }
    }
}

impl ModeDurations {
    pub fn minutes(&self, mode: PomodoroMode) -> u32 {
        match mode {
            PomodoroMode::Focus => self.focus_min,
            PomodoroMode::ShortBreak => self.short_break_min,
            PomodoroMode::LongBreak => self.long_break_min,
        }
    }

    pub fn ms(&self, mode: PomodoroMode) -> u64 {
        u64::from(self.minutes(mode)) * 60 * 1000
    }
}
