use chrono::Local;
use clap::{Args, Subcommand};
use serde_json::json;
use smartstudy_core::survey::{self, phone, sleep, StudentProfile};
use smartstudy_core::{Config, GeminiClient, PhoneUsageSurvey, SleepSurvey, SqliteStore};

use super::{current_user, print_json, runtime, with_user_data, CliResult};

#[derive(Subcommand)]
pub enum SurveyAction {
    /// List the accepted answers for every question
    Options,
    /// Answer both surveys, store the profile and plan today
    Submit {
        #[command(flatten)]
        phone: PhoneArgs,
        #[command(flatten)]
        sleep: SleepArgs,
        /// Skip generating today's schedule
        #[arg(long)]
        no_plan: bool,
    },
    /// Store a ready-made profile without answering (test mode)
    Demo,
    /// Print the stored profile and analysis
    Show,
    /// Ask the AI for its own reading of the phone survey
    Insight,
}

#[derive(Args)]
pub struct PhoneArgs {
    #[arg(long)]
    daily_hours: String,
    #[arg(long)]
    peak_time: String,
    /// Repeat for each purpose
    #[arg(long = "purpose")]
    purposes: Vec<String>,
    #[arg(long)]
    usage_during_study: String,
    #[arg(long)]
    overuse_intention: String,
    #[arg(long)]
    has_limits: String,
    #[arg(long)]
    impact: String,
}

#[derive(Args)]
pub struct SleepArgs {
    #[arg(long)]
    sleep_duration: String,
    #[arg(long)]
    bed_time: String,
    #[arg(long)]
    fall_asleep_time: String,
    #[arg(long)]
    sleep_quality: String,
    #[arg(long)]
    pre_sleep_device: String,
    #[arg(long)]
    wake_up_state: String,
    #[arg(long)]
    sleep_impact: String,
}

impl From<PhoneArgs> for PhoneUsageSurvey {
    fn from(a: PhoneArgs) -> Self {
        Self {
            daily_hours: a.daily_hours,
            peak_time: a.peak_time,
            purposes: a.purposes,
            usage_during_study: a.usage_during_study,
            overuse_intention: a.overuse_intention,
            has_limits: a.has_limits,
            impact: a.impact,
        }
    }
}

impl From<SleepArgs> for SleepSurvey {
    fn from(a: SleepArgs) -> Self {
        Self {
            sleep_duration: a.sleep_duration,
            bed_time: a.bed_time,
            fall_asleep_time: a.fall_asleep_time,
            sleep_quality: a.sleep_quality,
            pre_sleep_device: a.pre_sleep_device,
            wake_up_state: a.wake_up_state,
            impact: a.sleep_impact,
        }
    }
}

pub fn run(action: SurveyAction) -> CliResult {
    match action {
        SurveyAction::Options => print_json(&json!({
            "phone": {
                "dailyHours": phone::DAILY_HOURS,
                "peakTime": phone::PEAK_TIMES,
                "purposes": phone::PURPOSES,
                "usageDuringStudy": phone::FREQUENCY,
                "overuseIntention": phone::FREQUENCY,
                "hasLimits": phone::LIMITS,
                "impact": phone::IMPACT,
            },
            "sleep": {
                "sleepDuration": sleep::DURATION,
                "bedTime": sleep::BED_TIME,
                "fallAsleepTime": sleep::FALL_ASLEEP,
                "sleepQuality": sleep::QUALITY,
                "preSleepDevice": sleep::PRE_SLEEP_DEVICE,
                "wakeUpState": sleep::WAKE_UP,
                "sleepImpact": sleep::IMPACT,
            },
        })),
        SurveyAction::Submit { phone, sleep, no_plan } => submit(phone.into(), sleep.into(), no_plan),
        SurveyAction::Demo => {
            let db = SqliteStore::open()?;
            let user = current_user(&db)?;
            let profile = survey::demo_profile(&user.username);
            with_user_data(&db, |data| {
                data.profile = Some(profile.clone());
                Ok(())
            })?;
            print_json(&profile)
        }
        SurveyAction::Show => {
            let db = SqliteStore::open()?;
            match current_user(&db)?.data.profile {
                Some(profile) => print_json(&profile),
                None => {
                    println!("no profile yet, run `survey submit` or `survey demo`");
                    Ok(())
                }
            }
        }
        SurveyAction::Insight => {
            let db = SqliteStore::open()?;
            let profile = current_user(&db)?
                .data
                .profile
                .ok_or("no profile yet, run `survey submit` first")?;
            let client = GeminiClient::from_config(&Config::load_or_default().ai)?;
            let insight = runtime()?.block_on(client.analyze_profile(&profile.phone_survey));
            match insight {
                Some(insight) => print_json(&insight),
                None => Err("AI analysis unavailable".into()),
            }
        }
    }
}

fn submit(phone: PhoneUsageSurvey, sleep: SleepSurvey, no_plan: bool) -> CliResult {
    let analysis = survey::analyze(&phone, &sleep)?;
    let db = SqliteStore::open()?;
    let user = current_user(&db)?;

    let planned = if no_plan {
        Vec::new()
    } else {
        plan_today(&phone)
    };

    let profile = StudentProfile {
        name: user.username.clone(),
        phone_survey: phone,
        sleep_survey: sleep,
        analysis: Some(analysis.clone()),
    };
    let planned_count = planned.len();
    with_user_data(&db, |data| {
        data.profile = Some(profile);
        if !planned.is_empty() {
            data.tasks = planned;
        }
        Ok(())
    })?;

    if planned_count > 0 {
        eprintln!("planned {planned_count} tasks for today");
    }
    print_json(&analysis)
}

/// Ask the AI for today's first schedule. Missing keys only skip planning.
fn plan_today(phone: &PhoneUsageSurvey) -> Vec<smartstudy_core::Task> {
    let client = match GeminiClient::from_config(&Config::load_or_default().ai) {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(error = %e, "skipping schedule generation");
            return Vec::new();
        }
    };
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::warn!(error = %e, "skipping schedule generation");
            return Vec::new();
        }
    };
    let today = Local::now().date_naive();
    rt.block_on(client.generate_smart_schedule(
        &survey::focus_topics(phone),
        today,
        survey::available_study_hours(phone),
    ))
}
