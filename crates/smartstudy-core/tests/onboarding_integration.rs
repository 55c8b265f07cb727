//! End-to-end flow on an on-disk store: register, onboard, plan a day,
//! follow it with the timer, read the dashboard.

use chrono::NaiveDate;
use smartstudy_core::schedule::{self, ClockTime, SplitRequest, SplitRules, TaskCategory};
use smartstudy_core::survey::{self, RiskGroup};
use smartstudy_core::timer::{self, PomodoroMode};
use smartstudy_core::{AuthService, Dashboard, Event, PhoneUsageSurvey, SleepSurvey, SqliteStore, TimerEngine};

fn heavy_phone_user() -> PhoneUsageSurvey {
    PhoneUsageSurvey {
        daily_hours: "Trên 6 giờ".into(),
        peak_time: "Trước khi ngủ".into(),
        purposes: vec!["Mạng xã hội".into(), "Giải trí (xem phim, chơi game)".into()],
        usage_during_study: "Thường xuyên".into(),
        overuse_intention: "Thường xuyên".into(),
        has_limits: "Không đặt giới hạn".into(),
        impact: "Có và ảnh hưởng rõ rệt".into(),
    }
}

fn rested_sleeper() -> SleepSurvey {
    SleepSurvey {
        sleep_duration: "7–9 giờ".into(),
        bed_time: "22h–23h".into(),
        fall_asleep_time: "15–30 phút".into(),
        sleep_quality: "Ngủ sâu, ít tỉnh giấc".into(),
        pre_sleep_device: "Không".into(),
        wake_up_state: "Tỉnh táo, tràn đầy năng lượng".into(),
        impact: "Không".into(),
    }
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

#[test]
fn test_onboarding_to_timer_sync() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smartstudy.db");
    let db = SqliteStore::open_at(&path).unwrap();
    let auth = AuthService::new(&db);
    let user = auth.register("lan", "matkhau").unwrap();

    // Onboarding
    let phone = heavy_phone_user();
    let sleep = rested_sleeper();
    let analysis = survey::analyze(&phone, &sleep).unwrap();
    assert!(analysis.phone.is(RiskGroup::Severe));
    assert_eq!(analysis.study_method_recommendation.method_name, "Dopamine Detox");
    assert_eq!(analysis.roadmap.len(), 3);

    // Plan a 60 minute study block; it splits into 25/5/25/5.
    let mut data = user.data.clone();
    let request = SplitRequest {
        title: "Giải tích".into(),
        date: day(),
        start_time: ClockTime::new(8, 0).unwrap(),
        duration: 60,
        category: TaskCategory::Study,
        description: None,
        auto_split: true,
    };
    let ids = schedule::add_tasks(&mut data.tasks, &request, &SplitRules::default()).unwrap();
    assert_eq!(ids.len(), 4);
    data.profile = Some(survey::StudentProfile {
        name: "Lan".into(),
        phone_survey: phone,
        sleep_survey: sleep,
        analysis: Some(analysis),
    });
    auth.update_user_data(&user.id, data).unwrap();
    drop(auth);
    drop(db);

    // Reopen from disk
    let db = SqliteStore::open_at(&path).unwrap();
    let user = AuthService::new(&db).require_user().unwrap();
    assert_eq!(user.data.tasks.len(), 4);
    assert!(user.data.profile.is_some());

    // 08:27 falls inside the first break.
    let now = day().and_hms_opt(8, 27, 0).unwrap();
    let mut engine = TimerEngine::default();
    let event = timer::sync::sync(&mut engine, &user.data.tasks, now);
    assert!(matches!(event, Some(Event::TaskSynced { mode: PomodoroMode::ShortBreak, .. })));
    assert_eq!(engine.mode(), PomodoroMode::ShortBreak);

    // Dashboard sees four open tasks and one hour planned.
    let dash = Dashboard::compute(&user.data.tasks, &user.data.projects);
    assert_eq!(dash.expected_minutes, 60);
    assert_eq!(dash.completion_rate, 0);
}

#[test]
fn test_incomplete_survey_is_rejected() {
    let mut phone = heavy_phone_user();
    phone.purposes.clear();
    let mut sleep = rested_sleeper();
    sleep.impact.clear();

    let err = survey::analyze(&phone, &sleep).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("purposes"));
    assert!(msg.contains("sleep.impact"));
}
