//! Onboarding questionnaire and habit classification.
//!
//! Both questionnaires reduce to a [`RiskGroup`] and a canned
//! [`AnalysisGroup`]; [`analyze`] combines them into the profile analysis
//! stored with the user.

pub mod phone;
pub mod sleep;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

pub use phone::PhoneUsageSurvey;
pub use sleep::SleepSurvey;

/// Advice tier. Groups 1 to 4 are ordered by score; group 5 is the
/// "heavy but justified" exception checked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskGroup {
    Healthy,
    Mild,
    AtRisk,
    Severe,
    Purposeful,
}

impl RiskGroup {
    pub fn from_score(score: u32) -> Self {
        match score {
            12.. => RiskGroup::Severe,
            8..=11 => RiskGroup::AtRisk,
            5..=7 => RiskGroup::Mild,
            _ => RiskGroup::Healthy,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            RiskGroup::Healthy => 1,
            RiskGroup::Mild => 2,
            RiskGroup::AtRisk => 3,
            RiskGroup::Severe => 4,
            RiskGroup::Purposeful => 5,
        }
    }

    /// Display label, e.g. `Nhóm 4`.
    pub fn label(self) -> String {
        format!("Nhóm {}", self.number())
    }

    /// Colour hint for the result card.
    pub fn tone(self) -> &'static str {
        match self {
            RiskGroup::Healthy => "green",
            RiskGroup::Mild => "yellow",
            RiskGroup::AtRisk => "orange",
            RiskGroup::Severe => "red",
            RiskGroup::Purposeful => "blue",
        }
    }
}

/// A classification result as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisGroup {
    pub group_name: String,
    pub title: String,
    pub description: String,
    pub color: String,
    pub advice: Vec<String>,
}

impl AnalysisGroup {
    pub(crate) fn new(group: RiskGroup, title: &str, description: &str, advice: &[&str]) -> Self {
        Self {
            group_name: group.label(),
            title: title.to_string(),
            description: description.to_string(),
            color: group.tone().to_string(),
            advice: advice.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Whether this result belongs to `group`.
    pub fn is(&self, group: RiskGroup) -> bool {
        self.group_name == group.label()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyMethod {
    pub method_name: String,
    pub description: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPhase {
    pub phase: String,
    pub focus: String,
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl RoadmapPhase {
    fn new(phase: &str, focus: &str, duration: &str) -> Self {
        Self {
            phase: phase.into(),
            focus: focus.into(),
            duration: duration.into(),
            details: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsrAnalysis {
    pub phone: AnalysisGroup,
    pub sleep: AnalysisGroup,
    pub study_method_recommendation: StudyMethod,
    pub roadmap: Vec<RoadmapPhase>,
}

/// Onboarding answers plus their analysis, stored on the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub name: String,
    pub phone_survey: PhoneUsageSurvey,
    pub sleep_survey: SleepSurvey,
    #[serde(default)]
    pub analysis: Option<SsrAnalysis>,
}

pub const DEFAULT_TOPIC: &str = "Tự học tổng quát";
pub const FALLBACK_TOPIC: &str = "Cải thiện kỹ năng chuyên môn";

/// Reject surveys with unanswered questions.
pub fn ensure_complete(phone: &PhoneUsageSurvey, sleep: &SleepSurvey) -> Result<(), ValidationError> {
    let mut missing = phone.missing_answers();
    missing.extend(sleep.missing_answers().into_iter().map(|name| match name {
        // both surveys have an `impact` question
        "impact" => "sleep.impact",
        other => other,
    }));
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::IncompleteSurvey(missing))
    }
}

/// Classify both surveys and attach the recommended method and roadmap.
pub fn analyze(phone: &PhoneUsageSurvey, sleep: &SleepSurvey) -> Result<SsrAnalysis> {
    ensure_complete(phone, sleep)?;

    let phone_result = phone::classify(phone);
    let sleep_result = sleep::classify(sleep);

    let method_name = if phone_result.is(RiskGroup::Severe) {
        "Dopamine Detox"
    } else {
        "Pomodoro"
    };

    tracing::info!(
        phone = %phone_result.group_name,
        sleep = %sleep_result.group_name,
        method = method_name,
        "survey analyzed"
    );

    Ok(SsrAnalysis {
        phone: phone_result,
        sleep: sleep_result,
        study_method_recommendation: StudyMethod {
            method_name: method_name.into(),
            description: "Phương pháp tập trung dựa trên mức độ xao nhãng của bạn.".into(),
            reason: "Được đề xuất dựa trên kết quả khảo sát.".into(),
        },
        roadmap: vec![
            RoadmapPhase::new("Tuần 1", "Thiết lập giới hạn", "7 ngày"),
            RoadmapPhase::new("Tuần 2", "Xây dựng thói quen mới", "7 ngày"),
            RoadmapPhase::new("Tuần 3", "Tối ưu hóa hiệu suất", "Dài hạn"),
        ],
    })
}

/// Hours per day to plan study for, inferred from phone usage.
pub fn available_study_hours(phone: &PhoneUsageSurvey) -> u32 {
    match phone.daily_hours.as_str() {
        "Dưới 2 giờ" => 6,
        "2–4 giờ" => 4,
        "4–6 giờ" => 3,
        _ => 2,
    }
}

/// Topics to seed the first generated schedule with.
pub fn focus_topics(phone: &PhoneUsageSurvey) -> Vec<String> {
    if phone.purposes.is_empty() {
        return vec![DEFAULT_TOPIC.to_string()];
    }
    let topics: Vec<String> = phone
        .purposes
        .iter()
        .filter(|p| !p.contains("Giải trí") && !p.contains("Mạng xã hội"))
        .cloned()
        .collect();
    if topics.is_empty() {
        vec![FALLBACK_TOPIC.to_string()]
    } else {
        topics
    }
}

/// A fixed, already-analyzed profile for trying the app without answering.
pub fn demo_profile(name: &str) -> StudentProfile {
    let phone_survey = PhoneUsageSurvey {
        daily_hours: "2–4 giờ".into(),
        peak_time: "Buổi tối".into(),
        purposes: vec![phone::PURPOSE_STUDY.into(), phone::PURPOSE_CONTACT.into()],
        usage_during_study: "Thỉnh thoảng".into(),
        overuse_intention: "Không".into(),
        has_limits: "Có và luôn tuân thủ".into(),
        impact: "Không".into(),
    };
    let sleep_survey = SleepSurvey {
        sleep_duration: "7–9 giờ".into(),
        bed_time: "22h–23h".into(),
        fall_asleep_time: "15–30 phút".into(),
        sleep_quality: "Ngủ sâu, ít tỉnh giấc".into(),
        pre_sleep_device: "Không".into(),
        wake_up_state: "Tỉnh táo, tràn đầy năng lượng".into(),
        impact: "Không".into(),
    };
    let demo_note = "Đây là dữ liệu giả lập cho chế độ kiểm thử.";
    let analysis = SsrAnalysis {
        phone: AnalysisGroup::new(
            RiskGroup::Healthy,
            "Sử dụng Hợp lý (Test Mode)",
            demo_note,
            &["Tiếp tục duy trì phong độ", "Test tính năng Pomodoro"],
        ),
        sleep: AnalysisGroup::new(
            RiskGroup::Healthy,
            "Giấc ngủ Lành mạnh (Test Mode)",
            demo_note,
            &["Ngủ đủ giấc", "Tắt thiết bị điện tử sớm"],
        ),
        study_method_recommendation: StudyMethod {
            method_name: "Flowtime Technique".into(),
            description: "Phương pháp tập trung tự nhiên, nghỉ ngơi khi cảm thấy mệt.".into(),
            reason: "Được đề xuất ngẫu nhiên trong chế độ Test.".into(),
        },
        roadmap: vec![
            RoadmapPhase::new("Tuần 1", "Làm quen hệ thống", "7 ngày"),
            RoadmapPhase::new("Tuần 2", "Tối ưu hóa", "14 ngày"),
        ],
    };
    StudentProfile {
        name: name.to_string(),
        phone_survey,
        sleep_survey,
        analysis: Some(analysis),
    }
}
