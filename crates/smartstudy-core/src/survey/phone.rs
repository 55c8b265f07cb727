//! Phone-usage risk scoring.

use serde::{Deserialize, Serialize};

use super::{AnalysisGroup, RiskGroup};

pub const DAILY_HOURS: [&str; 4] = ["Dưới 2 giờ", "2–4 giờ", "4–6 giờ", "Trên 6 giờ"];
pub const PEAK_TIMES: [&str; 4] = ["Buổi sáng", "Buổi chiều", "Buổi tối", "Trước khi ngủ"];
pub const PURPOSES: [&str; 4] = [
    PURPOSE_STUDY,
    PURPOSE_CONTACT,
    PURPOSE_SOCIAL,
    PURPOSE_ENTERTAINMENT,
];
pub const FREQUENCY: [&str; 3] = ["Không", "Thỉnh thoảng", "Thường xuyên"];
pub const LIMITS: [&str; 3] = [
    "Có và luôn tuân thủ",
    "Có nhưng ít khi tuân thủ",
    "Không đặt giới hạn",
];
pub const IMPACT: [&str; 3] = ["Không", "Có nhưng không đáng kể", "Có và ảnh hưởng rõ rệt"];

pub const PURPOSE_STUDY: &str = "Học tập / tra cứu";
pub const PURPOSE_CONTACT: &str = "Liên lạc (nhắn tin, gọi điện)";
pub const PURPOSE_SOCIAL: &str = "Mạng xã hội";
pub const PURPOSE_ENTERTAINMENT: &str = "Giải trí (xem phim, chơi game)";

/// Share of purpose points that must be productive for group 5.
const PURPOSEFUL_RATIO: f64 = 0.6;
const PURPOSEFUL_MAX_CONTROL: u32 = 4;

/// Answers to the phone-usage questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneUsageSurvey {
    pub daily_hours: String,
    pub peak_time: String,
    #[serde(default)]
    pub purposes: Vec<String>,
    pub usage_during_study: String,
    pub overuse_intention: String,
    pub has_limits: String,
    pub impact: String,
}

impl PhoneUsageSurvey {
    /// Names of unanswered questions.
    pub fn missing_answers(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        let fields = [
            ("dailyHours", &self.daily_hours),
            ("peakTime", &self.peak_time),
            ("usageDuringStudy", &self.usage_during_study),
            ("overuseIntention", &self.overuse_intention),
            ("hasLimits", &self.has_limits),
            ("impact", &self.impact),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                missing.push(name);
            }
        }
        if self.purposes.is_empty() {
            missing.push("purposes");
        }
        missing
    }

    fn has_purpose(&self, purpose: &str) -> bool {
        self.purposes.iter().any(|p| p == purpose)
    }

    /// Usage of four hours a day or more.
    pub fn is_high_usage(&self) -> bool {
        matches!(self.daily_hours.as_str(), "4–6 giờ" | "Trên 6 giờ")
    }
}

/// Intermediate scores, exposed for reporting and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneScore {
    pub risk: u32,
    pub control: u32,
    pub positive_purpose: u32,
    pub risk_purpose: u32,
    pub high_usage: bool,
}

impl PhoneScore {
    fn purposeful(&self) -> bool {
        let total = self.positive_purpose + self.risk_purpose;
        self.high_usage
            && total > 0
            && f64::from(self.positive_purpose) / f64::from(total) >= PURPOSEFUL_RATIO
            && self.control <= PURPOSEFUL_MAX_CONTROL
    }

    pub fn group(&self) -> RiskGroup {
        if self.purposeful() {
            return RiskGroup::Purposeful;
        }
        RiskGroup::from_score(self.risk)
    }
}

fn frequency_points(answer: &str) -> u32 {
    match answer {
        "Thỉnh thoảng" => 1,
        "Thường xuyên" => 2,
        _ => 0,
    }
}

pub fn score(survey: &PhoneUsageSurvey) -> PhoneScore {
    let mut s = PhoneScore {
        high_usage: survey.is_high_usage(),
        ..Default::default()
    };

    s.risk += match survey.daily_hours.as_str() {
        "2–4 giờ" => 1,
        "4–6 giờ" => 2,
        "Trên 6 giờ" => 3,
        _ => 0,
    };

    s.risk += match survey.peak_time.as_str() {
        "Buổi chiều" => 1,
        "Buổi tối" => 2,
        "Trước khi ngủ" => 3,
        _ => 0,
    };

    if survey.has_purpose(PURPOSE_STUDY) {
        s.positive_purpose += 2;
    }
    if survey.has_purpose(PURPOSE_CONTACT) {
        s.positive_purpose += 1;
    }
    if survey.has_purpose(PURPOSE_SOCIAL) {
        s.risk += 2;
        s.risk_purpose += 2;
    }
    if survey.has_purpose(PURPOSE_ENTERTAINMENT) {
        s.risk += 3;
        s.risk_purpose += 3;
    }

    for answer in [&survey.usage_during_study, &survey.overuse_intention] {
        let p = frequency_points(answer);
        s.risk += p;
        s.control += p;
    }

    let limits = match survey.has_limits.as_str() {
        "Có nhưng ít khi tuân thủ" => 1,
        "Không đặt giới hạn" => 2,
        _ => 0,
    };
    s.risk += limits;
    s.control += limits;

    s.risk += match survey.impact.as_str() {
        "Có nhưng không đáng kể" => 1,
        "Có và ảnh hưởng rõ rệt" => 3,
        _ => 0,
    };

    s
}

/// Classify phone usage into one of the five advice groups.
pub fn classify(survey: &PhoneUsageSurvey) -> AnalysisGroup {
    let score = score(survey);
    let group = score.group();
    tracing::debug!(?score, ?group, "classified phone usage");
    result_for(group)
}

pub fn result_for(group: RiskGroup) -> AnalysisGroup {
    let (title, description, advice): (&str, &str, &[&str]) = match group {
        RiskGroup::Purposeful => (
            "Dùng nhiều vì mục đích tốt",
            "Bạn sử dụng điện thoại nhiều nhưng chủ yếu phục vụ học tập/công việc và vẫn giữ được kiểm soát.",
            &[
                "Duy trì thói quen hiện tại",
                "Chú ý nghỉ ngơi mắt mỗi 20 phút (Quy tắc 20-20-20)",
            ],
        ),
        RiskGroup::Severe => (
            "Dư thừa / Không hợp lý",
            "Mức độ sử dụng báo động, ảnh hưởng tiêu cực đến cuộc sống.",
            &[
                "Cần cai nghiện Dopamine ngay lập tức",
                "Xóa app MXH khỏi điện thoại",
                "Nhờ người thân giám sát",
            ],
        ),
        RiskGroup::AtRisk => (
            "Mức độ sử dụng có nguy cơ",
            "Bạn đang dành quá nhiều thời gian cho giải trí, cần điều chỉnh.",
            &[
                "Đặt giới hạn thời gian ứng dụng",
                "Không mang điện thoại lên giường ngủ",
            ],
        ),
        RiskGroup::Mild => (
            "Hơi dư thừa",
            "Thỉnh thoảng bạn vẫn bị cuốn vào điện thoại nhưng chưa quá nghiêm trọng.",
            &[
                "Tắt thông báo không cần thiết",
                "Ưu tiên học xong mới giải trí",
            ],
        ),
        RiskGroup::Healthy => (
            "Sử dụng Hợp lý",
            "Bạn kiểm soát rất tốt công nghệ. Xin chúc mừng!",
            &[
                "Tiếp tục duy trì",
                "Dùng thời gian rảnh để phát triển kỹ năng mềm",
            ],
        ),
    };
    AnalysisGroup::new(group, title, description, advice)
}
