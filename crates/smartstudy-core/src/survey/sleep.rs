//! Sleep-quality scoring.
//!
//! Duration, bed time and time-to-sleep are matched exactly. The remaining
//! answers are matched by substring, checked in order with the first hit
//! winning, so slightly reworded options still score.

use serde::{Deserialize, Serialize};

use super::{AnalysisGroup, RiskGroup};

pub const DURATION: [&str; 5] = ["Dưới 5 giờ", "5–6 giờ", "6–7 giờ", "7–9 giờ", "Trên 9 giờ"];
pub const BED_TIME: [&str; 4] = ["Trước 22h", "22h–23h", "23h–0h", "Sau 0h"];
pub const FALL_ASLEEP: [&str; 4] = ["Dưới 15 phút", "15–30 phút", "30–60 phút", "Trên 60 phút"];
pub const QUALITY: [&str; 4] = [
    "Ngủ sâu, ít tỉnh giấc",
    "Thỉnh thoảng tỉnh giấc",
    "Hay tỉnh giấc, ngủ không sâu",
    "Rất khó ngủ / thường xuyên mất ngủ",
];
pub const PRE_SLEEP_DEVICE: [&str; 4] = ["Không", "Có, dưới 30 phút", "Có, 30–60 phút", "Có, trên 60 phút"];
pub const WAKE_UP: [&str; 4] = [
    "Tỉnh táo, tràn đầy năng lượng",
    "Bình thường",
    "Mệt mỏi, buồn ngủ",
    "Rất mệt, khó tập trung",
];
pub const IMPACT: [&str; 3] = ["Không", "Ảnh hưởng nhẹ", "Ảnh hưởng rõ rệt"];

/// Answers to the sleep questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSurvey {
    pub sleep_duration: String,
    pub bed_time: String,
    pub fall_asleep_time: String,
    pub sleep_quality: String,
    pub pre_sleep_device: String,
    pub wake_up_state: String,
    pub impact: String,
}

impl SleepSurvey {
    pub fn missing_answers(&self) -> Vec<&'static str> {
        [
            ("sleepDuration", &self.sleep_duration),
            ("bedTime", &self.bed_time),
            ("fallAsleepTime", &self.fall_asleep_time),
            ("sleepQuality", &self.sleep_quality),
            ("preSleepDevice", &self.pre_sleep_device),
            ("wakeUpState", &self.wake_up_state),
            ("impact", &self.impact),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// First matching `(needle, points)` pair, or 0.
fn substring_points(answer: &str, table: &[(&str, u32)]) -> u32 {
    table
        .iter()
        .find(|(needle, _)| answer.contains(needle))
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

const QUALITY_POINTS: [(&str, u32); 3] = [("Thỉnh thoảng", 1), ("Hay tỉnh", 2), ("Rất khó", 3)];
const DEVICE_POINTS: [(&str, u32); 3] = [("dưới 30 phút", 1), ("30–60 phút", 2), ("trên 60 phút", 3)];
const WAKE_POINTS: [(&str, u32); 3] = [("Bình thường", 1), ("Mệt mỏi", 2), ("Rất mệt", 3)];
const IMPACT_POINTS: [(&str, u32); 2] = [("nhẹ", 1), ("rõ rệt", 3)];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepScore {
    pub total: u32,
    /// Short-sleep points; oversleeping does not count here.
    pub shortness: u32,
    pub quality: u32,
    pub impact: u32,
}

impl SleepScore {
    /// Short sleep that is still restful and not hurting daily life.
    fn trade_off(&self) -> bool {
        self.shortness >= 1 && self.quality <= 1 && self.impact <= 1
    }

    pub fn group(&self) -> RiskGroup {
        if self.trade_off() {
            return RiskGroup::Purposeful;
        }
        RiskGroup::from_score(self.total)
    }
}

pub fn score(survey: &SleepSurvey) -> SleepScore {
    let duration = match survey.sleep_duration.as_str() {
        "6–7 giờ" => 1,
        "5–6 giờ" => 2,
        "Dưới 5 giờ" | "Trên 9 giờ" => 3,
        _ => 0,
    };
    let shortness = match survey.sleep_duration.as_str() {
        "6–7 giờ" => 1,
        "5–6 giờ" => 2,
        "Dưới 5 giờ" => 3,
        _ => 0,
    };
    let bed = match survey.bed_time.as_str() {
        "22h–23h" => 1,
        "23h–0h" => 2,
        "Sau 0h" => 3,
        _ => 0,
    };
    let fall_asleep = match survey.fall_asleep_time.as_str() {
        "15–30 phút" => 1,
        "30–60 phút" => 2,
        "Trên 60 phút" => 3,
        _ => 0,
    };
    let quality = substring_points(&survey.sleep_quality, &QUALITY_POINTS);
    let device = substring_points(&survey.pre_sleep_device, &DEVICE_POINTS);
    let wake = substring_points(&survey.wake_up_state, &WAKE_POINTS);
    let impact = substring_points(&survey.impact, &IMPACT_POINTS);

    SleepScore {
        total: duration + bed + fall_asleep + quality + device + wake + impact,
        shortness,
        quality,
        impact,
    }
}

pub fn classify(survey: &SleepSurvey) -> AnalysisGroup {
    let score = score(survey);
    let group = score.group();
    tracing::debug!(?score, ?group, "classified sleep");
    result_for(group)
}

pub fn result_for(group: RiskGroup) -> AnalysisGroup {
    let (title, description, advice): (&str, &str, &[&str]) = match group {
        RiskGroup::Purposeful => (
            "Ngủ ít do Học tập/Công việc",
            "Bạn ngủ ít nhưng chất lượng vẫn ổn. Đây là sự đánh đổi tạm thời.",
            &[
                "Tranh thủ ngủ trưa 20-30 phút",
                "Ngủ bù vào cuối tuần nhưng không quá đà",
                "Đừng kéo dài tình trạng này quá lâu",
            ],
        ),
        RiskGroup::Severe => (
            "Rối loạn giấc ngủ",
            "Chất lượng giấc ngủ rất kém, ảnh hưởng nghiêm trọng đến sức khỏe.",
            &[
                "Không dùng cafein sau 2h chiều",
                "Cân nhắc gặp bác sĩ nếu kéo dài",
                "Thiết lập giờ ngủ cố định tuyệt đối",
            ],
        ),
        RiskGroup::AtRisk => (
            "Giấc ngủ kém",
            "Bạn thường xuyên ngủ không sâu và mệt mỏi.",
            &[
                "Thư giãn 30p trước khi ngủ (đọc sách, nghe nhạc)",
                "Không dùng điện thoại trước khi ngủ 1 tiếng",
            ],
        ),
        RiskGroup::Mild => (
            "Tương đối ổn",
            "Đôi khi bạn ngủ muộn hoặc hơi mệt, nhưng vẫn trong tầm kiểm soát.",
            &[
                "Cố gắng ngủ sớm hơn 30 phút",
                "Tạo không gian ngủ tối và yên tĩnh",
            ],
        ),
        RiskGroup::Healthy => (
            "Giấc ngủ Lành mạnh",
            "Bạn có thói quen ngủ tuyệt vời. Cơ thể bạn đang được phục hồi rất tốt.",
            &[
                "Tiếp tục duy trì lịch sinh hoạt này",
                "Tập thể dục đều đặn để giữ vững phong độ",
            ],
        ),
    };
    AnalysisGroup::new(group, title, description, advice)
}
