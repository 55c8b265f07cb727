use chrono::{NaiveDate, Utc};
use indoc::formatdoc;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use super::{resolve_api_key, ProfileInsight, RemediationPlan};
use crate::error::{AiError, CoreError};
use crate::schedule::{check_duration, ClockTime, Task, TaskCategory};
use crate::storage::AiConfig;
use crate::survey::PhoneUsageSurvey;

/// Thin client for `models/{model}:generateContent` with JSON-mode output.
pub struct GeminiClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: String,
}

/// One block of a generated day plan, before it becomes a [`Task`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlannedBlock {
    title: String,
    start_time: ClockTime,
    duration: f64,
    category: TaskCategory,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &AiConfig, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: api_key.into(),
        }
    }

    /// Build a client with the key from the environment or keyring.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        Ok(Self::new(config, resolve_api_key()?))
    }

    /// Ask for a pomodoro-style plan for `date`. Returns no tasks on failure.
    pub async fn generate_smart_schedule(&self, focus: &[String], date: NaiveDate, hours: u32) -> Vec<Task> {
        match self.request_schedule(focus, date, hours).await {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::error!(error = %e, "error generating schedule");
                Vec::new()
            }
        }
    }

    /// Ask a tutor-style explanation and step plan for a weak topic.
    pub async fn generate_remediation_plan(&self, subject: &str, weakness: &str) -> Option<RemediationPlan> {
        let prompt = formatdoc! {"
            Tôi là sinh viên đang gặp khó khăn môn: {subject}.
            Vấn đề cụ thể: {weakness}.
            Hãy đóng vai gia sư giỏi, giải thích ngắn gọn khái niệm này bằng tiếng Việt.
            Sau đó đưa ra lộ trình 3-5 bước để khắc phục điểm yếu này.
            Cuối cùng, đưa ra 1 câu hỏi trắc nghiệm để kiểm tra.
        "};
        self.generate(&prompt, remediation_schema())
            .await
            .map_err(|e| tracing::error!(error = %e, "error creating remediation plan"))
            .ok()
    }

    /// Let the model read the phone survey and suggest a method and roadmap.
    pub async fn analyze_profile(&self, survey: &PhoneUsageSurvey) -> Option<ProfileInsight> {
        let answers = match serde_json::to_string(survey) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "could not encode survey");
                return None;
            }
        };
        let prompt = formatdoc! {r#"
            Bạn là SSR (Smart Study Rhythm). Hãy phân tích dữ liệu sử dụng điện thoại của sinh viên:
            {answers}

            Quy tắc phân loại:
            1. Nếu dailyHours là "Dưới 2 giờ" hoặc "2–4 giờ" -> Mức độ: REASONABLE (Hợp lý).
            2. Nếu dailyHours là "4–6 giờ" -> Mức độ: AT_RISK (Có nguy cơ).
            3. Nếu dailyHours là "Trên 6 giờ" -> Mức độ: EXCESSIVE (Dư thừa).

            Dựa trên mức độ đó, hãy tạo ra một bản báo cáo JSON.
            - usageSummary: Tổng quan ngắn gọn về thói quen.
            - adviceList: Các lời khuyên cụ thể (ví dụ: Tắt thông báo, dùng Pomodoro, không dùng trước khi ngủ).
            - studyMethodRecommendation: Đề xuất một phương pháp học tập phù hợp để khắc phục sự xao nhãng.
            - roadmap: Lộ trình 3 giai đoạn để cải thiện bản thân và học tập tốt hơn.
        "#};
        self.generate(&prompt, insight_schema())
            .await
            .map_err(|e| tracing::error!(error = %e, "error analyzing profile"))
            .ok()
    }

    async fn request_schedule(&self, focus: &[String], date: NaiveDate, hours: u32) -> Result<Vec<Task>, AiError> {
        let prompt = formatdoc! {r#"
            I am a student needing a schedule for {date}.
            I have {hours} hours available to study.
            My focus tasks/subjects are: {focus}.

            IMPORTANT: Create a "Pomodoro" style schedule.
            1. Break the study time into intervals of 25 minutes for "study" and 5 minutes for "break".
            2. Every 4 Pomodoros (approx 2 hours), schedule a longer break (15-20 mins).
            3. Assign specific subjects from my focus list to the study blocks.
            4. Return a JSON array of tasks.
        "#, focus = focus.join(", ")};

        let raw: Vec<Value> = self.generate(&prompt, schedule_schema()).await?;
        let stamp = Utc::now().timestamp_millis();
        let tasks = raw
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| match planned_task(value, date) {
                Ok(task) => Some(Task {
                    id: format!("auto-{stamp}-{i}"),
                    ..task
                }),
                Err(e) => {
                    tracing::warn!(index = i, error = %e, "skipping generated block");
                    None
                }
            })
            .collect();
        Ok(tasks)
    }

    async fn generate<T: DeserializeOwned>(&self, prompt: &str, schema: Value) -> Result<T, AiError> {
        let endpoint = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let url = Url::parse_with_params(&endpoint, &[("key", self.api_key.as_str())])?;
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema,
            }
        });

        tracing::debug!(model = %self.model, "generateContent");
        let resp = self.http.post(url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await?;
        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(AiError::EmptyResponse)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Turn one generated block into a task on `date`; the caller assigns the id.
fn planned_task(value: Value, date: NaiveDate) -> Result<Task, CoreError> {
    let block: PlannedBlock = serde_json::from_value(value)?;
    let duration = check_duration(block.duration.max(0.0).round() as u32)?;
    Ok(Task {
        id: String::new(),
        title: block.title,
        date,
        start_time: block.start_time,
        duration,
        category: block.category,
        completed: false,
        description: None,
        actual_duration: None,
    })
}

fn schedule_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "startTime": { "type": "STRING", "description": "Format HH:mm" },
                "duration": { "type": "NUMBER", "description": "Duration in minutes" },
                "category": { "type": "STRING", "enum": ["study", "project", "break", "review"] }
            },
            "required": ["title", "startTime", "duration", "category"]
        }
    })
}

fn remediation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "topic": { "type": "STRING" },
            "explanation": { "type": "STRING" },
            "steps": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "step": { "type": "INTEGER" },
                        "action": { "type": "STRING" },
                        "resource": { "type": "STRING" }
                    }
                }
            },
            "quizQuestion": { "type": "STRING" }
        }
    })
}

fn insight_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "usageLevel": { "type": "STRING", "enum": ["REASONABLE", "AT_RISK", "EXCESSIVE"] },
            "usageLevelLabel": { "type": "STRING" },
            "usageSummary": { "type": "STRING" },
            "adviceList": { "type": "ARRAY", "items": { "type": "STRING" } },
            "studyMethodRecommendation": {
                "type": "OBJECT",
                "properties": {
                    "methodName": { "type": "STRING" },
                    "description": { "type": "STRING" },
                    "reason": { "type": "STRING" }
                }
            },
            "roadmap": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "phase": { "type": "STRING" },
                        "focus": { "type": "STRING" },
                        "duration": { "type": "STRING" }
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::UsageLevel;
    use mockito::Matcher;

    const PATH: &str = r"^/v1beta/models/gemini-test:generateContent";

    fn client(server: &mockito::Server) -> GeminiClient {
        let config = AiConfig {
            model: "gemini-test".into(),
            base_url: format!("{}/", server.url()),
        };
        GeminiClient::new(&config, "test-key")
    }

    fn reply(text: &str) -> String {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }).to_string()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    #[tokio::test]
    async fn schedule_is_parsed_into_tasks() {
        let mut server = mockito::Server::new_async().await;
        let plan = json!([
            { "title": "Giải tích", "startTime": "08:00", "duration": 25, "category": "study" },
            { "title": "Nghỉ", "startTime": "08:25", "duration": 5.0, "category": "break" }
        ]);
        let mock = server
            .mock("POST", Matcher::Regex(PATH.into()))
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": { "responseMimeType": "application/json" }
            })))
            .with_header("content-type", "application/json")
            .with_body(reply(&plan.to_string()))
            .create_async()
            .await;

        let tasks = client(&server)
            .generate_smart_schedule(&["Giải tích".into()], date(), 2)
            .await;
        mock.assert_async().await;

        assert_eq!(tasks.len(), 2);
        assert!(tasks[0].id.starts_with("auto-"));
        assert!(tasks[1].id.ends_with("-1"));
        assert_eq!(tasks[0].date, date());
        assert_eq!(tasks[1].category, TaskCategory::Break);
        assert_eq!(tasks[1].duration, 5);
        assert!(tasks.iter().all(|t| !t.completed));
    }

    #[tokio::test]
    async fn bad_blocks_are_skipped_and_good_ones_kept() {
        let mut server = mockito::Server::new_async().await;
        let plan = json!([
            { "title": "Giải tích", "startTime": "08:00", "duration": 25, "category": "study" },
            { "title": "Sai giờ", "startTime": "8:00 AM", "duration": 5, "category": "break" },
            { "title": "Ngủ trưa", "startTime": "08:25", "duration": 5, "category": "nap" },
            { "title": "Cả tuần", "startTime": "08:30", "duration": 10080, "category": "study" },
            { "title": "Ôn tập", "startTime": "08:30", "duration": 25, "category": "review" }
        ]);
        server
            .mock("POST", Matcher::Regex(PATH.into()))
            .match_query(Matcher::Any)
            .with_body(reply(&plan.to_string()))
            .create_async()
            .await;

        let tasks = client(&server).generate_smart_schedule(&[], date(), 1).await;
        let titles: Vec<_> = tasks.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Giải tích", "Ôn tập"]);
        assert!(tasks[0].id.ends_with("-0"));
        assert!(tasks[1].id.ends_with("-4"));
    }

    #[tokio::test]
    async fn http_error_gives_empty_schedule() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Regex(PATH.into()))
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("boom")
            .create_async()
            .await;

        let tasks = client(&server).generate_smart_schedule(&[], date(), 1).await;
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn malformed_text_gives_empty_schedule() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Regex(PATH.into()))
            .match_query(Matcher::Any)
            .with_body(reply("not json at all"))
            .create_async()
            .await;

        let tasks = client(&server).generate_smart_schedule(&[], date(), 1).await;
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn remediation_plan_parsed() {
        let mut server = mockito::Server::new_async().await;
        let plan = json!({
            "topic": "Đạo hàm",
            "explanation": "Đạo hàm là tốc độ thay đổi.",
            "steps": [
                { "step": 1, "action": "Ôn định nghĩa", "resource": "SGK chương 2" },
                { "step": 2, "action": "Làm bài tập" }
            ],
            "quizQuestion": "Đạo hàm của x^2 là gì?"
        });
        server
            .mock("POST", Matcher::Regex(PATH.into()))
            .match_query(Matcher::Any)
            .with_body(reply(&plan.to_string()))
            .create_async()
            .await;

        let plan = client(&server)
            .generate_remediation_plan("Toán", "Không hiểu đạo hàm")
            .await
            .unwrap();
        assert_eq!(plan.steps.len(), 2);
        assert_eq!(plan.steps[1].resource, None);
        assert_eq!(plan.quiz_question, "Đạo hàm của x^2 là gì?");
    }

    #[tokio::test]
    async fn empty_candidates_give_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", Matcher::Regex(PATH.into()))
            .match_query(Matcher::Any)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        assert!(client(&server)
            .generate_remediation_plan("Toán", "x")
            .await
            .is_none());
    }

    #[tokio::test]
    async fn profile_insight_parsed() {
        let mut server = mockito::Server::new_async().await;
        let insight = json!({
            "usageLevel": "AT_RISK",
            "usageLevelLabel": "Có nguy cơ",
            "usageSummary": "Dùng nhiều vào buổi tối.",
            "adviceList": ["Tắt thông báo"],
            "studyMethodRecommendation": {
                "methodName": "Pomodoro",
                "description": "25/5",
                "reason": "Giữ nhịp tập trung"
            },
            "roadmap": [{ "phase": "Tuần 1", "focus": "Giảm giờ dùng", "duration": "7 ngày" }]
        });
        server
            .mock("POST", Matcher::Regex(PATH.into()))
            .match_query(Matcher::Any)
            .with_body(reply(&insight.to_string()))
            .create_async()
            .await;

        let survey = PhoneUsageSurvey::default();
        let insight = client(&server).analyze_profile(&survey).await.unwrap();
        assert_eq!(insight.usage_level, UsageLevel::AtRisk);
        assert_eq!(insight.study_method_recommendation.method_name, "Pomodoro");
        assert_eq!(insight.roadmap[0].details, None);
    }
}
