// file: src/models/evaluation.rs
// description: scheduled assessment events tied to a course, faculty member, room and time

use crate::scheduling::TimeInterval;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub evaluation_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subject: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub course_id: Option<String>,
    pub faculty_id: String,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

impl Evaluation {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::on(self.date, self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewEvaluation {
    pub title: String,
    pub description: String,
    pub subject: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    pub faculty_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    pub created_by: String,
    pub is_published: bool,
}

impl NewEvaluation {
    pub fn interval(&self) -> TimeInterval {
        TimeInterval::on(self.date, self.start_time, self.end_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_decodes_postgres_types() {
        let row = r#"{
            "evaluation_id": "e1",
            "title": "Quiz 1",
            "type": "quiz",
            "date": "2025-03-04",
            "start_time": "10:00:00",
            "end_time": "11:00:00",
            "faculty_id": "f1"
        }"#;
        let evaluation: Evaluation = serde_json::from_str(row).unwrap();
        assert_eq!(evaluation.kind, "quiz");
        assert!(!evaluation.is_published);
        assert_eq!(evaluation.interval().duration_minutes(), 60);
    }

    #[test]
    fn test_new_evaluation_wire_shape() {
        let draft = NewEvaluation {
            title: "Mid Sem".to_string(),
            description: String::new(),
            subject: "Algorithms".to_string(),
            kind: "exam".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 6).unwrap(),
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            course_id: None,
            faculty_id: "f1".to_string(),
            room_id: None,
            created_by: "f1".to_string(),
            is_published: false,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["type"], "exam");
        assert_eq!(json["date"], "2025-03-06");
        assert_eq!(json["start_time"], "14:00:00");
        assert!(json.get("course_id").is_none());
    }
}
