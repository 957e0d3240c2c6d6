// file: src/models/schedule.rs
// description: course-to-room-to-timeslot assignment records

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub schedule_id: String,
    pub course_id: String,
    pub faculty_id: String,
    #[serde(default)]
    pub cohort_id: Option<String>,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub slot_id: Option<String>,
    #[serde(default)]
    pub semester: String,
    #[serde(default)]
    pub academic_year: String,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewSchedule {
    pub course_id: String,
    pub faculty_id: String,
    pub cohort_id: String,
    pub room_id: String,
    pub slot_id: String,
    pub semester: String,
    pub academic_year: String,
    pub is_active: bool,
}
