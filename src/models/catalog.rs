// file: src/models/catalog.rs
// description: reference data listed on dashboards: departments, courses, rooms, slots, cohorts

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Department {
    pub department_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(alias = "course_id")]
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub department_id: Option<String>,
}

/// Partial update; absent fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CourseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl CourseUpdate {
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.name.is_none() && self.department.is_none()
    }

    pub fn apply(&self, course: &mut Course) {
        if let Some(code) = &self.code {
            course.code = code.clone();
        }
        if let Some(name) = &self.name {
            course.name = name.clone();
        }
        if let Some(department) = &self.department {
            course.department = Some(department.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub room_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub slot_id: String,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cohort {
    pub cohort_id: String,
    pub name: String,
    #[serde(default)]
    pub department_id: Option<String>,
}
