// file: src/backend/store.rs
// description: storage port implemented by the REST adapter and the in-memory adapter

use crate::error::Result;
use crate::models::{
    Cohort, Comment, Course, CourseUpdate, Department, Evaluation, FacultyProfile, NewComment,
    NewEvaluation, NewReaction, NewSchedule, NewUser, Reaction, ReactionTarget, Role, Room,
    Schedule, StudentProfile, TimeSlot, User,
};
use async_trait::async_trait;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseFilter {
    pub department_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleFilter {
    pub faculty_id: Option<String>,
    pub cohort_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationFilter {
    pub faculty_id: Option<String>,
    pub course_id: Option<String>,
}

/// Record access for every service.
///
/// Update and delete operations report whether a row matched; a missing row
/// is not an error at this layer.
#[async_trait]
pub trait PortalStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;
    async fn list_users(&self) -> Result<Vec<User>>;
    async fn insert_user(&self, user: &NewUser) -> Result<User>;
    async fn update_user_role(&self, id: &str, role: Role) -> Result<bool>;
    async fn delete_user(&self, id: &str) -> Result<bool>;

    async fn list_departments(&self) -> Result<Vec<Department>>;
    async fn find_department_by_name(&self, name: &str) -> Result<Option<Department>>;
    async fn find_department_by_id(&self, id: &str) -> Result<Option<Department>>;

    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>>;
    async fn update_course(&self, id: &str, update: &CourseUpdate) -> Result<Option<Course>>;
    async fn delete_course(&self, id: &str) -> Result<bool>;

    async fn list_rooms(&self, available_only: bool) -> Result<Vec<Room>>;
    async fn list_time_slots(&self, day_of_week: Option<&str>) -> Result<Vec<TimeSlot>>;
    async fn list_cohorts(&self, department_id: Option<&str>) -> Result<Vec<Cohort>>;

    async fn list_schedules(&self, filter: &ScheduleFilter) -> Result<Vec<Schedule>>;
    async fn insert_schedule(&self, schedule: &NewSchedule) -> Result<Schedule>;

    async fn list_evaluations(&self, filter: &EvaluationFilter) -> Result<Vec<Evaluation>>;
    async fn insert_evaluation(&self, evaluation: &NewEvaluation) -> Result<Evaluation>;

    /// Oldest first.
    async fn list_comments(&self, evaluation_id: &str) -> Result<Vec<Comment>>;
    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment>;

    async fn list_reactions(&self, target: &ReactionTarget) -> Result<Vec<Reaction>>;
    async fn insert_reaction(&self, reaction: &NewReaction) -> Result<Reaction>;

    async fn list_faculty(&self) -> Result<Vec<FacultyProfile>>;
    async fn update_faculty_profile(&self, faculty_id: &str, profile: &FacultyProfile)
    -> Result<()>;
    async fn update_student_profile(&self, student_id: &str, profile: &StudentProfile)
    -> Result<()>;
}
