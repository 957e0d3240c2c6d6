// file: src/backend/memory.rs
// description: in-process store used for offline mode and service tests

use super::store::{CourseFilter, EvaluationFilter, PortalStore, ScheduleFilter};
use crate::auth::password;
use crate::error::{PortalError, Result};
use crate::models::{
    Cohort, Comment, Course, CourseUpdate, Department, Evaluation, FacultyProfile, NewComment,
    NewEvaluation, NewReaction, NewSchedule, NewUser, Reaction, ReactionKind, ReactionTarget,
    Role, Room, Schedule, StudentProfile, TimeSlot, User,
};
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, Utc, Weekday};
use std::sync::{Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

pub const OFFLINE_ADMIN_ID: &str = "offline-admin";

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    departments: Vec<Department>,
    courses: Vec<Course>,
    rooms: Vec<Room>,
    time_slots: Vec<TimeSlot>,
    cohorts: Vec<Cohort>,
    schedules: Vec<Schedule>,
    evaluations: Vec<Evaluation>,
    comments: Vec<Comment>,
    reactions: Vec<Reaction>,
    faculty: Vec<FacultyProfile>,
    students: Vec<StudentProfile>,
    clock: Option<DateTime<Utc>>,
}

impl Tables {
    /// Strictly increasing, so insertion order survives `created_at` ordering.
    fn tick(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let next = match self.clock {
            Some(last) if last >= now => last + Duration::microseconds(1),
            _ => now,
        };
        self.clock = Some(next);
        next
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Same filter semantics as the REST adapter, with state held in a mutex.
/// Nothing is persisted: each process starts from its seed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add_department(&self, department_id: &str, name: &str) -> Department {
        let department = Department {
            department_id: department_id.to_string(),
            name: name.to_string(),
        };
        self.tables().departments.push(department.clone());
        department
    }

    pub fn add_course(&self, id: &str, code: &str, name: &str, department: &Department) -> Course {
        let course = Course {
            id: id.to_string(),
            code: code.to_string(),
            name: name.to_string(),
            department: Some(department.name.clone()),
            department_id: Some(department.department_id.clone()),
        };
        self.tables().courses.push(course.clone());
        course
    }

    pub fn add_room(&self, room_id: &str, name: &str, capacity: u32, is_available: bool) -> Room {
        let room = Room {
            room_id: room_id.to_string(),
            name: name.to_string(),
            building: None,
            capacity: Some(capacity),
            is_available,
        };
        self.tables().rooms.push(room.clone());
        room
    }

    pub fn add_time_slot(&self, slot_id: &str, day: &str, start: &str, end: &str) -> TimeSlot {
        let slot = TimeSlot {
            slot_id: slot_id.to_string(),
            day_of_week: day.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
        };
        self.tables().time_slots.push(slot.clone());
        slot
    }

    pub fn add_cohort(&self, cohort_id: &str, name: &str, department: &Department) -> Cohort {
        let cohort = Cohort {
            cohort_id: cohort_id.to_string(),
            name: name.to_string(),
            department_id: Some(department.department_id.clone()),
        };
        self.tables().cohorts.push(cohort.clone());
        cohort
    }

    /// Adds a user with a fixed id and a sealed password.
    pub fn add_user(
        &self,
        id: &str,
        name: &str,
        email: &str,
        plain_password: &str,
        role: Role,
        department: Option<&Department>,
    ) -> User {
        let user = User {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            password: Some(password::seal(plain_password)),
            role: role.as_str().to_string(),
            department_id: department.map(|d| d.department_id.clone()),
            year: (role == Role::Student).then_some(1),
        };
        self.tables().users.push(user.clone());
        user
    }

    pub fn add_evaluation(&self, id: &str, draft: NewEvaluation) -> Evaluation {
        let evaluation = evaluation_from(id.to_string(), draft);
        self.tables().evaluations.push(evaluation.clone());
        evaluation
    }

    pub fn add_comment(&self, id: &str, draft: NewComment) -> Comment {
        let mut tables = self.tables();
        let comment = comment_from(id.to_string(), draft, tables.tick());
        tables.comments.push(comment.clone());
        comment
    }

    pub fn faculty_profile(&self, faculty_id: &str) -> Option<FacultyProfile> {
        self.tables()
            .faculty
            .iter()
            .find(|profile| profile.faculty_id == faculty_id)
            .cloned()
    }

    pub fn student_profile(&self, student_id: &str) -> Option<StudentProfile> {
        self.tables()
            .students
            .iter()
            .find(|profile| profile.student_id == student_id)
            .cloned()
    }

    /// Demo data for offline mode. Ids are fixed so a saved session stays
    /// valid across runs; evaluation dates follow the current week.
    pub fn sample() -> Self {
        let store = Self::new();

        let cs = store.add_department("d-cs", "Computer Science");
        let math = store.add_department("d-math", "Mathematics");
        let physics = store.add_department("d-phy", "Physics");

        store.add_course("c-cs101", "CS101", "Introduction to Programming", &cs);
        store.add_course("c-math201", "MATH201", "Calculus II", &math);
        store.add_course("c-phy101", "PHY101", "Physics Fundamentals", &physics);

        store.add_room("r-101", "Room 101", 40, true);
        store.add_room("r-lab1", "Computer Lab 1", 30, true);
        store.add_room("r-aud", "Auditorium", 200, false);

        store.add_time_slot("ts-mon-1", "Monday", "09:00:00", "10:30:00");
        store.add_time_slot("ts-wed-1", "Wednesday", "11:00:00", "12:30:00");
        store.add_time_slot("ts-fri-1", "Friday", "14:00:00", "15:30:00");

        let cohort = store.add_cohort("k-cs-2025", "CS Batch 2025", &cs);
        store.add_cohort("k-math-2025", "Math Batch 2025", &math);

        store.add_user(
            OFFLINE_ADMIN_ID,
            "Admin",
            "admin@unival.edu",
            "admin123$",
            Role::Admin,
            None,
        );
        let faculty = store.add_user(
            "u-faculty",
            "Grace Hopper",
            "grace@unival.edu",
            "faculty123",
            Role::Faculty,
            Some(&cs),
        );
        let student = store.add_user(
            "u-student",
            "Alan Turing",
            "alan@unival.edu",
            "student123",
            Role::Student,
            Some(&cs),
        );

        {
            let mut tables = store.tables();
            tables.faculty.push(FacultyProfile {
                faculty_id: faculty.id.clone(),
                specialization: Some("Compilers".to_string()),
                office_location: Some("B-204".to_string()),
                office_hours: Some("Tue 14:00-16:00".to_string()),
                ..Default::default()
            });
            tables.schedules.push(Schedule {
                schedule_id: "s-cs101-mon".to_string(),
                course_id: "c-cs101".to_string(),
                faculty_id: faculty.id.clone(),
                cohort_id: Some(cohort.cohort_id.clone()),
                room_id: Some("r-101".to_string()),
                slot_id: Some("ts-mon-1".to_string()),
                semester: "Fall".to_string(),
                academic_year: "2025-2026".to_string(),
                is_active: true,
            });
        }

        let first_day = next_weekday(Local::now().date_naive());
        let second_day = next_weekday(first_day + Duration::days(2));
        let quiz = store.add_evaluation(
            "e-quiz1",
            sample_evaluation("Quiz 1", "quiz", first_day, (10, 0), (11, 0), &faculty.id),
        );
        store.add_evaluation(
            "e-midsem",
            sample_evaluation("Mid Sem", "exam", second_day, (14, 0), (16, 0), &faculty.id),
        );

        let question = store.add_comment(
            "cm-1",
            NewComment {
                evaluation_id: quiz.evaluation_id.clone(),
                user_id: student.id.clone(),
                text: "Will the quiz cover recursion?".to_string(),
                parent_comment_id: None,
            },
        );
        let answer = store.add_comment(
            "cm-2",
            NewComment {
                evaluation_id: quiz.evaluation_id.clone(),
                user_id: faculty.id.clone(),
                text: "Yes, chapters 3 and 4.".to_string(),
                parent_comment_id: Some(question.comment_id.clone()),
            },
        );

        {
            let mut tables = store.tables();
            let created_at = Some(tables.tick());
            tables.reactions.push(Reaction {
                reaction_id: "rx-1".to_string(),
                evaluation_id: quiz.evaluation_id.clone(),
                user_id: student.id.clone(),
                comment_id: None,
                reaction_type: ReactionKind::ThumbsUp.emoji().to_string(),
                created_at,
            });
            tables.reactions.push(Reaction {
                reaction_id: "rx-2".to_string(),
                evaluation_id: quiz.evaluation_id.clone(),
                user_id: student.id.clone(),
                comment_id: Some(answer.comment_id.clone()),
                reaction_type: ReactionKind::Done.emoji().to_string(),
                created_at,
            });
        }

        debug!("Seeded offline sample data");
        store
    }
}

fn next_weekday(mut date: NaiveDate) -> NaiveDate {
    while matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        date += Duration::days(1);
    }
    date
}

fn sample_evaluation(
    title: &str,
    kind: &str,
    date: NaiveDate,
    start: (u32, u32),
    end: (u32, u32),
    faculty_id: &str,
) -> NewEvaluation {
    NewEvaluation {
        title: title.to_string(),
        description: String::new(),
        subject: "Introduction to Programming".to_string(),
        kind: kind.to_string(),
        date,
        start_time: NaiveTime::from_hms_opt(start.0, start.1, 0).unwrap_or_default(),
        end_time: NaiveTime::from_hms_opt(end.0, end.1, 0).unwrap_or_default(),
        course_id: Some("c-cs101".to_string()),
        faculty_id: faculty_id.to_string(),
        room_id: Some("r-101".to_string()),
        created_by: faculty_id.to_string(),
        is_published: true,
    }
}

fn evaluation_from(evaluation_id: String, draft: NewEvaluation) -> Evaluation {
    Evaluation {
        evaluation_id,
        title: draft.title,
        description: draft.description,
        subject: draft.subject,
        kind: draft.kind,
        date: draft.date,
        start_time: draft.start_time,
        end_time: draft.end_time,
        course_id: draft.course_id,
        faculty_id: draft.faculty_id,
        room_id: draft.room_id,
        created_by: Some(draft.created_by),
        is_published: draft.is_published,
    }
}

fn comment_from(comment_id: String, draft: NewComment, created_at: DateTime<Utc>) -> Comment {
    Comment {
        comment_id,
        evaluation_id: draft.evaluation_id,
        user_id: draft.user_id,
        parent_comment_id: draft.parent_comment_id,
        text: draft.text,
        is_edited: false,
        created_at: Some(created_at),
        updated_at: None,
    }
}

#[async_trait]
impl PortalStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.tables().users.iter().find(|user| user.id == id).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let mut users = self.tables().users.clone();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn insert_user(&self, user: &NewUser) -> Result<User> {
        let mut tables = self.tables();
        if tables.users.iter().any(|existing| existing.email == user.email) {
            return Err(PortalError::Api {
                status: 409,
                body: "duplicate key value violates unique constraint \"users_email_key\""
                    .to_string(),
            });
        }

        let created = User {
            id: new_id(),
            name: user.name.clone(),
            email: user.email.clone(),
            password: Some(user.password.clone()),
            role: user.role.as_str().to_string(),
            department_id: Some(user.department_id.clone()),
            year: Some(user.year),
        };
        tables.users.push(created.clone());
        Ok(created)
    }

    async fn update_user_role(&self, id: &str, role: Role) -> Result<bool> {
        let mut tables = self.tables();
        match tables.users.iter_mut().find(|user| user.id == id) {
            Some(user) => {
                user.role = role.as_str().to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables();
        let before = tables.users.len();
        tables.users.retain(|user| user.id != id);
        Ok(tables.users.len() != before)
    }

    async fn list_departments(&self) -> Result<Vec<Department>> {
        let mut departments = self.tables().departments.clone();
        departments.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(departments)
    }

    async fn find_department_by_name(&self, name: &str) -> Result<Option<Department>> {
        Ok(self
            .tables()
            .departments
            .iter()
            .find(|department| department.name == name)
            .cloned())
    }

    async fn find_department_by_id(&self, id: &str) -> Result<Option<Department>> {
        Ok(self
            .tables()
            .departments
            .iter()
            .find(|department| department.department_id == id)
            .cloned())
    }

    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>> {
        let mut courses: Vec<Course> = self
            .tables()
            .courses
            .iter()
            .filter(|course| match &filter.department_id {
                Some(id) => course.department_id.as_ref() == Some(id),
                None => true,
            })
            .cloned()
            .collect();
        courses.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(courses)
    }

    async fn update_course(&self, id: &str, update: &CourseUpdate) -> Result<Option<Course>> {
        let mut tables = self.tables();
        Ok(tables
            .courses
            .iter_mut()
            .find(|course| course.id == id)
            .map(|course| {
                update.apply(course);
                course.clone()
            }))
    }

    async fn delete_course(&self, id: &str) -> Result<bool> {
        let mut tables = self.tables();
        let before = tables.courses.len();
        tables.courses.retain(|course| course.id != id);
        Ok(tables.courses.len() != before)
    }

    async fn list_rooms(&self, available_only: bool) -> Result<Vec<Room>> {
        Ok(self
            .tables()
            .rooms
            .iter()
            .filter(|room| !available_only || room.is_available)
            .cloned()
            .collect())
    }

    async fn list_time_slots(&self, day_of_week: Option<&str>) -> Result<Vec<TimeSlot>> {
        let mut slots: Vec<TimeSlot> = self
            .tables()
            .time_slots
            .iter()
            .filter(|slot| day_of_week.is_none_or(|day| slot.day_of_week == day))
            .cloned()
            .collect();
        slots.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(slots)
    }

    async fn list_cohorts(&self, department_id: Option<&str>) -> Result<Vec<Cohort>> {
        Ok(self
            .tables()
            .cohorts
            .iter()
            .filter(|cohort| {
                department_id.is_none_or(|id| cohort.department_id.as_deref() == Some(id))
            })
            .cloned()
            .collect())
    }

    async fn list_schedules(&self, filter: &ScheduleFilter) -> Result<Vec<Schedule>> {
        Ok(self
            .tables()
            .schedules
            .iter()
            .filter(|schedule| {
                filter
                    .faculty_id
                    .as_ref()
                    .is_none_or(|id| &schedule.faculty_id == id)
                    && filter
                        .cohort_id
                        .as_ref()
                        .is_none_or(|id| schedule.cohort_id.as_ref() == Some(id))
            })
            .cloned()
            .collect())
    }

    async fn insert_schedule(&self, schedule: &NewSchedule) -> Result<Schedule> {
        let created = Schedule {
            schedule_id: new_id(),
            course_id: schedule.course_id.clone(),
            faculty_id: schedule.faculty_id.clone(),
            cohort_id: Some(schedule.cohort_id.clone()),
            room_id: Some(schedule.room_id.clone()),
            slot_id: Some(schedule.slot_id.clone()),
            semester: schedule.semester.clone(),
            academic_year: schedule.academic_year.clone(),
            is_active: schedule.is_active,
        };
        self.tables().schedules.push(created.clone());
        Ok(created)
    }

    async fn list_evaluations(&self, filter: &EvaluationFilter) -> Result<Vec<Evaluation>> {
        let mut evaluations: Vec<Evaluation> = self
            .tables()
            .evaluations
            .iter()
            .filter(|evaluation| {
                filter
                    .faculty_id
                    .as_ref()
                    .is_none_or(|id| &evaluation.faculty_id == id)
                    && filter
                        .course_id
                        .as_ref()
                        .is_none_or(|id| evaluation.course_id.as_ref() == Some(id))
            })
            .cloned()
            .collect();
        evaluations.sort_by_key(|evaluation| (evaluation.date, evaluation.start_time));
        Ok(evaluations)
    }

    async fn insert_evaluation(&self, evaluation: &NewEvaluation) -> Result<Evaluation> {
        let created = evaluation_from(new_id(), evaluation.clone());
        self.tables().evaluations.push(created.clone());
        Ok(created)
    }

    async fn list_comments(&self, evaluation_id: &str) -> Result<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .tables()
            .comments
            .iter()
            .filter(|comment| comment.evaluation_id == evaluation_id)
            .cloned()
            .collect();
        // nulls last, as Postgres orders them
        comments.sort_by_key(|comment| (comment.created_at.is_none(), comment.created_at));
        Ok(comments)
    }

    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment> {
        let mut tables = self.tables();
        let created = comment_from(new_id(), comment.clone(), tables.tick());
        tables.comments.push(created.clone());
        Ok(created)
    }

    async fn list_reactions(&self, target: &ReactionTarget) -> Result<Vec<Reaction>> {
        Ok(self
            .tables()
            .reactions
            .iter()
            .filter(|reaction| match target {
                ReactionTarget::Evaluation(id) => {
                    &reaction.evaluation_id == id && reaction.comment_id.is_none()
                }
                ReactionTarget::Comment(id) => reaction.comment_id.as_ref() == Some(id),
            })
            .cloned()
            .collect())
    }

    async fn insert_reaction(&self, reaction: &NewReaction) -> Result<Reaction> {
        let mut tables = self.tables();
        let created = Reaction {
            reaction_id: new_id(),
            evaluation_id: reaction.evaluation_id.clone(),
            user_id: reaction.user_id.clone(),
            comment_id: reaction.comment_id.clone(),
            reaction_type: reaction.reaction_type.clone(),
            created_at: Some(tables.tick()),
        };
        tables.reactions.push(created.clone());
        Ok(created)
    }

    async fn list_faculty(&self) -> Result<Vec<FacultyProfile>> {
        Ok(self.tables().faculty.clone())
    }

    async fn update_faculty_profile(
        &self,
        faculty_id: &str,
        profile: &FacultyProfile,
    ) -> Result<()> {
        let mut tables = self.tables();
        let updated = FacultyProfile {
            faculty_id: faculty_id.to_string(),
            ..profile.clone()
        };
        match tables
            .faculty
            .iter_mut()
            .find(|existing| existing.faculty_id == faculty_id)
        {
            Some(existing) => *existing = updated,
            None => tables.faculty.push(updated),
        }
        Ok(())
    }

    async fn update_student_profile(
        &self,
        student_id: &str,
        profile: &StudentProfile,
    ) -> Result<()> {
        let mut tables = self.tables();
        let updated = StudentProfile {
            student_id: student_id.to_string(),
            ..profile.clone()
        };
        match tables
            .students
            .iter_mut()
            .find(|existing| existing.student_id == student_id)
        {
            Some(existing) => *existing = updated,
            None => tables.students.push(updated),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_data_is_consistent() {
        let store = MemoryStore::sample();

        let courses = store.list_courses(&CourseFilter::default()).await.unwrap();
        let codes: Vec<&str> = courses.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["CS101", "MATH201", "PHY101"]);

        let evaluations = store
            .list_evaluations(&EvaluationFilter {
                faculty_id: Some("u-faculty".to_string()),
                course_id: None,
            })
            .await
            .unwrap();
        assert_eq!(evaluations.len(), 2);
        for evaluation in &evaluations {
            assert!(!matches!(
                evaluation.date.weekday(),
                Weekday::Sat | Weekday::Sun
            ));
        }
    }

    #[tokio::test]
    async fn test_reaction_targets_are_disjoint() {
        let store = MemoryStore::sample();
        let on_evaluation = store
            .list_reactions(&ReactionTarget::Evaluation("e-quiz1".to_string()))
            .await
            .unwrap();
        let on_comment = store
            .list_reactions(&ReactionTarget::Comment("cm-2".to_string()))
            .await
            .unwrap();
        assert_eq!(on_evaluation.len(), 1);
        assert_eq!(on_comment.len(), 1);
        assert_ne!(on_evaluation[0].reaction_id, on_comment[0].reaction_id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryStore::sample();
        let result = store
            .insert_user(&NewUser {
                name: "Imposter".to_string(),
                email: "grace@unival.edu".to_string(),
                password: "x".to_string(),
                role: Role::Faculty,
                department_id: "d-cs".to_string(),
                year: 0,
            })
            .await;
        assert!(matches!(result, Err(PortalError::Api { status: 409, .. })));
    }

    #[tokio::test]
    async fn test_comments_keep_insertion_order() {
        let store = MemoryStore::new();
        for text in ["first", "second", "third"] {
            store
                .insert_comment(&NewComment {
                    evaluation_id: "e1".to_string(),
                    user_id: "u1".to_string(),
                    text: text.to_string(),
                    parent_comment_id: None,
                })
                .await
                .unwrap();
        }
        let texts: Vec<String> = store
            .list_comments("e1")
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_report_matches() {
        let store = MemoryStore::sample();
        assert!(store.update_user_role("u-student", Role::Faculty).await.unwrap());
        assert!(!store.update_user_role("missing", Role::Faculty).await.unwrap());
        assert!(store.delete_course("c-phy101").await.unwrap());
        assert!(!store.delete_course("c-phy101").await.unwrap());
    }
}
