// file: src/admin/service.rs
// description: user, course and schedule administration plus reports

use super::report::{Report, ReportKind, ReportRange, ReportRow};
use crate::auth::Session;
use crate::backend::{
    CourseFilter, EvaluationFilter, OFFLINE_ADMIN_ID, PortalStore, ScheduleFilter,
};
use crate::config::OfflineConfig;
use crate::error::{PortalError, Result};
use crate::models::{
    Course, CourseUpdate, FacultyProfile, NewSchedule, Role, Schedule, User,
};
use crate::utils::Validator;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub role: Option<Role>,
    /// Case-insensitive substring of name or email.
    pub search: Option<String>,
}

impl UserQuery {
    pub fn matches(&self, user: &User) -> bool {
        if let Some(role) = self.role {
            if !user.role.eq_ignore_ascii_case(role.as_str()) {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                user.name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
            }
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FacultyMember {
    pub profile: FacultyProfile,
    pub name: String,
    pub email: Option<String>,
}

pub struct AdminService {
    store: Arc<dyn PortalStore>,
    offline_admin: bool,
}

impl AdminService {
    pub fn new(store: Arc<dyn PortalStore>) -> Self {
        Self {
            store,
            offline_admin: false,
        }
    }

    /// Accepts the configured offline administrator, who has no backend row.
    pub fn with_offline(mut self, offline: &OfflineConfig) -> Self {
        self.offline_admin = offline.enabled;
        self
    }

    /// The session file is editable, so its role is confirmed against the
    /// backend before any admin operation.
    async fn require_admin(&self, session: &Session) -> Result<()> {
        session.require_admin()?;
        if self.offline_admin && session.user_id == OFFLINE_ADMIN_ID {
            return Ok(());
        }
        if !self.is_admin(&session.user_id).await? {
            return Err(PortalError::forbidden(format!(
                "{} is not an administrator",
                session.email
            )));
        }
        Ok(())
    }

    /// Looks the role up in the backend rather than trusting a session.
    pub async fn is_admin(&self, user_id: &str) -> Result<bool> {
        Ok(self
            .store
            .find_user_by_id(user_id)
            .await?
            .is_some_and(|user| matches!(user.role(), Ok(Role::Admin))))
    }

    pub async fn users(&self, session: &Session, query: &UserQuery) -> Result<Vec<User>> {
        self.require_admin(session).await?;
        let users = self.store.list_users().await?;
        Ok(users.into_iter().filter(|user| query.matches(user)).collect())
    }

    pub async fn set_role(&self, session: &Session, user_id: &str, role: Role) -> Result<()> {
        self.require_admin(session).await?;
        if !self.store.update_user_role(user_id, role).await? {
            return Err(PortalError::not_found(format!("user {}", user_id)));
        }
        info!("{} set role of {} to {}", session.email, user_id, role);
        Ok(())
    }

    pub async fn delete_user(&self, session: &Session, user_id: &str) -> Result<()> {
        self.require_admin(session).await?;
        if user_id == session.user_id {
            return Err(PortalError::validation("You cannot delete your own account"));
        }
        if !self.store.delete_user(user_id).await? {
            return Err(PortalError::not_found(format!("user {}", user_id)));
        }
        info!("{} deleted user {}", session.email, user_id);
        Ok(())
    }

    pub async fn courses(&self, session: &Session) -> Result<Vec<Course>> {
        self.require_admin(session).await?;
        self.store.list_courses(&CourseFilter::default()).await
    }

    pub async fn update_course(
        &self,
        session: &Session,
        course_id: &str,
        update: &CourseUpdate,
    ) -> Result<Course> {
        self.require_admin(session).await?;
        if update.is_empty() {
            return Err(PortalError::validation("Nothing to update"));
        }
        for value in [&update.code, &update.name].into_iter().flatten() {
            Validator::validate_not_blank("Course field", value)?;
        }

        let course = self
            .store
            .update_course(course_id, update)
            .await?
            .ok_or_else(|| PortalError::not_found(format!("course {}", course_id)))?;
        info!("{} updated course {}", session.email, course.code);
        Ok(course)
    }

    pub async fn delete_course(&self, session: &Session, course_id: &str) -> Result<()> {
        self.require_admin(session).await?;
        if !self.store.delete_course(course_id).await? {
            return Err(PortalError::not_found(format!("course {}", course_id)));
        }
        info!("{} deleted course {}", session.email, course_id);
        Ok(())
    }

    pub async fn faculty(&self, session: &Session) -> Result<Vec<FacultyMember>> {
        self.require_admin(session).await?;
        let profiles = self.store.list_faculty().await?;
        let users: HashMap<String, User> = self
            .store
            .list_users()
            .await?
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();

        Ok(profiles
            .into_iter()
            .map(|profile| {
                let user = users.get(&profile.faculty_id);
                FacultyMember {
                    name: user
                        .map(|u| u.display_name().to_string())
                        .unwrap_or_else(|| profile.faculty_id.clone()),
                    email: user.map(|u| u.email.clone()),
                    profile,
                }
            })
            .collect())
    }

    pub async fn schedules(&self, session: &Session) -> Result<Vec<Schedule>> {
        self.require_admin(session).await?;
        self.store.list_schedules(&ScheduleFilter::default()).await
    }

    pub async fn create_schedule(
        &self,
        session: &Session,
        schedule: NewSchedule,
    ) -> Result<Schedule> {
        self.require_admin(session).await?;
        for (field, value) in [
            ("Course", &schedule.course_id),
            ("Faculty", &schedule.faculty_id),
            ("Cohort", &schedule.cohort_id),
            ("Room", &schedule.room_id),
            ("Time slot", &schedule.slot_id),
            ("Semester", &schedule.semester),
            ("Academic year", &schedule.academic_year),
        ] {
            Validator::validate_not_blank(field, value)?;
        }

        let created = self.store.insert_schedule(&schedule).await?;
        info!(
            "{} created schedule {} for course {}",
            session.email, created.schedule_id, created.course_id
        );
        Ok(created)
    }

    pub async fn report(
        &self,
        session: &Session,
        kind: ReportKind,
        range: ReportRange,
    ) -> Result<Report> {
        self.require_admin(session).await?;
        let rows = match kind {
            ReportKind::UserActivity => self
                .store
                .list_users()
                .await?
                .into_iter()
                .map(|user| ReportRow {
                    label: user.display_name().to_string(),
                    detail: user.role,
                })
                .collect(),
            ReportKind::CourseEnrollment => self
                .store
                .list_courses(&CourseFilter::default())
                .await?
                .into_iter()
                .map(|course| ReportRow {
                    label: course.name,
                    detail: course.code,
                })
                .collect(),
            ReportKind::EvaluationSchedule => self
                .store
                .list_evaluations(&EvaluationFilter::default())
                .await?
                .into_iter()
                .filter(|evaluation| range.contains(evaluation.date))
                .map(|evaluation| ReportRow {
                    detail: evaluation.interval().to_string(),
                    label: evaluation.title,
                })
                .collect(),
            // no usage data is recorded anywhere
            ReportKind::SystemUsage => Vec::new(),
        };

        info!("{} generated {} ({} rows)", session.email, kind, rows.len());
        Ok(Report { kind, rows })
    }
}
