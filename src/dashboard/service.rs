// file: src/dashboard/service.rs
// description: role-based landing summaries and catalog listings

use crate::auth::Session;
use crate::backend::{CourseFilter, EvaluationFilter, PortalStore, ScheduleFilter};
use crate::error::{PortalError, Result};
use crate::models::{Cohort, Course, Evaluation, Role, Room, Schedule, TimeSlot};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub enum Dashboard {
    Admin {
        users: usize,
        courses: usize,
        evaluations: usize,
    },
    Faculty {
        schedules: Vec<Schedule>,
        evaluations: Vec<Evaluation>,
    },
    Student {
        department: String,
        courses: Vec<Course>,
    },
}

pub struct DashboardService {
    store: Arc<dyn PortalStore>,
}

impl DashboardService {
    pub fn new(store: Arc<dyn PortalStore>) -> Self {
        Self { store }
    }

    pub async fn summary(&self, session: &Session) -> Result<Dashboard> {
        debug!("Building {} dashboard for {}", session.role, session.email);
        match session.role {
            Role::Admin => {
                let all_courses = CourseFilter::default();
                let all_evaluations = EvaluationFilter::default();
                let (users, courses, evaluations) = futures::try_join!(
                    self.store.list_users(),
                    self.store.list_courses(&all_courses),
                    self.store.list_evaluations(&all_evaluations),
                )?;
                Ok(Dashboard::Admin {
                    users: users.len(),
                    courses: courses.len(),
                    evaluations: evaluations.len(),
                })
            }
            Role::Faculty => {
                let own_schedules = ScheduleFilter {
                    faculty_id: Some(session.user_id.clone()),
                    cohort_id: None,
                };
                let own_evaluations = EvaluationFilter {
                    faculty_id: Some(session.user_id.clone()),
                    course_id: None,
                };
                let (schedules, evaluations) = futures::try_join!(
                    self.store.list_schedules(&own_schedules),
                    self.store.list_evaluations(&own_evaluations),
                )?;
                Ok(Dashboard::Faculty {
                    schedules,
                    evaluations,
                })
            }
            Role::Student => {
                let courses = match &session.department_id {
                    Some(id) => {
                        self.store
                            .list_courses(&CourseFilter {
                                department_id: Some(id.clone()),
                            })
                            .await?
                    }
                    None => Vec::new(),
                };
                Ok(Dashboard::Student {
                    department: session.department.clone(),
                    courses,
                })
            }
        }
    }

    async fn department_id(&self, name: &str) -> Result<String> {
        self.store
            .find_department_by_name(name.trim())
            .await?
            .map(|department| department.department_id)
            .ok_or_else(|| PortalError::not_found(format!("Department not found: {}", name)))
    }

    /// Courses, optionally restricted to a department given by name.
    pub async fn courses(&self, department: Option<&str>) -> Result<Vec<Course>> {
        let department_id = match department {
            Some(name) => Some(self.department_id(name).await?),
            None => None,
        };
        self.store
            .list_courses(&CourseFilter { department_id })
            .await
    }

    pub async fn rooms(&self, available_only: bool) -> Result<Vec<Room>> {
        self.store.list_rooms(available_only).await
    }

    pub async fn time_slots(&self, day_of_week: Option<&str>) -> Result<Vec<TimeSlot>> {
        self.store.list_time_slots(day_of_week).await
    }

    pub async fn cohorts(&self, department: Option<&str>) -> Result<Vec<Cohort>> {
        let department_id = match department {
            Some(name) => Some(self.department_id(name).await?),
            None => None,
        };
        self.store.list_cohorts(department_id.as_deref()).await
    }

    /// A faculty member sees their own schedules; admins see everything.
    pub async fn schedules(&self, session: &Session) -> Result<Vec<Schedule>> {
        let filter = match session.role {
            Role::Admin => ScheduleFilter::default(),
            Role::Faculty => ScheduleFilter {
                faculty_id: Some(session.user_id.clone()),
                cohort_id: None,
            },
            Role::Student => {
                return Err(PortalError::forbidden(
                    "schedules are listed for faculty and administrators",
                ));
            }
        };
        self.store.list_schedules(&filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryStore;

    fn session(user_id: &str, role: Role) -> Session {
        Session {
            user_id: user_id.to_string(),
            name: "Someone".to_string(),
            email: "someone@unival.edu".to_string(),
            role,
            department_id: Some("d-cs".to_string()),
            department: "Computer Science".to_string(),
        }
    }

    fn service() -> DashboardService {
        DashboardService::new(Arc::new(MemoryStore::sample()))
    }

    #[tokio::test]
    async fn test_admin_summary_counts() {
        let dashboard = service()
            .summary(&session("offline-admin", Role::Admin))
            .await
            .unwrap();
        assert_eq!(
            dashboard,
            Dashboard::Admin {
                users: 3,
                courses: 3,
                evaluations: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_faculty_summary_is_own_work() {
        let dashboard = service()
            .summary(&session("u-faculty", Role::Faculty))
            .await
            .unwrap();
        match dashboard {
            Dashboard::Faculty {
                schedules,
                evaluations,
            } => {
                assert_eq!(schedules.len(), 1);
                assert_eq!(evaluations.len(), 2);
            }
            other => panic!("unexpected dashboard {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_student_sees_department_courses() {
        let dashboard = service()
            .summary(&session("u-student", Role::Student))
            .await
            .unwrap();
        match dashboard {
            Dashboard::Student { courses, .. } => {
                assert_eq!(courses.len(), 1);
                assert_eq!(courses[0].code, "CS101");
            }
            other => panic!("unexpected dashboard {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_catalog_listings() {
        let service = service();
        assert_eq!(service.courses(None).await.unwrap().len(), 3);
        assert_eq!(
            service.courses(Some("Mathematics")).await.unwrap()[0].code,
            "MATH201"
        );
        assert!(matches!(
            service.courses(Some("Alchemy")).await,
            Err(PortalError::NotFound(_))
        ));
        assert_eq!(service.rooms(true).await.unwrap().len(), 2);
        assert_eq!(service.rooms(false).await.unwrap().len(), 3);
        assert_eq!(service.time_slots(Some("Monday")).await.unwrap().len(), 1);
        assert_eq!(
            service.cohorts(Some("Computer Science")).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_students_cannot_list_schedules() {
        assert!(
            service()
                .schedules(&session("u-student", Role::Student))
                .await
                .is_err()
        );
    }
}
