// file: src/auth/service.rs
// description: login against stored salted hashes and self-registration

use super::password;
use super::session::Session;
use crate::backend::{OFFLINE_ADMIN_ID, PortalStore};
use crate::config::OfflineConfig;
use crate::error::{PortalError, Result};
use crate::models::{FacultyProfile, NewUser, Role, StudentProfile, User};
use crate::utils::Validator;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const UNKNOWN_DEPARTMENT: &str = "Unknown Department";

#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
    /// Department name as shown to users.
    pub department: String,
    pub year: Option<u8>,
    pub faculty: Option<FacultyProfile>,
    pub student: Option<StudentProfile>,
}

pub struct AuthService {
    store: Arc<dyn PortalStore>,
    offline: Option<OfflineConfig>,
}

impl AuthService {
    pub fn new(store: Arc<dyn PortalStore>) -> Self {
        Self {
            store,
            offline: None,
        }
    }

    /// Enables the built-in administrator account when the config allows it.
    pub fn with_offline(mut self, offline: &OfflineConfig) -> Self {
        self.offline = offline.enabled.then(|| offline.clone());
        self
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim();
        Validator::validate_not_blank("Email", email)?;
        Validator::validate_not_blank("Password", password)?;

        if let Some(offline) = &self.offline {
            if email == offline.admin_email && password == offline.admin_password {
                info!("Offline administrator logged in");
                return Ok(Session {
                    user_id: OFFLINE_ADMIN_ID.to_string(),
                    name: "Administrator".to_string(),
                    email: email.to_string(),
                    role: Role::Admin,
                    department_id: None,
                    department: "Administration".to_string(),
                });
            }
        }

        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(PortalError::Unauthorized)?;

        let stored = user.password.as_deref().ok_or(PortalError::Unauthorized)?;
        if !password::verify(password, stored) {
            debug!("Password mismatch for {}", email);
            return Err(PortalError::Unauthorized);
        }

        let role = user.role()?;
        let department = self.department_name(user.department_id.as_deref()).await?;

        info!("{} logged in as {}", user.email, role);
        Ok(Session {
            user_id: user.id,
            name: user.name,
            email: user.email,
            role,
            department_id: user.department_id,
            department,
        })
    }

    async fn department_name(&self, department_id: Option<&str>) -> Result<String> {
        let Some(id) = department_id else {
            return Ok(UNKNOWN_DEPARTMENT.to_string());
        };
        Ok(self
            .store
            .find_department_by_id(id)
            .await?
            .map(|department| department.name)
            .unwrap_or_else(|| UNKNOWN_DEPARTMENT.to_string()))
    }

    pub async fn register(&self, registration: Registration) -> Result<User> {
        let name = registration.name.trim();
        let email = registration.email.trim();
        let department = registration.department.trim();

        Validator::validate_not_blank("Name", name)?;
        Validator::validate_not_blank("Email", email)?;
        Validator::validate_not_blank("Password", &registration.password)?;
        Validator::validate_not_blank("Department", department)?;
        Validator::validate_email(email)?;

        let role = registration
            .role
            .ok_or_else(|| PortalError::validation("Role is required"))?;
        let year = match role {
            Role::Admin => {
                return Err(PortalError::validation(
                    "Only faculty and student accounts can be registered",
                ));
            }
            Role::Student => {
                let year = registration
                    .year
                    .ok_or_else(|| PortalError::validation("Year is required for students"))?;
                Validator::validate_year(year)?;
                i32::from(year)
            }
            Role::Faculty => 0,
        };

        if self.store.find_user_by_email(email).await?.is_some() {
            return Err(PortalError::validation(format!(
                "An account already exists for {}",
                email
            )));
        }

        let department = self
            .store
            .find_department_by_name(department)
            .await?
            .ok_or_else(|| PortalError::not_found(format!("Department not found: {}", department)))?;

        let user = self
            .store
            .insert_user(&NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password: password::seal(&registration.password),
                role,
                department_id: department.department_id,
                year,
            })
            .await?;

        info!("Registered {} as {}", user.email, role);
        self.store_profile(&user, role, registration.faculty, registration.student)
            .await;
        Ok(user)
    }

    /// Profile rows are best effort; the account already exists.
    async fn store_profile(
        &self,
        user: &User,
        role: Role,
        faculty: Option<FacultyProfile>,
        student: Option<StudentProfile>,
    ) {
        let result = match (role, faculty, student) {
            (Role::Faculty, Some(profile), _) => {
                self.store.update_faculty_profile(&user.id, &profile).await
            }
            (Role::Student, _, Some(profile)) => {
                self.store.update_student_profile(&user.id, &profile).await
            }
            _ => return,
        };

        if let Err(e) = result {
            warn!("Could not store {} profile for {}: {}", role, user.email, e);
        }
    }
}
