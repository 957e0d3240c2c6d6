// file: src/backend/rest.rs
// description: reqwest adapter for the hosted PostgREST backend
// reference: https://docs.rs/reqwest

use super::query::TableQuery;
use super::store::{CourseFilter, EvaluationFilter, PortalStore, ScheduleFilter};
use crate::config::BackendConfig;
use crate::error::{PortalError, Result};
use crate::models::{
    Cohort, Comment, Course, CourseUpdate, Department, Evaluation, FacultyProfile, NewComment,
    NewEvaluation, NewReaction, NewSchedule, NewUser, Reaction, ReactionTarget, Role, Room,
    Schedule, StudentProfile, TimeSlot, User,
};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestStore {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                PortalError::Config(
                    "Backend credentials not configured. Set SUPABASE_URL and SUPABASE_KEY \
                     or backend.api_key in the config file."
                        .to_string(),
                )
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn url_for(&self, query: &TableQuery) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, query.path());
        Url::parse(&raw)
            .map_err(|e| PortalError::Config(format!("Invalid backend URL {}: {}", raw, e)))
    }

    fn request(&self, method: Method, query: &TableQuery) -> Result<RequestBuilder> {
        let url = self.url_for(query)?;
        debug!("{} {}", method, url.path());

        Ok(self
            .client
            .request(method, url)
            .header("apikey", self.api_key.as_str())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json"))
    }

    async fn fetch<T: DeserializeOwned>(&self, query: TableQuery) -> Result<Vec<T>> {
        let response = self.request(Method::GET, &query)?.send().await?;
        Self::read_rows(query.table_name(), response).await
    }

    async fn fetch_one<T: DeserializeOwned>(&self, query: TableQuery) -> Result<Option<T>> {
        Ok(self.fetch(query).await?.into_iter().next())
    }

    /// Sends a write and returns the affected rows (`Prefer: return=representation`).
    async fn write<B, T>(&self, method: Method, query: TableQuery, body: &B) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let response = self
            .request(method, &query)?
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        Self::read_rows(query.table_name(), response).await
    }

    async fn insert<B, T>(&self, query: TableQuery, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let table = query.table_name();
        self.write(Method::POST, query, body)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| PortalError::Decode(format!("insert into {} returned no rows", table)))
    }

    async fn remove(&self, query: TableQuery) -> Result<bool> {
        let response = self
            .request(Method::DELETE, &query)?
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = Self::read_rows(query.table_name(), response).await?;
        Ok(!rows.is_empty())
    }

    async fn read_rows<T: DeserializeOwned>(table: &str, response: Response) -> Result<Vec<T>> {
        let status = response.status();
        let body = response.bytes().await?;
        debug!("{} responded {} ({} bytes)", table, status, body.len());

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body).into_owned();
            warn!("Backend rejected request on {}: {}", table, status);
            return Err(PortalError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        // DELETE/PATCH without representation answer 204 with no body
        if body.is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&body)
            .map_err(|e| PortalError::Decode(format!("{} response: {}", table, e)))
    }
}

#[async_trait]
impl PortalStore for RestStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.fetch_one(TableQuery::table("users").eq("email", email))
            .await
    }

    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.fetch_one(TableQuery::table("users").eq("id", id)).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.fetch(TableQuery::table("users").order_asc("name"))
            .await
    }

    async fn insert_user(&self, user: &NewUser) -> Result<User> {
        self.insert(TableQuery::table("users"), user).await
    }

    async fn update_user_role(&self, id: &str, role: Role) -> Result<bool> {
        let rows: Vec<User> = self
            .write(
                Method::PATCH,
                TableQuery::table("users").eq("id", id),
                &json!({ "role": role }),
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn delete_user(&self, id: &str) -> Result<bool> {
        self.remove(TableQuery::table("users").eq("id", id)).await
    }

    async fn list_departments(&self) -> Result<Vec<Department>> {
        self.fetch(TableQuery::table("departments").order_asc("name"))
            .await
    }

    async fn find_department_by_name(&self, name: &str) -> Result<Option<Department>> {
        self.fetch_one(TableQuery::table("departments").eq("name", name))
            .await
    }

    async fn find_department_by_id(&self, id: &str) -> Result<Option<Department>> {
        self.fetch_one(TableQuery::table("departments").eq("department_id", id))
            .await
    }

    async fn list_courses(&self, filter: &CourseFilter) -> Result<Vec<Course>> {
        self.fetch(
            TableQuery::table("courses")
                .eq_opt("department_id", filter.department_id.as_deref())
                .order_asc("code"),
        )
        .await
    }

    async fn update_course(&self, id: &str, update: &CourseUpdate) -> Result<Option<Course>> {
        let rows: Vec<Course> = self
            .write(Method::PATCH, TableQuery::table("courses").eq("id", id), update)
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn delete_course(&self, id: &str) -> Result<bool> {
        self.remove(TableQuery::table("courses").eq("id", id)).await
    }

    async fn list_rooms(&self, available_only: bool) -> Result<Vec<Room>> {
        let query = TableQuery::table("rooms");
        let query = if available_only {
            query.eq("is_available", true)
        } else {
            query
        };
        self.fetch(query).await
    }

    async fn list_time_slots(&self, day_of_week: Option<&str>) -> Result<Vec<TimeSlot>> {
        self.fetch(
            TableQuery::table("time_slots")
                .eq_opt("day_of_week", day_of_week)
                .order_asc("start_time"),
        )
        .await
    }

    async fn list_cohorts(&self, department_id: Option<&str>) -> Result<Vec<Cohort>> {
        self.fetch(TableQuery::table("cohorts").eq_opt("department_id", department_id))
            .await
    }

    async fn list_schedules(&self, filter: &ScheduleFilter) -> Result<Vec<Schedule>> {
        self.fetch(
            TableQuery::table("schedules")
                .eq_opt("faculty_id", filter.faculty_id.as_deref())
                .eq_opt("cohort_id", filter.cohort_id.as_deref()),
        )
        .await
    }

    async fn insert_schedule(&self, schedule: &NewSchedule) -> Result<Schedule> {
        self.insert(TableQuery::table("schedules"), schedule).await
    }

    async fn list_evaluations(&self, filter: &EvaluationFilter) -> Result<Vec<Evaluation>> {
        self.fetch(
            TableQuery::table("evaluations")
                .eq_opt("faculty_id", filter.faculty_id.as_deref())
                .eq_opt("course_id", filter.course_id.as_deref())
                .order_asc("date"),
        )
        .await
    }

    async fn insert_evaluation(&self, evaluation: &NewEvaluation) -> Result<Evaluation> {
        self.insert(TableQuery::table("evaluations"), evaluation)
            .await
    }

    async fn list_comments(&self, evaluation_id: &str) -> Result<Vec<Comment>> {
        self.fetch(
            TableQuery::table("comments")
                .eq("evaluation_id", evaluation_id)
                .order_asc("created_at"),
        )
        .await
    }

    async fn insert_comment(&self, comment: &NewComment) -> Result<Comment> {
        self.insert(TableQuery::table("comments"), comment).await
    }

    async fn list_reactions(&self, target: &ReactionTarget) -> Result<Vec<Reaction>> {
        let query = match target {
            ReactionTarget::Evaluation(evaluation_id) => TableQuery::table("reactions")
                .eq("evaluation_id", evaluation_id)
                .is_null("comment_id"),
            ReactionTarget::Comment(comment_id) => {
                TableQuery::table("reactions").eq("comment_id", comment_id)
            }
        };
        self.fetch(query).await
    }

    async fn insert_reaction(&self, reaction: &NewReaction) -> Result<Reaction> {
        self.insert(TableQuery::table("reactions"), reaction).await
    }

    async fn list_faculty(&self) -> Result<Vec<FacultyProfile>> {
        self.fetch(TableQuery::table("faculty")).await
    }

    async fn update_faculty_profile(
        &self,
        faculty_id: &str,
        profile: &FacultyProfile,
    ) -> Result<()> {
        let _: Vec<serde_json::Value> = self
            .write(
                Method::PATCH,
                TableQuery::table("faculty").eq("faculty_id", faculty_id),
                profile,
            )
            .await?;
        Ok(())
    }

    async fn update_student_profile(
        &self,
        student_id: &str,
        profile: &StudentProfile,
    ) -> Result<()> {
        let _: Vec<serde_json::Value> = self
            .write(
                Method::PATCH,
                TableQuery::table("students").eq("student_id", student_id),
                profile,
            )
            .await?;
        Ok(())
    }
}
