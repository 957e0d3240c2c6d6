// file: src/evaluations/service.rs
// description: schedules evaluations after checking them against the owner's calendar

use crate::auth::Session;
use crate::backend::{EvaluationFilter, PortalStore};
use crate::error::{PortalError, Result};
use crate::models::{Evaluation, NewEvaluation, Role};
use crate::scheduling::{CalendarEntry, EvaluationCalendar, SchedulingRules};
use crate::utils::Validator;
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use tracing::{debug, info};

/// What a user fills in when adding an evaluation.
#[derive(Debug, Clone)]
pub struct EvaluationDraft {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub kind: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub course_id: Option<String>,
    pub room_id: Option<String>,
    /// Calendar owner; defaults to the scheduling user. Only administrators
    /// may name someone else.
    pub faculty_id: Option<String>,
}

pub struct EvaluationService {
    store: Arc<dyn PortalStore>,
    rules: SchedulingRules,
}

impl EvaluationService {
    pub fn new(store: Arc<dyn PortalStore>, rules: SchedulingRules) -> Self {
        Self { store, rules }
    }

    pub fn rules(&self) -> &SchedulingRules {
        &self.rules
    }

    pub fn time_options(&self) -> Vec<NaiveTime> {
        self.rules.time_options()
    }

    pub async fn list_for_faculty(&self, faculty_id: &str) -> Result<Vec<Evaluation>> {
        self.store
            .list_evaluations(&EvaluationFilter {
                faculty_id: Some(faculty_id.to_string()),
                course_id: None,
            })
            .await
    }

    pub async fn list_for_course(&self, course_id: &str) -> Result<Vec<Evaluation>> {
        self.store
            .list_evaluations(&EvaluationFilter {
                faculty_id: None,
                course_id: Some(course_id.to_string()),
            })
            .await
    }

    pub async fn calendar_for(&self, faculty_id: &str) -> Result<EvaluationCalendar> {
        let evaluations = self.list_for_faculty(faculty_id).await?;
        debug!(
            "Loaded {} evaluations into the calendar of {}",
            evaluations.len(),
            faculty_id
        );
        Ok(EvaluationCalendar::load(
            self.rules.clone(),
            evaluations.iter().map(CalendarEntry::from),
        ))
    }

    /// Checks the draft against the owner's current calendar, then stores it
    /// unpublished. Nothing is written when the check fails.
    pub async fn schedule(&self, session: &Session, draft: EvaluationDraft) -> Result<Evaluation> {
        if !session.role.can_schedule() {
            return Err(PortalError::forbidden(
                "only faculty and administrators can add evaluations",
            ));
        }

        let title = EvaluationCalendar::base_title(draft.title.trim()).trim().to_string();
        Validator::validate_not_blank("Title", &title)?;

        let faculty_id = match draft.faculty_id {
            Some(owner) if owner != session.user_id && session.role != Role::Admin => {
                return Err(PortalError::forbidden(format!(
                    "{} cannot add evaluations to the calendar of {}",
                    session.email, owner
                )));
            }
            Some(owner) => owner,
            None => session.user_id.clone(),
        };

        let evaluation = NewEvaluation {
            title,
            description: draft.description.trim().to_string(),
            subject: draft.subject.trim().to_string(),
            kind: draft.kind.trim().to_string(),
            date: draft.date,
            start_time: draft.start_time,
            end_time: draft.end_time,
            course_id: draft.course_id,
            faculty_id,
            room_id: draft.room_id,
            created_by: session.user_id.clone(),
            is_published: false,
        };

        let calendar = self.calendar_for(&evaluation.faculty_id).await?;
        calendar.check(&CalendarEntry::from(&evaluation))?;

        let created = self.store.insert_evaluation(&evaluation).await?;
        info!(
            "Scheduled {} for {} on {}",
            created.title, created.faculty_id, created.date
        );
        Ok(created)
    }
}
