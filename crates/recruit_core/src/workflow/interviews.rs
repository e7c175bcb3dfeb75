//! crates/recruit_core/src/workflow/interviews.rs
//!
//! Interview scheduling on top of applications. Scheduling is intentionally
//! permissive: no future-date check, no application-status gate, and no
//! one-interview-per-application limit (multiple rounds are a feature).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Interview, InterviewStatus, InterviewType, InterviewUpdate, Role};
use crate::ports::{DatabaseService, PortError};

use super::{WorkflowError, WorkflowResult};

pub async fn schedule(
    db: &dyn DatabaseService,
    application_id: Uuid,
    scheduled_at: DateTime<Utc>,
    interview_type: InterviewType,
    location: Option<String>,
    notes: Option<String>,
) -> WorkflowResult<Interview> {
    // The application must resolve; everything else about its state is
    // allowed to be arbitrary.
    db.get_application(application_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => WorkflowError::NotFound("application"),
            other => other.into(),
        })?;

    Ok(db
        .create_interview(application_id, scheduled_at, interview_type, location, notes)
        .await?)
}

/// Free-form partial update, status included. COMPLETED back to SCHEDULED
/// is not blocked.
pub async fn update(
    db: &dyn DatabaseService,
    interview_id: Uuid,
    update: InterviewUpdate,
) -> WorkflowResult<Interview> {
    db.update_interview(interview_id, update)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => WorkflowError::NotFound("interview"),
            other => other.into(),
        })
}

pub async fn cancel(db: &dyn DatabaseService, interview_id: Uuid) -> WorkflowResult<Interview> {
    update(
        db,
        interview_id,
        InterviewUpdate {
            status: Some(InterviewStatus::Cancelled),
            ..Default::default()
        },
    )
    .await
}

pub async fn complete(
    db: &dyn DatabaseService,
    interview_id: Uuid,
    feedback: Option<String>,
    rating: Option<i32>,
) -> WorkflowResult<Interview> {
    update(
        db,
        interview_id,
        InterviewUpdate {
            status: Some(InterviewStatus::Completed),
            feedback,
            rating,
            ..Default::default()
        },
    )
    .await
}

/// Role-dispatched upcoming list: students see interviews on their own
/// applications, companies those on their postings, anyone else nothing.
pub async fn list_upcoming(
    db: &dyn DatabaseService,
    caller_account_id: Uuid,
    caller_role: Role,
) -> WorkflowResult<Vec<Interview>> {
    let now = Utc::now();
    match caller_role {
        Role::Student => Ok(db
            .list_upcoming_interviews_for_student(caller_account_id, now)
            .await?),
        Role::Company => Ok(db
            .list_upcoming_interviews_for_company(caller_account_id, now)
            .await?),
        _ => Ok(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::workflow::support::Fixture;

    async fn seeded_application(fx: &Fixture) -> Uuid {
        crate::workflow::applications::apply(
            &fx.db,
            fx.student_account.id,
            fx.posting.id,
            fx.cv.id,
            None,
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn schedule_allows_multiple_rounds() {
        let fx = Fixture::new().await;
        let application_id = seeded_application(&fx).await;

        let first = schedule(
            &fx.db,
            application_id,
            Utc::now() + Duration::days(2),
            InterviewType::Online,
            None,
            Some("screening".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(first.status, InterviewStatus::Scheduled);

        // A second round on the same application is fine, even in the past.
        schedule(
            &fx.db,
            application_id,
            Utc::now() - Duration::days(1),
            InterviewType::Offline,
            Some("HQ, room 2".to_string()),
            None,
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn schedule_requires_an_existing_application() {
        let fx = Fixture::new().await;
        let err = schedule(
            &fx.db,
            Uuid::new_v4(),
            Utc::now(),
            InterviewType::Online,
            None,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound("application")));
    }

    #[tokio::test]
    async fn complete_stores_feedback_and_rating() {
        let fx = Fixture::new().await;
        let application_id = seeded_application(&fx).await;
        let interview = schedule(
            &fx.db,
            application_id,
            Utc::now() + Duration::days(1),
            InterviewType::Online,
            None,
            None,
        )
        .await
        .unwrap();

        let completed = complete(&fx.db, interview.id, Some("solid".to_string()), Some(4))
            .await
            .unwrap();
        assert_eq!(completed.status, InterviewStatus::Completed);
        assert_eq!(completed.feedback.as_deref(), Some("solid"));
        assert_eq!(completed.rating, Some(4));

        // Transitions out of COMPLETED are not blocked.
        let reopened = update(
            &fx.db,
            interview.id,
            InterviewUpdate {
                status: Some(InterviewStatus::Scheduled),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(reopened.status, InterviewStatus::Scheduled);
    }

    #[tokio::test]
    async fn upcoming_is_role_dispatched() {
        let fx = Fixture::new().await;
        let application_id = seeded_application(&fx).await;
        schedule(
            &fx.db,
            application_id,
            Utc::now() + Duration::days(3),
            InterviewType::Online,
            None,
            None,
        )
        .await
        .unwrap();
        // A past interview never shows up as upcoming.
        schedule(
            &fx.db,
            application_id,
            Utc::now() - Duration::days(3),
            InterviewType::Online,
            None,
            None,
        )
        .await
        .unwrap();
        // A cancelled one neither.
        let cancelled = schedule(
            &fx.db,
            application_id,
            Utc::now() + Duration::days(5),
            InterviewType::Offline,
            None,
            None,
        )
        .await
        .unwrap();
        cancel(&fx.db, cancelled.id).await.unwrap();

        let student_view = list_upcoming(&fx.db, fx.student_account.id, Role::Student)
            .await
            .unwrap();
        assert_eq!(student_view.len(), 1);

        let company_view = list_upcoming(&fx.db, fx.company_account.id, Role::Company)
            .await
            .unwrap();
        assert_eq!(company_view.len(), 1);

        let admin_view = list_upcoming(&fx.db, fx.student_account.id, Role::Admin)
            .await
            .unwrap();
        assert!(admin_view.is_empty());
    }
}
