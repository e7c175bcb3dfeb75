//! crates/recruit_core/src/workflow/recruitments.rs
//!
//! Direct recruitment: company-initiated outreach to a specific student,
//! no posting involved. One live record per (company, student) pair.
//! "Deletion" withdraws the record to the WITHDRAWN terminal status so a
//! withdrawal stays distinguishable from a student-side rejection.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{DirectRecruitment, RecruitmentFilter, RecruitmentStatus};
use crate::ports::{DatabaseService, PortError};

use super::{WorkflowError, WorkflowResult};

pub async fn create(
    db: &dyn DatabaseService,
    company_profile_id: Uuid,
    student_profile_id: Uuid,
    recruiter_account_id: Option<Uuid>,
    message: Option<String>,
    notes: Option<String>,
) -> WorkflowResult<DirectRecruitment> {
    // Resolve both ends so a bad id is a 404 instead of a dangling row.
    db.get_company_profile(company_profile_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => WorkflowError::NotFound("company profile"),
            other => other.into(),
        })?;
    db.get_student_profile(student_profile_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => WorkflowError::NotFound("student profile"),
            other => other.into(),
        })?;

    if db
        .find_recruitment(company_profile_id, student_profile_id)
        .await?
        .is_some()
    {
        return Err(WorkflowError::AlreadyRecruited);
    }

    db.create_recruitment(
        company_profile_id,
        student_profile_id,
        recruiter_account_id,
        message,
        notes,
    )
    .await
    .map_err(|e| match e {
        PortError::Conflict(_) => WorkflowError::AlreadyRecruited,
        other => other.into(),
    })
}

/// Sets the status (and optionally overwrites the notes). Transitions are
/// deliberately unguarded, including out of terminal states.
pub async fn update_status(
    db: &dyn DatabaseService,
    recruitment_id: Uuid,
    status: RecruitmentStatus,
    notes: Option<String>,
) -> WorkflowResult<DirectRecruitment> {
    db.update_recruitment_status(recruitment_id, status, notes, Utc::now())
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => WorkflowError::NotFound("recruitment"),
            other => other.into(),
        })
}

pub async fn list(
    db: &dyn DatabaseService,
    filter: RecruitmentFilter,
) -> WorkflowResult<Vec<DirectRecruitment>> {
    Ok(db.list_recruitments(filter).await?)
}

/// Soft delete: the row stays, the status becomes WITHDRAWN.
pub async fn withdraw(
    db: &dyn DatabaseService,
    recruitment_id: Uuid,
) -> WorkflowResult<DirectRecruitment> {
    update_status(db, recruitment_id, RecruitmentStatus::Withdrawn, None).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::support::Fixture;

    #[tokio::test]
    async fn create_is_unique_per_pair() {
        let fx = Fixture::new().await;
        let recruitment = create(
            &fx.db,
            fx.company_profile.id,
            fx.student_profile.id,
            Some(fx.company_account.id),
            Some("We liked your portfolio".to_string()),
            None,
        )
        .await
        .unwrap();
        assert_eq!(recruitment.status, RecruitmentStatus::Pending);

        let err = create(
            &fx.db,
            fx.company_profile.id,
            fx.student_profile.id,
            None,
            None,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyRecruited));
    }

    #[tokio::test]
    async fn create_rejects_unknown_profiles() {
        let fx = Fixture::new().await;
        let err = create(
            &fx.db,
            Uuid::new_v4(),
            fx.student_profile.id,
            None,
            None,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound("company profile")));
    }

    #[tokio::test]
    async fn update_status_overwrites_notes_only_when_given() {
        let fx = Fixture::new().await;
        let recruitment = create(
            &fx.db,
            fx.company_profile.id,
            fx.student_profile.id,
            None,
            None,
            Some("initial note".to_string()),
        )
        .await
        .unwrap();

        let updated = update_status(&fx.db, recruitment.id, RecruitmentStatus::Accepted, None)
            .await
            .unwrap();
        assert_eq!(updated.status, RecruitmentStatus::Accepted);
        assert_eq!(updated.notes.as_deref(), Some("initial note"));

        let updated = update_status(
            &fx.db,
            recruitment.id,
            RecruitmentStatus::Completed,
            Some("signed".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(updated.notes.as_deref(), Some("signed"));
    }

    #[tokio::test]
    async fn withdraw_is_a_distinct_terminal_status() {
        let fx = Fixture::new().await;
        let recruitment = create(
            &fx.db,
            fx.company_profile.id,
            fx.student_profile.id,
            None,
            None,
            None,
        )
        .await
        .unwrap();

        let withdrawn = withdraw(&fx.db, recruitment.id).await.unwrap();
        assert_eq!(withdrawn.status, RecruitmentStatus::Withdrawn);
        assert_ne!(withdrawn.status, RecruitmentStatus::Rejected);

        // Still listable; the row was not removed.
        let all = list(&fx.db, RecruitmentFilter::default()).await.unwrap();
        assert_eq!(all.len(), 1);
    }

    #[tokio::test]
    async fn filters_compose_with_and_semantics() {
        let fx = Fixture::new().await;
        let (_, other_student) = fx
            .db
            .create_student_account(
                "other@example.edu",
                "$argon2id$fake",
                crate::domain::NewStudentProfile {
                    full_name: "Budi".to_string(),
                    major: "Accounting".to_string(),
                    phone: None,
                    skills: None,
                },
            )
            .await
            .unwrap();

        let first = create(
            &fx.db,
            fx.company_profile.id,
            fx.student_profile.id,
            None,
            None,
            None,
        )
        .await
        .unwrap();
        let second = create(
            &fx.db,
            fx.company_profile.id,
            other_student.id,
            None,
            None,
            None,
        )
        .await
        .unwrap();
        update_status(&fx.db, second.id, RecruitmentStatus::Accepted, None)
            .await
            .unwrap();

        let by_company = list(
            &fx.db,
            RecruitmentFilter {
                company_profile_id: Some(fx.company_profile.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(by_company.len(), 2);
        // Ordered by recruited_at descending.
        assert!(by_company[0].recruited_at >= by_company[1].recruited_at);

        let accepted_for_company = list(
            &fx.db,
            RecruitmentFilter {
                company_profile_id: Some(fx.company_profile.id),
                status: Some(RecruitmentStatus::Accepted),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(accepted_for_company.len(), 1);
        assert_eq!(accepted_for_company[0].id, second.id);

        let pair = list(
            &fx.db,
            RecruitmentFilter {
                company_profile_id: Some(fx.company_profile.id),
                student_profile_id: Some(fx.student_profile.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(pair.len(), 1);
        assert_eq!(pair[0].id, first.id);
    }
}
