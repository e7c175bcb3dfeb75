//! crates/recruit_core/src/workflow/applications.rs
//!
//! The application lifecycle: PENDING at creation, moved to a terminal
//! ACCEPTED/REJECTED by the posting's company or an admin, deletable by the
//! owning student only while still PENDING.

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    Application, ApplicationStatus, PostingStatus, Role, StudentApplicationView,
};
use crate::ports::{DatabaseService, PortError};

use super::{WorkflowError, WorkflowResult};

/// Submits an application for `caller_account_id` to `posting_id`, citing
/// one of the caller's CVs.
///
/// The pair pre-check gives a friendly error in the common case; under a
/// concurrent duplicate submit the store's unique constraint is the
/// authority and its conflict is translated the same way.
pub async fn apply(
    db: &dyn DatabaseService,
    caller_account_id: Uuid,
    posting_id: Uuid,
    cv_id: Uuid,
    notes: Option<String>,
) -> WorkflowResult<Application> {
    let profile = db
        .get_student_profile_by_account(caller_account_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => WorkflowError::ProfileNotFound("student"),
            other => other.into(),
        })?;

    let posting = db.get_posting(posting_id).await.map_err(|e| match e {
        PortError::NotFound(_) => WorkflowError::NotFound("posting"),
        other => other.into(),
    })?;
    if posting.status != PostingStatus::Active {
        return Err(WorkflowError::PostingNotActive);
    }

    if db.find_application(profile.id, posting_id).await?.is_some() {
        return Err(WorkflowError::AlreadyApplied);
    }

    let cv = db.get_cv(cv_id).await.map_err(|e| match e {
        PortError::NotFound(_) => WorkflowError::NotFound("cv"),
        other => other.into(),
    })?;
    if cv.student_profile_id != profile.id {
        return Err(WorkflowError::CvNotOwned);
    }

    db.create_application(profile.id, posting_id, cv_id, notes)
        .await
        .map_err(|e| match e {
            PortError::Conflict(_) => WorkflowError::AlreadyApplied,
            other => other.into(),
        })
}

/// Moves an application to `status`. Allowed for admins and for the account
/// owning the posting's company profile. Terminal states are deliberately
/// not locked: an admin may correct an ACCEPTED back to PENDING.
pub async fn update_status(
    db: &dyn DatabaseService,
    caller_account_id: Uuid,
    caller_role: Role,
    application_id: Uuid,
    status: ApplicationStatus,
) -> WorkflowResult<Application> {
    let application = db
        .get_application(application_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => WorkflowError::NotFound("application"),
            other => other.into(),
        })?;

    if caller_role != Role::Admin {
        let posting = db.get_posting(application.job_posting_id).await?;
        let company = db.get_company_profile(posting.company_profile_id).await?;
        if company.account_id != caller_account_id {
            return Err(WorkflowError::Forbidden);
        }
    }

    Ok(db
        .update_application_status(application_id, status, Utc::now())
        .await?)
}

/// Hard-deletes an application. Only the owning student may withdraw, and
/// only while the application is still PENDING.
pub async fn withdraw(
    db: &dyn DatabaseService,
    caller_account_id: Uuid,
    application_id: Uuid,
) -> WorkflowResult<()> {
    let application = db
        .get_application(application_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => WorkflowError::NotFound("application"),
            other => other.into(),
        })?;

    let profile = db
        .get_student_profile_by_account(caller_account_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => WorkflowError::ProfileNotFound("student"),
            other => other.into(),
        })?;
    if application.student_profile_id != profile.id {
        return Err(WorkflowError::Forbidden);
    }
    if application.status != ApplicationStatus::Pending {
        return Err(WorkflowError::NotPending);
    }

    Ok(db.delete_application(application_id).await?)
}

/// Newest-first applications of the calling student, with posting, company
/// and CV summaries attached.
pub async fn list_mine(
    db: &dyn DatabaseService,
    caller_account_id: Uuid,
) -> WorkflowResult<Vec<StudentApplicationView>> {
    let profile = db
        .get_student_profile_by_account(caller_account_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => WorkflowError::ProfileNotFound("student"),
            other => other.into(),
        })?;
    Ok(db.list_applications_by_student(profile.id).await?)
}

pub async fn list_all(db: &dyn DatabaseService) -> WorkflowResult<Vec<Application>> {
    Ok(db.list_all_applications().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewStudentProfile, PostingStatus};
    use crate::workflow::support::Fixture;

    #[tokio::test]
    async fn apply_creates_pending_application() {
        let fx = Fixture::new().await;
        let application = apply(
            &fx.db,
            fx.student_account.id,
            fx.posting.id,
            fx.cv.id,
            Some("motivated".to_string()),
        )
        .await
        .unwrap();

        assert_eq!(application.status, ApplicationStatus::Pending);
        assert_eq!(application.student_profile_id, fx.student_profile.id);
        assert_eq!(application.job_posting_id, fx.posting.id);
    }

    #[tokio::test]
    async fn second_apply_for_same_posting_conflicts() {
        let fx = Fixture::new().await;
        apply(&fx.db, fx.student_account.id, fx.posting.id, fx.cv.id, None)
            .await
            .unwrap();
        let err = apply(&fx.db, fx.student_account.id, fx.posting.id, fx.cv.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyApplied));
    }

    #[tokio::test]
    async fn apply_rejects_non_active_posting() {
        let fx = Fixture::new().await;
        // Freshly created postings are APPROVED, not ACTIVE.
        fx.db
            .set_posting_status(fx.posting.id, PostingStatus::Approved)
            .await
            .unwrap();
        let err = apply(&fx.db, fx.student_account.id, fx.posting.id, fx.cv.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::PostingNotActive));
    }

    #[tokio::test]
    async fn apply_rejects_foreign_cv() {
        let fx = Fixture::new().await;
        let (other_account, other_profile) = fx
            .db
            .create_student_account(
                "other@example.edu",
                "$argon2id$fake",
                NewStudentProfile {
                    full_name: "Budi".to_string(),
                    major: "Accounting".to_string(),
                    phone: None,
                    skills: None,
                },
            )
            .await
            .unwrap();
        let foreign_cv = fx
            .db
            .create_cv(other_profile.id, "uploads/cv-2.pdf", "cv2.pdf")
            .await
            .unwrap();

        let err = apply(
            &fx.db,
            fx.student_account.id,
            fx.posting.id,
            foreign_cv.id,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WorkflowError::CvNotOwned));

        // The other student can use it.
        apply(&fx.db, other_account.id, fx.posting.id, foreign_cv.id, None)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn apply_without_student_profile_fails() {
        let fx = Fixture::new().await;
        let err = apply(&fx.db, fx.company_account.id, fx.posting.id, fx.cv.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ProfileNotFound("student")));
    }

    #[tokio::test]
    async fn owning_company_can_accept_and_student_cannot_then_withdraw() {
        let fx = Fixture::new().await;
        let application = apply(&fx.db, fx.student_account.id, fx.posting.id, fx.cv.id, None)
            .await
            .unwrap();

        let updated = update_status(
            &fx.db,
            fx.company_account.id,
            Role::Company,
            application.id,
            ApplicationStatus::Accepted,
        )
        .await
        .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Accepted);
        assert!(updated.last_status_update >= application.last_status_update);

        // Scenario B: processed applications are immutable by the student.
        let err = withdraw(&fx.db, fx.student_account.id, application.id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::NotPending));
    }

    #[tokio::test]
    async fn unrelated_company_cannot_update_status() {
        let fx = Fixture::new().await;
        let application = apply(&fx.db, fx.student_account.id, fx.posting.id, fx.cv.id, None)
            .await
            .unwrap();
        let (rival_account, _) = fx
            .db
            .create_company_account(
                "hr@rival.example",
                "$argon2id$fake",
                crate::domain::NewCompanyProfile {
                    company_name: "Rival Corp".to_string(),
                    industry_type: "Retail".to_string(),
                    phone: None,
                    address: None,
                },
            )
            .await
            .unwrap();

        let err = update_status(
            &fx.db,
            rival_account.id,
            Role::Company,
            application.id,
            ApplicationStatus::Rejected,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden));
    }

    #[tokio::test]
    async fn admin_can_update_any_application() {
        let fx = Fixture::new().await;
        let application = apply(&fx.db, fx.student_account.id, fx.posting.id, fx.cv.id, None)
            .await
            .unwrap();

        let updated = update_status(
            &fx.db,
            Uuid::new_v4(), // admins need no ownership relation
            Role::Admin,
            application.id,
            ApplicationStatus::Reviewed,
        )
        .await
        .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Reviewed);
    }

    #[tokio::test]
    async fn foreign_student_cannot_withdraw() {
        let fx = Fixture::new().await;
        let application = apply(&fx.db, fx.student_account.id, fx.posting.id, fx.cv.id, None)
            .await
            .unwrap();
        let (other_account, _) = fx
            .db
            .create_student_account(
                "other@example.edu",
                "$argon2id$fake",
                NewStudentProfile {
                    full_name: "Budi".to_string(),
                    major: "Accounting".to_string(),
                    phone: None,
                    skills: None,
                },
            )
            .await
            .unwrap();

        let err = withdraw(&fx.db, other_account.id, application.id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden));

        // Unchanged, and the owner can still withdraw while pending.
        withdraw(&fx.db, fx.student_account.id, application.id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn list_mine_is_newest_first_and_stable() {
        let fx = Fixture::new().await;
        let second_posting = fx
            .db
            .create_posting(crate::domain::NewJobPosting {
                company_profile_id: fx.company_profile.id,
                title: "Data Analyst".to_string(),
                description: "Dashboards".to_string(),
                requirements: None,
                location: None,
                salary_min: None,
                salary_max: None,
                employment_type: None,
                deadline: None,
                status: PostingStatus::Active,
            })
            .await
            .unwrap();

        apply(&fx.db, fx.student_account.id, fx.posting.id, fx.cv.id, None)
            .await
            .unwrap();
        apply(&fx.db, fx.student_account.id, second_posting.id, fx.cv.id, None)
            .await
            .unwrap();

        let first = list_mine(&fx.db, fx.student_account.id).await.unwrap();
        assert_eq!(first.len(), 2);
        assert!(
            first[0].application.application_date >= first[1].application.application_date
        );
        assert_eq!(first[0].company_name, "Acme Manufacturing");

        // Idempotent read: a second listing with no writes in between is
        // identical in order and content.
        let second = list_mine(&fx.db, fx.student_account.id).await.unwrap();
        let ids: Vec<Uuid> = first.iter().map(|v| v.application.id).collect();
        let ids_again: Vec<Uuid> = second.iter().map(|v| v.application.id).collect();
        assert_eq!(ids, ids_again);
    }
}
