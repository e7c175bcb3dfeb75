//! crates/recruit_core/src/workflow/postings.rs
//!
//! Job posting lifecycle: company-authored postings with a moderation
//! status. Creation auto-publishes as APPROVED (observed behavior of the
//! product; the apply gate checks for ACTIVE, so a new posting still needs
//! a status change before it can receive applications).

use std::str::FromStr;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{JobPosting, NewJobPosting, PostingApplicantView, PostingStatus, PostingUpdate};
use crate::ports::{DatabaseService, PortError};

use super::{WorkflowError, WorkflowResult};

/// Fields a company supplies when creating a posting.
#[derive(Debug, Clone)]
pub struct PostingFields {
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub employment_type: Option<String>,
    pub deadline: Option<NaiveDate>,
}

/// Creates a posting owned by the caller's company profile.
pub async fn create(
    db: &dyn DatabaseService,
    caller_account_id: Uuid,
    fields: PostingFields,
) -> WorkflowResult<JobPosting> {
    let company = db
        .get_company_profile_by_account(caller_account_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => WorkflowError::ProfileNotFound("company"),
            other => other.into(),
        })?;

    Ok(db
        .create_posting(NewJobPosting {
            company_profile_id: company.id,
            title: fields.title,
            description: fields.description,
            requirements: fields.requirements,
            location: fields.location,
            salary_min: fields.salary_min,
            salary_max: fields.salary_max,
            employment_type: fields.employment_type,
            deadline: fields.deadline,
            // Auto-publish, see module docs.
            status: PostingStatus::Approved,
        })
        .await?)
}

async fn resolve_owned(
    db: &dyn DatabaseService,
    caller_account_id: Uuid,
    posting_id: Uuid,
) -> WorkflowResult<JobPosting> {
    let posting = db.get_posting(posting_id).await.map_err(|e| match e {
        PortError::NotFound(_) => WorkflowError::NotFound("posting"),
        other => other.into(),
    })?;
    let company = db.get_company_profile(posting.company_profile_id).await?;
    if company.account_id != caller_account_id {
        return Err(WorkflowError::Forbidden);
    }
    Ok(posting)
}

pub async fn update(
    db: &dyn DatabaseService,
    caller_account_id: Uuid,
    posting_id: Uuid,
    update: PostingUpdate,
) -> WorkflowResult<JobPosting> {
    resolve_owned(db, caller_account_id, posting_id).await?;
    Ok(db.update_posting(posting_id, update).await?)
}

pub async fn delete(
    db: &dyn DatabaseService,
    caller_account_id: Uuid,
    posting_id: Uuid,
) -> WorkflowResult<()> {
    resolve_owned(db, caller_account_id, posting_id).await?;
    Ok(db.delete_posting(posting_id).await?)
}

/// Admin moderation: sets a posting to any of the enumerated statuses.
/// The status arrives as the raw wire string so an unknown value is a
/// validation failure, not a deserialization 422.
pub async fn admin_set_status(
    db: &dyn DatabaseService,
    posting_id: Uuid,
    status: &str,
) -> WorkflowResult<JobPosting> {
    let status =
        PostingStatus::from_str(status).map_err(|_| WorkflowError::InvalidStatus(status.into()))?;
    db.set_posting_status(posting_id, status)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => WorkflowError::NotFound("posting"),
            other => other.into(),
        })
}

/// Lists the applicants of a posting; only the owning company may look.
pub async fn list_applicants(
    db: &dyn DatabaseService,
    caller_account_id: Uuid,
    posting_id: Uuid,
) -> WorkflowResult<Vec<PostingApplicantView>> {
    resolve_owned(db, caller_account_id, posting_id).await?;
    Ok(db.list_applications_for_posting(posting_id).await?)
}

pub async fn list_mine(
    db: &dyn DatabaseService,
    caller_account_id: Uuid,
) -> WorkflowResult<Vec<JobPosting>> {
    let company = db
        .get_company_profile_by_account(caller_account_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => WorkflowError::ProfileNotFound("company"),
            other => other.into(),
        })?;
    Ok(db.list_postings_by_company(company.id).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::support::Fixture;

    fn fields(title: &str) -> PostingFields {
        PostingFields {
            title: title.to_string(),
            description: "desc".to_string(),
            requirements: None,
            location: None,
            salary_min: None,
            salary_max: None,
            employment_type: None,
            deadline: None,
        }
    }

    #[tokio::test]
    async fn create_auto_publishes_as_approved() {
        let fx = Fixture::new().await;
        let posting = create(&fx.db, fx.company_account.id, fields("QA Engineer"))
            .await
            .unwrap();
        assert_eq!(posting.status, PostingStatus::Approved);
        assert_eq!(posting.company_profile_id, fx.company_profile.id);
    }

    #[tokio::test]
    async fn create_requires_company_profile() {
        let fx = Fixture::new().await;
        let err = create(&fx.db, fx.student_account.id, fields("QA Engineer"))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ProfileNotFound("company")));
    }

    #[tokio::test]
    async fn only_owner_may_update_or_delete() {
        let fx = Fixture::new().await;
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

        let err = update(
            &fx.db,
            rival_account.id,
            fx.posting.id,
            PostingUpdate {
                title: Some("Hijacked".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden));

        let err = delete(&fx.db, rival_account.id, fx.posting.id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden));

        let updated = update(
            &fx.db,
            fx.company_account.id,
            fx.posting.id,
            PostingUpdate {
                title: Some("Senior Backend Engineer".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "Senior Backend Engineer");
    }

    #[tokio::test]
    async fn admin_set_status_validates_the_value() {
        let fx = Fixture::new().await;
        let err = admin_set_status(&fx.db, fx.posting.id, "PUBLISHED")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidStatus(_)));

        let posting = admin_set_status(&fx.db, fx.posting.id, "EXPIRED")
            .await
            .unwrap();
        assert_eq!(posting.status, PostingStatus::Expired);
    }

    #[tokio::test]
    async fn applicant_listing_is_owner_gated() {
        let fx = Fixture::new().await;
        crate::workflow::applications::apply(
            &fx.db,
            fx.student_account.id,
            fx.posting.id,
            fx.cv.id,
            None,
        )
        .await
        .unwrap();

        let applicants = list_applicants(&fx.db, fx.company_account.id, fx.posting.id)
            .await
            .unwrap();
        assert_eq!(applicants.len(), 1);
        assert_eq!(applicants[0].student_name, "Siti Rahma");

        let err = list_applicants(&fx.db, fx.student_account.id, fx.posting.id)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden));
    }
}
