//! crates/recruit_core/src/ports.rs
//!
//! Defines the service contract (trait) for the application's persistence.
//! The trait forms the boundary of the hexagonal architecture: the workflow
//! layer depends only on this port, so tests can substitute the in-memory
//! store and the service substitutes the PostgreSQL adapter.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Account, AccountCredentials, ActivityLog, Application, ApplicationStatus, Bookmark,
    CompanyProfile, DirectRecruitment, Interview, InterviewUpdate, InterviewType, JobPosting,
    Message, NewCompanyProfile, NewJobPosting, NewStudentProfile, Notification, Portfolio,
    PostingApplicantView, PostingStatus, PostingUpdate, RecruitmentFilter, RecruitmentStatus,
    Review, Role, StudentApplicationView, StudentCv, StudentProfile, UserSetting,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// Abstracts away the specific errors of the backing store.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("item not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("an unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// The Persistence Port
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Accounts ---

    /// Creates an account with role `Student` together with its profile.
    /// Must be atomic: if the profile cannot be created, the account must
    /// not persist. A taken email yields `PortError::Conflict`.
    async fn create_student_account(
        &self,
        email: &str,
        password_hash: &str,
        profile: NewStudentProfile,
    ) -> PortResult<(Account, StudentProfile)>;

    /// As above for role `Company`.
    async fn create_company_account(
        &self,
        email: &str,
        password_hash: &str,
        profile: NewCompanyProfile,
    ) -> PortResult<(Account, CompanyProfile)>;

    async fn get_account(&self, account_id: Uuid) -> PortResult<Account>;

    async fn get_account_by_email(&self, email: &str) -> PortResult<AccountCredentials>;

    async fn update_account_role(&self, account_id: Uuid, role: Role) -> PortResult<Account>;

    /// Deletes an account and everything hanging off it.
    async fn delete_account(&self, account_id: Uuid) -> PortResult<()>;

    // --- Profiles ---

    async fn get_student_profile_by_account(&self, account_id: Uuid) -> PortResult<StudentProfile>;

    async fn get_company_profile_by_account(&self, account_id: Uuid) -> PortResult<CompanyProfile>;

    async fn get_student_profile(&self, profile_id: Uuid) -> PortResult<StudentProfile>;

    async fn get_company_profile(&self, profile_id: Uuid) -> PortResult<CompanyProfile>;

    // --- Student CVs ---

    async fn create_cv(
        &self,
        student_profile_id: Uuid,
        file_path: &str,
        original_name: &str,
    ) -> PortResult<StudentCv>;

    async fn get_cv(&self, cv_id: Uuid) -> PortResult<StudentCv>;

    async fn list_cvs(&self, student_profile_id: Uuid) -> PortResult<Vec<StudentCv>>;

    async fn delete_cv(&self, cv_id: Uuid) -> PortResult<()>;

    // --- Job Postings ---

    async fn create_posting(&self, posting: NewJobPosting) -> PortResult<JobPosting>;

    async fn get_posting(&self, posting_id: Uuid) -> PortResult<JobPosting>;

    async fn update_posting(
        &self,
        posting_id: Uuid,
        update: PostingUpdate,
    ) -> PortResult<JobPosting>;

    async fn delete_posting(&self, posting_id: Uuid) -> PortResult<()>;

    async fn set_posting_status(
        &self,
        posting_id: Uuid,
        status: PostingStatus,
    ) -> PortResult<JobPosting>;

    async fn list_postings_by_company(&self, company_profile_id: Uuid)
        -> PortResult<Vec<JobPosting>>;

    async fn list_postings_by_status(&self, status: PostingStatus) -> PortResult<Vec<JobPosting>>;

    // --- Applications ---

    /// Inserts a new application. The store enforces uniqueness of the
    /// `(student_profile_id, job_posting_id)` pair; a violation, including
    /// one lost to a concurrent insert, yields `PortError::Conflict`.
    async fn create_application(
        &self,
        student_profile_id: Uuid,
        job_posting_id: Uuid,
        cv_id: Uuid,
        notes: Option<String>,
    ) -> PortResult<Application>;

    async fn get_application(&self, application_id: Uuid) -> PortResult<Application>;

    async fn find_application(
        &self,
        student_profile_id: Uuid,
        job_posting_id: Uuid,
    ) -> PortResult<Option<Application>>;

    /// Newest-first applications of one student, joined with posting,
    /// company and CV summaries.
    async fn list_applications_by_student(
        &self,
        student_profile_id: Uuid,
    ) -> PortResult<Vec<StudentApplicationView>>;

    /// Applications for one posting, joined with applicant summaries.
    async fn list_applications_for_posting(
        &self,
        job_posting_id: Uuid,
    ) -> PortResult<Vec<PostingApplicantView>>;

    async fn list_all_applications(&self) -> PortResult<Vec<Application>>;

    async fn update_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
        updated_at: DateTime<Utc>,
    ) -> PortResult<Application>;

    async fn delete_application(&self, application_id: Uuid) -> PortResult<()>;

    // --- Direct Recruitments ---

    /// Inserts a new direct recruitment. Uniqueness of the
    /// `(company_profile_id, student_profile_id)` pair is enforced by the
    /// store; violations yield `PortError::Conflict`.
    async fn create_recruitment(
        &self,
        company_profile_id: Uuid,
        student_profile_id: Uuid,
        recruiter_account_id: Option<Uuid>,
        message: Option<String>,
        notes: Option<String>,
    ) -> PortResult<DirectRecruitment>;

    async fn get_recruitment(&self, recruitment_id: Uuid) -> PortResult<DirectRecruitment>;

    async fn find_recruitment(
        &self,
        company_profile_id: Uuid,
        student_profile_id: Uuid,
    ) -> PortResult<Option<DirectRecruitment>>;

    /// Lists recruitments matching every set filter field (AND semantics),
    /// ordered by `recruited_at` descending.
    async fn list_recruitments(
        &self,
        filter: RecruitmentFilter,
    ) -> PortResult<Vec<DirectRecruitment>>;

    /// Sets status and `last_status_update`; `notes` overwrites only when
    /// `Some`.
    async fn update_recruitment_status(
        &self,
        recruitment_id: Uuid,
        status: RecruitmentStatus,
        notes: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> PortResult<DirectRecruitment>;

    // --- Interviews ---

    async fn create_interview(
        &self,
        application_id: Uuid,
        scheduled_at: DateTime<Utc>,
        interview_type: InterviewType,
        location: Option<String>,
        notes: Option<String>,
    ) -> PortResult<Interview>;

    async fn get_interview(&self, interview_id: Uuid) -> PortResult<Interview>;

    async fn update_interview(
        &self,
        interview_id: Uuid,
        update: InterviewUpdate,
    ) -> PortResult<Interview>;

    /// Scheduled interviews at or after `now` whose application belongs to
    /// the student owning `account_id`.
    async fn list_upcoming_interviews_for_student(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> PortResult<Vec<Interview>>;

    /// Scheduled interviews at or after `now` whose application's posting
    /// belongs to the company owning `account_id`.
    async fn list_upcoming_interviews_for_company(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> PortResult<Vec<Interview>>;

    // --- Bookmarks ---

    async fn create_bookmark(
        &self,
        student_profile_id: Uuid,
        job_posting_id: Uuid,
    ) -> PortResult<Bookmark>;

    async fn list_bookmarks(&self, student_profile_id: Uuid) -> PortResult<Vec<Bookmark>>;

    async fn delete_bookmark(&self, bookmark_id: Uuid) -> PortResult<()>;

    // --- Notifications ---

    async fn create_notification(
        &self,
        account_id: Uuid,
        title: &str,
        body: &str,
    ) -> PortResult<Notification>;

    async fn list_notifications(&self, account_id: Uuid) -> PortResult<Vec<Notification>>;

    async fn mark_notification_read(&self, notification_id: Uuid) -> PortResult<Notification>;

    // --- Reviews ---

    async fn create_review(
        &self,
        student_profile_id: Uuid,
        company_profile_id: Uuid,
        application_id: Option<Uuid>,
        rating: i32,
        comment: Option<String>,
    ) -> PortResult<Review>;

    async fn list_reviews_for_company(&self, company_profile_id: Uuid) -> PortResult<Vec<Review>>;

    // --- Portfolios ---

    async fn create_portfolio(
        &self,
        student_profile_id: Uuid,
        title: &str,
        description: Option<String>,
        url: Option<String>,
    ) -> PortResult<Portfolio>;

    async fn list_portfolios(&self, student_profile_id: Uuid) -> PortResult<Vec<Portfolio>>;

    async fn delete_portfolio(&self, portfolio_id: Uuid) -> PortResult<()>;

    // --- Messages ---

    async fn create_message(
        &self,
        sender_account_id: Uuid,
        receiver_account_id: Uuid,
        body: &str,
    ) -> PortResult<Message>;

    /// Messages exchanged between two accounts, oldest first.
    async fn list_conversation(
        &self,
        account_a: Uuid,
        account_b: Uuid,
    ) -> PortResult<Vec<Message>>;

    // --- Settings ---

    async fn upsert_setting(
        &self,
        account_id: Uuid,
        key: &str,
        value: &str,
    ) -> PortResult<UserSetting>;

    async fn list_settings(&self, account_id: Uuid) -> PortResult<Vec<UserSetting>>;

    // --- Activity log ---

    async fn log_activity(&self, account_id: Option<Uuid>, action: &str) -> PortResult<()>;

    async fn list_activity(&self, limit: i64) -> PortResult<Vec<ActivityLog>>;
}
