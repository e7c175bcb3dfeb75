//! crates/recruit_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or web framework; the
//! status enums serialize as the SCREAMING_SNAKE_CASE strings that are
//! stored in the database and sent over the wire.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Roles and Capabilities
//=========================================================================================

/// The closed set of account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Company,
    Admin,
}

/// Things a caller may be allowed to do. Route handlers check these through
/// [`Role::can`] instead of comparing role strings in every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create, update and delete own job postings; review applicants.
    ManagePostings,
    /// Apply to postings, upload CVs, withdraw own pending applications.
    Apply,
    /// Initiate direct recruitments toward students.
    Recruit,
    /// Schedule and manage interviews.
    ScheduleInterviews,
    /// Move applications through their status workflow. Ownership of the
    /// posting is checked separately in the workflow layer.
    ReviewApplications,
    /// Moderate posting statuses, manage users, read the activity log.
    Moderate,
    /// Read the full application list across all students.
    ListAllApplications,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Company => "COMPANY",
            Role::Admin => "ADMIN",
        }
    }

    /// The central authorization matrix. Admins intentionally do not inherit
    /// student/company capabilities: an admin cannot apply to a posting.
    pub fn can(&self, capability: Capability) -> bool {
        use Capability::*;
        match self {
            Role::Student => matches!(capability, Apply),
            Role::Company => matches!(
                capability,
                ManagePostings | Recruit | ScheduleInterviews | ReviewApplications
            ),
            Role::Admin => matches!(
                capability,
                Moderate | ListAllApplications | ScheduleInterviews | ReviewApplications
            ),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STUDENT" => Ok(Role::Student),
            "COMPANY" => Ok(Role::Company),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

//=========================================================================================
// Status Enums
//=========================================================================================

/// Moderation/visibility status of a job posting.
///
/// Postings are created as `Approved` (observed auto-publish behavior) and
/// must be separately marked `Active` before they can receive applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostingStatus {
    Pending,
    Approved,
    Active,
    Rejected,
    Expired,
}

impl PostingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostingStatus::Pending => "PENDING",
            PostingStatus::Approved => "APPROVED",
            PostingStatus::Active => "ACTIVE",
            PostingStatus::Rejected => "REJECTED",
            PostingStatus::Expired => "EXPIRED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PostingStatus::Rejected | PostingStatus::Expired)
    }
}

impl std::fmt::Display for PostingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PostingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PostingStatus::Pending),
            "APPROVED" => Ok(PostingStatus::Approved),
            "ACTIVE" => Ok(PostingStatus::Active),
            "REJECTED" => Ok(PostingStatus::Rejected),
            "EXPIRED" => Ok(PostingStatus::Expired),
            other => Err(format!("unknown posting status '{other}'")),
        }
    }
}

/// Status of a student's application to a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "PENDING",
            ApplicationStatus::Reviewed => "REVIEWED",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ApplicationStatus::Pending),
            "REVIEWED" => Ok(ApplicationStatus::Reviewed),
            "ACCEPTED" => Ok(ApplicationStatus::Accepted),
            "REJECTED" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status '{other}'")),
        }
    }
}

/// Status of a company-initiated direct recruitment.
///
/// `Withdrawn` is the company-side soft delete; it is a distinct terminal
/// state so a withdrawal stays distinguishable from a genuine rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecruitmentStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Withdrawn,
}

impl RecruitmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecruitmentStatus::Pending => "PENDING",
            RecruitmentStatus::Accepted => "ACCEPTED",
            RecruitmentStatus::Rejected => "REJECTED",
            RecruitmentStatus::Completed => "COMPLETED",
            RecruitmentStatus::Withdrawn => "WITHDRAWN",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RecruitmentStatus::Rejected | RecruitmentStatus::Completed | RecruitmentStatus::Withdrawn
        )
    }
}

impl std::fmt::Display for RecruitmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RecruitmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(RecruitmentStatus::Pending),
            "ACCEPTED" => Ok(RecruitmentStatus::Accepted),
            "REJECTED" => Ok(RecruitmentStatus::Rejected),
            "COMPLETED" => Ok(RecruitmentStatus::Completed),
            "WITHDRAWN" => Ok(RecruitmentStatus::Withdrawn),
            other => Err(format!("unknown recruitment status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl InterviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "SCHEDULED",
            InterviewStatus::Completed => "COMPLETED",
            InterviewStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InterviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SCHEDULED" => Ok(InterviewStatus::Scheduled),
            "COMPLETED" => Ok(InterviewStatus::Completed),
            "CANCELLED" => Ok(InterviewStatus::Cancelled),
            other => Err(format!("unknown interview status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterviewType {
    Online,
    Offline,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Online => "online",
            InterviewType::Offline => "offline",
        }
    }
}

impl std::str::FromStr for InterviewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "online" => Ok(InterviewType::Online),
            "offline" => Ok(InterviewType::Offline),
            other => Err(format!("unknown interview type '{other}'")),
        }
    }
}

//=========================================================================================
// Accounts and Profiles
//=========================================================================================

/// An account as exposed through the API. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Only used internally for login - contains sensitive data.
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub account_id: Uuid,
    pub email: String,
    pub role: Role,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub full_name: String,
    pub major: String,
    pub phone: Option<String>,
    pub skills: Option<String>,
    pub profile_photo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub company_name: String,
    pub industry_type: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub logo: Option<String>,
}

/// Profile field sets used at registration time.
#[derive(Debug, Clone, Deserialize)]
pub struct NewStudentProfile {
    pub full_name: String,
    pub major: String,
    pub phone: Option<String>,
    pub skills: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCompanyProfile {
    pub company_name: String,
    pub industry_type: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentCv {
    pub id: Uuid,
    pub student_profile_id: Uuid,
    pub file_path: String,
    pub original_name: String,
    pub uploaded_at: DateTime<Utc>,
}

//=========================================================================================
// Postings, Applications, Recruitments, Interviews
//=========================================================================================

#[derive(Debug, Clone, Serialize)]
pub struct JobPosting {
    pub id: Uuid,
    pub company_profile_id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub employment_type: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: PostingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewJobPosting {
    pub company_profile_id: Uuid,
    pub title: String,
    pub description: String,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub employment_type: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub status: PostingStatus,
}

/// Mutable posting fields; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostingUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub employment_type: Option<String>,
    pub deadline: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Application {
    pub id: Uuid,
    pub student_profile_id: Uuid,
    pub job_posting_id: Uuid,
    pub cv_id: Uuid,
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub application_date: DateTime<Utc>,
    pub last_status_update: DateTime<Utc>,
}

/// An application joined with the posting/company/CV summaries a student
/// sees when listing their own applications.
#[derive(Debug, Clone, Serialize)]
pub struct StudentApplicationView {
    #[serde(flatten)]
    pub application: Application,
    pub posting_title: String,
    pub company_name: String,
    pub cv_original_name: String,
}

/// An application joined with the applicant summary a company sees when
/// listing applicants for one of its postings.
#[derive(Debug, Clone, Serialize)]
pub struct PostingApplicantView {
    #[serde(flatten)]
    pub application: Application,
    pub student_name: String,
    pub student_major: String,
    pub cv_id_cited: Uuid,
    pub cv_original_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectRecruitment {
    pub id: Uuid,
    pub company_profile_id: Uuid,
    pub student_profile_id: Uuid,
    pub recruiter_account_id: Option<Uuid>,
    pub status: RecruitmentStatus,
    pub message: Option<String>,
    pub notes: Option<String>,
    pub recruited_at: DateTime<Utc>,
    pub last_status_update: DateTime<Utc>,
}

/// Composable AND filter for listing direct recruitments.
#[derive(Debug, Clone, Default)]
pub struct RecruitmentFilter {
    pub company_profile_id: Option<Uuid>,
    pub student_profile_id: Option<Uuid>,
    pub status: Option<RecruitmentStatus>,
    pub recruiter_account_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Interview {
    pub id: Uuid,
    pub application_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub interview_type: InterviewType,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub feedback: Option<String>,
    pub rating: Option<i32>,
    pub status: InterviewStatus,
}

/// Partial interview update. Status is included and deliberately unchecked:
/// transitions like COMPLETED back to SCHEDULED are not blocked.
#[derive(Debug, Clone, Default)]
pub struct InterviewUpdate {
    pub scheduled_at: Option<DateTime<Utc>>,
    pub interview_type: Option<InterviewType>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub feedback: Option<String>,
    pub rating: Option<i32>,
    pub status: Option<InterviewStatus>,
}

//=========================================================================================
// Ancillary records (owner-referenced CRUD, no cross-entity invariants)
//=========================================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Bookmark {
    pub id: Uuid,
    pub student_profile_id: Uuid,
    pub job_posting_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub account_id: Uuid,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub id: Uuid,
    pub student_profile_id: Uuid,
    pub company_profile_id: Uuid,
    pub application_id: Option<Uuid>,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Portfolio {
    pub id: Uuid,
    pub student_profile_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_account_id: Uuid,
    pub receiver_account_id: Uuid,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSetting {
    pub account_id: Uuid,
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivityLog {
    pub id: Uuid,
    pub account_id: Option<Uuid>,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_capability_matrix() {
        assert!(Role::Student.can(Capability::Apply));
        assert!(!Role::Student.can(Capability::ManagePostings));
        assert!(!Role::Student.can(Capability::Moderate));

        assert!(Role::Company.can(Capability::ManagePostings));
        assert!(Role::Company.can(Capability::Recruit));
        assert!(Role::Company.can(Capability::ScheduleInterviews));
        assert!(Role::Company.can(Capability::ReviewApplications));
        assert!(!Role::Company.can(Capability::Apply));
        assert!(!Role::Company.can(Capability::ListAllApplications));

        assert!(Role::Admin.can(Capability::Moderate));
        assert!(Role::Admin.can(Capability::ListAllApplications));
        assert!(Role::Admin.can(Capability::ReviewApplications));
        assert!(!Role::Admin.can(Capability::Apply));
        assert!(!Role::Student.can(Capability::ReviewApplications));
    }

    #[test]
    fn status_string_round_trips() {
        for status in [
            PostingStatus::Pending,
            PostingStatus::Approved,
            PostingStatus::Active,
            PostingStatus::Rejected,
            PostingStatus::Expired,
        ] {
            assert_eq!(PostingStatus::from_str(status.as_str()), Ok(status));
        }
        for status in [
            ApplicationStatus::Pending,
            ApplicationStatus::Reviewed,
            ApplicationStatus::Accepted,
            ApplicationStatus::Rejected,
        ] {
            assert_eq!(ApplicationStatus::from_str(status.as_str()), Ok(status));
        }
        for status in [
            RecruitmentStatus::Pending,
            RecruitmentStatus::Accepted,
            RecruitmentStatus::Rejected,
            RecruitmentStatus::Completed,
            RecruitmentStatus::Withdrawn,
        ] {
            assert_eq!(RecruitmentStatus::from_str(status.as_str()), Ok(status));
        }
        assert!(PostingStatus::from_str("DRAFT").is_err());
        assert!(ApplicationStatus::from_str("pending").is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(!ApplicationStatus::Pending.is_terminal());
        assert!(!ApplicationStatus::Reviewed.is_terminal());
        assert!(ApplicationStatus::Accepted.is_terminal());
        assert!(ApplicationStatus::Rejected.is_terminal());

        assert!(RecruitmentStatus::Withdrawn.is_terminal());
        assert!(!RecruitmentStatus::Pending.is_terminal());

        assert!(PostingStatus::Expired.is_terminal());
        assert!(!PostingStatus::Active.is_terminal());
    }

    #[test]
    fn wire_serialization_is_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&ApplicationStatus::Pending).unwrap(),
            "\"PENDING\""
        );
        assert_eq!(
            serde_json::to_string(&RecruitmentStatus::Withdrawn).unwrap(),
            "\"WITHDRAWN\""
        );
        assert_eq!(serde_json::to_string(&Role::Company).unwrap(), "\"COMPANY\"");
        assert_eq!(
            serde_json::to_string(&InterviewType::Online).unwrap(),
            "\"online\""
        );
    }
}
