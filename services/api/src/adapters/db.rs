//! services/api/src/adapters/db.rs
//!
//! The database adapter: the concrete implementation of the
//! `DatabaseService` port from the `core` crate, backed by PostgreSQL
//! through `sqlx`. Uniqueness is enforced here by the schema's constraints;
//! unique violations are translated to `PortError::Conflict` so the
//! workflow layer sees the same error whether the pre-check or the
//! constraint caught the duplicate.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use recruit_core::domain::{
    Account, AccountCredentials, ActivityLog, Application, ApplicationStatus, Bookmark,
    CompanyProfile, DirectRecruitment, Interview, InterviewUpdate, InterviewType, JobPosting,
    Message, NewCompanyProfile, NewJobPosting, NewStudentProfile, Notification, Portfolio,
    PostingApplicantView, PostingStatus, PostingUpdate, RecruitmentFilter, RecruitmentStatus,
    Review, Role, StudentApplicationView, StudentCv, StudentProfile, UserSetting,
};
use recruit_core::ports::{DatabaseService, PortError, PortResult};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A PostgreSQL adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new `PgStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn not_found_or(e: sqlx::Error, what: String) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(what),
        other => unexpected(other),
    }
}

/// Maps an insert failure, turning unique-constraint violations into the
/// domain-facing conflict message.
fn insert_err(e: sqlx::Error, conflict_msg: &str) -> PortError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return PortError::Conflict(conflict_msg.to_string());
        }
    }
    unexpected(e)
}

fn parse<T: std::str::FromStr<Err = String>>(raw: String) -> PortResult<T> {
    raw.parse().map_err(PortError::Unexpected)
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct AccountRecord {
    id: Uuid,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
}
impl AccountRecord {
    fn to_domain(self) -> PortResult<Account> {
        Ok(Account {
            id: self.id,
            email: self.email,
            role: parse(self.role)?,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    role: String,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> PortResult<AccountCredentials> {
        Ok(AccountCredentials {
            account_id: self.id,
            email: self.email,
            role: parse(self.role)?,
            password_hash: self.password_hash,
        })
    }
}

#[derive(FromRow)]
struct StudentProfileRecord {
    id: Uuid,
    account_id: Uuid,
    full_name: String,
    major: String,
    phone: Option<String>,
    skills: Option<String>,
    profile_photo: Option<String>,
}
impl StudentProfileRecord {
    fn to_domain(self) -> StudentProfile {
        StudentProfile {
            id: self.id,
            account_id: self.account_id,
            full_name: self.full_name,
            major: self.major,
            phone: self.phone,
            skills: self.skills,
            profile_photo: self.profile_photo,
        }
    }
}

#[derive(FromRow)]
struct CompanyProfileRecord {
    id: Uuid,
    account_id: Uuid,
    company_name: String,
    industry_type: String,
    phone: Option<String>,
    address: Option<String>,
    logo: Option<String>,
}
impl CompanyProfileRecord {
    fn to_domain(self) -> CompanyProfile {
        CompanyProfile {
            id: self.id,
            account_id: self.account_id,
            company_name: self.company_name,
            industry_type: self.industry_type,
            phone: self.phone,
            address: self.address,
            logo: self.logo,
        }
    }
}

#[derive(FromRow)]
struct CvRecord {
    id: Uuid,
    student_profile_id: Uuid,
    file_path: String,
    original_name: String,
    uploaded_at: DateTime<Utc>,
}
impl CvRecord {
    fn to_domain(self) -> StudentCv {
        StudentCv {
            id: self.id,
            student_profile_id: self.student_profile_id,
            file_path: self.file_path,
            original_name: self.original_name,
            uploaded_at: self.uploaded_at,
        }
    }
}

#[derive(FromRow)]
struct PostingRecord {
    id: Uuid,
    company_profile_id: Uuid,
    title: String,
    description: String,
    requirements: Option<String>,
    location: Option<String>,
    salary_min: Option<i64>,
    salary_max: Option<i64>,
    employment_type: Option<String>,
    deadline: Option<NaiveDate>,
    status: String,
    created_at: DateTime<Utc>,
}
impl PostingRecord {
    fn to_domain(self) -> PortResult<JobPosting> {
        Ok(JobPosting {
            id: self.id,
            company_profile_id: self.company_profile_id,
            title: self.title,
            description: self.description,
            requirements: self.requirements,
            location: self.location,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            employment_type: self.employment_type,
            deadline: self.deadline,
            status: parse(self.status)?,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct ApplicationRecord {
    id: Uuid,
    student_profile_id: Uuid,
    job_posting_id: Uuid,
    cv_id: Uuid,
    status: String,
    notes: Option<String>,
    application_date: DateTime<Utc>,
    last_status_update: DateTime<Utc>,
}
impl ApplicationRecord {
    fn to_domain(self) -> PortResult<Application> {
        Ok(Application {
            id: self.id,
            student_profile_id: self.student_profile_id,
            job_posting_id: self.job_posting_id,
            cv_id: self.cv_id,
            status: parse(self.status)?,
            notes: self.notes,
            application_date: self.application_date,
            last_status_update: self.last_status_update,
        })
    }
}

const APPLICATION_COLUMNS: &str = "id, student_profile_id, job_posting_id, cv_id, status, notes, \
                                   application_date, last_status_update";

#[derive(FromRow)]
struct StudentApplicationViewRecord {
    #[sqlx(flatten)]
    application: ApplicationRecord,
    posting_title: String,
    company_name: String,
    cv_original_name: String,
}
impl StudentApplicationViewRecord {
    fn to_domain(self) -> PortResult<StudentApplicationView> {
        Ok(StudentApplicationView {
            application: self.application.to_domain()?,
            posting_title: self.posting_title,
            company_name: self.company_name,
            cv_original_name: self.cv_original_name,
        })
    }
}

#[derive(FromRow)]
struct PostingApplicantViewRecord {
    #[sqlx(flatten)]
    application: ApplicationRecord,
    student_name: String,
    student_major: String,
    cv_original_name: String,
}
impl PostingApplicantViewRecord {
    fn to_domain(self) -> PortResult<PostingApplicantView> {
        let application = self.application.to_domain()?;
        Ok(PostingApplicantView {
            cv_id_cited: application.cv_id,
            application,
            student_name: self.student_name,
            student_major: self.student_major,
            cv_original_name: self.cv_original_name,
        })
    }
}

#[derive(FromRow)]
struct RecruitmentRecord {
    id: Uuid,
    company_profile_id: Uuid,
    student_profile_id: Uuid,
    recruiter_account_id: Option<Uuid>,
    status: String,
    message: Option<String>,
    notes: Option<String>,
    recruited_at: DateTime<Utc>,
    last_status_update: DateTime<Utc>,
}
impl RecruitmentRecord {
    fn to_domain(self) -> PortResult<DirectRecruitment> {
        Ok(DirectRecruitment {
            id: self.id,
            company_profile_id: self.company_profile_id,
            student_profile_id: self.student_profile_id,
            recruiter_account_id: self.recruiter_account_id,
            status: parse(self.status)?,
            message: self.message,
            notes: self.notes,
            recruited_at: self.recruited_at,
            last_status_update: self.last_status_update,
        })
    }
}

const RECRUITMENT_COLUMNS: &str = "id, company_profile_id, student_profile_id, \
                                   recruiter_account_id, status, message, notes, recruited_at, \
                                   last_status_update";

#[derive(FromRow)]
struct InterviewRecord {
    id: Uuid,
    application_id: Uuid,
    scheduled_at: DateTime<Utc>,
    interview_type: String,
    location: Option<String>,
    notes: Option<String>,
    feedback: Option<String>,
    rating: Option<i32>,
    status: String,
}
impl InterviewRecord {
    fn to_domain(self) -> PortResult<Interview> {
        Ok(Interview {
            id: self.id,
            application_id: self.application_id,
            scheduled_at: self.scheduled_at,
            interview_type: parse(self.interview_type)?,
            location: self.location,
            notes: self.notes,
            feedback: self.feedback,
            rating: self.rating,
            status: parse(self.status)?,
        })
    }
}

const INTERVIEW_COLUMNS: &str =
    "id, application_id, scheduled_at, interview_type, location, notes, feedback, rating, status";

#[derive(FromRow)]
struct BookmarkRecord {
    id: Uuid,
    student_profile_id: Uuid,
    job_posting_id: Uuid,
    created_at: DateTime<Utc>,
}
impl BookmarkRecord {
    fn to_domain(self) -> Bookmark {
        Bookmark {
            id: self.id,
            student_profile_id: self.student_profile_id,
            job_posting_id: self.job_posting_id,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct NotificationRecord {
    id: Uuid,
    account_id: Uuid,
    title: String,
    body: String,
    read: bool,
    created_at: DateTime<Utc>,
}
impl NotificationRecord {
    fn to_domain(self) -> Notification {
        Notification {
            id: self.id,
            account_id: self.account_id,
            title: self.title,
            body: self.body,
            read: self.read,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct ReviewRecord {
    id: Uuid,
    student_profile_id: Uuid,
    company_profile_id: Uuid,
    application_id: Option<Uuid>,
    rating: i32,
    comment: Option<String>,
    created_at: DateTime<Utc>,
}
impl ReviewRecord {
    fn to_domain(self) -> Review {
        Review {
            id: self.id,
            student_profile_id: self.student_profile_id,
            company_profile_id: self.company_profile_id,
            application_id: self.application_id,
            rating: self.rating,
            comment: self.comment,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct PortfolioRecord {
    id: Uuid,
    student_profile_id: Uuid,
    title: String,
    description: Option<String>,
    url: Option<String>,
    created_at: DateTime<Utc>,
}
impl PortfolioRecord {
    fn to_domain(self) -> Portfolio {
        Portfolio {
            id: self.id,
            student_profile_id: self.student_profile_id,
            title: self.title,
            description: self.description,
            url: self.url,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct MessageRecord {
    id: Uuid,
    sender_account_id: Uuid,
    receiver_account_id: Uuid,
    body: String,
    sent_at: DateTime<Utc>,
}
impl MessageRecord {
    fn to_domain(self) -> Message {
        Message {
            id: self.id,
            sender_account_id: self.sender_account_id,
            receiver_account_id: self.receiver_account_id,
            body: self.body,
            sent_at: self.sent_at,
        }
    }
}

#[derive(FromRow)]
struct SettingRecord {
    account_id: Uuid,
    key: String,
    value: String,
}
impl SettingRecord {
    fn to_domain(self) -> UserSetting {
        UserSetting {
            account_id: self.account_id,
            key: self.key,
            value: self.value,
        }
    }
}

#[derive(FromRow)]
struct ActivityRecord {
    id: Uuid,
    account_id: Option<Uuid>,
    action: String,
    created_at: DateTime<Utc>,
}
impl ActivityRecord {
    fn to_domain(self) -> ActivityLog {
        ActivityLog {
            id: self.id,
            account_id: self.account_id,
            action: self.action,
            created_at: self.created_at,
        }
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for PgStore {
    async fn create_student_account(
        &self,
        email: &str,
        password_hash: &str,
        profile: NewStudentProfile,
    ) -> PortResult<(Account, StudentProfile)> {
        // Account and profile go in one transaction: if the profile insert
        // fails, the account row must not persist.
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let account = sqlx::query_as::<_, AccountRecord>(
            "INSERT INTO accounts (id, email, password_hash, role) VALUES ($1, $2, $3, $4) \
             RETURNING id, email, role, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .bind(Role::Student.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| insert_err(e, &format!("email '{email}' is already registered")))?
        .to_domain()?;

        let profile = sqlx::query_as::<_, StudentProfileRecord>(
            "INSERT INTO student_profiles (id, account_id, full_name, major, phone, skills) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, account_id, full_name, major, phone, skills, profile_photo",
        )
        .bind(Uuid::new_v4())
        .bind(account.id)
        .bind(&profile.full_name)
        .bind(&profile.major)
        .bind(&profile.phone)
        .bind(&profile.skills)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?
        .to_domain();

        tx.commit().await.map_err(unexpected)?;
        Ok((account, profile))
    }

    async fn create_company_account(
        &self,
        email: &str,
        password_hash: &str,
        profile: NewCompanyProfile,
    ) -> PortResult<(Account, CompanyProfile)> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let account = sqlx::query_as::<_, AccountRecord>(
            "INSERT INTO accounts (id, email, password_hash, role) VALUES ($1, $2, $3, $4) \
             RETURNING id, email, role, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .bind(Role::Company.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| insert_err(e, &format!("email '{email}' is already registered")))?
        .to_domain()?;

        let profile = sqlx::query_as::<_, CompanyProfileRecord>(
            "INSERT INTO company_profiles (id, account_id, company_name, industry_type, phone, address) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, account_id, company_name, industry_type, phone, address, logo",
        )
        .bind(Uuid::new_v4())
        .bind(account.id)
        .bind(&profile.company_name)
        .bind(&profile.industry_type)
        .bind(&profile.phone)
        .bind(&profile.address)
        .fetch_one(&mut *tx)
        .await
        .map_err(unexpected)?
        .to_domain();

        tx.commit().await.map_err(unexpected)?;
        Ok((account, profile))
    }

    async fn get_account(&self, account_id: Uuid) -> PortResult<Account> {
        sqlx::query_as::<_, AccountRecord>(
            "SELECT id, email, role, created_at FROM accounts WHERE id = $1",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("account {account_id}")))?
        .to_domain()
    }

    async fn get_account_by_email(&self, email: &str) -> PortResult<AccountCredentials> {
        sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, role, password_hash FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("account '{email}'")))?
        .to_domain()
    }

    async fn update_account_role(&self, account_id: Uuid, role: Role) -> PortResult<Account> {
        sqlx::query_as::<_, AccountRecord>(
            "UPDATE accounts SET role = $1 WHERE id = $2 RETURNING id, email, role, created_at",
        )
        .bind(role.as_str())
        .bind(account_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("account {account_id}")))?
        .to_domain()
    }

    async fn delete_account(&self, account_id: Uuid) -> PortResult<()> {
        // Dependent rows go away through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("account {account_id}")));
        }
        Ok(())
    }

    async fn get_student_profile_by_account(&self, account_id: Uuid) -> PortResult<StudentProfile> {
        Ok(sqlx::query_as::<_, StudentProfileRecord>(
            "SELECT id, account_id, full_name, major, phone, skills, profile_photo \
             FROM student_profiles WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("student profile for account {account_id}")))?
        .to_domain())
    }

    async fn get_company_profile_by_account(&self, account_id: Uuid) -> PortResult<CompanyProfile> {
        Ok(sqlx::query_as::<_, CompanyProfileRecord>(
            "SELECT id, account_id, company_name, industry_type, phone, address, logo \
             FROM company_profiles WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("company profile for account {account_id}")))?
        .to_domain())
    }

    async fn get_student_profile(&self, profile_id: Uuid) -> PortResult<StudentProfile> {
        Ok(sqlx::query_as::<_, StudentProfileRecord>(
            "SELECT id, account_id, full_name, major, phone, skills, profile_photo \
             FROM student_profiles WHERE id = $1",
        )
        .bind(profile_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("student profile {profile_id}")))?
        .to_domain())
    }

    async fn get_company_profile(&self, profile_id: Uuid) -> PortResult<CompanyProfile> {
        Ok(sqlx::query_as::<_, CompanyProfileRecord>(
            "SELECT id, account_id, company_name, industry_type, phone, address, logo \
             FROM company_profiles WHERE id = $1",
        )
        .bind(profile_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("company profile {profile_id}")))?
        .to_domain())
    }

    async fn create_cv(
        &self,
        student_profile_id: Uuid,
        file_path: &str,
        original_name: &str,
    ) -> PortResult<StudentCv> {
        Ok(sqlx::query_as::<_, CvRecord>(
            "INSERT INTO student_cvs (id, student_profile_id, file_path, original_name) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, student_profile_id, file_path, original_name, uploaded_at",
        )
        .bind(Uuid::new_v4())
        .bind(student_profile_id)
        .bind(file_path)
        .bind(original_name)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?
        .to_domain())
    }

    async fn get_cv(&self, cv_id: Uuid) -> PortResult<StudentCv> {
        Ok(sqlx::query_as::<_, CvRecord>(
            "SELECT id, student_profile_id, file_path, original_name, uploaded_at \
             FROM student_cvs WHERE id = $1",
        )
        .bind(cv_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("cv {cv_id}")))?
        .to_domain())
    }

    async fn list_cvs(&self, student_profile_id: Uuid) -> PortResult<Vec<StudentCv>> {
        let records = sqlx::query_as::<_, CvRecord>(
            "SELECT id, student_profile_id, file_path, original_name, uploaded_at \
             FROM student_cvs WHERE student_profile_id = $1 ORDER BY uploaded_at DESC",
        )
        .bind(student_profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(CvRecord::to_domain).collect())
    }

    async fn delete_cv(&self, cv_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM student_cvs WHERE id = $1")
            .bind(cv_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("cv {cv_id}")));
        }
        Ok(())
    }

    async fn create_posting(&self, posting: NewJobPosting) -> PortResult<JobPosting> {
        sqlx::query_as::<_, PostingRecord>(
            "INSERT INTO job_postings \
             (id, company_profile_id, title, description, requirements, location, salary_min, \
              salary_max, employment_type, deadline, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING id, company_profile_id, title, description, requirements, location, \
                       salary_min, salary_max, employment_type, deadline, status, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(posting.company_profile_id)
        .bind(&posting.title)
        .bind(&posting.description)
        .bind(&posting.requirements)
        .bind(&posting.location)
        .bind(posting.salary_min)
        .bind(posting.salary_max)
        .bind(&posting.employment_type)
        .bind(posting.deadline)
        .bind(posting.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?
        .to_domain()
    }

    async fn get_posting(&self, posting_id: Uuid) -> PortResult<JobPosting> {
        sqlx::query_as::<_, PostingRecord>(
            "SELECT id, company_profile_id, title, description, requirements, location, \
                    salary_min, salary_max, employment_type, deadline, status, created_at \
             FROM job_postings WHERE id = $1",
        )
        .bind(posting_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("posting {posting_id}")))?
        .to_domain()
    }

    async fn update_posting(
        &self,
        posting_id: Uuid,
        update: PostingUpdate,
    ) -> PortResult<JobPosting> {
        sqlx::query_as::<_, PostingRecord>(
            "UPDATE job_postings SET \
                 title = COALESCE($1, title), \
                 description = COALESCE($2, description), \
                 requirements = COALESCE($3, requirements), \
                 location = COALESCE($4, location), \
                 salary_min = COALESCE($5, salary_min), \
                 salary_max = COALESCE($6, salary_max), \
                 employment_type = COALESCE($7, employment_type), \
                 deadline = COALESCE($8, deadline) \
             WHERE id = $9 \
             RETURNING id, company_profile_id, title, description, requirements, location, \
                       salary_min, salary_max, employment_type, deadline, status, created_at",
        )
        .bind(update.title)
        .bind(update.description)
        .bind(update.requirements)
        .bind(update.location)
        .bind(update.salary_min)
        .bind(update.salary_max)
        .bind(update.employment_type)
        .bind(update.deadline)
        .bind(posting_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("posting {posting_id}")))?
        .to_domain()
    }

    async fn delete_posting(&self, posting_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM job_postings WHERE id = $1")
            .bind(posting_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("posting {posting_id}")));
        }
        Ok(())
    }

    async fn set_posting_status(
        &self,
        posting_id: Uuid,
        status: PostingStatus,
    ) -> PortResult<JobPosting> {
        sqlx::query_as::<_, PostingRecord>(
            "UPDATE job_postings SET status = $1 WHERE id = $2 \
             RETURNING id, company_profile_id, title, description, requirements, location, \
                       salary_min, salary_max, employment_type, deadline, status, created_at",
        )
        .bind(status.as_str())
        .bind(posting_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("posting {posting_id}")))?
        .to_domain()
    }

    async fn list_postings_by_company(
        &self,
        company_profile_id: Uuid,
    ) -> PortResult<Vec<JobPosting>> {
        let records = sqlx::query_as::<_, PostingRecord>(
            "SELECT id, company_profile_id, title, description, requirements, location, \
                    salary_min, salary_max, employment_type, deadline, status, created_at \
             FROM job_postings WHERE company_profile_id = $1 ORDER BY created_at DESC",
        )
        .bind(company_profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(PostingRecord::to_domain).collect()
    }

    async fn list_postings_by_status(&self, status: PostingStatus) -> PortResult<Vec<JobPosting>> {
        let records = sqlx::query_as::<_, PostingRecord>(
            "SELECT id, company_profile_id, title, description, requirements, location, \
                    salary_min, salary_max, employment_type, deadline, status, created_at \
             FROM job_postings WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(PostingRecord::to_domain).collect()
    }

    async fn create_application(
        &self,
        student_profile_id: Uuid,
        job_posting_id: Uuid,
        cv_id: Uuid,
        notes: Option<String>,
    ) -> PortResult<Application> {
        sqlx::query_as::<_, ApplicationRecord>(
            "INSERT INTO applications (id, student_profile_id, job_posting_id, cv_id, status, notes) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, student_profile_id, job_posting_id, cv_id, status, notes, \
                       application_date, last_status_update",
        )
        .bind(Uuid::new_v4())
        .bind(student_profile_id)
        .bind(job_posting_id)
        .bind(cv_id)
        .bind(ApplicationStatus::Pending.as_str())
        .bind(notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_err(e, "an application for this posting already exists"))?
        .to_domain()
    }

    async fn get_application(&self, application_id: Uuid) -> PortResult<Application> {
        sqlx::query_as::<_, ApplicationRecord>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"
        ))
        .bind(application_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("application {application_id}")))?
        .to_domain()
    }

    async fn find_application(
        &self,
        student_profile_id: Uuid,
        job_posting_id: Uuid,
    ) -> PortResult<Option<Application>> {
        let record = sqlx::query_as::<_, ApplicationRecord>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications \
             WHERE student_profile_id = $1 AND job_posting_id = $2"
        ))
        .bind(student_profile_id)
        .bind(job_posting_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        record.map(ApplicationRecord::to_domain).transpose()
    }

    async fn list_applications_by_student(
        &self,
        student_profile_id: Uuid,
    ) -> PortResult<Vec<StudentApplicationView>> {
        let records = sqlx::query_as::<_, StudentApplicationViewRecord>(
            "SELECT a.id, a.student_profile_id, a.job_posting_id, a.cv_id, a.status, a.notes, \
                    a.application_date, a.last_status_update, \
                    jp.title AS posting_title, cp.company_name, cv.original_name AS cv_original_name \
             FROM applications a \
             JOIN job_postings jp ON jp.id = a.job_posting_id \
             JOIN company_profiles cp ON cp.id = jp.company_profile_id \
             JOIN student_cvs cv ON cv.id = a.cv_id \
             WHERE a.student_profile_id = $1 \
             ORDER BY a.application_date DESC",
        )
        .bind(student_profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records
            .into_iter()
            .map(StudentApplicationViewRecord::to_domain)
            .collect()
    }

    async fn list_applications_for_posting(
        &self,
        job_posting_id: Uuid,
    ) -> PortResult<Vec<PostingApplicantView>> {
        let records = sqlx::query_as::<_, PostingApplicantViewRecord>(
            "SELECT a.id, a.student_profile_id, a.job_posting_id, a.cv_id, a.status, a.notes, \
                    a.application_date, a.last_status_update, \
                    sp.full_name AS student_name, sp.major AS student_major, \
                    cv.original_name AS cv_original_name \
             FROM applications a \
             JOIN student_profiles sp ON sp.id = a.student_profile_id \
             JOIN student_cvs cv ON cv.id = a.cv_id \
             WHERE a.job_posting_id = $1 \
             ORDER BY a.application_date DESC",
        )
        .bind(job_posting_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records
            .into_iter()
            .map(PostingApplicantViewRecord::to_domain)
            .collect()
    }

    async fn list_all_applications(&self) -> PortResult<Vec<Application>> {
        let records = sqlx::query_as::<_, ApplicationRecord>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications ORDER BY application_date DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(ApplicationRecord::to_domain).collect()
    }

    async fn update_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
        updated_at: DateTime<Utc>,
    ) -> PortResult<Application> {
        sqlx::query_as::<_, ApplicationRecord>(&format!(
            "UPDATE applications SET status = $1, last_status_update = $2 WHERE id = $3 \
             RETURNING {APPLICATION_COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(updated_at)
        .bind(application_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("application {application_id}")))?
        .to_domain()
    }

    async fn delete_application(&self, application_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(application_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("application {application_id}")));
        }
        Ok(())
    }

    async fn create_recruitment(
        &self,
        company_profile_id: Uuid,
        student_profile_id: Uuid,
        recruiter_account_id: Option<Uuid>,
        message: Option<String>,
        notes: Option<String>,
    ) -> PortResult<DirectRecruitment> {
        sqlx::query_as::<_, RecruitmentRecord>(&format!(
            "INSERT INTO direct_recruitments \
             (id, company_profile_id, student_profile_id, recruiter_account_id, status, message, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {RECRUITMENT_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(company_profile_id)
        .bind(student_profile_id)
        .bind(recruiter_account_id)
        .bind(RecruitmentStatus::Pending.as_str())
        .bind(message)
        .bind(notes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_err(e, "a recruitment for this student already exists"))?
        .to_domain()
    }

    async fn get_recruitment(&self, recruitment_id: Uuid) -> PortResult<DirectRecruitment> {
        sqlx::query_as::<_, RecruitmentRecord>(&format!(
            "SELECT {RECRUITMENT_COLUMNS} FROM direct_recruitments WHERE id = $1"
        ))
        .bind(recruitment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("recruitment {recruitment_id}")))?
        .to_domain()
    }

    async fn find_recruitment(
        &self,
        company_profile_id: Uuid,
        student_profile_id: Uuid,
    ) -> PortResult<Option<DirectRecruitment>> {
        let record = sqlx::query_as::<_, RecruitmentRecord>(&format!(
            "SELECT {RECRUITMENT_COLUMNS} FROM direct_recruitments \
             WHERE company_profile_id = $1 AND student_profile_id = $2"
        ))
        .bind(company_profile_id)
        .bind(student_profile_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;
        record.map(RecruitmentRecord::to_domain).transpose()
    }

    async fn list_recruitments(
        &self,
        filter: RecruitmentFilter,
    ) -> PortResult<Vec<DirectRecruitment>> {
        // All filters optional and ANDed; NULL parameters match everything.
        let records = sqlx::query_as::<_, RecruitmentRecord>(&format!(
            "SELECT {RECRUITMENT_COLUMNS} FROM direct_recruitments \
             WHERE ($1::uuid IS NULL OR company_profile_id = $1) \
               AND ($2::uuid IS NULL OR student_profile_id = $2) \
               AND ($3::text IS NULL OR status = $3) \
               AND ($4::uuid IS NULL OR recruiter_account_id = $4) \
             ORDER BY recruited_at DESC"
        ))
        .bind(filter.company_profile_id)
        .bind(filter.student_profile_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.recruiter_account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(RecruitmentRecord::to_domain).collect()
    }

    async fn update_recruitment_status(
        &self,
        recruitment_id: Uuid,
        status: RecruitmentStatus,
        notes: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> PortResult<DirectRecruitment> {
        sqlx::query_as::<_, RecruitmentRecord>(&format!(
            "UPDATE direct_recruitments \
             SET status = $1, last_status_update = $2, notes = COALESCE($3, notes) \
             WHERE id = $4 \
             RETURNING {RECRUITMENT_COLUMNS}"
        ))
        .bind(status.as_str())
        .bind(updated_at)
        .bind(notes)
        .bind(recruitment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("recruitment {recruitment_id}")))?
        .to_domain()
    }

    async fn create_interview(
        &self,
        application_id: Uuid,
        scheduled_at: DateTime<Utc>,
        interview_type: InterviewType,
        location: Option<String>,
        notes: Option<String>,
    ) -> PortResult<Interview> {
        sqlx::query_as::<_, InterviewRecord>(&format!(
            "INSERT INTO interviews (id, application_id, scheduled_at, interview_type, location, notes, status) \
             VALUES ($1, $2, $3, $4, $5, $6, 'SCHEDULED') \
             RETURNING {INTERVIEW_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(application_id)
        .bind(scheduled_at)
        .bind(interview_type.as_str())
        .bind(location)
        .bind(notes)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?
        .to_domain()
    }

    async fn get_interview(&self, interview_id: Uuid) -> PortResult<Interview> {
        sqlx::query_as::<_, InterviewRecord>(&format!(
            "SELECT {INTERVIEW_COLUMNS} FROM interviews WHERE id = $1"
        ))
        .bind(interview_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("interview {interview_id}")))?
        .to_domain()
    }

    async fn update_interview(
        &self,
        interview_id: Uuid,
        update: InterviewUpdate,
    ) -> PortResult<Interview> {
        sqlx::query_as::<_, InterviewRecord>(&format!(
            "UPDATE interviews SET \
                 scheduled_at = COALESCE($1, scheduled_at), \
                 interview_type = COALESCE($2, interview_type), \
                 location = COALESCE($3, location), \
                 notes = COALESCE($4, notes), \
                 feedback = COALESCE($5, feedback), \
                 rating = COALESCE($6, rating), \
                 status = COALESCE($7, status) \
             WHERE id = $8 \
             RETURNING {INTERVIEW_COLUMNS}"
        ))
        .bind(update.scheduled_at)
        .bind(update.interview_type.map(|t| t.as_str()))
        .bind(update.location)
        .bind(update.notes)
        .bind(update.feedback)
        .bind(update.rating)
        .bind(update.status.map(|s| s.as_str()))
        .bind(interview_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("interview {interview_id}")))?
        .to_domain()
    }

    async fn list_upcoming_interviews_for_student(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> PortResult<Vec<Interview>> {
        let records = sqlx::query_as::<_, InterviewRecord>(
            "SELECT i.id, i.application_id, i.scheduled_at, i.interview_type, i.location, \
                    i.notes, i.feedback, i.rating, i.status \
             FROM interviews i \
             JOIN applications a ON a.id = i.application_id \
             JOIN student_profiles sp ON sp.id = a.student_profile_id \
             WHERE sp.account_id = $1 AND i.status = 'SCHEDULED' AND i.scheduled_at >= $2 \
             ORDER BY i.scheduled_at ASC",
        )
        .bind(account_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(InterviewRecord::to_domain).collect()
    }

    async fn list_upcoming_interviews_for_company(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> PortResult<Vec<Interview>> {
        let records = sqlx::query_as::<_, InterviewRecord>(
            "SELECT i.id, i.application_id, i.scheduled_at, i.interview_type, i.location, \
                    i.notes, i.feedback, i.rating, i.status \
             FROM interviews i \
             JOIN applications a ON a.id = i.application_id \
             JOIN job_postings jp ON jp.id = a.job_posting_id \
             JOIN company_profiles cp ON cp.id = jp.company_profile_id \
             WHERE cp.account_id = $1 AND i.status = 'SCHEDULED' AND i.scheduled_at >= $2 \
             ORDER BY i.scheduled_at ASC",
        )
        .bind(account_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        records.into_iter().map(InterviewRecord::to_domain).collect()
    }

    async fn create_bookmark(
        &self,
        student_profile_id: Uuid,
        job_posting_id: Uuid,
    ) -> PortResult<Bookmark> {
        Ok(sqlx::query_as::<_, BookmarkRecord>(
            "INSERT INTO bookmarks (id, student_profile_id, job_posting_id) VALUES ($1, $2, $3) \
             RETURNING id, student_profile_id, job_posting_id, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(student_profile_id)
        .bind(job_posting_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| insert_err(e, "posting already bookmarked"))?
        .to_domain())
    }

    async fn list_bookmarks(&self, student_profile_id: Uuid) -> PortResult<Vec<Bookmark>> {
        let records = sqlx::query_as::<_, BookmarkRecord>(
            "SELECT id, student_profile_id, job_posting_id, created_at \
             FROM bookmarks WHERE student_profile_id = $1 ORDER BY created_at DESC",
        )
        .bind(student_profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(BookmarkRecord::to_domain).collect())
    }

    async fn delete_bookmark(&self, bookmark_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = $1")
            .bind(bookmark_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("bookmark {bookmark_id}")));
        }
        Ok(())
    }

    async fn create_notification(
        &self,
        account_id: Uuid,
        title: &str,
        body: &str,
    ) -> PortResult<Notification> {
        Ok(sqlx::query_as::<_, NotificationRecord>(
            "INSERT INTO notifications (id, account_id, title, body) VALUES ($1, $2, $3, $4) \
             RETURNING id, account_id, title, body, read, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(account_id)
        .bind(title)
        .bind(body)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?
        .to_domain())
    }

    async fn list_notifications(&self, account_id: Uuid) -> PortResult<Vec<Notification>> {
        let records = sqlx::query_as::<_, NotificationRecord>(
            "SELECT id, account_id, title, body, read, created_at \
             FROM notifications WHERE account_id = $1 ORDER BY created_at DESC",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(NotificationRecord::to_domain).collect())
    }

    async fn mark_notification_read(&self, notification_id: Uuid) -> PortResult<Notification> {
        Ok(sqlx::query_as::<_, NotificationRecord>(
            "UPDATE notifications SET read = TRUE WHERE id = $1 \
             RETURNING id, account_id, title, body, read, created_at",
        )
        .bind(notification_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| not_found_or(e, format!("notification {notification_id}")))?
        .to_domain())
    }

    async fn create_review(
        &self,
        student_profile_id: Uuid,
        company_profile_id: Uuid,
        application_id: Option<Uuid>,
        rating: i32,
        comment: Option<String>,
    ) -> PortResult<Review> {
        Ok(sqlx::query_as::<_, ReviewRecord>(
            "INSERT INTO reviews (id, student_profile_id, company_profile_id, application_id, rating, comment) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, student_profile_id, company_profile_id, application_id, rating, comment, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(student_profile_id)
        .bind(company_profile_id)
        .bind(application_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?
        .to_domain())
    }

    async fn list_reviews_for_company(&self, company_profile_id: Uuid) -> PortResult<Vec<Review>> {
        let records = sqlx::query_as::<_, ReviewRecord>(
            "SELECT id, student_profile_id, company_profile_id, application_id, rating, comment, created_at \
             FROM reviews WHERE company_profile_id = $1 ORDER BY created_at DESC",
        )
        .bind(company_profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(ReviewRecord::to_domain).collect())
    }

    async fn create_portfolio(
        &self,
        student_profile_id: Uuid,
        title: &str,
        description: Option<String>,
        url: Option<String>,
    ) -> PortResult<Portfolio> {
        Ok(sqlx::query_as::<_, PortfolioRecord>(
            "INSERT INTO portfolios (id, student_profile_id, title, description, url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, student_profile_id, title, description, url, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(student_profile_id)
        .bind(title)
        .bind(description)
        .bind(url)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?
        .to_domain())
    }

    async fn list_portfolios(&self, student_profile_id: Uuid) -> PortResult<Vec<Portfolio>> {
        let records = sqlx::query_as::<_, PortfolioRecord>(
            "SELECT id, student_profile_id, title, description, url, created_at \
             FROM portfolios WHERE student_profile_id = $1 ORDER BY created_at DESC",
        )
        .bind(student_profile_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(PortfolioRecord::to_domain).collect())
    }

    async fn delete_portfolio(&self, portfolio_id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM portfolios WHERE id = $1")
            .bind(portfolio_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(PortError::NotFound(format!("portfolio {portfolio_id}")));
        }
        Ok(())
    }

    async fn create_message(
        &self,
        sender_account_id: Uuid,
        receiver_account_id: Uuid,
        body: &str,
    ) -> PortResult<Message> {
        Ok(sqlx::query_as::<_, MessageRecord>(
            "INSERT INTO messages (id, sender_account_id, receiver_account_id, body) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, sender_account_id, receiver_account_id, body, sent_at",
        )
        .bind(Uuid::new_v4())
        .bind(sender_account_id)
        .bind(receiver_account_id)
        .bind(body)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?
        .to_domain())
    }

    async fn list_conversation(
        &self,
        account_a: Uuid,
        account_b: Uuid,
    ) -> PortResult<Vec<Message>> {
        let records = sqlx::query_as::<_, MessageRecord>(
            "SELECT id, sender_account_id, receiver_account_id, body, sent_at \
             FROM messages \
             WHERE (sender_account_id = $1 AND receiver_account_id = $2) \
                OR (sender_account_id = $2 AND receiver_account_id = $1) \
             ORDER BY sent_at ASC",
        )
        .bind(account_a)
        .bind(account_b)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(MessageRecord::to_domain).collect())
    }

    async fn upsert_setting(
        &self,
        account_id: Uuid,
        key: &str,
        value: &str,
    ) -> PortResult<UserSetting> {
        Ok(sqlx::query_as::<_, SettingRecord>(
            "INSERT INTO user_settings (account_id, key, value) VALUES ($1, $2, $3) \
             ON CONFLICT (account_id, key) DO UPDATE SET value = EXCLUDED.value \
             RETURNING account_id, key, value",
        )
        .bind(account_id)
        .bind(key)
        .bind(value)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?
        .to_domain())
    }

    async fn list_settings(&self, account_id: Uuid) -> PortResult<Vec<UserSetting>> {
        let records = sqlx::query_as::<_, SettingRecord>(
            "SELECT account_id, key, value FROM user_settings WHERE account_id = $1 ORDER BY key",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(SettingRecord::to_domain).collect())
    }

    async fn log_activity(&self, account_id: Option<Uuid>, action: &str) -> PortResult<()> {
        sqlx::query("INSERT INTO activity_log (id, account_id, action) VALUES ($1, $2, $3)")
            .bind(Uuid::new_v4())
            .bind(account_id)
            .bind(action)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn list_activity(&self, limit: i64) -> PortResult<Vec<ActivityLog>> {
        let records = sqlx::query_as::<_, ActivityRecord>(
            "SELECT id, account_id, action, created_at FROM activity_log \
             ORDER BY created_at DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(records.into_iter().map(ActivityRecord::to_domain).collect())
    }
}
