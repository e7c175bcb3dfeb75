//! crates/recruit_core/src/memory.rs
//!
//! An in-memory implementation of the [`DatabaseService`] port backed by
//! plain `HashMap`s behind a `Mutex`. It mirrors the uniqueness semantics of
//! the SQL schema (unique email, unique application and recruitment pairs)
//! so workflow tests exercise the same conflict paths as production.

use std::collections::HashMap;
use std::sync::Mutex;

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
use crate::ports::{DatabaseService, PortError, PortResult};

#[derive(Default)]
struct Inner {
    accounts: HashMap<Uuid, Account>,
    credentials: HashMap<Uuid, AccountCredentials>,
    student_profiles: HashMap<Uuid, StudentProfile>,
    company_profiles: HashMap<Uuid, CompanyProfile>,
    cvs: HashMap<Uuid, StudentCv>,
    postings: HashMap<Uuid, JobPosting>,
    applications: HashMap<Uuid, Application>,
    recruitments: HashMap<Uuid, DirectRecruitment>,
    interviews: HashMap<Uuid, Interview>,
    bookmarks: HashMap<Uuid, Bookmark>,
    notifications: HashMap<Uuid, Notification>,
    reviews: Vec<Review>,
    portfolios: HashMap<Uuid, Portfolio>,
    messages: Vec<Message>,
    settings: Vec<UserSetting>,
    activity: Vec<ActivityLog>,
}

/// In-memory database adapter. Cheap to construct per test.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn create_account_row(
        inner: &mut Inner,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> PortResult<Account> {
        if inner.credentials.values().any(|c| c.email == email) {
            return Err(PortError::Conflict(format!(
                "email '{email}' is already registered"
            )));
        }
        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role,
            created_at: Utc::now(),
        };
        inner.credentials.insert(
            account.id,
            AccountCredentials {
                account_id: account.id,
                email: email.to_string(),
                role,
                password_hash: password_hash.to_string(),
            },
        );
        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }
}

#[async_trait]
impl DatabaseService for MemoryStore {
    async fn create_student_account(
        &self,
        email: &str,
        password_hash: &str,
        profile: NewStudentProfile,
    ) -> PortResult<(Account, StudentProfile)> {
        let mut inner = self.inner.lock().unwrap();
        let account = Self::create_account_row(&mut inner, email, password_hash, Role::Student)?;
        let profile = StudentProfile {
            id: Uuid::new_v4(),
            account_id: account.id,
            full_name: profile.full_name,
            major: profile.major,
            phone: profile.phone,
            skills: profile.skills,
            profile_photo: None,
        };
        inner.student_profiles.insert(profile.id, profile.clone());
        Ok((account, profile))
    }

    async fn create_company_account(
        &self,
        email: &str,
        password_hash: &str,
        profile: NewCompanyProfile,
    ) -> PortResult<(Account, CompanyProfile)> {
        let mut inner = self.inner.lock().unwrap();
        let account = Self::create_account_row(&mut inner, email, password_hash, Role::Company)?;
        let profile = CompanyProfile {
            id: Uuid::new_v4(),
            account_id: account.id,
            company_name: profile.company_name,
            industry_type: profile.industry_type,
            phone: profile.phone,
            address: profile.address,
            logo: None,
        };
        inner.company_profiles.insert(profile.id, profile.clone());
        Ok((account, profile))
    }

    async fn get_account(&self, account_id: Uuid) -> PortResult<Account> {
        let inner = self.inner.lock().unwrap();
        inner
            .accounts
            .get(&account_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("account {account_id}")))
    }

    async fn get_account_by_email(&self, email: &str) -> PortResult<AccountCredentials> {
        let inner = self.inner.lock().unwrap();
        inner
            .credentials
            .values()
            .find(|c| c.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("account '{email}'")))
    }

    async fn update_account_role(&self, account_id: Uuid, role: Role) -> PortResult<Account> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(creds) = inner.credentials.get_mut(&account_id) {
            creds.role = role;
        }
        let account = inner
            .accounts
            .get_mut(&account_id)
            .ok_or_else(|| PortError::NotFound(format!("account {account_id}")))?;
        account.role = role;
        Ok(account.clone())
    }

    async fn delete_account(&self, account_id: Uuid) -> PortResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.accounts.remove(&account_id).is_none() {
            return Err(PortError::NotFound(format!("account {account_id}")));
        }
        inner.credentials.remove(&account_id);

        // Cascade the way the SQL FKs do.
        let student_ids: Vec<Uuid> = inner
            .student_profiles
            .values()
            .filter(|p| p.account_id == account_id)
            .map(|p| p.id)
            .collect();
        let company_ids: Vec<Uuid> = inner
            .company_profiles
            .values()
            .filter(|p| p.account_id == account_id)
            .map(|p| p.id)
            .collect();
        let posting_ids: Vec<Uuid> = inner
            .postings
            .values()
            .filter(|p| company_ids.contains(&p.company_profile_id))
            .map(|p| p.id)
            .collect();
        let application_ids: Vec<Uuid> = inner
            .applications
            .values()
            .filter(|a| {
                student_ids.contains(&a.student_profile_id)
                    || posting_ids.contains(&a.job_posting_id)
            })
            .map(|a| a.id)
            .collect();

        inner
            .interviews
            .retain(|_, i| !application_ids.contains(&i.application_id));
        inner.applications.retain(|id, _| !application_ids.contains(id));
        inner.postings.retain(|id, _| !posting_ids.contains(id));
        inner.recruitments.retain(|_, r| {
            !company_ids.contains(&r.company_profile_id)
                && !student_ids.contains(&r.student_profile_id)
        });
        inner
            .cvs
            .retain(|_, cv| !student_ids.contains(&cv.student_profile_id));
        inner
            .bookmarks
            .retain(|_, b| !student_ids.contains(&b.student_profile_id));
        inner
            .portfolios
            .retain(|_, p| !student_ids.contains(&p.student_profile_id));
        inner.notifications.retain(|_, n| n.account_id != account_id);
        inner.settings.retain(|s| s.account_id != account_id);
        inner.student_profiles.retain(|id, _| !student_ids.contains(id));
        inner.company_profiles.retain(|id, _| !company_ids.contains(id));
        Ok(())
    }

    async fn get_student_profile_by_account(&self, account_id: Uuid) -> PortResult<StudentProfile> {
        let inner = self.inner.lock().unwrap();
        inner
            .student_profiles
            .values()
            .find(|p| p.account_id == account_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("student profile for account {account_id}")))
    }

    async fn get_company_profile_by_account(&self, account_id: Uuid) -> PortResult<CompanyProfile> {
        let inner = self.inner.lock().unwrap();
        inner
            .company_profiles
            .values()
            .find(|p| p.account_id == account_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("company profile for account {account_id}")))
    }

    async fn get_student_profile(&self, profile_id: Uuid) -> PortResult<StudentProfile> {
        let inner = self.inner.lock().unwrap();
        inner
            .student_profiles
            .get(&profile_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("student profile {profile_id}")))
    }

    async fn get_company_profile(&self, profile_id: Uuid) -> PortResult<CompanyProfile> {
        let inner = self.inner.lock().unwrap();
        inner
            .company_profiles
            .get(&profile_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("company profile {profile_id}")))
    }

    async fn create_cv(
        &self,
        student_profile_id: Uuid,
        file_path: &str,
        original_name: &str,
    ) -> PortResult<StudentCv> {
        let mut inner = self.inner.lock().unwrap();
        let cv = StudentCv {
            id: Uuid::new_v4(),
            student_profile_id,
            file_path: file_path.to_string(),
            original_name: original_name.to_string(),
            uploaded_at: Utc::now(),
        };
        inner.cvs.insert(cv.id, cv.clone());
        Ok(cv)
    }

    async fn get_cv(&self, cv_id: Uuid) -> PortResult<StudentCv> {
        let inner = self.inner.lock().unwrap();
        inner
            .cvs
            .get(&cv_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("cv {cv_id}")))
    }

    async fn list_cvs(&self, student_profile_id: Uuid) -> PortResult<Vec<StudentCv>> {
        let inner = self.inner.lock().unwrap();
        let mut cvs: Vec<StudentCv> = inner
            .cvs
            .values()
            .filter(|cv| cv.student_profile_id == student_profile_id)
            .cloned()
            .collect();
        cvs.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(cvs)
    }

    async fn delete_cv(&self, cv_id: Uuid) -> PortResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .cvs
            .remove(&cv_id)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound(format!("cv {cv_id}")))
    }

    async fn create_posting(&self, posting: NewJobPosting) -> PortResult<JobPosting> {
        let mut inner = self.inner.lock().unwrap();
        let posting = JobPosting {
            id: Uuid::new_v4(),
            company_profile_id: posting.company_profile_id,
            title: posting.title,
            description: posting.description,
            requirements: posting.requirements,
            location: posting.location,
            salary_min: posting.salary_min,
            salary_max: posting.salary_max,
            employment_type: posting.employment_type,
            deadline: posting.deadline,
            status: posting.status,
            created_at: Utc::now(),
        };
        inner.postings.insert(posting.id, posting.clone());
        Ok(posting)
    }

    async fn get_posting(&self, posting_id: Uuid) -> PortResult<JobPosting> {
        let inner = self.inner.lock().unwrap();
        inner
            .postings
            .get(&posting_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("posting {posting_id}")))
    }

    async fn update_posting(
        &self,
        posting_id: Uuid,
        update: PostingUpdate,
    ) -> PortResult<JobPosting> {
        let mut inner = self.inner.lock().unwrap();
        let posting = inner
            .postings
            .get_mut(&posting_id)
            .ok_or_else(|| PortError::NotFound(format!("posting {posting_id}")))?;
        if let Some(title) = update.title {
            posting.title = title;
        }
        if let Some(description) = update.description {
            posting.description = description;
        }
        if let Some(requirements) = update.requirements {
            posting.requirements = Some(requirements);
        }
        if let Some(location) = update.location {
            posting.location = Some(location);
        }
        if let Some(salary_min) = update.salary_min {
            posting.salary_min = Some(salary_min);
        }
        if let Some(salary_max) = update.salary_max {
            posting.salary_max = Some(salary_max);
        }
        if let Some(employment_type) = update.employment_type {
            posting.employment_type = Some(employment_type);
        }
        if let Some(deadline) = update.deadline {
            posting.deadline = Some(deadline);
        }
        Ok(posting.clone())
    }

    async fn delete_posting(&self, posting_id: Uuid) -> PortResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.postings.remove(&posting_id).is_none() {
            return Err(PortError::NotFound(format!("posting {posting_id}")));
        }
        let application_ids: Vec<Uuid> = inner
            .applications
            .values()
            .filter(|a| a.job_posting_id == posting_id)
            .map(|a| a.id)
            .collect();
        inner
            .interviews
            .retain(|_, i| !application_ids.contains(&i.application_id));
        inner.applications.retain(|id, _| !application_ids.contains(id));
        inner.bookmarks.retain(|_, b| b.job_posting_id != posting_id);
        Ok(())
    }

    async fn set_posting_status(
        &self,
        posting_id: Uuid,
        status: PostingStatus,
    ) -> PortResult<JobPosting> {
        let mut inner = self.inner.lock().unwrap();
        let posting = inner
            .postings
            .get_mut(&posting_id)
            .ok_or_else(|| PortError::NotFound(format!("posting {posting_id}")))?;
        posting.status = status;
        Ok(posting.clone())
    }

    async fn list_postings_by_company(
        &self,
        company_profile_id: Uuid,
    ) -> PortResult<Vec<JobPosting>> {
        let inner = self.inner.lock().unwrap();
        let mut postings: Vec<JobPosting> = inner
            .postings
            .values()
            .filter(|p| p.company_profile_id == company_profile_id)
            .cloned()
            .collect();
        postings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(postings)
    }

    async fn list_postings_by_status(&self, status: PostingStatus) -> PortResult<Vec<JobPosting>> {
        let inner = self.inner.lock().unwrap();
        let mut postings: Vec<JobPosting> = inner
            .postings
            .values()
            .filter(|p| p.status == status)
            .cloned()
            .collect();
        postings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(postings)
    }

    async fn create_application(
        &self,
        student_profile_id: Uuid,
        job_posting_id: Uuid,
        cv_id: Uuid,
        notes: Option<String>,
    ) -> PortResult<Application> {
        let mut inner = self.inner.lock().unwrap();
        if inner.applications.values().any(|a| {
            a.student_profile_id == student_profile_id && a.job_posting_id == job_posting_id
        }) {
            return Err(PortError::Conflict(
                "an application for this posting already exists".to_string(),
            ));
        }
        let now = Utc::now();
        let application = Application {
            id: Uuid::new_v4(),
            student_profile_id,
            job_posting_id,
            cv_id,
            status: ApplicationStatus::Pending,
            notes,
            application_date: now,
            last_status_update: now,
        };
        inner.applications.insert(application.id, application.clone());
        Ok(application)
    }

    async fn get_application(&self, application_id: Uuid) -> PortResult<Application> {
        let inner = self.inner.lock().unwrap();
        inner
            .applications
            .get(&application_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("application {application_id}")))
    }

    async fn find_application(
        &self,
        student_profile_id: Uuid,
        job_posting_id: Uuid,
    ) -> PortResult<Option<Application>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .applications
            .values()
            .find(|a| {
                a.student_profile_id == student_profile_id && a.job_posting_id == job_posting_id
            })
            .cloned())
    }

    async fn list_applications_by_student(
        &self,
        student_profile_id: Uuid,
    ) -> PortResult<Vec<StudentApplicationView>> {
        let inner = self.inner.lock().unwrap();
        let mut applications: Vec<Application> = inner
            .applications
            .values()
            .filter(|a| a.student_profile_id == student_profile_id)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.application_date.cmp(&a.application_date));

        let mut views = Vec::with_capacity(applications.len());
        for application in applications {
            let posting = inner
                .postings
                .get(&application.job_posting_id)
                .ok_or_else(|| PortError::Unexpected("dangling posting reference".to_string()))?;
            let company = inner
                .company_profiles
                .get(&posting.company_profile_id)
                .ok_or_else(|| PortError::Unexpected("dangling company reference".to_string()))?;
            let cv = inner
                .cvs
                .get(&application.cv_id)
                .ok_or_else(|| PortError::Unexpected("dangling cv reference".to_string()))?;
            views.push(StudentApplicationView {
                posting_title: posting.title.clone(),
                company_name: company.company_name.clone(),
                cv_original_name: cv.original_name.clone(),
                application,
            });
        }
        Ok(views)
    }

    async fn list_applications_for_posting(
        &self,
        job_posting_id: Uuid,
    ) -> PortResult<Vec<PostingApplicantView>> {
        let inner = self.inner.lock().unwrap();
        let mut applications: Vec<Application> = inner
            .applications
            .values()
            .filter(|a| a.job_posting_id == job_posting_id)
            .cloned()
            .collect();
        applications.sort_by(|a, b| b.application_date.cmp(&a.application_date));

        let mut views = Vec::with_capacity(applications.len());
        for application in applications {
            let student = inner
                .student_profiles
                .get(&application.student_profile_id)
                .ok_or_else(|| PortError::Unexpected("dangling student reference".to_string()))?;
            let cv = inner
                .cvs
                .get(&application.cv_id)
                .ok_or_else(|| PortError::Unexpected("dangling cv reference".to_string()))?;
            views.push(PostingApplicantView {
                student_name: student.full_name.clone(),
                student_major: student.major.clone(),
                cv_id_cited: cv.id,
                cv_original_name: cv.original_name.clone(),
                application,
            });
        }
        Ok(views)
    }

    async fn list_all_applications(&self) -> PortResult<Vec<Application>> {
        let inner = self.inner.lock().unwrap();
        let mut applications: Vec<Application> = inner.applications.values().cloned().collect();
        applications.sort_by(|a, b| b.application_date.cmp(&a.application_date));
        Ok(applications)
    }

    async fn update_application_status(
        &self,
        application_id: Uuid,
        status: ApplicationStatus,
        updated_at: DateTime<Utc>,
    ) -> PortResult<Application> {
        let mut inner = self.inner.lock().unwrap();
        let application = inner
            .applications
            .get_mut(&application_id)
            .ok_or_else(|| PortError::NotFound(format!("application {application_id}")))?;
        application.status = status;
        application.last_status_update = updated_at;
        Ok(application.clone())
    }

    async fn delete_application(&self, application_id: Uuid) -> PortResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.applications.remove(&application_id).is_none() {
            return Err(PortError::NotFound(format!("application {application_id}")));
        }
        inner
            .interviews
            .retain(|_, i| i.application_id != application_id);
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
        let mut inner = self.inner.lock().unwrap();
        if inner.recruitments.values().any(|r| {
            r.company_profile_id == company_profile_id
                && r.student_profile_id == student_profile_id
        }) {
            return Err(PortError::Conflict(
                "a recruitment for this student already exists".to_string(),
            ));
        }
        let now = Utc::now();
        let recruitment = DirectRecruitment {
            id: Uuid::new_v4(),
            company_profile_id,
            student_profile_id,
            recruiter_account_id,
            status: RecruitmentStatus::Pending,
            message,
            notes,
            recruited_at: now,
            last_status_update: now,
        };
        inner.recruitments.insert(recruitment.id, recruitment.clone());
        Ok(recruitment)
    }

    async fn get_recruitment(&self, recruitment_id: Uuid) -> PortResult<DirectRecruitment> {
        let inner = self.inner.lock().unwrap();
        inner
            .recruitments
            .get(&recruitment_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("recruitment {recruitment_id}")))
    }

    async fn find_recruitment(
        &self,
        company_profile_id: Uuid,
        student_profile_id: Uuid,
    ) -> PortResult<Option<DirectRecruitment>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .recruitments
            .values()
            .find(|r| {
                r.company_profile_id == company_profile_id
                    && r.student_profile_id == student_profile_id
            })
            .cloned())
    }

    async fn list_recruitments(
        &self,
        filter: RecruitmentFilter,
    ) -> PortResult<Vec<DirectRecruitment>> {
        let inner = self.inner.lock().unwrap();
        let mut recruitments: Vec<DirectRecruitment> = inner
            .recruitments
            .values()
            .filter(|r| {
                filter
                    .company_profile_id
                    .map_or(true, |id| r.company_profile_id == id)
                    && filter
                        .student_profile_id
                        .map_or(true, |id| r.student_profile_id == id)
                    && filter.status.map_or(true, |s| r.status == s)
                    && filter
                        .recruiter_account_id
                        .map_or(true, |id| r.recruiter_account_id == Some(id))
            })
            .cloned()
            .collect();
        recruitments.sort_by(|a, b| b.recruited_at.cmp(&a.recruited_at));
        Ok(recruitments)
    }

    async fn update_recruitment_status(
        &self,
        recruitment_id: Uuid,
        status: RecruitmentStatus,
        notes: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> PortResult<DirectRecruitment> {
        let mut inner = self.inner.lock().unwrap();
        let recruitment = inner
            .recruitments
            .get_mut(&recruitment_id)
            .ok_or_else(|| PortError::NotFound(format!("recruitment {recruitment_id}")))?;
        recruitment.status = status;
        recruitment.last_status_update = updated_at;
        if let Some(notes) = notes {
            recruitment.notes = Some(notes);
        }
        Ok(recruitment.clone())
    }

    async fn create_interview(
        &self,
        application_id: Uuid,
        scheduled_at: DateTime<Utc>,
        interview_type: InterviewType,
        location: Option<String>,
        notes: Option<String>,
    ) -> PortResult<Interview> {
        let mut inner = self.inner.lock().unwrap();
        let interview = Interview {
            id: Uuid::new_v4(),
            application_id,
            scheduled_at,
            interview_type,
            location,
            notes,
            feedback: None,
            rating: None,
            status: crate::domain::InterviewStatus::Scheduled,
        };
        inner.interviews.insert(interview.id, interview.clone());
        Ok(interview)
    }

    async fn get_interview(&self, interview_id: Uuid) -> PortResult<Interview> {
        let inner = self.inner.lock().unwrap();
        inner
            .interviews
            .get(&interview_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("interview {interview_id}")))
    }

    async fn update_interview(
        &self,
        interview_id: Uuid,
        update: InterviewUpdate,
    ) -> PortResult<Interview> {
        let mut inner = self.inner.lock().unwrap();
        let interview = inner
            .interviews
            .get_mut(&interview_id)
            .ok_or_else(|| PortError::NotFound(format!("interview {interview_id}")))?;
        if let Some(scheduled_at) = update.scheduled_at {
            interview.scheduled_at = scheduled_at;
        }
        if let Some(interview_type) = update.interview_type {
            interview.interview_type = interview_type;
        }
        if let Some(location) = update.location {
            interview.location = Some(location);
        }
        if let Some(notes) = update.notes {
            interview.notes = Some(notes);
        }
        if let Some(feedback) = update.feedback {
            interview.feedback = Some(feedback);
        }
        if let Some(rating) = update.rating {
            interview.rating = Some(rating);
        }
        if let Some(status) = update.status {
            interview.status = status;
        }
        Ok(interview.clone())
    }

    async fn list_upcoming_interviews_for_student(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> PortResult<Vec<Interview>> {
        let inner = self.inner.lock().unwrap();
        let mut interviews: Vec<Interview> = inner
            .interviews
            .values()
            .filter(|i| {
                i.status == crate::domain::InterviewStatus::Scheduled && i.scheduled_at >= now
            })
            .filter(|i| {
                inner
                    .applications
                    .get(&i.application_id)
                    .and_then(|a| inner.student_profiles.get(&a.student_profile_id))
                    .map_or(false, |p| p.account_id == account_id)
            })
            .cloned()
            .collect();
        interviews.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at));
        Ok(interviews)
    }

    async fn list_upcoming_interviews_for_company(
        &self,
        account_id: Uuid,
        now: DateTime<Utc>,
    ) -> PortResult<Vec<Interview>> {
        let inner = self.inner.lock().unwrap();
        let mut interviews: Vec<Interview> = inner
            .interviews
            .values()
            .filter(|i| {
                i.status == crate::domain::InterviewStatus::Scheduled && i.scheduled_at >= now
            })
            .filter(|i| {
                inner
                    .applications
                    .get(&i.application_id)
                    .and_then(|a| inner.postings.get(&a.job_posting_id))
                    .and_then(|p| inner.company_profiles.get(&p.company_profile_id))
                    .map_or(false, |c| c.account_id == account_id)
            })
            .cloned()
            .collect();
        interviews.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at));
        Ok(interviews)
    }

    async fn create_bookmark(
        &self,
        student_profile_id: Uuid,
        job_posting_id: Uuid,
    ) -> PortResult<Bookmark> {
        let mut inner = self.inner.lock().unwrap();
        if inner.bookmarks.values().any(|b| {
            b.student_profile_id == student_profile_id && b.job_posting_id == job_posting_id
        }) {
            return Err(PortError::Conflict("posting already bookmarked".to_string()));
        }
        let bookmark = Bookmark {
            id: Uuid::new_v4(),
            student_profile_id,
            job_posting_id,
            created_at: Utc::now(),
        };
        inner.bookmarks.insert(bookmark.id, bookmark.clone());
        Ok(bookmark)
    }

    async fn list_bookmarks(&self, student_profile_id: Uuid) -> PortResult<Vec<Bookmark>> {
        let inner = self.inner.lock().unwrap();
        let mut bookmarks: Vec<Bookmark> = inner
            .bookmarks
            .values()
            .filter(|b| b.student_profile_id == student_profile_id)
            .cloned()
            .collect();
        bookmarks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookmarks)
    }

    async fn delete_bookmark(&self, bookmark_id: Uuid) -> PortResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .bookmarks
            .remove(&bookmark_id)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound(format!("bookmark {bookmark_id}")))
    }

    async fn create_notification(
        &self,
        account_id: Uuid,
        title: &str,
        body: &str,
    ) -> PortResult<Notification> {
        let mut inner = self.inner.lock().unwrap();
        let notification = Notification {
            id: Uuid::new_v4(),
            account_id,
            title: title.to_string(),
            body: body.to_string(),
            read: false,
            created_at: Utc::now(),
        };
        inner.notifications.insert(notification.id, notification.clone());
        Ok(notification)
    }

    async fn list_notifications(&self, account_id: Uuid) -> PortResult<Vec<Notification>> {
        let inner = self.inner.lock().unwrap();
        let mut notifications: Vec<Notification> = inner
            .notifications
            .values()
            .filter(|n| n.account_id == account_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    async fn mark_notification_read(&self, notification_id: Uuid) -> PortResult<Notification> {
        let mut inner = self.inner.lock().unwrap();
        let notification = inner
            .notifications
            .get_mut(&notification_id)
            .ok_or_else(|| PortError::NotFound(format!("notification {notification_id}")))?;
        notification.read = true;
        Ok(notification.clone())
    }

    async fn create_review(
        &self,
        student_profile_id: Uuid,
        company_profile_id: Uuid,
        application_id: Option<Uuid>,
        rating: i32,
        comment: Option<String>,
    ) -> PortResult<Review> {
        let mut inner = self.inner.lock().unwrap();
        let review = Review {
            id: Uuid::new_v4(),
            student_profile_id,
            company_profile_id,
            application_id,
            rating,
            comment,
            created_at: Utc::now(),
        };
        inner.reviews.push(review.clone());
        Ok(review)
    }

    async fn list_reviews_for_company(&self, company_profile_id: Uuid) -> PortResult<Vec<Review>> {
        let inner = self.inner.lock().unwrap();
        let mut reviews: Vec<Review> = inner
            .reviews
            .iter()
            .filter(|r| r.company_profile_id == company_profile_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    async fn create_portfolio(
        &self,
        student_profile_id: Uuid,
        title: &str,
        description: Option<String>,
        url: Option<String>,
    ) -> PortResult<Portfolio> {
        let mut inner = self.inner.lock().unwrap();
        let portfolio = Portfolio {
            id: Uuid::new_v4(),
            student_profile_id,
            title: title.to_string(),
            description,
            url,
            created_at: Utc::now(),
        };
        inner.portfolios.insert(portfolio.id, portfolio.clone());
        Ok(portfolio)
    }

    async fn list_portfolios(&self, student_profile_id: Uuid) -> PortResult<Vec<Portfolio>> {
        let inner = self.inner.lock().unwrap();
        let mut portfolios: Vec<Portfolio> = inner
            .portfolios
            .values()
            .filter(|p| p.student_profile_id == student_profile_id)
            .cloned()
            .collect();
        portfolios.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(portfolios)
    }

    async fn delete_portfolio(&self, portfolio_id: Uuid) -> PortResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .portfolios
            .remove(&portfolio_id)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound(format!("portfolio {portfolio_id}")))
    }

    async fn create_message(
        &self,
        sender_account_id: Uuid,
        receiver_account_id: Uuid,
        body: &str,
    ) -> PortResult<Message> {
        let mut inner = self.inner.lock().unwrap();
        let message = Message {
            id: Uuid::new_v4(),
            sender_account_id,
            receiver_account_id,
            body: body.to_string(),
            sent_at: Utc::now(),
        };
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn list_conversation(
        &self,
        account_a: Uuid,
        account_b: Uuid,
    ) -> PortResult<Vec<Message>> {
        let inner = self.inner.lock().unwrap();
        let mut messages: Vec<Message> = inner
            .messages
            .iter()
            .filter(|m| {
                (m.sender_account_id == account_a && m.receiver_account_id == account_b)
                    || (m.sender_account_id == account_b && m.receiver_account_id == account_a)
            })
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.sent_at.cmp(&b.sent_at));
        Ok(messages)
    }

    async fn upsert_setting(
        &self,
        account_id: Uuid,
        key: &str,
        value: &str,
    ) -> PortResult<UserSetting> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .settings
            .retain(|s| !(s.account_id == account_id && s.key == key));
        let setting = UserSetting {
            account_id,
            key: key.to_string(),
            value: value.to_string(),
        };
        inner.settings.push(setting.clone());
        Ok(setting)
    }

    async fn list_settings(&self, account_id: Uuid) -> PortResult<Vec<UserSetting>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .settings
            .iter()
            .filter(|s| s.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn log_activity(&self, account_id: Option<Uuid>, action: &str) -> PortResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.activity.push(ActivityLog {
            id: Uuid::new_v4(),
            account_id,
            action: action.to_string(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn list_activity(&self, limit: i64) -> PortResult<Vec<ActivityLog>> {
        let inner = self.inner.lock().unwrap();
        let mut activity: Vec<ActivityLog> = inner.activity.iter().cloned().collect();
        activity.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        activity.truncate(limit.max(0) as usize);
        Ok(activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student_profile(name: &str) -> NewStudentProfile {
        NewStudentProfile {
            full_name: name.to_string(),
            major: "Software Engineering".to_string(),
            phone: None,
            skills: None,
        }
    }

    #[tokio::test]
    async fn registering_a_taken_email_conflicts_and_creates_nothing() {
        let store = MemoryStore::new();
        let (first, _) = store
            .create_student_account("siti@example.edu", "hash-a", student_profile("Siti Rahma"))
            .await
            .unwrap();

        let second = store
            .create_student_account("siti@example.edu", "hash-b", student_profile("Impostor"))
            .await;
        assert!(matches!(second, Err(PortError::Conflict(_))));

        // The original account is untouched and remains the only holder
        // of the email.
        let creds = store.get_account_by_email("siti@example.edu").await.unwrap();
        assert_eq!(creds.account_id, first.id);
        assert_eq!(creds.password_hash, "hash-a");
        let profile = store.get_student_profile_by_account(first.id).await.unwrap();
        assert_eq!(profile.full_name, "Siti Rahma");
    }
}
