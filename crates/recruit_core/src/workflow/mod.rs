//! crates/recruit_core/src/workflow/mod.rs
//!
//! The status workflows spanning postings, applications, direct recruitments
//! and interviews. Every operation here takes the persistence port as an
//! explicit handle, performs the ownership and business-rule checks, and
//! leaves storage-level uniqueness to the port (the pre-checks are an
//! optimization for friendly errors, not the authority under races).

pub mod applications;
pub mod interviews;
pub mod postings;
pub mod recruitments;

use crate::ports::PortError;

/// Failures of the workflow operations, one variant per business rule.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("access denied")]
    Forbidden,

    #[error("no {0} profile exists for this account")]
    ProfileNotFound(&'static str),

    #[error("this posting is not accepting applications")]
    PostingNotActive,

    #[error("an application for this posting already exists")]
    AlreadyApplied,

    #[error("the selected CV does not belong to the applicant")]
    CvNotOwned,

    #[error("only pending applications can be withdrawn")]
    NotPending,

    #[error("a recruitment for this student already exists")]
    AlreadyRecruited,

    #[error("invalid status '{0}'")]
    InvalidStatus(String),

    #[error(transparent)]
    Port(#[from] PortError),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
pub(crate) mod support {
    //! Shared test fixture: one student with a CV, one company with an
    //! ACTIVE posting, all living in a fresh `MemoryStore`.

    use crate::domain::{
        Account, CompanyProfile, JobPosting, NewCompanyProfile, NewJobPosting, NewStudentProfile,
        PostingStatus, StudentCv, StudentProfile,
    };
    use crate::memory::MemoryStore;
    use crate::ports::DatabaseService;

    pub struct Fixture {
        pub db: MemoryStore,
        pub student_account: Account,
        pub student_profile: StudentProfile,
        pub company_account: Account,
        pub company_profile: CompanyProfile,
        pub cv: StudentCv,
        pub posting: JobPosting,
    }

    impl Fixture {
        pub async fn new() -> Self {
            let db = MemoryStore::new();
            let (student_account, student_profile) = db
                .create_student_account(
                    "student@example.edu",
                    "$argon2id$fake",
                    NewStudentProfile {
                        full_name: "Siti Rahma".to_string(),
                        major: "Software Engineering".to_string(),
                        phone: None,
                        skills: Some("rust, sql".to_string()),
                    },
                )
                .await
                .unwrap();
            let (company_account, company_profile) = db
                .create_company_account(
                    "hr@acme.example",
                    "$argon2id$fake",
                    NewCompanyProfile {
                        company_name: "Acme Manufacturing".to_string(),
                        industry_type: "Manufacturing".to_string(),
                        phone: None,
                        address: None,
                    },
                )
                .await
                .unwrap();
            let cv = db
                .create_cv(student_profile.id, "uploads/cv-1.pdf", "cv.pdf")
                .await
                .unwrap();
            let posting = db
                .create_posting(NewJobPosting {
                    company_profile_id: company_profile.id,
                    title: "Junior Backend Engineer".to_string(),
                    description: "Build internal services".to_string(),
                    requirements: None,
                    location: Some("Bandung".to_string()),
                    salary_min: Some(6_000_000),
                    salary_max: Some(9_000_000),
                    employment_type: Some("full-time".to_string()),
                    deadline: None,
                    status: PostingStatus::Active,
                })
                .await
                .unwrap();
            Self {
                db,
                student_account,
                student_profile,
                company_account,
                company_profile,
                cv,
                posting,
            }
        }
    }
}
