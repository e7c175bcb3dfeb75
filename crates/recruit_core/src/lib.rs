pub mod domain;
pub mod memory;
pub mod ports;
pub mod workflow;

pub use domain::{
    Account, AccountCredentials, Application, ApplicationStatus, Capability, CompanyProfile,
    DirectRecruitment, Interview, InterviewStatus, InterviewType, JobPosting, PostingStatus,
    RecruitmentStatus, Role, StudentCv, StudentProfile,
};
pub use memory::MemoryStore;
pub use ports::{DatabaseService, PortError, PortResult};
pub use workflow::{WorkflowError, WorkflowResult};
