pub mod resume;

pub use resume::{InvalidResumeId, ResumeData, ResumeId, StepDefinition};
