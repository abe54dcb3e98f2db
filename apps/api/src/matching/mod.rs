pub mod handlers;
pub mod job_matcher;
pub mod refresh;
