pub mod classifier;
pub mod company_scoring;
pub mod handlers;
pub mod news;
pub mod pipeline;
pub mod prompts;
pub mod rules;
