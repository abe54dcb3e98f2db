pub mod context;
pub mod documents;
pub mod handlers;
pub mod orchestrator;
pub mod personas;
pub mod tools;
