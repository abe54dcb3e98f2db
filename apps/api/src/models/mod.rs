pub mod company;
pub mod conversation;
pub mod event;
pub mod job;
pub mod profile;
