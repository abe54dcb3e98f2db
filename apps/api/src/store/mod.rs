//! Datastore collaborator.
//!
//! Every component reads and writes through `Store`; `PgStore` is the
//! production backend. Score rows are always upserted on their composite keys
//! ((company, user) and (user, job)) so re-running a pass never duplicates them.

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::matching::job_matcher::MatchScore;
use crate::models::company::{Company, CompanyScore, ScoredCompany};
use crate::models::conversation::{AgentType, Conversation, Message, NewMessage};
use crate::models::event::{ClassifiedEvent, CompanyEvent};
use crate::models::job::{Job, JobMatchSummary};
use crate::models::profile::Profile;

pub mod codec;
#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    // Profiles
    async fn get_profile_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>>;

    // Jobs
    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>>;
    /// Most recently posted jobs first.
    async fn list_jobs(&self, limit: i64, offset: i64) -> Result<Vec<Job>>;
    async fn get_jobs_by_company_id(&self, company_id: Uuid, limit: i64) -> Result<Vec<Job>>;
    async fn get_saved_jobs_by_user_id(&self, user_id: Uuid) -> Result<Vec<Job>>;

    // Job matches
    async fn upsert_job_match(&self, user_id: Uuid, job_id: Uuid, score: &MatchScore)
        -> Result<()>;
    /// Highest total score first.
    async fn get_matches_by_user_id(&self, user_id: Uuid, limit: i64)
        -> Result<Vec<JobMatchSummary>>;

    // Companies
    async fn get_or_create_company(&self, name: &str) -> Result<Company>;
    async fn get_company_by_id(&self, company_id: Uuid) -> Result<Option<Company>>;
    /// Case-insensitive exact name lookup.
    async fn get_company_by_name(&self, name: &str) -> Result<Option<Company>>;
    /// Companies with at least one event published within `days_back` days.
    async fn get_active_companies(&self, days_back: i64) -> Result<Vec<Company>>;

    // Events
    async fn create_event(&self, company_id: Uuid, event: &ClassifiedEvent)
        -> Result<CompanyEvent>;
    /// Newest first.
    async fn get_events_by_company_id(&self, company_id: Uuid, limit: i64)
        -> Result<Vec<CompanyEvent>>;

    // Company scores
    async fn upsert_company_score(&self, score: &CompanyScore) -> Result<()>;
    /// Highest combined score first.
    async fn get_top_company_scores(&self, user_id: Uuid, limit: i64)
        -> Result<Vec<ScoredCompany>>;

    // Conversations
    async fn create_conversation(
        &self,
        user_id: Uuid,
        agent_type: AgentType,
        title: &str,
    ) -> Result<Conversation>;
    async fn get_conversation(&self, conversation_id: Uuid) -> Result<Option<Conversation>>;
    async fn get_conversations_by_user_id(&self, user_id: Uuid, limit: i64)
        -> Result<Vec<Conversation>>;
    async fn delete_conversation(&self, conversation_id: Uuid) -> Result<()>;
    async fn create_message(&self, message: NewMessage) -> Result<Message>;
    /// The latest `limit` messages, returned oldest first.
    async fn get_messages_by_conversation_id(&self, conversation_id: Uuid, limit: i64)
        -> Result<Vec<Message>>;
}
