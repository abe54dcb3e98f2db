//! In-memory `Store` for unit tests, with per-operation failure injection.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::matching::job_matcher::MatchScore;
use crate::models::company::{Company, CompanyScore, ScoredCompany};
use crate::models::conversation::{AgentType, Conversation, Message, NewMessage};
use crate::models::event::{ClassifiedEvent, CompanyEvent};
use crate::models::job::{Job, JobMatchSummary};
use crate::models::profile::Profile;
use crate::store::Store;

#[derive(Default)]
struct State {
    profiles: HashMap<Uuid, Profile>,
    jobs: Vec<Job>,
    saved: Vec<(Uuid, Uuid)>,
    matches: HashMap<(Uuid, Uuid), MatchScore>,
    companies: Vec<Company>,
    events: Vec<CompanyEvent>,
    scores: HashMap<(Uuid, Uuid), CompanyScore>,
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    failing: Mutex<HashSet<&'static str>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to the named `Store` method return an error.
    pub fn fail_on(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    fn check(&self, operation: &'static str) -> Result<()> {
        if self.failing.lock().unwrap().contains(operation) {
            return Err(anyhow!("injected failure in {operation}"));
        }
        Ok(())
    }

    pub fn put_profile(&self, profile: Profile) {
        self.state.lock().unwrap().profiles.insert(profile.user_id, profile);
    }

    pub fn put_job(&self, job: Job) {
        self.state.lock().unwrap().jobs.push(job);
    }

    pub fn save_job(&self, user_id: Uuid, job_id: Uuid) {
        self.state.lock().unwrap().saved.push((user_id, job_id));
    }

    pub fn put_company(&self, company: Company) {
        self.state.lock().unwrap().companies.push(company);
    }

    pub fn put_event(&self, event: CompanyEvent) {
        self.state.lock().unwrap().events.push(event);
    }

    pub fn match_count(&self) -> usize {
        self.state.lock().unwrap().matches.len()
    }

    pub fn stored_match(&self, user_id: Uuid, job_id: Uuid) -> Option<MatchScore> {
        self.state.lock().unwrap().matches.get(&(user_id, job_id)).cloned()
    }

    pub fn score_count(&self) -> usize {
        self.state.lock().unwrap().scores.len()
    }

    pub fn stored_score(&self, company_id: Uuid, user_id: Uuid) -> Option<CompanyScore> {
        self.state.lock().unwrap().scores.get(&(company_id, user_id)).cloned()
    }

    pub fn company_count(&self) -> usize {
        self.state.lock().unwrap().companies.len()
    }

    pub fn event_count(&self) -> usize {
        self.state.lock().unwrap().events.len()
    }

    pub fn all_messages(&self, conversation_id: Uuid) -> Vec<Message> {
        self.state
            .lock()
            .unwrap()
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect()
    }
}

pub fn company(name: &str) -> Company {
    Company {
        id: Uuid::new_v4(),
        name: name.to_string(),
        industry: None,
        website: None,
        description: None,
        employee_count: None,
        headquarters: None,
        created_at: Utc::now(),
    }
}

pub fn job(title: &str, company: &str) -> Job {
    Job {
        id: Uuid::new_v4(),
        company_id: None,
        title: title.to_string(),
        company: company.to_string(),
        description: None,
        location: None,
        salary_min: None,
        salary_max: None,
        employment_type: None,
        remote_type: None,
        industry: None,
        required_skills: None,
        experience_required: None,
        function_type: None,
        seniority_level: None,
        company_rating: None,
        posted_at: None,
        expires_at: None,
        url: None,
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_profile_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>> {
        self.check("get_profile_by_user_id")?;
        Ok(self.state.lock().unwrap().profiles.get(&user_id).cloned())
    }

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>> {
        self.check("get_job_by_id")?;
        let state = self.state.lock().unwrap();
        Ok(state.jobs.iter().find(|j| j.id == job_id).cloned())
    }

    async fn list_jobs(&self, limit: i64, offset: i64) -> Result<Vec<Job>> {
        self.check("list_jobs")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .jobs
            .iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn get_jobs_by_company_id(&self, company_id: Uuid, limit: i64) -> Result<Vec<Job>> {
        self.check("get_jobs_by_company_id")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .jobs
            .iter()
            .filter(|j| j.company_id == Some(company_id))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn get_saved_jobs_by_user_id(&self, user_id: Uuid) -> Result<Vec<Job>> {
        self.check("get_saved_jobs_by_user_id")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .saved
            .iter()
            .filter(|(u, _)| *u == user_id)
            .filter_map(|(_, job_id)| state.jobs.iter().find(|j| j.id == *job_id).cloned())
            .collect())
    }

    async fn upsert_job_match(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        score: &MatchScore,
    ) -> Result<()> {
        self.check("upsert_job_match")?;
        self.state
            .lock()
            .unwrap()
            .matches
            .insert((user_id, job_id), score.clone());
        Ok(())
    }

    async fn get_matches_by_user_id(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<JobMatchSummary>> {
        self.check("get_matches_by_user_id")?;
        let state = self.state.lock().unwrap();
        let mut summaries: Vec<JobMatchSummary> = state
            .matches
            .iter()
            .filter(|((u, _), _)| *u == user_id)
            .filter_map(|((_, job_id), score)| {
                let job = state.jobs.iter().find(|j| j.id == *job_id)?;
                Some(JobMatchSummary {
                    job_id: job.id,
                    job_title: job.title.clone(),
                    company: job.company.clone(),
                    total_score: score.total_score,
                    skill_score: score.skill_score,
                    experience_score: score.experience_score,
                    location_score: score.location_score,
                    match_category: score.match_category.as_str().to_string(),
                })
            })
            .collect();
        summaries.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        summaries.truncate(limit.max(0) as usize);
        Ok(summaries)
    }

    async fn get_or_create_company(&self, name: &str) -> Result<Company> {
        self.check("get_or_create_company")?;
        let name = name.trim();
        let mut state = self.state.lock().unwrap();
        if let Some(existing) = state
            .companies
            .iter()
            .find(|c| c.name.to_lowercase() == name.to_lowercase())
        {
            return Ok(existing.clone());
        }
        let created = company(name);
        state.companies.push(created.clone());
        Ok(created)
    }

    async fn get_company_by_id(&self, company_id: Uuid) -> Result<Option<Company>> {
        self.check("get_company_by_id")?;
        let state = self.state.lock().unwrap();
        Ok(state.companies.iter().find(|c| c.id == company_id).cloned())
    }

    async fn get_company_by_name(&self, name: &str) -> Result<Option<Company>> {
        self.check("get_company_by_name")?;
        let wanted = name.trim().to_lowercase();
        let state = self.state.lock().unwrap();
        Ok(state
            .companies
            .iter()
            .find(|c| c.name.to_lowercase() == wanted)
            .cloned())
    }

    async fn get_active_companies(&self, days_back: i64) -> Result<Vec<Company>> {
        self.check("get_active_companies")?;
        let cutoff = Utc::now() - Duration::days(days_back);
        let state = self.state.lock().unwrap();
        Ok(state
            .companies
            .iter()
            .filter(|c| {
                state
                    .events
                    .iter()
                    .any(|e| e.company_id == c.id && e.published_at >= cutoff)
            })
            .cloned()
            .collect())
    }

    async fn create_event(
        &self,
        company_id: Uuid,
        event: &ClassifiedEvent,
    ) -> Result<CompanyEvent> {
        self.check("create_event")?;
        let stored = CompanyEvent {
            id: Uuid::new_v4(),
            company_id,
            event_type: event.event_type,
            headline: event.headline.clone(),
            summary: event.summary.clone(),
            source_url: event.source_url.clone(),
            impact_strength: event.impact_strength,
            function_focus: event.function_focus.clone(),
            affected_count: event.affected_count,
            confidence: event.confidence,
            published_at: event.published_at,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().events.push(stored.clone());
        Ok(stored)
    }

    async fn get_events_by_company_id(
        &self,
        company_id: Uuid,
        limit: i64,
    ) -> Result<Vec<CompanyEvent>> {
        self.check("get_events_by_company_id")?;
        let state = self.state.lock().unwrap();
        let mut events: Vec<CompanyEvent> = state
            .events
            .iter()
            .filter(|e| e.company_id == company_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        events.truncate(limit.max(0) as usize);
        Ok(events)
    }

    async fn upsert_company_score(&self, score: &CompanyScore) -> Result<()> {
        self.check("upsert_company_score")?;
        self.state
            .lock()
            .unwrap()
            .scores
            .insert((score.company_id, score.user_id), score.clone());
        Ok(())
    }

    async fn get_top_company_scores(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ScoredCompany>> {
        self.check("get_top_company_scores")?;
        let state = self.state.lock().unwrap();
        let mut scored: Vec<ScoredCompany> = state
            .scores
            .values()
            .filter(|s| s.user_id == user_id)
            .filter_map(|s| {
                let company = state.companies.iter().find(|c| c.id == s.company_id)?;
                Some(ScoredCompany {
                    company: company.clone(),
                    score: s.clone(),
                    calculated_at: Utc::now(),
                })
            })
            .collect();
        scored.sort_by(|a, b| b.score.combined_score.total_cmp(&a.score.combined_score));
        scored.truncate(limit.max(0) as usize);
        Ok(scored)
    }

    async fn create_conversation(
        &self,
        user_id: Uuid,
        agent_type: AgentType,
        title: &str,
    ) -> Result<Conversation> {
        self.check("create_conversation")?;
        let conversation = Conversation {
            id: Uuid::new_v4(),
            user_id,
            agent_type,
            title: title.to_string(),
            created_at: Utc::now(),
        };
        self.state
            .lock()
            .unwrap()
            .conversations
            .push(conversation.clone());
        Ok(conversation)
    }

    async fn get_conversation(&self, conversation_id: Uuid) -> Result<Option<Conversation>> {
        self.check("get_conversation")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .conversations
            .iter()
            .find(|c| c.id == conversation_id)
            .cloned())
    }

    async fn get_conversations_by_user_id(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Conversation>> {
        self.check("get_conversations_by_user_id")?;
        let state = self.state.lock().unwrap();
        Ok(state
            .conversations
            .iter()
            .rev()
            .filter(|c| c.user_id == user_id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn delete_conversation(&self, conversation_id: Uuid) -> Result<()> {
        self.check("delete_conversation")?;
        let mut state = self.state.lock().unwrap();
        state.conversations.retain(|c| c.id != conversation_id);
        state.messages.retain(|m| m.conversation_id != conversation_id);
        Ok(())
    }

    async fn create_message(&self, message: NewMessage) -> Result<Message> {
        self.check("create_message")?;
        let stored = Message {
            id: Uuid::new_v4(),
            conversation_id: message.conversation_id,
            role: message.role,
            content: message.content,
            tool_calls: (!message.tool_calls.is_empty()).then_some(message.tool_calls),
            tool_results: (!message.tool_results.is_empty()).then_some(message.tool_results),
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().messages.push(stored.clone());
        Ok(stored)
    }

    async fn get_messages_by_conversation_id(
        &self,
        conversation_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Message>> {
        self.check("get_messages_by_conversation_id")?;
        let all = self.all_messages(conversation_id);
        let skip = all.len().saturating_sub(limit.max(0) as usize);
        Ok(all.into_iter().skip(skip).collect())
    }
}
