use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use crate::matching::job_matcher::MatchScore;
use crate::models::company::{Company, CompanyScore, ScoredCompany};
use crate::models::conversation::{
    AgentType, Conversation, Message, MessageRole, NewMessage, ToolCallRecord, ToolResultRecord,
};
use crate::models::event::{BusinessFunction, ClassifiedEvent, CompanyEvent, EventType};
use crate::models::job::{Job, JobMatchSummary};
use crate::models::profile::{Profile, WorkMode};
use crate::store::codec::{decode_list, decode_optional_list, encode_list};
use crate::store::Store;

// ────────────────────────────────────────────────────────────────────────────
// Row types (storage shape) and their domain conversions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, FromRow)]
struct ProfileRow {
    user_id: Uuid,
    current_title: Option<String>,
    years_of_experience: Option<i32>,
    skills: Option<String>,
    languages: Option<String>,
    certifications: Option<String>,
    degree: Option<String>,
    field: Option<String>,
    university: Option<String>,
    preferred_job_titles: Option<String>,
    preferred_industries: Option<String>,
    preferred_locations: Option<String>,
    employment_types: Option<String>,
    salary_min: Option<i32>,
    salary_max: Option<i32>,
    remote_preference: Option<String>,
    work_history: Option<String>,
    target_functions: Option<String>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            user_id: row.user_id,
            current_title: row.current_title,
            years_of_experience: row.years_of_experience,
            skills: decode_optional_list(row.skills.as_deref()),
            languages: decode_list(row.languages.as_deref()),
            certifications: decode_list(row.certifications.as_deref()),
            degree: row.degree,
            field: row.field,
            university: row.university,
            preferred_job_titles: decode_list(row.preferred_job_titles.as_deref()),
            preferred_industries: decode_optional_list(row.preferred_industries.as_deref()),
            preferred_locations: decode_optional_list(row.preferred_locations.as_deref()),
            employment_types: decode_list(row.employment_types.as_deref()),
            salary_min: row.salary_min,
            salary_max: row.salary_max,
            remote_preference: row.remote_preference.as_deref().and_then(WorkMode::parse),
            work_history: decode_list(row.work_history.as_deref()),
            target_functions: decode_list(row.target_functions.as_deref()),
        }
    }
}

#[derive(Debug, FromRow)]
struct JobRow {
    id: Uuid,
    company_id: Option<Uuid>,
    title: String,
    company: String,
    description: Option<String>,
    location: Option<String>,
    salary_min: Option<i32>,
    salary_max: Option<i32>,
    employment_type: Option<String>,
    remote_type: Option<String>,
    industry: Option<String>,
    required_skills: Option<String>,
    experience_required: Option<i32>,
    function_type: Option<String>,
    seniority_level: Option<String>,
    company_rating: Option<i32>,
    posted_at: Option<DateTime<Utc>>,
    expires_at: Option<DateTime<Utc>>,
    url: Option<String>,
}

impl From<JobRow> for Job {
    fn from(row: JobRow) -> Self {
        Job {
            id: row.id,
            company_id: row.company_id,
            title: row.title,
            company: row.company,
            description: row.description,
            location: row.location,
            salary_min: row.salary_min,
            salary_max: row.salary_max,
            employment_type: row.employment_type,
            remote_type: row.remote_type.as_deref().and_then(WorkMode::parse),
            industry: row.industry,
            required_skills: decode_optional_list(row.required_skills.as_deref()),
            experience_required: row.experience_required,
            function_type: row.function_type,
            seniority_level: row.seniority_level,
            company_rating: row.company_rating,
            posted_at: row.posted_at,
            expires_at: row.expires_at,
            url: row.url,
        }
    }
}

const JOB_COLUMNS: &str = "j.id, j.company_id, j.title, j.company, j.description, j.location, \
    j.salary_min, j.salary_max, j.employment_type, j.remote_type, j.industry, j.required_skills, \
    j.experience_required, j.function_type, j.seniority_level, j.company_rating, j.posted_at, \
    j.expires_at, j.url";

#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    company_id: Uuid,
    event_type: String,
    headline: String,
    summary: String,
    source_url: String,
    impact_strength: i16,
    function_focus: String,
    affected_count: Option<i32>,
    confidence: f64,
    published_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
}

impl From<EventRow> for CompanyEvent {
    fn from(row: EventRow) -> Self {
        let functions: Vec<String> = decode_list(Some(&row.function_focus));
        CompanyEvent {
            id: row.id,
            company_id: row.company_id,
            event_type: EventType::parse_lenient(&row.event_type),
            headline: row.headline,
            summary: row.summary,
            source_url: row.source_url,
            impact_strength: row.impact_strength.clamp(1, 5) as u8,
            function_focus: functions
                .iter()
                .filter_map(|f| BusinessFunction::parse(f))
                .collect(),
            affected_count: row.affected_count,
            confidence: row.confidence.clamp(0.0, 1.0),
            published_at: row.published_at,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ScoredCompanyRow {
    #[sqlx(flatten)]
    company: Company,
    user_id: Uuid,
    talent_need_score: i32,
    profile_match_score: i32,
    combined_score: f64,
    score_reasons: String,
    calculated_at: DateTime<Utc>,
}

impl From<ScoredCompanyRow> for ScoredCompany {
    fn from(row: ScoredCompanyRow) -> Self {
        ScoredCompany {
            score: CompanyScore {
                company_id: row.company.id,
                user_id: row.user_id,
                talent_need_score: row.talent_need_score.clamp(0, 100) as u32,
                profile_match_score: row.profile_match_score.clamp(0, 100) as u32,
                combined_score: row.combined_score.clamp(0.0, 100.0),
                reasons: decode_list(Some(&row.score_reasons)),
            },
            company: row.company,
            calculated_at: row.calculated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct MatchRow {
    job_id: Uuid,
    job_title: String,
    company: String,
    total_score: i32,
    skill_score: i32,
    experience_score: i32,
    location_score: i32,
    match_category: String,
}

impl From<MatchRow> for JobMatchSummary {
    fn from(row: MatchRow) -> Self {
        JobMatchSummary {
            job_id: row.job_id,
            job_title: row.job_title,
            company: row.company,
            total_score: row.total_score.clamp(0, 100) as u32,
            skill_score: row.skill_score.clamp(0, 100) as u32,
            experience_score: row.experience_score.clamp(0, 100) as u32,
            location_score: row.location_score.clamp(0, 100) as u32,
            match_category: row.match_category,
        }
    }
}

#[derive(Debug, FromRow)]
struct ConversationRow {
    id: Uuid,
    user_id: Uuid,
    agent_type: String,
    title: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ConversationRow> for Conversation {
    type Error = anyhow::Error;

    fn try_from(row: ConversationRow) -> Result<Self> {
        let agent_type = AgentType::parse(&row.agent_type)
            .with_context(|| format!("Unknown agent type '{}' on conversation {}", row.agent_type, row.id))?;
        Ok(Conversation {
            id: row.id,
            user_id: row.user_id,
            agent_type,
            title: row.title,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct MessageRow {
    id: Uuid,
    conversation_id: Uuid,
    role: String,
    content: String,
    tool_calls: Option<Value>,
    tool_results: Option<Value>,
    created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        let role = if row.role == "assistant" {
            MessageRole::Assistant
        } else {
            MessageRole::User
        };
        Message {
            id: row.id,
            conversation_id: row.conversation_id,
            role,
            content: row.content,
            tool_calls: row
                .tool_calls
                .and_then(|v| serde_json::from_value::<Vec<ToolCallRecord>>(v).ok()),
            tool_results: row
                .tool_results
                .and_then(|v| serde_json::from_value::<Vec<ToolResultRecord>>(v).ok()),
            created_at: row.created_at,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PgStore
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_profile_by_user_id(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT user_id, current_title, years_of_experience, skills, languages, certifications,
                   degree, field, university, preferred_job_titles, preferred_industries,
                   preferred_locations, employment_types, salary_min, salary_max,
                   remote_preference, work_history, target_functions
            FROM profiles WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Profile::from))
    }

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>> {
        let row: Option<JobRow> =
            sqlx::query_as(&format!("SELECT {JOB_COLUMNS} FROM jobs j WHERE j.id = $1"))
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Job::from))
    }

    async fn list_jobs(&self, limit: i64, offset: i64) -> Result<Vec<Job>> {
        let rows: Vec<JobRow> = sqlx::query_as(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs j \
             ORDER BY j.posted_at DESC NULLS LAST, j.created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn get_jobs_by_company_id(&self, company_id: Uuid, limit: i64) -> Result<Vec<Job>> {
        let rows: Vec<JobRow> = sqlx::query_as(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs j WHERE j.company_id = $1 \
             ORDER BY j.posted_at DESC NULLS LAST LIMIT $2"
        ))
        .bind(company_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn get_saved_jobs_by_user_id(&self, user_id: Uuid) -> Result<Vec<Job>> {
        let rows: Vec<JobRow> = sqlx::query_as(&format!(
            "SELECT {JOB_COLUMNS} FROM saved_jobs s JOIN jobs j ON j.id = s.job_id \
             WHERE s.user_id = $1 ORDER BY s.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Job::from).collect())
    }

    async fn upsert_job_match(
        &self,
        user_id: Uuid,
        job_id: Uuid,
        score: &MatchScore,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO job_matches
                (user_id, job_id, total_score, skill_score, experience_score, location_score,
                 salary_score, industry_score, company_score, match_category, calculated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now())
            ON CONFLICT (user_id, job_id) DO UPDATE SET
                total_score = EXCLUDED.total_score,
                skill_score = EXCLUDED.skill_score,
                experience_score = EXCLUDED.experience_score,
                location_score = EXCLUDED.location_score,
                salary_score = EXCLUDED.salary_score,
                industry_score = EXCLUDED.industry_score,
                company_score = EXCLUDED.company_score,
                match_category = EXCLUDED.match_category,
                calculated_at = now()
            "#,
        )
        .bind(user_id)
        .bind(job_id)
        .bind(score.total_score as i32)
        .bind(score.skill_score as i32)
        .bind(score.experience_score as i32)
        .bind(score.location_score as i32)
        .bind(score.salary_score as i32)
        .bind(score.industry_score as i32)
        .bind(score.company_score as i32)
        .bind(score.match_category.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_matches_by_user_id(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<JobMatchSummary>> {
        let rows: Vec<MatchRow> = sqlx::query_as(
            r#"
            SELECT m.job_id, j.title AS job_title, j.company, m.total_score, m.skill_score,
                   m.experience_score, m.location_score, m.match_category
            FROM job_matches m JOIN jobs j ON j.id = m.job_id
            WHERE m.user_id = $1
            ORDER BY m.total_score DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(JobMatchSummary::from).collect())
    }

    async fn get_or_create_company(&self, name: &str) -> Result<Company> {
        let name = name.trim();
        if let Some(existing) = self.get_company_by_name(name).await? {
            return Ok(existing);
        }

        sqlx::query(
            "INSERT INTO companies (id, name) VALUES ($1, $2) \
             ON CONFLICT ((lower(name))) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .execute(&self.pool)
        .await?;
        info!("Created company '{name}'");

        self.get_company_by_name(name)
            .await?
            .with_context(|| format!("Company '{name}' missing right after insert"))
    }

    async fn get_company_by_id(&self, company_id: Uuid) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(company_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(company)
    }

    async fn get_company_by_name(&self, name: &str) -> Result<Option<Company>> {
        let company =
            sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE lower(name) = lower($1)")
                .bind(name.trim())
                .fetch_optional(&self.pool)
                .await?;
        Ok(company)
    }

    async fn get_active_companies(&self, days_back: i64) -> Result<Vec<Company>> {
        let cutoff = Utc::now() - Duration::days(days_back);
        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT c.* FROM companies c
            WHERE EXISTS (
                SELECT 1 FROM company_events e
                WHERE e.company_id = c.id AND e.published_at >= $1
            )
            ORDER BY c.name
            "#,
        )
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;
        Ok(companies)
    }

    async fn create_event(
        &self,
        company_id: Uuid,
        event: &ClassifiedEvent,
    ) -> Result<CompanyEvent> {
        let functions: Vec<&str> = event.function_focus.iter().map(|f| f.as_str()).collect();
        let row: EventRow = sqlx::query_as(
            r#"
            INSERT INTO company_events
                (id, company_id, event_type, headline, summary, source_url, impact_strength,
                 function_focus, affected_count, confidence, published_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(company_id)
        .bind(event.event_type.as_str())
        .bind(&event.headline)
        .bind(&event.summary)
        .bind(&event.source_url)
        .bind(event.impact_strength as i16)
        .bind(encode_list(&functions))
        .bind(event.affected_count)
        .bind(event.confidence)
        .bind(event.published_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn get_events_by_company_id(
        &self,
        company_id: Uuid,
        limit: i64,
    ) -> Result<Vec<CompanyEvent>> {
        let rows: Vec<EventRow> = sqlx::query_as(
            "SELECT * FROM company_events WHERE company_id = $1 \
             ORDER BY published_at DESC LIMIT $2",
        )
        .bind(company_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CompanyEvent::from).collect())
    }

    async fn upsert_company_score(&self, score: &CompanyScore) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO company_scores
                (company_id, user_id, talent_need_score, profile_match_score, combined_score,
                 score_reasons, calculated_at)
            VALUES ($1, $2, $3, $4, $5, $6, now())
            ON CONFLICT (company_id, user_id) DO UPDATE SET
                talent_need_score = EXCLUDED.talent_need_score,
                profile_match_score = EXCLUDED.profile_match_score,
                combined_score = EXCLUDED.combined_score,
                score_reasons = EXCLUDED.score_reasons,
                calculated_at = now()
            "#,
        )
        .bind(score.company_id)
        .bind(score.user_id)
        .bind(score.talent_need_score as i32)
        .bind(score.profile_match_score as i32)
        .bind(score.combined_score)
        .bind(encode_list(&score.reasons))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_top_company_scores(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<ScoredCompany>> {
        let rows: Vec<ScoredCompanyRow> = sqlx::query_as(
            r#"
            SELECT c.*, s.user_id, s.talent_need_score, s.profile_match_score, s.combined_score,
                   s.score_reasons, s.calculated_at
            FROM company_scores s JOIN companies c ON c.id = s.company_id
            WHERE s.user_id = $1
            ORDER BY s.combined_score DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ScoredCompany::from).collect())
    }

    async fn create_conversation(
        &self,
        user_id: Uuid,
        agent_type: AgentType,
        title: &str,
    ) -> Result<Conversation> {
        let row: ConversationRow = sqlx::query_as(
            "INSERT INTO conversations (id, user_id, agent_type, title) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(agent_type.as_str())
        .bind(title)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn get_conversation(&self, conversation_id: Uuid) -> Result<Option<Conversation>> {
        let row: Option<ConversationRow> =
            sqlx::query_as("SELECT * FROM conversations WHERE id = $1")
                .bind(conversation_id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(Conversation::try_from).transpose()
    }

    async fn get_conversations_by_user_id(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Conversation>> {
        let rows: Vec<ConversationRow> = sqlx::query_as(
            "SELECT * FROM conversations WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut conversations = Vec::with_capacity(rows.len());
        for row in rows {
            match Conversation::try_from(row) {
                Ok(c) => conversations.push(c),
                Err(e) => warn!("Skipping unreadable conversation: {e}"),
            }
        }
        Ok(conversations)
    }

    async fn delete_conversation(&self, conversation_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM conversations WHERE id = $1")
            .bind(conversation_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_message(&self, message: NewMessage) -> Result<Message> {
        let tool_calls = if message.tool_calls.is_empty() {
            None
        } else {
            Some(serde_json::to_value(&message.tool_calls)?)
        };
        let tool_results = if message.tool_results.is_empty() {
            None
        } else {
            Some(serde_json::to_value(&message.tool_results)?)
        };

        let row: MessageRow = sqlx::query_as(
            r#"
            INSERT INTO messages (id, conversation_id, role, content, tool_calls, tool_results)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(message.conversation_id)
        .bind(message.role.as_str())
        .bind(&message.content)
        .bind(tool_calls)
        .bind(tool_results)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn get_messages_by_conversation_id(
        &self,
        conversation_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Message>> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            r#"
            SELECT * FROM (
                SELECT * FROM messages WHERE conversation_id = $1
                ORDER BY created_at DESC LIMIT $2
            ) recent
            ORDER BY created_at ASC
            "#,
        )
        .bind(conversation_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Message::from).collect())
    }
}
