//! Batch passes: news ingestion and company scoring.
//!
//! Both passes always run their whole batch. Individual failures are logged,
//! counted, and skipped.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::signals::classifier::EventClassifier;
use crate::signals::company_scoring::score_company;
use crate::signals::news::NewsSource;
use crate::store::Store;

const EVENTS_PER_COMPANY: i64 = 50;
const JOBS_PER_COMPANY: i64 = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestSummary {
    pub news_fetched: u32,
    pub events_classified: u32,
    pub events_created: u32,
    pub failed: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoringSummary {
    pub companies_processed: u32,
    pub scores_calculated: u32,
    pub failed: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FullRunSummary {
    pub ingest: IngestSummary,
    pub scoring: ScoringSummary,
}

pub struct SignalPipeline {
    store: Arc<dyn Store>,
    classifier: Arc<EventClassifier>,
    news: Arc<dyn NewsSource>,
}

impl SignalPipeline {
    pub fn new(
        store: Arc<dyn Store>,
        classifier: Arc<EventClassifier>,
        news: Arc<dyn NewsSource>,
    ) -> Self {
        Self {
            store,
            classifier,
            news,
        }
    }

    /// Fetch → classify → resolve company → persist event.
    pub async fn ingest_news(&self, days_back: i64) -> IngestSummary {
        let mut summary = IngestSummary::default();

        let items = match self.news.fetch_news(days_back).await {
            Ok(items) => items,
            Err(e) => {
                error!("News fetch failed: {e}");
                return summary;
            }
        };
        summary.news_fetched = items.len() as u32;

        let events = self.classifier.classify_batch(&items).await;
        summary.events_classified = events.len() as u32;

        for event in &events {
            let company = match self.store.get_or_create_company(&event.company_name).await {
                Ok(company) => company,
                Err(e) => {
                    warn!("Could not resolve company '{}': {e}", event.company_name);
                    summary.failed += 1;
                    continue;
                }
            };
            match self.store.create_event(company.id, event).await {
                Ok(_) => summary.events_created += 1,
                Err(e) => {
                    warn!("Could not store event '{}': {e}", event.headline);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Ingest: {} fetched, {} classified, {} created, {} failed",
            summary.news_fetched, summary.events_classified, summary.events_created, summary.failed
        );
        summary
    }

    /// Scores every company active within `days_back` days for one user and
    /// upserts the result keyed by (company, user).
    pub async fn score_companies(&self, user_id: Uuid, days_back: i64) -> ScoringSummary {
        let mut summary = ScoringSummary::default();

        let profile = match self.store.get_profile_by_user_id(user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!("Profile lookup failed for {user_id}, scoring without it: {e}");
                None
            }
        };

        let companies = match self.store.get_active_companies(days_back).await {
            Ok(companies) => companies,
            Err(e) => {
                error!("Could not list active companies: {e}");
                return summary;
            }
        };

        for company in &companies {
            summary.companies_processed += 1;

            let events = match self
                .store
                .get_events_by_company_id(company.id, EVENTS_PER_COMPANY)
                .await
            {
                Ok(events) => events,
                Err(e) => {
                    warn!("Events unavailable for '{}': {e}", company.name);
                    summary.failed += 1;
                    continue;
                }
            };
            let jobs = match self
                .store
                .get_jobs_by_company_id(company.id, JOBS_PER_COMPANY)
                .await
            {
                Ok(jobs) => jobs,
                Err(e) => {
                    warn!("Jobs unavailable for '{}': {e}", company.name);
                    summary.failed += 1;
                    continue;
                }
            };

            let score = score_company(company, &events, &jobs, profile.as_ref(), user_id);
            match self.store.upsert_company_score(&score).await {
                Ok(()) => summary.scores_calculated += 1,
                Err(e) => {
                    warn!("Could not store score for '{}': {e}", company.name);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Scoring for {user_id}: {} companies, {} scores, {} failed",
            summary.companies_processed, summary.scores_calculated, summary.failed
        );
        summary
    }

    pub async fn run_full(
        &self,
        user_id: Uuid,
        news_days_back: i64,
        score_days_back: i64,
    ) -> FullRunSummary {
        let ingest = self.ingest_news(news_days_back).await;
        let scoring = self.score_companies(user_id, score_days_back).await;
        FullRunSummary { ingest, scoring }
    }
}
