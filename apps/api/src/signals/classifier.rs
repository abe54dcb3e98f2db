//! Event classifier: turns one raw news item into at most one company event.
//!
//! The model is asked for a strict JSON object. Model absence, transport
//! failure, or an unusable reply all fall back to the keyword rules in
//! `rules.rs`. A reply that parses but names no company is final: the item
//! yields no event.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::llm_client::{extract_json, ChatModel, CompletionRequest, CLASSIFIER_MODEL};
use crate::models::event::{BusinessFunction, ClassifiedEvent, EventType, RawNewsItem};
use crate::signals::prompts::{CLASSIFICATION_PROMPT, CLASSIFIER_SYSTEM};
use crate::signals::rules::classify_by_rules;

const PROMPT_SUMMARY_CHARS: usize = 1500;
const EVENT_SUMMARY_CHARS: usize = 500;
const MAX_FUNCTIONS: usize = 3;
const DEFAULT_IMPACT: i64 = 3;
const DEFAULT_CONFIDENCE: f64 = 0.8;

pub struct EventClassifier {
    /// `None` when no credential is configured.
    llm: Option<Arc<dyn ChatModel>>,
}

/// What the model's reply amounts to after validation.
#[derive(Debug, PartialEq)]
enum Verdict {
    Event(ClassifiedEvent),
    NoCompany,
    Malformed,
}

impl EventClassifier {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm: Some(llm) }
    }

    pub fn rules_only() -> Self {
        Self { llm: None }
    }

    pub async fn classify(&self, item: &RawNewsItem) -> Option<ClassifiedEvent> {
        let Some(llm) = &self.llm else {
            return classify_by_rules(item);
        };

        let summary: String = item.summary.chars().take(PROMPT_SUMMARY_CHARS).collect();
        let prompt = CLASSIFICATION_PROMPT
            .replace("{headline}", &item.headline)
            .replace("{summary}", &summary);
        let mut request = CompletionRequest::single(CLASSIFIER_MODEL, CLASSIFIER_SYSTEM, &prompt);
        request.max_tokens = 500;
        request.temperature = Some(0.1);

        let reply = match llm.complete(request).await {
            Ok(response) => response.text(),
            Err(e) => {
                warn!("Classifier model call failed for '{}': {e}; using rules", item.headline);
                return classify_by_rules(item);
            }
        };

        match interpret_reply(&reply, item) {
            Verdict::Event(event) => Some(event),
            Verdict::NoCompany => {
                debug!("No company identified in '{}'", item.headline);
                None
            }
            Verdict::Malformed => {
                warn!("Unusable classifier reply for '{}'; using rules", item.headline);
                classify_by_rules(item)
            }
        }
    }

    /// Sequential; items without an identifiable company are dropped.
    pub async fn classify_batch(&self, items: &[RawNewsItem]) -> Vec<ClassifiedEvent> {
        let mut events = Vec::with_capacity(items.len());
        for item in items {
            if let Some(event) = self.classify(item).await {
                events.push(event);
            }
        }
        info!("Classified {} of {} news items", events.len(), items.len());
        events
    }
}

fn interpret_reply(reply: &str, item: &RawNewsItem) -> Verdict {
    let Ok(value) = serde_json::from_str::<Value>(extract_json(reply).trim()) else {
        return Verdict::Malformed;
    };
    let Some(data) = value.as_object() else {
        return Verdict::Malformed;
    };

    let company_name = data
        .get("company_name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.eq_ignore_ascii_case("null"));
    let Some(company_name) = company_name else {
        return Verdict::NoCompany;
    };

    let event_type = data
        .get("event_type")
        .and_then(Value::as_str)
        .map(EventType::parse_lenient)
        .unwrap_or(EventType::Other);

    let impact = data
        .get("impact_strength")
        .and_then(as_integer)
        .filter(|i| *i != 0)
        .unwrap_or(DEFAULT_IMPACT)
        .clamp(1, 5) as u8;

    let confidence = data
        .get("confidence")
        .and_then(as_float)
        .filter(|c| *c != 0.0 && c.is_finite())
        .unwrap_or(DEFAULT_CONFIDENCE)
        .clamp(0.0, 1.0);

    let affected_count = data
        .get("affected_count")
        .and_then(as_integer)
        .and_then(|n| i32::try_from(n).ok());

    let summary = data
        .get("summary")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(&item.summary)
        .chars()
        .take(EVENT_SUMMARY_CHARS)
        .collect();

    Verdict::Event(ClassifiedEvent {
        company_name: company_name.to_string(),
        event_type,
        impact_strength: impact,
        function_focus: parse_functions(data.get("function_focus")),
        affected_count,
        confidence,
        summary,
        headline: item.headline.clone(),
        source_url: item.url.clone(),
        published_at: item.published_at,
    })
}

/// Accepts a single string or an array; unknown names are dropped.
fn parse_functions(value: Option<&Value>) -> Vec<BusinessFunction> {
    let names: Vec<&str> = match value {
        Some(Value::String(s)) => vec![s.as_str()],
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => vec![],
    };

    let mut functions: Vec<BusinessFunction> = Vec::new();
    for function in names.into_iter().filter_map(BusinessFunction::parse) {
        if !functions.contains(&function) {
            functions.push(function);
        }
    }
    functions.truncate(MAX_FUNCTIONS);
    if functions.is_empty() {
        functions.push(BusinessFunction::Other);
    }
    functions
}

/// Integers, truncated floats, and numeric strings.
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
