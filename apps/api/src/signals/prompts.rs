// Prompt templates for news classification.

pub const CLASSIFIER_SYSTEM: &str = "You analyse Finnish business news. \
    Always answer with a single valid JSON object.";

/// Placeholders: `{headline}`, `{summary}`.
pub const CLASSIFICATION_PROMPT: &str = r#"Analyse the following Finnish news item and return its details as JSON.

NEWS ITEM:
Headline: {headline}
Body: {summary}

TASK:
1. Identify the company the item is about (if any).
2. Classify the event type.
3. Rate the impact strength from 1 to 5.
4. Pick the business functions most affected.
5. If a headcount is mentioned (for example people being laid off), extract it.

EVENT TYPES:
- yt_layoff: change negotiations (YT-neuvottelut) leading to redundancies
- yt_restructure: change negotiations without significant redundancies
- funding: funding round or investment
- new_unit: new unit, office or market
- expansion: growth, recruiting, expansion
- acquisition: acquisition or merger
- strategy_change: change of strategy
- leadership_change: change in leadership
- other: any other relevant event

FUNCTIONS (choose the 1-3 most relevant):
marketing, sales, it, hr, finance, operations, production, rd, management, other

IMPACT STRENGTH:
1 = minor, 2 = moderate, 3 = significant, 4 = large, 5 = very large

ANSWER WITH JSON ONLY:
{
    "company_name": "company name or null",
    "event_type": "type",
    "impact_strength": 1-5,
    "function_focus": ["list"],
    "affected_count": number or null,
    "confidence": 0.0-1.0,
    "summary": "short summary"
}"#;
