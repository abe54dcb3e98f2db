//! Keyword-driven classifier used when no model is available or its output is unusable.
//!
//! Deterministic: the same headline and summary always produce the same event.

use crate::models::event::{BusinessFunction, ClassifiedEvent, EventType, RawNewsItem};

/// Confidence attached to every rule-derived event.
pub const RULE_CONFIDENCE: f64 = 0.6;

const RULE_SUMMARY_CHARS: usize = 200;

/// Capitalised words that are never company names in Finnish headlines.
const STOPWORDS: &[&str] = &[
    "suomi", "suomen", "helsinki", "tampere", "turku", "oulu", "uusi", "uudet", "tänään", "ensi",
    "viime", "yle", "hs", "euro", "euroa", "miljoonaa", "miljardia", "prosenttia",
];

struct KeywordRule {
    keywords: &'static [&'static str],
    event_type: EventType,
    impact: u8,
    functions: &'static [BusinessFunction],
}

/// Evaluated in order; the first rule with a matching keyword wins.
const RULES: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["yt-neuvo", "irtisano", "lomautta", "vähent"],
        event_type: EventType::YtLayoff,
        impact: 4,
        functions: &[BusinessFunction::Hr, BusinessFunction::Management],
    },
    KeywordRule {
        keywords: &["rahoitus", "sijoitus", "miljoonaa euroa"],
        event_type: EventType::Funding,
        impact: 3,
        functions: &[BusinessFunction::Management, BusinessFunction::Finance],
    },
    KeywordRule {
        keywords: &["ostaa", "hankkii", "yrityskauppa"],
        event_type: EventType::Acquisition,
        impact: 4,
        functions: &[BusinessFunction::Management],
    },
    KeywordRule {
        keywords: &["toimitusjohtaja", "nimitetty", "nimitys"],
        event_type: EventType::LeadershipChange,
        impact: 3,
        functions: &[BusinessFunction::Management],
    },
    KeywordRule {
        keywords: &["rekrytoi", "palkkaa", "avaa", "laajenta"],
        event_type: EventType::Expansion,
        impact: 2,
        functions: &[BusinessFunction::Hr],
    },
];

pub fn classify_by_rules(item: &RawNewsItem) -> Option<ClassifiedEvent> {
    let company_name = extract_company_name(&item.headline)?;
    let text = format!("{} {}", item.headline, item.summary).to_lowercase();

    let (event_type, impact, functions) = RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| text.contains(kw)))
        .map(|rule| (rule.event_type, rule.impact, rule.functions.to_vec()))
        .unwrap_or((EventType::Other, 3, vec![BusinessFunction::Other]));

    Some(ClassifiedEvent {
        company_name,
        event_type,
        impact_strength: impact,
        function_focus: functions,
        affected_count: None,
        confidence: RULE_CONFIDENCE,
        summary: item.summary.chars().take(RULE_SUMMARY_CHARS).collect(),
        headline: item.headline.clone(),
        source_url: item.url.clone(),
        published_at: item.published_at,
    })
}

/// First capitalised, non-stopword token of at least two characters.
pub fn extract_company_name(headline: &str) -> Option<String> {
    headline
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| !matches!(c, ',' | ':' | ';' | '.' | '!' | '?' | '(' | ')' | '[' | ']' | '"' | '\''))
                .collect::<String>()
        })
        .find(|word| {
            word.chars().count() >= 2
                && word.chars().next().is_some_and(char::is_uppercase)
                && !STOPWORDS.contains(&word.to_lowercase().as_str())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(headline: &str, summary: &str) -> RawNewsItem {
        RawNewsItem {
            headline: headline.to_string(),
            summary: summary.to_string(),
            url: "https://yle.fi/a/1".to_string(),
            source: "yle".to_string(),
            published_at: Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_company_name_skips_stopwords_and_punctuation() {
        assert_eq!(
            extract_company_name("Suomen Wärtsilä: aloittaa yt-neuvottelut").as_deref(),
            Some("Wärtsilä")
        );
        assert_eq!(
            extract_company_name("\"Nokia\" vähentää väkeä").as_deref(),
            Some("Nokia")
        );
        assert_eq!(extract_company_name("tänään ei mitään"), None);
        assert_eq!(extract_company_name("Helsinki Oulu Yle"), None);
    }

    #[test]
    fn test_layoff_keywords_win_over_later_groups() {
        // "rekrytoi" would match expansion but layoffs are checked first.
        let event = classify_by_rules(&item(
            "Fiskars aloittaa yt-neuvottelut",
            "Yhtiö rekrytoi samalla uusia osaajia.",
        ))
        .unwrap();
        assert_eq!(event.company_name, "Fiskars");
        assert_eq!(event.event_type, EventType::YtLayoff);
        assert_eq!(event.impact_strength, 4);
        assert_eq!(
            event.function_focus,
            vec![BusinessFunction::Hr, BusinessFunction::Management]
        );
        assert_eq!(event.confidence, RULE_CONFIDENCE);
    }

    #[test]
    fn test_keyword_groups() {
        let cases = [
            ("Oura sai rahoitusta", "", EventType::Funding),
            ("Kone ostaa kilpailijansa", "", EventType::Acquisition),
            ("Posti nimitys", "uusi toimitusjohtaja aloittaa", EventType::LeadershipChange),
            ("Supercell palkkaa sata", "", EventType::Expansion),
            ("Valio julkaisi tuloksensa", "", EventType::Other),
        ];
        for (headline, summary, expected) in cases {
            let event = classify_by_rules(&item(headline, summary)).unwrap();
            assert_eq!(event.event_type, expected, "headline = {headline}");
        }
    }

    #[test]
    fn test_rules_are_deterministic() {
        let news = item("Wolt laajentaa Tampereelle", "Yhtiö avaa uuden toimiston.");
        let first = classify_by_rules(&news).unwrap();
        let second = classify_by_rules(&news).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.event_type, EventType::Expansion);
        assert_eq!(first.impact_strength, 2);
    }

    #[test]
    fn test_no_company_means_no_event() {
        assert!(classify_by_rules(&item("irtisanomisia luvassa", "")).is_none());
    }

    #[test]
    fn test_summary_is_truncated_by_chars() {
        let long = "ä".repeat(300);
        let event = classify_by_rules(&item("Neste tiedottaa", &long)).unwrap();
        assert_eq!(event.summary.chars().count(), RULE_SUMMARY_CHARS);
    }
}
