//! Company Scorer: talent-need and profile-match scores from a company's
//! classified events and open jobs.
//!
//! All three scores are clamped to 0 – 100 whatever the input volume.

use serde::Serialize;
use uuid::Uuid;

use crate::models::company::{Company, CompanyScore};
use crate::models::event::{CompanyEvent, EventType};
use crate::models::job::Job;
use crate::models::profile::Profile;

/// Seniority levels that count as a match when the profile states none.
const DEFAULT_TARGET_SENIORITY: &[&str] = &["senior", "lead"];
const REMOTE_KEYWORDS: &[&str] = &["remote", "etä"];

const JOB_VOLUME_BONUS: i32 = 5;
const JOB_VOLUME_CAP: i32 = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub score: u32,
    pub reasons: Vec<String>,
}

fn clamp_score(raw: i32) -> u32 {
    raw.clamp(0, 100) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Talent need
// ────────────────────────────────────────────────────────────────────────────

/// Contribution of one event and its reason line, if the event type counts.
fn event_contribution(event: &CompanyEvent) -> Option<(i32, String)> {
    let impact = event.impact_strength as i32;
    let contribution = match event.event_type {
        EventType::Funding => (20 + 5 * impact, format!("Funding round (impact {impact}/5)")),
        EventType::Expansion => (15 + 4 * impact, "Growing and expanding".to_string()),
        EventType::NewUnit => (15 + 3 * impact, "New unit or market".to_string()),
        EventType::Acquisition => (
            10 + 3 * impact,
            "Acquisition: integration hires likely".to_string(),
        ),
        EventType::LeadershipChange => (10, "Leadership change".to_string()),
        // A large layoff round often precedes rebuilding.
        EventType::YtLayoff if impact >= 4 => (
            5,
            "Large change negotiations: restructuring ahead".to_string(),
        ),
        EventType::YtLayoff => (-5, "Change negotiations under way".to_string()),
        EventType::YtRestructure => (5, "Reorganisation: new roles emerging".to_string()),
        EventType::StrategyChange | EventType::Other => return None,
    };
    Some(contribution)
}

pub fn talent_need_score(
    _company: &Company,
    events: &[CompanyEvent],
    jobs: &[Job],
) -> ScoreBreakdown {
    let mut score = 0;
    let mut reasons = Vec::new();

    for event in events {
        if let Some((points, reason)) = event_contribution(event) {
            score += points;
            reasons.push(reason);
        }
    }

    if !jobs.is_empty() {
        score += (jobs.len() as i32 * JOB_VOLUME_BONUS).min(JOB_VOLUME_CAP);
        reasons.push(format!("{} open positions", jobs.len()));
    }

    ScoreBreakdown {
        score: clamp_score(score),
        reasons,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Profile match
// ────────────────────────────────────────────────────────────────────────────

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.trim().to_lowercase()).collect()
}

fn job_bonus(job: &Job, target_functions: &[String], target_locations: &[String]) -> i32 {
    let mut bonus = 0;

    if let Some(function) = &job.function_type {
        if target_functions.contains(&function.to_lowercase()) {
            bonus += 10;
        }
    }

    if let Some(location) = &job.location {
        let location = location.to_lowercase();
        if target_locations
            .iter()
            .any(|l| !l.is_empty() && location.contains(l.as_str()))
        {
            bonus += 5;
        }
        if REMOTE_KEYWORDS.iter().any(|kw| location.contains(kw)) {
            bonus += 3;
        }
    }

    if let Some(seniority) = &job.seniority_level {
        if DEFAULT_TARGET_SENIORITY.contains(&seniority.to_lowercase().as_str()) {
            bonus += 10;
        }
    }

    bonus
}

/// Score 0 with no reasons when there is no profile.
pub fn profile_match_score(
    company: &Company,
    events: &[CompanyEvent],
    jobs: &[Job],
    profile: Option<&Profile>,
) -> ScoreBreakdown {
    let Some(profile) = profile else {
        return ScoreBreakdown::default();
    };

    let target_functions = lowercase_all(&profile.target_functions);
    let target_locations =
        lowercase_all(profile.preferred_locations.as_deref().unwrap_or_default());
    let mut score = 0;
    let mut reasons = Vec::new();

    for event in events {
        let matching: Vec<&str> = event
            .function_focus
            .iter()
            .map(|f| f.as_str())
            .filter(|f| target_functions.iter().any(|t| t.as_str() == *f))
            .collect();
        if !matching.is_empty() {
            score += 15;
            reasons.push(format!("Event affects: {}", matching.join(", ")));
        }
    }

    let mut matching_jobs = 0;
    for job in jobs {
        let bonus = job_bonus(job, &target_functions, &target_locations);
        if bonus > 0 {
            matching_jobs += 1;
            score += bonus;
        }
    }
    if matching_jobs > 0 {
        reasons.push(format!("{matching_jobs} matching open positions"));
    }

    if let Some(industry) = company.industry.as_deref().filter(|i| !i.is_empty()) {
        if profile
            .preferred_industries
            .iter()
            .flatten()
            .any(|p| p.trim().to_lowercase() == industry.trim().to_lowercase())
        {
            score += 15;
            reasons.push(format!("Industry fits: {industry}"));
        }
    }

    ScoreBreakdown {
        score: clamp_score(score),
        reasons,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Combination
// ────────────────────────────────────────────────────────────────────────────

pub fn combined_score(talent_need: u32, profile_match: u32, has_profile: bool) -> f64 {
    let combined = if has_profile {
        talent_need as f64 * 0.5 + profile_match as f64 * 0.5
    } else {
        talent_need as f64
    };
    combined.clamp(0.0, 100.0)
}

/// Full scoring pass for one (company, user) pair. Talent-need reasons come
/// first in the result.
pub fn score_company(
    company: &Company,
    events: &[CompanyEvent],
    jobs: &[Job],
    profile: Option<&Profile>,
    user_id: Uuid,
) -> CompanyScore {
    let talent = talent_need_score(company, events, jobs);
    let fit = profile_match_score(company, events, jobs, profile);
    let combined = combined_score(talent.score, fit.score, profile.is_some());

    let mut reasons = talent.reasons;
    reasons.extend(fit.reasons);

    CompanyScore {
        company_id: company.id,
        user_id,
        talent_need_score: talent.score,
        profile_match_score: fit.score,
        combined_score: combined,
        reasons,
    }
}

/// Plain-text report for one scored company.
pub fn format_company_report(
    company: &Company,
    score: &CompanyScore,
    events: &[CompanyEvent],
    jobs: &[Job],
) -> String {
    let rule = "=".repeat(60);
    let mut lines = vec![
        rule.clone(),
        company.name.clone(),
        rule,
        String::new(),
        "SCORES:".to_string(),
        format!("   Talent need:   {}/100", score.talent_need_score),
        format!("   Profile match: {}/100", score.profile_match_score),
        format!("   Combined:      {:.0}/100", score.combined_score),
        String::new(),
        "WHY IT IS LISTED:".to_string(),
    ];
    lines.extend(score.reasons.iter().map(|r| format!("   - {r}")));

    if !events.is_empty() {
        lines.push(String::new());
        lines.push("RECENT EVENTS:".to_string());
        for event in events.iter().take(3) {
            let headline: String = event.headline.chars().take(60).collect();
            lines.push(format!("   - [{}] {headline}", event.event_type.as_str()));
        }
    }

    if !jobs.is_empty() {
        lines.push(String::new());
        lines.push(format!("OPEN POSITIONS ({}):", jobs.len()));
        for job in jobs.iter().take(5) {
            lines.push(format!(
                "   - {} ({})",
                job.title,
                job.location.as_deref().unwrap_or("N/A")
            ));
        }
    }

    lines.push(String::new());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::BusinessFunction;
    use crate::store::memory;
    use chrono::Utc;

    fn event(event_type: EventType, impact: u8) -> CompanyEvent {
        CompanyEvent {
            id: Uuid::new_v4(),
            company_id: Uuid::new_v4(),
            event_type,
            headline: "Headline".into(),
            summary: String::new(),
            source_url: String::new(),
            impact_strength: impact,
            function_focus: vec![BusinessFunction::It],
            affected_count: None,
            confidence: 0.9,
            published_at: Utc::now(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_funding_impact_five_contributes_45() {
        let company = memory::company("Oura");
        let result = talent_need_score(&company, &[event(EventType::Funding, 5)], &[]);
        assert_eq!(result.score, 45);
        assert_eq!(result.reasons, vec!["Funding round (impact 5/5)"]);
    }

    #[test]
    fn test_layoff_sign_depends_on_impact() {
        let company = memory::company("Nokia");
        let base = talent_need_score(&company, &[event(EventType::Funding, 1)], &[]).score;
        assert_eq!(base, 25);

        let small = talent_need_score(
            &company,
            &[event(EventType::Funding, 1), event(EventType::YtLayoff, 2)],
            &[],
        );
        assert_eq!(small.score, base - 5);

        let large = talent_need_score(
            &company,
            &[event(EventType::Funding, 1), event(EventType::YtLayoff, 5)],
            &[],
        );
        assert_eq!(large.score, base + 5);
    }

    #[test]
    fn test_talent_need_clamps_both_ends() {
        let company = memory::company("Acme");
        let layoffs: Vec<_> = (0..50).map(|_| event(EventType::YtLayoff, 1)).collect();
        assert_eq!(talent_need_score(&company, &layoffs, &[]).score, 0);

        let big: Vec<_> = (0..50).map(|_| event(EventType::YtLayoff, 5)).collect();
        assert_eq!(talent_need_score(&company, &big, &[]).score, 100);
    }

    #[test]
    fn test_job_volume_bonus_is_capped() {
        let company = memory::company("Acme");
        let jobs: Vec<_> = (0..3).map(|_| memory::job("Dev", "Acme")).collect();
        let three = talent_need_score(&company, &[], &jobs);
        assert_eq!(three.score, 15);
        assert_eq!(three.reasons, vec!["3 open positions"]);

        let jobs: Vec<_> = (0..20).map(|_| memory::job("Dev", "Acme")).collect();
        assert_eq!(talent_need_score(&company, &[], &jobs).score, 30);
    }

    #[test]
    fn test_strategy_change_and_other_do_not_count() {
        let company = memory::company("Acme");
        let result = talent_need_score(
            &company,
            &[event(EventType::StrategyChange, 5), event(EventType::Other, 5)],
            &[],
        );
        assert_eq!(result, ScoreBreakdown::default());
    }

    #[test]
    fn test_profile_match_without_profile_is_zero() {
        let company = memory::company("Acme");
        let result = profile_match_score(&company, &[event(EventType::Funding, 5)], &[], None);
        assert_eq!(result.score, 0);
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_profile_match_accumulates_job_bonuses() {
        let mut company = memory::company("Acme");
        company.industry = Some("Software".into());
        let profile = Profile {
            target_functions: vec!["IT".into()],
            preferred_locations: Some(vec!["Helsinki".into()]),
            preferred_industries: Some(vec!["software".into()]),
            ..Default::default()
        };

        let mut job = memory::job("Senior Developer", "Acme");
        job.function_type = Some("it".into());
        job.location = Some("Helsinki / etätyö".into());
        job.seniority_level = Some("Senior".into());
        let unrelated = memory::job("Cleaner", "Acme");

        let result = profile_match_score(
            &company,
            &[event(EventType::Funding, 3)],
            &[job, unrelated],
            Some(&profile),
        );
        // 15 (event) + 10 + 5 + 3 + 10 (job) + 15 (industry)
        assert_eq!(result.score, 58);
        assert_eq!(
            result.reasons,
            vec![
                "Event affects: it".to_string(),
                "1 matching open positions".to_string(),
                "Industry fits: Software".to_string(),
            ]
        );
    }

    #[test]
    fn test_profile_match_clamps_to_100() {
        let company = memory::company("Acme");
        let profile = Profile {
            target_functions: vec!["it".into()],
            ..Default::default()
        };
        let events: Vec<_> = (0..20).map(|_| event(EventType::Other, 1)).collect();
        let result = profile_match_score(&company, &events, &[], Some(&profile));
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_combined_score() {
        assert_eq!(combined_score(80, 40, true), 60.0);
        assert_eq!(combined_score(80, 0, false), 80.0);
        assert_eq!(combined_score(100, 100, true), 100.0);
    }

    #[test]
    fn test_score_company_orders_reasons_and_is_stable() {
        let company = memory::company("Acme");
        let profile = Profile {
            target_functions: vec!["it".into()],
            ..Default::default()
        };
        let events = vec![event(EventType::Expansion, 2)];
        let user_id = Uuid::new_v4();

        let first = score_company(&company, &events, &[], Some(&profile), user_id);
        assert_eq!(first.talent_need_score, 23);
        assert_eq!(first.profile_match_score, 15);
        assert_eq!(first.combined_score, 19.0);
        assert_eq!(first.reasons[0], "Growing and expanding");
        assert_eq!(first.reasons[1], "Event affects: it");

        let second = score_company(&company, &events, &[], Some(&profile), user_id);
        assert_eq!(first, second);
    }

    #[test]
    fn test_report_lists_scores_and_events() {
        let company = memory::company("Acme");
        let events = vec![event(EventType::Funding, 4)];
        let score = score_company(&company, &events, &[], None, Uuid::new_v4());
        let report = format_company_report(&company, &score, &events, &[]);
        assert!(report.contains("Acme"));
        assert!(report.contains("Talent need:   40/100"));
        assert!(report.contains("[funding] Headline"));
        assert!(!report.contains("OPEN POSITIONS"));
    }
}
