//! News collaborator: raw items from RSS feeds, filtered to hiring-relevant news.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use reqwest::Client;
use tracing::{info, warn};

use crate::models::event::RawNewsItem;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; ScoutBot/1.0)";
const SUMMARY_CHARS: usize = 500;

/// Change-negotiation and layoff vocabulary.
const LAYOFF_KEYWORDS: &[&str] = &[
    "yt-neuvottelu",
    "yt-neuvottelut",
    "yhteistoimintaneuvottelu",
    "muutosneuvottelu",
    "irtisano",
    "irtisanominen",
    "lomauttaa",
    "lomautus",
    "henkilöstövähennys",
    "vähentää työpaikkoja",
    "supistaa",
    "saneeraus",
    "säästöohjelma",
];

const GROWTH_KEYWORDS: &[&str] = &[
    "rahoituskierros",
    "sijoitus",
    "investointi",
    "kasvurahoitus",
    "listautuminen",
    "ipo",
    "yrityskauppa",
    "ostaa",
    "hankkii",
    "laajentaa",
    "avaa uuden",
    "perustaa",
    "kasvattaa",
    "rekrytoi",
    "palkkaa",
    "uusi toimitusjohtaja",
    "nimitetty",
    "nimitys",
];

#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Relevant items published within the last `days_back` days.
    async fn fetch_news(&self, days_back: i64) -> Result<Vec<RawNewsItem>>;
}

pub fn is_layoff_news(item: &RawNewsItem) -> bool {
    contains_any(item, LAYOFF_KEYWORDS)
}

pub fn is_growth_news(item: &RawNewsItem) -> bool {
    contains_any(item, GROWTH_KEYWORDS)
}

pub fn is_relevant(item: &RawNewsItem) -> bool {
    is_layoff_news(item) || is_growth_news(item)
}

fn contains_any(item: &RawNewsItem, keywords: &[&str]) -> bool {
    let text = format!("{} {}", item.headline, item.summary).to_lowercase();
    keywords.iter().any(|kw| text.contains(kw))
}

// ────────────────────────────────────────────────────────────────────────────
// RSS parsing
// ────────────────────────────────────────────────────────────────────────────

pub struct FeedParser {
    item: Regex,
    title: Regex,
    description: Regex,
    link: Regex,
    pub_date: Regex,
    tag: Regex,
    whitespace: Regex,
}

impl FeedParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            item: Regex::new(r"(?s)<item>(.*?)</item>")?,
            title: Regex::new(r"(?s)<title><!\[CDATA\[(.*?)\]\]></title>|<title>(.*?)</title>")?,
            description: Regex::new(
                r"(?s)<description><!\[CDATA\[(.*?)\]\]></description>|<description>(.*?)</description>",
            )?,
            link: Regex::new(r"(?s)<link>(.*?)</link>")?,
            pub_date: Regex::new(r"(?s)<pubDate>(.*?)</pubDate>")?,
            tag: Regex::new(r"<[^>]+>")?,
            whitespace: Regex::new(r"\s+")?,
        })
    }

    /// Items without a title are skipped. An unreadable `pubDate` counts as "now".
    pub fn parse(&self, xml: &str, source: &str) -> Vec<RawNewsItem> {
        self.item
            .captures_iter(xml)
            .filter_map(|cap| {
                let body = cap.get(1)?.as_str();
                let headline = decode_entities(first_group(&self.title, body)?.trim());
                if headline.is_empty() {
                    return None;
                }

                let description = decode_entities(first_group(&self.description, body).unwrap_or(""));
                let stripped = self.tag.replace_all(&description, " ");
                let summary: String = self
                    .whitespace
                    .replace_all(&stripped, " ")
                    .trim()
                    .chars()
                    .take(SUMMARY_CHARS)
                    .collect();

                let url = first_group(&self.link, body).unwrap_or("").trim().to_string();
                let published_at = first_group(&self.pub_date, body)
                    .and_then(|d| DateTime::parse_from_rfc2822(d.trim()).ok())
                    .map(|d| d.with_timezone(&Utc))
                    .unwrap_or_else(Utc::now);

                Some(RawNewsItem {
                    headline,
                    summary,
                    url,
                    source: source.to_string(),
                    published_at,
                })
            })
            .collect()
    }
}

/// The first non-empty alternative group of a match.
fn first_group<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    let cap = re.captures(text)?;
    cap.iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str())
        .find(|s| !s.is_empty())
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

// ────────────────────────────────────────────────────────────────────────────
// RssNewsSource
// ────────────────────────────────────────────────────────────────────────────

pub struct RssNewsSource {
    client: Client,
    feeds: Vec<String>,
    parser: FeedParser,
}

impl RssNewsSource {
    pub fn new(feeds: Vec<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to build RSS HTTP client")?;
        Ok(Self {
            client,
            feeds,
            parser: FeedParser::new()?,
        })
    }

    async fn fetch_feed(&self, url: &str) -> Result<Vec<RawNewsItem>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let xml = response.text().await?;
        let source = reqwest::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| url.to_string());
        Ok(self.parser.parse(&xml, &source))
    }
}

#[async_trait]
impl NewsSource for RssNewsSource {
    async fn fetch_news(&self, days_back: i64) -> Result<Vec<RawNewsItem>> {
        let cutoff = Utc::now() - Duration::days(days_back);
        let mut all = Vec::new();

        for feed in &self.feeds {
            match self.fetch_feed(feed).await {
                Ok(items) => all.extend(items.into_iter().filter(|i| i.published_at >= cutoff)),
                Err(e) => warn!("RSS feed {feed} failed: {e}"),
            }
        }

        let total = all.len();
        let relevant: Vec<RawNewsItem> = all.into_iter().filter(is_relevant).collect();
        info!("Found {} relevant news items out of {total}", relevant.len());
        Ok(relevant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0"?>
<rss><channel>
<item>
  <title><![CDATA[Wärtsilä aloittaa yt-neuvottelut]]></title>
  <description><![CDATA[<p>Yhtiö   vähentää <b>200</b> työpaikkaa.</p>]]></description>
  <link>https://yle.fi/a/74-1</link>
  <pubDate>Mon, 02 Mar 2026 08:30:00 +0200</pubDate>
</item>
<item>
  <title>Sää &amp; liikenne</title>
  <description>Lunta tulee.</description>
  <link>https://yle.fi/a/74-2</link>
  <pubDate>not a date</pubDate>
</item>
<item>
  <description>No title here</description>
</item>
</channel></rss>"#;

    #[test]
    fn test_parse_cdata_and_plain_items() {
        let items = FeedParser::new().unwrap().parse(FEED, "feeds.yle.fi");
        assert_eq!(items.len(), 2);

        assert_eq!(items[0].headline, "Wärtsilä aloittaa yt-neuvottelut");
        assert_eq!(items[0].summary, "Yhtiö vähentää 200 työpaikkaa.");
        assert_eq!(items[0].url, "https://yle.fi/a/74-1");
        assert_eq!(items[0].published_at.to_rfc3339(), "2026-03-02T06:30:00+00:00");

        assert_eq!(items[1].headline, "Sää & liikenne");
        assert_eq!(items[1].source, "feeds.yle.fi");
    }

    #[test]
    fn test_relevance_filter() {
        let items = FeedParser::new().unwrap().parse(FEED, "yle");
        assert!(is_layoff_news(&items[0]));
        assert!(is_relevant(&items[0]));
        assert!(!is_relevant(&items[1]));
    }
}
