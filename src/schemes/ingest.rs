//! Offline scrape-and-extract pipeline that produces `schemes.json`.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;
use tracing::{info, warn};

use super::types::SchemeRecord;
use crate::agent::decision::strip_fences;
use crate::agent::prompts;
use crate::llm::TextModel;

/// Pages scraped on every run.
pub const TARGET_URLS: &[&str] = &[
    "https://www.india.gov.in/spotlight/ayushman-bharat-pradhan-mantri-jan-arogya-yojana",
    // PM-SVANidhi
    "https://pib.gov.in/PressReleasePage.aspx?PRID=1983842",
    // PM-Mudra Yojana
    "https://pib.gov.in/PressReleaseIframePage.aspx?PRID=1914233",
    // Lakhpati Didi
    "https://pib.gov.in/PressReleaseIframePage.aspx?PRID=1997395",
    // PM Fasal Bima Yojana
    "https://pib.gov.in/PressReleaseIframePage.aspx?PRID=1900133",
];

/// Pages with this much text or less are not worth a model call.
pub const MIN_PAGE_CHARS: usize = 100;

const NO_TITLE: &str = "No Title Found";
const BOILERPLATE_TAGS: &[&str] = &["script", "style", "nav", "footer", "header", "aside"];

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title\s*>").expect("static regex"));

static BOILERPLATE_RE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BOILERPLATE_TAGS
        .iter()
        .map(|tag| {
            Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).expect("static regex")
        })
        .collect()
});

/// Cleaned text of one fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub text: String,
}

/// Turn raw HTML into a [`Page`]: title, boilerplate removed, one text run per line.
pub fn parse_page(html: &str) -> Page {
    let title = TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let mut body = html.to_string();
    for re in BOILERPLATE_RE.iter() {
        body = re.replace_all(&body, "").into_owned();
    }

    let rendered = html2text::from_read(body.as_bytes(), 200).unwrap_or(body);
    let text = rendered
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Page { title, text }
}

/// Where pages come from. The scraper uses HTTP; tests substitute canned HTML.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("Mozilla/5.0")
            .timeout(Duration::from_secs(15))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page> {
        let body = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch URL")?
            .error_for_status()
            .context("Page returned an error status")?
            .text()
            .await
            .context("Failed to read response body")?;

        let page = parse_page(&body);
        info!(url, title = %page.title, len = page.text.len(), "page scraped");
        Ok(page)
    }
}

/// Ask the model for one scheme record describing `page`.
pub async fn extract_record(llm: &dyn TextModel, page: &Page, url: &str) -> Result<SchemeRecord> {
    let prompt = prompts::extraction_prompt(&page.title, url, &page.text);
    let raw = llm.generate(&prompt).await?;
    let mut record: SchemeRecord =
        serde_json::from_str(&strip_fences(&raw)).context("Could not parse AI response")?;
    record.official_link = Some(url.to_string());
    Ok(record)
}

/// Fetch and extract every URL in order, waiting `delay` before each fetch.
///
/// Per-URL failures are logged and skipped; nothing is written here.
pub async fn run(
    fetcher: &dyn PageFetcher,
    llm: &dyn TextModel,
    urls: &[&str],
    delay: Duration,
) -> Vec<SchemeRecord> {
    let mut extracted = Vec::new();

    for url in urls {
        info!(url, "processing page");
        tokio::time::sleep(delay).await;

        let page = match fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url, "scrape failed: {:#}", e);
                continue;
            }
        };

        if page.text.chars().count() <= MIN_PAGE_CHARS {
            warn!(url, "skipping AI extraction due to insufficient content");
            continue;
        }

        match extract_record(llm, &page, url).await {
            Ok(record) => {
                info!(url, scheme = %record.name, "scheme extracted");
                extracted.push(record);
            }
            Err(e) => warn!(url, "extraction failed: {:#}", e),
        }
    }

    extracted
}

/// Overwrite `path` with the pretty-printed records.
pub fn save(path: &Path, records: &[SchemeRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("serialize schemes")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Record count per category, for the end-of-run report.
pub fn summarize(records: &[SchemeRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        let category = record
            .category
            .clone()
            .unwrap_or_else(|| "(none)".to_string());
        *counts.entry(category).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const PAGE_HTML: &str = r#"<html><head><title>
        Ayushman Bharat | National Portal of India
    </title><style>body { color: red; }</style></head>
    <body>
      <header><a href="/">Home</a> Skip to main content</header>
      <nav><ul><li>Menu item</li></ul></nav>
      <h1>Ayushman Bharat PM-JAY</h1>
      <p>Health cover of Rs. 5 lakh per family per year for secondary and tertiary care hospitalization.</p>
      <script>trackVisitor();</script>
      <aside>Related links</aside>
      <footer>Copyright Government of India</footer>
    </body></html>"#;

    #[test]
    fn test_parse_page_strips_boilerplate() {
        let page = parse_page(PAGE_HTML);
        assert_eq!(page.title, "Ayushman Bharat | National Portal of India");
        assert!(page.text.contains("Ayushman Bharat PM-JAY"));
        assert!(page.text.contains("Health cover of Rs. 5 lakh"));
        for gone in ["Skip to main content", "Menu item", "trackVisitor", "Related links", "Copyright"] {
            assert!(!page.text.contains(gone), "left in: {gone}");
        }
        assert!(!page.text.contains("\n\n"));
    }

    #[test]
    fn test_parse_page_without_title() {
        let page = parse_page("<p>hello</p>");
        assert_eq!(page.title, "No Title Found");
    }

    struct CannedFetcher {
        pages: HashMap<&'static str, Page>,
    }

    #[async_trait]
    impl PageFetcher for CannedFetcher {
        async fn fetch(&self, url: &str) -> Result<Page> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("404 for {}", url))
        }
    }

    struct QueueModel(Mutex<Vec<String>>);

    #[async_trait]
    impl TextModel for QueueModel {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(self.0.lock().unwrap().remove(0))
        }
    }

    fn long_page(title: &str) -> Page {
        Page {
            title: title.to_string(),
            text: "Scheme details. ".repeat(20),
        }
    }

    #[tokio::test]
    async fn test_extract_record_sets_link() {
        let llm = QueueModel(Mutex::new(vec![
            "```json\n{\"scheme_name\": \"PM-SVANidhi\", \"category\": \"Entrepreneurship\", \"min_age\": 18}\n```".to_string(),
        ]));
        let record = extract_record(&llm, &long_page("PIB"), "https://pib.gov.in/x")
            .await
            .unwrap();
        assert_eq!(record.name, "PM-SVANidhi");
        assert_eq!(record.official_link.as_deref(), Some("https://pib.gov.in/x"));
    }

    #[tokio::test]
    async fn test_extract_record_accepts_list_fields() {
        let llm = QueueModel(Mutex::new(vec![
            r#"{"scheme_name": "PM SVANidhi", "documents_required": ["Aadhaar"], "description": 6000}"#
                .to_string(),
        ]));
        let record = extract_record(&llm, &long_page("PIB"), "https://pib.gov.in/y")
            .await
            .unwrap();
        assert_eq!(record.name, "PM SVANidhi");
        assert_eq!(record.documents_required.as_deref(), Some("Aadhaar"));
        assert_eq!(record.description.as_deref(), Some("6000"));
    }

    #[tokio::test]
    async fn test_run_skips_failures_and_short_pages() {
        let fetcher = CannedFetcher {
            pages: HashMap::from([
                ("https://a", long_page("A")),
                (
                    "https://short",
                    Page {
                        title: "Short".into(),
                        text: "tiny".into(),
                    },
                ),
                ("https://bad-json", long_page("B")),
                ("https://c", long_page("C")),
            ]),
        };
        let llm = QueueModel(Mutex::new(vec![
            r#"{"scheme_name": "Scheme A", "category": "Health"}"#.to_string(),
            "Sorry, I could not find a scheme on this page.".to_string(),
            r#"{"scheme_name": "Scheme C", "category": "Health"}"#.to_string(),
        ]));

        let records = run(
            &fetcher,
            &llm,
            &["https://a", "https://missing", "https://short", "https://bad-json", "https://c"],
            Duration::ZERO,
        )
        .await;

        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Scheme A", "Scheme C"]);
        assert_eq!(summarize(&records).get("Health"), Some(&2));
    }

    #[test]
    fn test_save_overwrites_with_array() {
        let path = std::env::temp_dir().join(format!("civic-agent-save-{}.json", std::process::id()));
        std::fs::write(&path, "[{\"scheme_name\": \"old\"}]").unwrap();

        save(&path, &[SchemeRecord::named("new")]).unwrap();
        let loaded = crate::schemes::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "new");
    }
}
