pub mod ingest;
pub mod matcher;
pub mod types;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use types::SchemeRecord;

/// Categories always offered by the profile form, even before any page in
/// that category has been scraped.
pub const BASE_CATEGORIES: &[&str] = &[
    "Health",
    "Agriculture",
    "Education",
    "Social Justice",
    "Women & Child Development",
    "Rural Development",
    "Entrepreneurship",
];

/// States and union territories selectable on the profile form.
pub const REGIONS: &[&str] = &[
    "Andaman and Nicobar Islands",
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chandigarh",
    "Chhattisgarh",
    "Dadra and Nagar Haveli and Daman and Diu",
    "Delhi (National Capital Territory of Delhi)",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jammu and Kashmir",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Ladakh",
    "Lakshadweep",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Puducherry",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
];

/// Why the scheme file could not be used. Every variant leaves the app
/// running with an empty corpus.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("`{0}` not found. Run `scheme-scraper` first to generate it, or create a default one.")]
    NotFound(PathBuf),
    #[error("could not read `{path}`: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("`{path}` is not a JSON array of schemes: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Read and decode the scheme file.
///
/// Elements that don't decode as a [`SchemeRecord`] are skipped with a warning,
/// and placeholder records left behind by failed extractions are dropped.
pub fn load(path: &Path) -> Result<Vec<SchemeRecord>, StoreError> {
    let raw = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
        _ => StoreError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    parse(&raw).map_err(|reason| StoreError::Malformed {
        path: path.to_path_buf(),
        reason,
    })
}

fn parse(raw: &str) -> Result<Vec<SchemeRecord>, String> {
    let value: Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    let Value::Array(items) = value else {
        return Err("top-level value is not an array".to_string());
    };

    let mut records = Vec::with_capacity(items.len());
    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<SchemeRecord>(item) {
            Ok(record) if record.is_placeholder() => {
                debug!(idx, "skipping placeholder scheme");
            }
            Ok(record) => records.push(record),
            Err(e) => warn!(idx, "skipping undecodable scheme: {}", e),
        }
    }
    Ok(records)
}

/// Loaded corpus plus the reason it is empty, if loading failed.
#[derive(Debug, Default)]
pub struct Corpus {
    pub records: Vec<SchemeRecord>,
    pub unavailable: Option<String>,
}

/// Process-wide, read-only scheme corpus.
///
/// The file is read on first access and never again; picking up a new
/// `schemes.json` needs a restart.
pub struct SchemeStore {
    path: PathBuf,
    corpus: OnceLock<Corpus>,
}

impl SchemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            corpus: OnceLock::new(),
        }
    }

    /// Store over an already-built corpus. Nothing is read from disk.
    pub fn from_records(records: Vec<SchemeRecord>) -> Self {
        let corpus = OnceLock::new();
        let _ = corpus.set(Corpus {
            records: records.into_iter().filter(|r| !r.is_placeholder()).collect(),
            unavailable: None,
        });
        Self {
            path: PathBuf::new(),
            corpus,
        }
    }

    fn corpus(&self) -> &Corpus {
        self.corpus.get_or_init(|| match load(&self.path) {
            Ok(records) => {
                info!(path = ?self.path, count = records.len(), "scheme corpus loaded");
                Corpus {
                    records,
                    unavailable: None,
                }
            }
            Err(e) => {
                warn!("scheme data unavailable: {}", e);
                Corpus {
                    records: Vec::new(),
                    unavailable: Some(e.to_string()),
                }
            }
        })
    }

    pub fn schemes(&self) -> &[SchemeRecord] {
        &self.corpus().records
    }

    /// Warning to show when the backing file could not be loaded.
    pub fn unavailable(&self) -> Option<&str> {
        self.corpus().unavailable.as_deref()
    }

    /// Categories for the profile form: everything in the corpus plus the
    /// fixed base list, sorted and de-duplicated.
    pub fn categories(&self) -> Vec<String> {
        self.schemes()
            .iter()
            .filter_map(|s| s.category.as_deref())
            .chain(BASE_CATEGORIES.iter().copied())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
