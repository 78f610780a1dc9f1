use crate::errors::IngestError;
use std::env;
use std::time::Duration;

/// Upper bound for one sheet range read.
pub const SYNC_TIMEOUT: Duration = Duration::from_secs(15);

pub const DEFAULT_RANGE: &str = "Sheet1!A2:E100";
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Clone)]
pub struct SheetConfig {
    pub spreadsheet_id: Option<String>,
    pub api_key: Option<String>,
    pub range: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            api_key: None,
            range: DEFAULT_RANGE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: SYNC_TIMEOUT,
        }
    }
}

impl SheetConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            spreadsheet_id: read("SHEETS_SPREADSHEET_ID"),
            api_key: read("SHEETS_API_KEY"),
            range: read("SHEETS_RANGE").unwrap_or(defaults.range),
            base_url: read("SHEETS_BASE_URL").unwrap_or(defaults.base_url),
            timeout: defaults.timeout,
        }
    }

    /// The spreadsheet id and API key, or which one is missing.
    pub fn credentials(&self) -> Result<(&str, &str), IngestError> {
        let id = self
            .spreadsheet_id
            .as_deref()
            .ok_or(IngestError::ConfigMissing("SHEETS_SPREADSHEET_ID"))?;
        let key = self
            .api_key
            .as_deref()
            .ok_or(IngestError::ConfigMissing("SHEETS_API_KEY"))?;
        Ok((id, key))
    }
}
