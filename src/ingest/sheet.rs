use crate::config::SheetConfig;
use crate::errors::IngestError;
use crate::models::{Category, Goal};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

pub const DEFAULT_TARGET: f64 = 100.0;
pub const DEFAULT_UNIT: &str = "units";

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Reads a fixed cell range from the spreadsheet values endpoint.
pub struct SheetsClient {
    client: Client,
    config: SheetConfig,
}

impl SheetsClient {
    pub fn new(config: SheetConfig) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| IngestError::Network(err.to_string()))?;

        Ok(Self { client, config })
    }

    pub async fn fetch_rows(&self) -> Result<Vec<Vec<Value>>, IngestError> {
        let (spreadsheet_id, api_key) = self.config.credentials()?;
        let url = self.range_url(spreadsheet_id)?;

        let response = self
            .client
            .get(url)
            .query(&[("key", api_key)])
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|err| {
                debug!("failed to read error body: {err}");
                String::new()
            });
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|parsed| parsed.error.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("unexpected status")
                        .to_string()
                });
            return Err(IngestError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let range: ValueRange = response.json().await.map_err(|err| {
            if err.is_timeout() {
                IngestError::Timeout(self.config.timeout.as_secs())
            } else {
                IngestError::Malformed(err.to_string())
            }
        })?;
        Ok(range.values)
    }

    pub async fn fetch_goals(&self) -> Result<Vec<Goal>, IngestError> {
        let rows = self.fetch_rows().await?;
        rows_to_goals(&rows)
    }

    /// `{base}/{id}/values/{range}` with each part encoded as one path segment.
    fn range_url(&self, spreadsheet_id: &str) -> Result<Url, IngestError> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|err| IngestError::Network(format!("invalid base url: {err}")))?;
        url.path_segments_mut()
            .map_err(|_| IngestError::Network(format!("invalid base url: {}", self.config.base_url)))?
            .pop_if_empty()
            .push(spreadsheet_id)
            .push("values")
            .push(&self.config.range);
        Ok(url)
    }

    fn transport_error(&self, err: reqwest::Error) -> IngestError {
        if err.is_timeout() {
            IngestError::Timeout(self.config.timeout.as_secs())
        } else {
            IngestError::Network(err.to_string())
        }
    }
}

/// Converts `[name, current, target, unit, category]` rows into a goal list.
///
/// Rows without a name are skipped; a batch with no usable row is `EmptyResult`.
pub fn rows_to_goals(rows: &[Vec<Value>]) -> Result<Vec<Goal>, IngestError> {
    let goals: Vec<Goal> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            let goal = row_to_goal(index, row);
            if goal.is_none() {
                debug!(index, "skipping sheet row without a name");
            }
            goal
        })
        .collect();

    if goals.is_empty() {
        return Err(IngestError::EmptyResult);
    }
    Ok(goals)
}

fn row_to_goal(index: usize, row: &[Value]) -> Option<Goal> {
    let name = cell_text(row.first())?;

    let category = cell_text(row.get(4))
        .and_then(|value| value.parse::<Category>().ok())
        .unwrap_or(Category::Physical);

    Some(Goal {
        id: format!("sheet-{index}-{}", slugify(&name)),
        current: cell_number(row.get(1)).unwrap_or(0.0),
        target: cell_number(row.get(2)).unwrap_or(DEFAULT_TARGET),
        unit: cell_text(row.get(3)).unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        category,
        name,
    })
}

/// Trimmed text of a cell; `None` when absent or blank.
fn cell_text(cell: Option<&Value>) -> Option<String> {
    let text = match cell? {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn cell_number(cell: Option<&Value>) -> Option<f64> {
    let value = match cell? {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().replace(',', "").parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn slugify(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}
