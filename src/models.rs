use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Physical,
    Mental,
    Other,
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "physical" => Ok(Category::Physical),
            "mental" => Ok(Category::Mental),
            "other" => Ok(Category::Other),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

/// Either every goal or only the goals of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        value.parse().map(CategoryFilter::Only)
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One tracked metric. `current` may overshoot `target`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub current: f64,
    pub target: f64,
    pub unit: String,
    pub category: Category,
}

impl Goal {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        current: f64,
        target: f64,
        unit: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            current,
            target,
            unit: unit.into(),
            category,
        }
    }

    /// `current / target`, or 0 when the target is not positive.
    pub fn ratio(&self) -> f64 {
        if self.target > 0.0 && self.current.is_finite() {
            self.current / self.target
        } else {
            0.0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current >= self.target
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalStats {
    /// `None` when there are no goals to average over.
    pub average_progress: Option<f64>,
    pub completed_goals: usize,
    pub total_goals: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    pub progress: f64,
    pub remaining: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeProgress {
    pub percentage: f64,
    pub days_left: i64,
    pub days_elapsed: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    #[serde(default)]
    pub category: CategoryFilter,
}

#[derive(Debug, Deserialize)]
pub struct TextIngestRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SyncStatusResponse {
    pub syncing: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub goals: Vec<Goal>,
    pub stats: GoalStats,
    pub chart: Vec<ChartPoint>,
    pub time: TimeProgress,
}
