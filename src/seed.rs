use crate::models::{Category, Goal};
use chrono::{DateTime, Utc};

pub const CHALLENGE_START: &str = "2025-11-01T00:00:00Z";
pub const CHALLENGE_END: &str = "2026-11-01T00:00:00Z";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn parse(start: &str, end: &str) -> Result<Self, chrono::ParseError> {
        Ok(Self {
            start: DateTime::parse_from_rfc3339(start)?.with_timezone(&Utc),
            end: DateTime::parse_from_rfc3339(end)?.with_timezone(&Utc),
        })
    }

    /// The fixed twelve months leading up to the fiftieth birthday.
    pub fn challenge() -> Result<Self, chrono::ParseError> {
        Self::parse(CHALLENGE_START, CHALLENGE_END)
    }
}

pub fn seed_goals() -> Vec<Goal> {
    vec![
        Goal::new("running", "Running (1 Mile)", 0.0, 51.0, "Runs", Category::Physical),
        Goal::new("pushups", "Push-ups", 0.0, 5000.0, "Reps", Category::Physical),
        Goal::new("cycling", "Cycling", 0.0, 500.0, "km", Category::Physical),
        Goal::new("weight", "Weight Loss", 0.0, 10.0, "kg", Category::Physical),
        Goal::new("books", "Books Read", 0.0, 50.0, "Books", Category::Mental),
        Goal::new("meditation", "Meditation", 0.0, 3000.0, "Minutes", Category::Mental),
        Goal::new("language", "Language Streak", 0.0, 365.0, "Days", Category::Mental),
        Goal::new("savings", "Savings", 0.0, 50000.0, "USD", Category::Other),
        Goal::new("volunteering", "Volunteer Hours", 0.0, 50.0, "Hours", Category::Other),
        Goal::new("places", "New Places Visited", 0.0, 50.0, "Places", Category::Other),
    ]
}
