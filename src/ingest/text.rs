use crate::errors::IngestError;
use crate::models::Goal;
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Float,
}

/// Maps a label found in a status line to the goal whose `current` it sets.
///
/// The pattern runs against the text after the anchor. Capture group 1 is the
/// new current value; an optional group 2 holds the target as written in the
/// update and is not applied.
#[derive(Debug)]
pub struct AnchorRule {
    pub anchor: &'static str,
    pub goal_id: &'static str,
    pub pattern: &'static str,
    pub kind: NumericKind,
}

const INTEGER_PAIR: &str = r"(\d[\d,]*)(?:\s*/\s*(\d[\d,]*))?";
const FLOAT_PAIR: &str = r"(\d[\d,]*(?:\.\d+)?)(?:\s*/\s*(\d[\d,]*(?:\.\d+)?))?";
// "120.5km 500" and "120.5 km / 500 km" both read as 120.5 of 500.
const KILOMETRE_PAIR: &str =
    r"(\d[\d,]*(?:\.\d+)?)(?:\s*(?:km\s*/?|/)\s*(\d[\d,]*(?:\.\d+)?))?";

/// Checked in order; the first anchor found in a line wins.
pub static ANCHOR_RULES: &[AnchorRule] = &[
    AnchorRule { anchor: "Running (1 Mile)", goal_id: "running", pattern: INTEGER_PAIR, kind: NumericKind::Integer },
    AnchorRule { anchor: "Push-ups", goal_id: "pushups", pattern: INTEGER_PAIR, kind: NumericKind::Integer },
    AnchorRule { anchor: "Cycling", goal_id: "cycling", pattern: KILOMETRE_PAIR, kind: NumericKind::Float },
    AnchorRule { anchor: "Weight Loss", goal_id: "weight", pattern: FLOAT_PAIR, kind: NumericKind::Float },
    AnchorRule { anchor: "Books Read", goal_id: "books", pattern: INTEGER_PAIR, kind: NumericKind::Integer },
    AnchorRule { anchor: "Meditation", goal_id: "meditation", pattern: INTEGER_PAIR, kind: NumericKind::Integer },
    AnchorRule { anchor: "Language Streak", goal_id: "language", pattern: INTEGER_PAIR, kind: NumericKind::Integer },
    AnchorRule { anchor: "Savings", goal_id: "savings", pattern: FLOAT_PAIR, kind: NumericKind::Float },
    AnchorRule { anchor: "Volunteer Hours", goal_id: "volunteering", pattern: FLOAT_PAIR, kind: NumericKind::Float },
    AnchorRule { anchor: "New Places Visited", goal_id: "places", pattern: INTEGER_PAIR, kind: NumericKind::Integer },
];

struct CompiledRule {
    rule: &'static AnchorRule,
    regex: Regex,
}

static COMPILED_RULES: OnceLock<Result<Vec<CompiledRule>, String>> = OnceLock::new();

fn compiled_rules() -> Result<&'static [CompiledRule], IngestError> {
    COMPILED_RULES
        .get_or_init(|| {
            ANCHOR_RULES
                .iter()
                .map(|rule| {
                    Regex::new(rule.pattern)
                        .map(|regex| CompiledRule { rule, regex })
                        .map_err(|err| format!("pattern for '{}': {err}", rule.anchor))
                })
                .collect()
        })
        .as_ref()
        .map(Vec::as_slice)
        .map_err(|err| IngestError::ParseFailure(err.clone()))
}

/// Applies a pasted status update to a copy of `goals`.
///
/// Only `current` of goals named by a matching line changes. Lines without a
/// known anchor, or whose numbers don't match the rule, are skipped.
pub fn apply_status_update(goals: &[Goal], text: &str) -> Result<Vec<Goal>, IngestError> {
    let rules = compiled_rules()?;
    let mut updated = goals.to_vec();

    for line in text.lines() {
        let Some((compiled, rest)) = rules.iter().find_map(|compiled| {
            line.find(compiled.rule.anchor)
                .map(|pos| (compiled, &line[pos + compiled.rule.anchor.len()..]))
        }) else {
            continue;
        };

        let Some(value) = compiled
            .regex
            .captures(rest)
            .and_then(|captures| captures.get(1))
        else {
            debug!(anchor = compiled.rule.anchor, "no numbers after anchor, skipping line");
            continue;
        };

        let current = parse_number(value.as_str(), compiled.rule.kind)?;
        match updated.iter_mut().find(|goal| goal.id == compiled.rule.goal_id) {
            Some(goal) => goal.current = current,
            None => debug!(goal_id = compiled.rule.goal_id, "goal not in current list"),
        }
    }

    Ok(updated)
}

fn parse_number(raw: &str, kind: NumericKind) -> Result<f64, IngestError> {
    let cleaned = raw.replace(',', "");
    match kind {
        NumericKind::Integer => cleaned
            .parse::<i64>()
            .map(|value| value as f64)
            .map_err(|err| IngestError::ParseFailure(format!("'{raw}': {err}"))),
        NumericKind::Float => cleaned
            .parse::<f64>()
            .map_err(|err| IngestError::ParseFailure(format!("'{raw}': {err}"))),
    }
}
