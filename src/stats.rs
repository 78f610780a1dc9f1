use crate::models::{CategoryFilter, ChartPoint, Goal, GoalStats, OverviewResponse, TimeProgress};
use crate::seed::TimeWindow;
use chrono::{DateTime, Duration, Utc};

const SECONDS_PER_DAY: f64 = 86_400.0;

pub fn compute_stats(goals: &[Goal]) -> GoalStats {
    let total_goals = goals.len();
    let completed_goals = goals.iter().filter(|goal| goal.is_complete()).count();
    let average_progress = if total_goals == 0 {
        None
    } else {
        let sum: f64 = goals.iter().map(Goal::ratio).sum();
        Some(sum / total_goals as f64 * 100.0)
    };

    GoalStats {
        average_progress,
        completed_goals,
        total_goals,
    }
}

/// Progress bars clamp to 100 even when a goal overshoots.
pub fn compute_chart_data(goals: &[Goal]) -> Vec<ChartPoint> {
    goals
        .iter()
        .map(|goal| {
            let progress = (goal.ratio() * 100.0).clamp(0.0, 100.0);
            ChartPoint {
                name: goal.name.clone(),
                progress,
                remaining: (100.0 - progress).max(0.0),
            }
        })
        .collect()
}

pub fn filter_by_category(goals: &[Goal], filter: CategoryFilter) -> Vec<Goal> {
    match filter {
        CategoryFilter::All => goals.to_vec(),
        CategoryFilter::Only(category) => goals
            .iter()
            .filter(|goal| goal.category == category)
            .cloned()
            .collect(),
    }
}

pub fn compute_time_progress(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> TimeProgress {
    let span = seconds(end - start);
    let percentage = if span <= 0.0 {
        if now >= end { 100.0 } else { 0.0 }
    } else {
        (seconds(now - start) / span * 100.0).clamp(0.0, 100.0)
    };

    TimeProgress {
        percentage,
        days_left: (seconds(end - now) / SECONDS_PER_DAY).ceil().max(0.0) as i64,
        days_elapsed: (seconds(now - start) / SECONDS_PER_DAY).floor().max(0.0) as i64,
    }
}

pub fn build_overview(goals: &[Goal], window: TimeWindow) -> OverviewResponse {
    build_overview_at(goals, window, Utc::now())
}

pub fn build_overview_at(goals: &[Goal], window: TimeWindow, now: DateTime<Utc>) -> OverviewResponse {
    OverviewResponse {
        goals: goals.to_vec(),
        stats: compute_stats(goals),
        chart: compute_chart_data(goals),
        time: compute_time_progress(window.start, window.end, now),
    }
}

fn seconds(duration: Duration) -> f64 {
    duration.num_milliseconds() as f64 / 1000.0
}
