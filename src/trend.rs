//! Chart model for the recent-attempts trend.
//!
//! Both series are normalized to `0.0..=1.0` against their own maximum.
//! Queue positions are inverted (`1 - q/max`) because a lower position is
//! the better result.

use crate::stats::{Attempt, CHART_WINDOW};

/// Horizontal guides drawn across the plot
pub const GRIDLINES: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendChart {
    pub reaction: Vec<(f64, f64)>,
    pub queue: Vec<(f64, f64)>,
    pub max_reaction_ms: u64,
    pub max_queue_position: u64,
    pub x_labels: Vec<(f64, String)>,
}

impl TrendChart {
    /// Build the chart over the last [`CHART_WINDOW`] attempts of `history`
    pub fn build(history: &[Attempt]) -> Self {
        let start = history.len().saturating_sub(CHART_WINDOW);
        let recent = &history[start..];
        if recent.is_empty() {
            return Self::default();
        }

        let max_reaction_ms = recent.iter().map(|a| a.reaction_time).max().unwrap_or(0);
        let max_queue_position = recent.iter().map(|a| a.queue_position).max().unwrap_or(0);
        let label_every_point = recent.len() <= 5;

        let mut chart = Self {
            max_reaction_ms,
            max_queue_position,
            ..Self::default()
        };

        for (index, attempt) in recent.iter().enumerate() {
            let x = index as f64;
            let reaction = normalize(attempt.reaction_time, max_reaction_ms);
            let queue = 1.0 - normalize(attempt.queue_position, max_queue_position);

            chart.reaction.push((x, reaction));
            chart.queue.push((x, queue));

            if label_every_point || index % 2 == 0 {
                chart.x_labels.push((x, format!("#{}", attempt.attempt)));
            }
        }

        chart
    }

    pub fn is_empty(&self) -> bool {
        self.reaction.is_empty()
    }

    /// Right edge of the x axis; a single point still gets a unit-wide plot
    pub fn x_max(&self) -> f64 {
        (self.reaction.len().saturating_sub(1)).max(1) as f64
    }

    /// Bottom and top labels for the reaction-time axis
    pub fn y_labels(&self) -> [String; 2] {
        ["0ms".to_string(), format!("{}ms", self.max_reaction_ms)]
    }

    /// Gridline segments spanning the x axis
    pub fn gridline_segments(&self) -> Vec<[(f64, f64); 2]> {
        let right = self.x_max();
        GRIDLINES.iter().map(|&y| [(0.0, y), (right, y)]).collect()
    }
}

fn normalize(value: u64, max: u64) -> f64 {
    if max == 0 {
        0.0
    } else {
        value as f64 / max as f64
    }
}
