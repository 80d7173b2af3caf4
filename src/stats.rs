use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::store::{KeyValueStore, StoreError};
use crate::util::{format_thousands, mean, std_dev};

/// Key of the persisted stats blob
pub const STATS_KEY: &str = "ticketingPracticeStats";
/// Attempts kept in the rolling history
pub const HISTORY_LIMIT: usize = 20;
/// Attempts drawn in the trend chart
pub const CHART_WINDOW: usize = 10;

/// One confirmed booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    /// 1-based sequence number, never reused
    pub attempt: u64,
    pub reaction_time: u64,
    pub queue_position: u64,
    pub timestamp: DateTime<Utc>,
}

/// Everything persisted between runs.
///
/// The full reaction/queue lists feed the averages; `history` is the capped
/// window used for the chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionStats {
    pub attempt_count: u64,
    pub reaction_times: Vec<u64>,
    pub queue_positions: Vec<u64>,
    pub best_time: Option<u64>,
    pub history: VecDeque<Attempt>,
}

impl SessionStats {
    pub fn record(
        &mut self,
        reaction_time: u64,
        queue_position: u64,
        timestamp: DateTime<Utc>,
    ) -> Attempt {
        self.attempt_count += 1;
        self.reaction_times.push(reaction_time);
        self.queue_positions.push(queue_position);

        self.best_time = Some(match self.best_time {
            Some(best) => best.min(reaction_time),
            None => reaction_time,
        });

        let attempt = Attempt {
            attempt: self.attempt_count,
            reaction_time,
            queue_position,
            timestamp,
        };
        self.history.push_back(attempt.clone());
        self.trim_history();

        attempt
    }

    fn trim_history(&mut self) {
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
    }

    /// Bring a freshly loaded blob back within the history cap
    pub fn normalized(mut self) -> Self {
        self.trim_history();
        self
    }

    /// The last `n` history entries, oldest first
    pub fn recent(&self, n: usize) -> Vec<Attempt> {
        let skip = self.history.len().saturating_sub(n);
        self.history.iter().skip(skip).cloned().collect()
    }

    pub fn summary(&self) -> StatsSummary {
        let reactions: Vec<f64> = self.reaction_times.iter().map(|&t| t as f64).collect();
        let queues: Vec<f64> = self.queue_positions.iter().map(|&q| q as f64).collect();

        StatsSummary {
            attempts: self.attempt_count,
            best_ms: self.best_time,
            mean_reaction_ms: mean(&reactions),
            mean_queue_position: mean(&queues),
            reaction_std_dev: std_dev(&reactions),
        }
    }
}

/// Derived figures shown in the stats bar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatsSummary {
    pub attempts: u64,
    pub best_ms: Option<u64>,
    pub mean_reaction_ms: Option<f64>,
    pub mean_queue_position: Option<f64>,
    pub reaction_std_dev: Option<f64>,
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = |v: Option<f64>| match v {
            Some(v) => format!("{} ms", v.round()),
            None => "-".to_string(),
        };

        write!(f, "attempts: {}", self.attempts)?;
        write!(f, "   avg: {}", ms(self.mean_reaction_ms))?;
        write!(f, "   best: {}", ms(self.best_ms.map(|b| b as f64)))?;
        match self.mean_queue_position {
            Some(q) => write!(f, "   avg queue: {}", format_thousands(q.round() as u64))?,
            None => write!(f, "   avg queue: -")?,
        }
        if let Some(sd) = self.reaction_std_dev {
            write!(f, "   sd: {sd:.1} ms")?;
        }
        Ok(())
    }
}

/// Loads and saves [`SessionStats`] as one JSON blob in a key-value store
#[derive(Debug)]
pub struct StatsRepository {
    store: Box<dyn KeyValueStore>,
}

impl StatsRepository {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load saved stats, falling back to empty stats on any failure
    pub fn load(&self) -> SessionStats {
        match self.try_load() {
            Ok(stats) => stats,
            Err(e) => {
                log::error!("Failed to load saved stats: {e}");
                SessionStats::default()
            }
        }
    }

    pub fn try_load(&self) -> Result<SessionStats, StoreError> {
        match self.store.get(STATS_KEY)? {
            Some(raw) => Ok(serde_json::from_str::<SessionStats>(&raw)?.normalized()),
            None => Ok(SessionStats::default()),
        }
    }

    pub fn save(&mut self, stats: &SessionStats) -> Result<(), StoreError> {
        let blob = serde_json::to_string(stats)?;
        self.store.set(STATS_KEY, &blob)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.store.remove(STATS_KEY)
    }
}
