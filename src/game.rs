use chrono::Utc;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::queue::{queue_position, Verdict};
use crate::round::{Round, Selection};
use crate::scheduler::Scheduler;
use crate::stats::{Attempt, SessionStats, StatsRepository, StatsSummary, CHART_WINDOW};
use crate::trend::TrendChart;
use crate::util::{encode_query_value, format_thousands};

/// Timers the game schedules while waiting for the sale to open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTask {
    Countdown,
    Reveal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaitState {
    pub started_at: Instant,
    pub delay: Duration,
    pub elapsed: Duration,
}

impl WaitState {
    /// Elapsed wait as `SS:CC` (seconds, centiseconds)
    pub fn countdown_label(&self) -> String {
        let ms = self.elapsed.as_millis();
        format!("{:02}:{:02}", ms / 1000, (ms % 1000) / 10)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub attempt: Attempt,
    pub seat: u32,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Waiting(WaitState),
    Ticketing(Round),
    Result(RoundResult),
}

/// Owns the whole session: current phase, timers, stats and their storage
#[derive(Debug)]
pub struct Game {
    config: Config,
    phase: Phase,
    stats: SessionStats,
    repository: StatsRepository,
    scheduler: Scheduler<TimerTask>,
    rng: StdRng,
}

impl Game {
    /// Load saved stats and start the first wait
    pub fn new(
        config: Config,
        repository: StatsRepository,
        seed: Option<u64>,
        now: Instant,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let stats = repository.load();
        log::info!("loaded stats with {} previous attempts", stats.attempt_count);

        let mut game = Self {
            config: config.sanitized(),
            phase: Phase::Waiting(WaitState {
                started_at: now,
                delay: Duration::ZERO,
                elapsed: Duration::ZERO,
            }),
            stats,
            repository,
            scheduler: Scheduler::new(),
            rng,
        };
        game.start_round(now);
        game
    }

    /// Begin a new wait: pick the delay and arm the countdown and reveal timers
    pub fn start_round(&mut self, now: Instant) {
        self.scheduler.cancel_all();

        let delay = Duration::from_millis(
            self.rng
                .gen_range(self.config.min_wait_ms..=self.config.max_wait_ms),
        );
        self.scheduler.schedule_every(
            now,
            Duration::from_millis(self.config.tick_ms),
            TimerTask::Countdown,
        );
        self.scheduler.schedule_once(now, delay, TimerTask::Reveal);

        log::debug!("waiting {} ms before the sale opens", delay.as_millis());
        self.phase = Phase::Waiting(WaitState {
            started_at: now,
            delay,
            elapsed: Duration::ZERO,
        });
    }

    /// Run due timers. Returns true when something visible changed.
    pub fn on_tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        for task in self.scheduler.poll(now) {
            match task {
                TimerTask::Countdown => {
                    if let Phase::Waiting(wait) = &mut self.phase {
                        wait.elapsed = now.saturating_duration_since(wait.started_at).min(wait.delay);
                        changed = true;
                    }
                }
                TimerTask::Reveal => {
                    self.scheduler.cancel_all();
                    self.reveal(now);
                    changed = true;
                }
            }
        }

        changed
    }

    fn reveal(&mut self, now: Instant) {
        let round = Round::generate(&mut self.rng, self.config.total_seats, now);
        log::debug!(
            "sale open: target seat {}, {} seats available",
            round.target,
            round.available.len()
        );
        self.phase = Phase::Ticketing(round);
    }

    pub fn select_seat(&mut self, seat: u32) -> Selection {
        match &mut self.phase {
            Phase::Ticketing(round) => round.select(seat),
            _ => Selection::Ignored,
        }
    }

    /// Confirm the booking. Only succeeds with the target seat selected.
    pub fn reserve(&mut self, now: Instant) -> Option<RoundResult> {
        let Phase::Ticketing(round) = &self.phase else {
            return None;
        };
        let reaction_ms = round.reserve(now)?;
        let seat = round.target;

        let position = queue_position(reaction_ms, &mut self.rng);
        let attempt = self.stats.record(reaction_ms, position, Utc::now());
        log::info!(
            "attempt #{}: seat {seat} in {reaction_ms} ms, queue position {position}",
            attempt.attempt
        );
        self.persist();

        let result = RoundResult {
            attempt,
            seat,
            verdict: Verdict::from_queue_position(position),
        };
        self.phase = Phase::Result(result.clone());
        Some(result)
    }

    fn persist(&mut self) {
        if let Err(e) = self.repository.save(&self.stats) {
            log::warn!("Failed to save stats: {e}");
        }
    }

    /// Forget every attempt, in memory and on disk
    pub fn reset_stats(&mut self) {
        self.stats = SessionStats::default();
        match self.repository.clear() {
            Ok(()) => log::info!("statistics cleared"),
            Err(e) => log::warn!("Failed to clear saved stats: {e}"),
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn repository(&self) -> &StatsRepository {
        &self.repository
    }

    pub fn summary(&self) -> StatsSummary {
        self.stats.summary()
    }

    pub fn trend(&self) -> TrendChart {
        TrendChart::build(&self.stats.recent(CHART_WINDOW))
    }

    /// Tweet intent for the last result, if a round just finished
    pub fn share_url(&self) -> Option<String> {
        let Phase::Result(result) = &self.phase else {
            return None;
        };
        let text = format!(
            "Grabbed seat {} in {} ms and landed queue position #{} on ticket-rush. Can you beat it?",
            result.seat,
            result.attempt.reaction_time,
            format_thousands(result.attempt.queue_position)
        );
        Some(format!(
            "https://twitter.com/intent/tweet?text={}",
            encode_query_value(&text)
        ))
    }
}
