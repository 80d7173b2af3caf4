//! Mapping from reaction time to a simulated queue position.
//!
//! The breakpoints and the jitter are presentation tuning for the game, not a
//! calibrated model of real ticketing queues. They are kept exactly as they
//! are so positions stored in older stats stay comparable.

use rand::Rng;

/// Lowest jitter added on top of the base mapping (inclusive)
pub const JITTER_MIN: i64 = -50;
/// Highest jitter added on top of the base mapping (inclusive)
pub const JITTER_MAX: i64 = 49;

/// Piecewise-linear queue position for a reaction time, before jitter.
///
/// | reaction     | position      |
/// |--------------|---------------|
/// | < 200ms      | 1 ..= 199     |
/// | 200..500ms   | 200 ..= 698   |
/// | 500..1000ms  | 700 ..= 1498  |
/// | >= 1000ms    | 1500 + 1.5/ms |
pub fn base_queue_position(reaction_ms: u64) -> u64 {
    let t = reaction_ms as f64;

    let position = if reaction_ms < 200 {
        1.0 + (t / 200.0) * 199.0
    } else if reaction_ms < 500 {
        200.0 + ((t - 200.0) / 300.0) * 500.0
    } else if reaction_ms < 1000 {
        700.0 + ((t - 500.0) / 500.0) * 800.0
    } else {
        1500.0 + (t - 1000.0) * 1.5
    };

    position.floor() as u64
}

/// Add jitter to a base position, never going below first in line
pub fn apply_jitter(base: u64, jitter: i64) -> u64 {
    let base = i64::try_from(base).unwrap_or(i64::MAX);
    base.saturating_add(jitter).max(1) as u64
}

pub fn roll_jitter<R: Rng + ?Sized>(rng: &mut R) -> i64 {
    rng.gen_range(JITTER_MIN..=JITTER_MAX)
}

/// Final queue position shown to the player
pub fn queue_position<R: Rng + ?Sized>(reaction_ms: u64, rng: &mut R) -> u64 {
    apply_jitter(base_queue_position(reaction_ms), roll_jitter(rng))
}

/// Feedback tier for a finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Verdict {
    #[strum(to_string = "legendary")]
    Legendary,
    #[strum(to_string = "excellent")]
    Excellent,
    #[strum(to_string = "fast")]
    Fast,
    #[strum(to_string = "decent")]
    Decent,
    #[strum(to_string = "needs practice")]
    NeedsPractice,
    #[strum(to_string = "warming up")]
    WarmingUp,
}

impl Verdict {
    pub fn from_queue_position(position: u64) -> Self {
        match position {
            p if p < 200 => Verdict::Legendary,
            p if p < 700 => Verdict::Excellent,
            p if p < 1500 => Verdict::Fast,
            p if p < 3000 => Verdict::Decent,
            p if p < 5000 => Verdict::NeedsPractice,
            _ => Verdict::WarmingUp,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Legendary => "Incredible speed! You'd have a real shot at the live sale.",
            Verdict::Excellent => "Very fast! That is quick enough to land tickets.",
            Verdict::Fast => "Pretty quick! A little more practice and you're there.",
            Verdict::Decent => "Not bad! Repetition will make you faster.",
            Verdict::NeedsPractice => "Work on spotting the seat faster.",
            Verdict::WarmingUp => {
                "Take it slow and get a feel for it. Finding the seat quickly is what matters."
            }
        }
    }
}
