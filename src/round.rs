use std::time::Instant;

use rand::Rng;

use crate::util::time_diff_ms;

pub const DEFAULT_TOTAL_SEATS: u32 = 150;
/// Smallest available set, target included
pub const MIN_AVAILABLE: usize = 8;
/// Largest available set, target included
pub const MAX_AVAILABLE: usize = 15;

/// What happened when the player picked a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Correct(u32),
    Wrong(u32),
    Deselected(u32),
    /// Taken or out-of-range seats cannot be picked
    Ignored,
}

/// One ticketing round: the seat to grab and the seats still open
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub target: u32,
    /// Open seats in draw order, the target first
    pub available: Vec<u32>,
    pub selected: Option<u32>,
    pub started_at: Instant,
}

impl Round {
    /// Draw a target uniformly from `1..=total_seats`, then add distinct
    /// random seats until 8 to 15 seats are open.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, total_seats: u32, started_at: Instant) -> Self {
        let total_seats = total_seats.max(1);
        let target = rng.gen_range(1..=total_seats);
        let wanted = rng
            .gen_range(MIN_AVAILABLE..=MAX_AVAILABLE)
            .min(total_seats as usize);

        let mut available = Vec::with_capacity(wanted);
        available.push(target);
        while available.len() < wanted {
            let seat = rng.gen_range(1..=total_seats);
            if !available.contains(&seat) {
                available.push(seat);
            }
        }

        Self {
            target,
            available,
            selected: None,
            started_at,
        }
    }

    pub fn is_available(&self, seat: u32) -> bool {
        self.available.contains(&seat)
    }

    pub fn select(&mut self, seat: u32) -> Selection {
        if !self.is_available(seat) {
            return Selection::Ignored;
        }

        if self.selected == Some(seat) {
            self.selected = None;
            return Selection::Deselected(seat);
        }

        self.selected = Some(seat);
        if seat == self.target {
            Selection::Correct(seat)
        } else {
            Selection::Wrong(seat)
        }
    }

    pub fn can_reserve(&self) -> bool {
        self.selected == Some(self.target)
    }

    /// Reaction time in ms from the grid appearing to the confirmed booking
    pub fn reserve(&self, now: Instant) -> Option<u64> {
        self.can_reserve()
            .then(|| time_diff_ms(self.started_at, now))
    }
}
