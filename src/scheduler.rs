//! Scheduled tasks driven by an explicit clock.
//!
//! Nothing here spawns threads or sleeps: the owner calls [`Scheduler::poll`]
//! from its event loop with the current instant and gets back the tasks that
//! came due.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared flag that stops a scheduled task from firing again
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
struct Scheduled<T> {
    id: u64,
    due: Instant,
    every: Option<Duration>,
    task: T,
    token: CancellationToken,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    next_id: u64,
    tasks: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            tasks: Vec::new(),
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `task` once, `delay` after `now`
    pub fn schedule_once(&mut self, now: Instant, delay: Duration, task: T) -> CancellationToken {
        self.push(now + delay, None, task)
    }

    /// Fire `task` every `interval`, starting one interval after `now`
    pub fn schedule_every(
        &mut self,
        now: Instant,
        interval: Duration,
        task: T,
    ) -> CancellationToken {
        let interval = interval.max(Duration::from_millis(1));
        self.push(now + interval, Some(interval), task)
    }

    fn push(&mut self, due: Instant, every: Option<Duration>, task: T) -> CancellationToken {
        let token = CancellationToken::new();
        self.tasks.push(Scheduled {
            id: self.next_id,
            due,
            every,
            task,
            token: token.clone(),
        });
        self.next_id += 1;
        token
    }

    /// Collect every task due at `now`, earliest first.
    ///
    /// A repeating task fires at most once per poll; intervals missed while
    /// the loop was busy are skipped rather than replayed.
    pub fn poll(&mut self, now: Instant) -> Vec<T> {
        self.tasks.retain(|s| !s.token.is_cancelled());

        let mut fired = Vec::new();
        let mut finished = Vec::new();

        for scheduled in self.tasks.iter_mut().filter(|s| s.due <= now) {
            fired.push((scheduled.due, scheduled.id, scheduled.task.clone()));

            match scheduled.every {
                Some(interval) => {
                    let behind = now.duration_since(scheduled.due).as_nanos();
                    let missed = (behind / interval.as_nanos()) as u32 + 1;
                    scheduled.due += interval * missed;
                }
                None => finished.push(scheduled.id),
            }
        }

        self.tasks.retain(|s| !finished.contains(&s.id));

        fired.sort_by_key(|(due, id, _)| (*due, *id));
        fired.into_iter().map(|(_, _, task)| task).collect()
    }

    /// Cancel and drop every pending task
    pub fn cancel_all(&mut self) {
        for scheduled in self.tasks.drain(..) {
            scheduled.token.cancel();
        }
    }

    /// Number of tasks that can still fire
    pub fn pending(&self) -> usize {
        self.tasks
            .iter()
            .filter(|s| !s.token.is_cancelled())
            .count()
    }
}
