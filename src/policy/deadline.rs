//! Read/write deadlines for established connections.

use std::time::{Duration, Instant};

/// Read/write timeout applied to a connection right after it is established.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(5);

/// Produces the absolute instant after which a connection's reads and writes fail.
///
/// Evaluated once per physical connection, not once per logical request.
pub trait DeadlinePolicy: Send + Sync {
    fn deadline(&self) -> Instant;
}

impl<F> DeadlinePolicy for F
where
    F: Fn() -> Instant + Send + Sync,
{
    fn deadline(&self) -> Instant {
        self()
    }
}

/// Now plus [`DEFAULT_DEADLINE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultDeadline;

impl DeadlinePolicy for DefaultDeadline {
    fn deadline(&self) -> Instant {
        Instant::now() + DEFAULT_DEADLINE
    }
}

/// Now plus a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct IdleDeadline(pub Duration);

impl DeadlinePolicy for IdleDeadline {
    fn deadline(&self) -> Instant {
        Instant::now() + self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_deadline_is_five_seconds_out() {
        let before = Instant::now();
        let deadline = DefaultDeadline.deadline();
        assert!(deadline >= before + DEFAULT_DEADLINE);
        assert!(deadline <= Instant::now() + DEFAULT_DEADLINE);
    }

    #[test]
    fn deadline_is_evaluated_fresh_each_call() {
        let policy = IdleDeadline(Duration::from_millis(50));
        let first = policy.deadline();
        std::thread::sleep(Duration::from_millis(2));
        assert!(policy.deadline() > first);
    }

    #[test]
    fn closures_are_deadline_policies() {
        let fixed = Instant::now();
        let policy = move || fixed;
        assert_eq!(DeadlinePolicy::deadline(&policy), fixed);
    }
}
