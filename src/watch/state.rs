//! Poll state definitions for post count tracking
//!
//! The first successful observation only records a baseline, so a freshly
//! started watcher never reports posts that existed before it started.

use std::fmt;

/// Represents where a detector is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// No post count observed yet
    Uninitialized,

    /// Baseline recorded; increases over it are reported
    Tracking {
        /// Highest post count observed so far
        last_known_posts: u64,
    },

    /// Stopped by its owner; no further polls
    Stopped {
        /// Baseline at the time of stopping, if one was recorded
        last_known_posts: Option<u64>,
    },
}

/// What a single poll concluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing usable was observed (fetch failed, count unreadable, or stopped)
    Skipped,

    /// First observation, recorded as the baseline
    Baseline(u64),

    /// Count did not exceed the baseline
    Unchanged { last_known: u64, observed: u64 },

    /// Count went up
    Increased { from: u64, to: u64 },
}

impl TickOutcome {
    /// Returns true if this tick should notify about a new post
    pub fn is_new_post(&self) -> bool {
        matches!(self, Self::Increased { .. })
    }
}

impl PollState {
    /// The current baseline, if any
    pub fn last_known_posts(&self) -> Option<u64> {
        match self {
            Self::Uninitialized => None,
            Self::Tracking { last_known_posts } => Some(*last_known_posts),
            Self::Stopped { last_known_posts } => *last_known_posts,
        }
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self, Self::Tracking { .. })
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped { .. })
    }

    /// Applies one observation and reports the transition
    ///
    /// `None` means the poll produced no usable count; it never touches the
    /// baseline. The baseline only moves up: a lower count (deleted posts) is
    /// reported as unchanged and the next report waits for a count above the
    /// highest one seen.
    pub fn observe(&mut self, observed: Option<u64>) -> TickOutcome {
        let Some(observed) = observed else {
            return TickOutcome::Skipped;
        };

        match *self {
            Self::Uninitialized => {
                *self = Self::Tracking {
                    last_known_posts: observed,
                };
                TickOutcome::Baseline(observed)
            }
            Self::Tracking { last_known_posts } if observed > last_known_posts => {
                *self = Self::Tracking {
                    last_known_posts: observed,
                };
                TickOutcome::Increased {
                    from: last_known_posts,
                    to: observed,
                }
            }
            Self::Tracking { last_known_posts } => TickOutcome::Unchanged {
                last_known: last_known_posts,
                observed,
            },
            Self::Stopped { .. } => TickOutcome::Skipped,
        }
    }

    /// Moves to `Stopped`, keeping the baseline for inspection
    pub fn stop(&mut self) {
        *self = Self::Stopped {
            last_known_posts: self.last_known_posts(),
        };
    }
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Tracking { last_known_posts } => write!(f, "tracking ({} posts)", last_known_posts),
            Self::Stopped { .. } => write!(f, "stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_is_baseline() {
        let mut state = PollState::Uninitialized;
        assert_eq!(state.observe(Some(500)), TickOutcome::Baseline(500));
        assert_eq!(state, PollState::Tracking { last_known_posts: 500 });
    }

    #[test]
    fn test_failures_before_baseline_keep_uninitialized() {
        let mut state = PollState::Uninitialized;
        assert_eq!(state.observe(None), TickOutcome::Skipped);
        assert_eq!(state, PollState::Uninitialized);
    }

    #[test]
    fn test_tracking_transitions() {
        let mut state = PollState::Tracking { last_known_posts: 500 };

        assert_eq!(
            state.observe(Some(500)),
            TickOutcome::Unchanged {
                last_known: 500,
                observed: 500
            }
        );
        assert_eq!(state.last_known_posts(), Some(500));

        let outcome = state.observe(Some(501));
        assert_eq!(outcome, TickOutcome::Increased { from: 500, to: 501 });
        assert!(outcome.is_new_post());
        assert_eq!(state.last_known_posts(), Some(501));

        assert_eq!(state.observe(None), TickOutcome::Skipped);
        assert_eq!(state.last_known_posts(), Some(501));
    }

    #[test]
    fn test_lower_count_keeps_baseline() {
        let mut state = PollState::Tracking { last_known_posts: 501 };
        assert!(!state.observe(Some(499)).is_new_post());
        assert_eq!(state.last_known_posts(), Some(501));
        assert!(!state.observe(Some(501)).is_new_post());
        assert!(state.observe(Some(502)).is_new_post());
    }

    #[test]
    fn test_stopped_ignores_observations() {
        let mut state = PollState::Tracking { last_known_posts: 7 };
        state.stop();
        assert!(state.is_stopped());
        assert_eq!(state.observe(Some(100)), TickOutcome::Skipped);
        assert_eq!(state.last_known_posts(), Some(7));
    }
}
