//! Change detector - polls a profile and reports new posts
//!
//! Each detector runs in its own task. A tick fetches the profile, feeds the
//! post count into the [`PollState`] machine and, on an increase, awaits the
//! callback before the next tick may start. Ticks never overlap: a tick that
//! overruns the interval delays the following one.

use crate::forum::ForumClient;
use crate::watch::state::{PollState, TickOutcome};
use crate::{ConfigError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use url::Url;

/// Watches the post count of one forum user
#[derive(Debug)]
pub struct ChangeDetector {
    client: ForumClient,
    user_id: String,
    profile_url: Url,
    interval: Duration,
    state: PollState,
}

impl ChangeDetector {
    /// Creates a detector in the `Uninitialized` state
    ///
    /// Each tick costs one to three fetches (see
    /// [`ForumClient::fetch_user_profile`]); pick `interval` accordingly.
    pub fn new(client: ForumClient, user_id: &str, interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(ConfigError::Validation("poll interval must be positive".to_string()).into());
        }
        let profile_url = client.profile_url(user_id)?;

        Ok(Self {
            client,
            user_id: user_id.to_string(),
            profile_url,
            interval,
            state: PollState::Uninitialized,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    /// Runs one poll: fetch the profile and apply its post count
    ///
    /// Never fails; fetch and parse errors are logged and the tick is skipped
    /// with the baseline untouched.
    pub async fn tick(&mut self) -> TickOutcome {
        if self.state.is_stopped() {
            return TickOutcome::Skipped;
        }

        tracing::debug!("Checking profile page of user {}", self.user_id);

        let observed = match self.client.fetch_user_profile(self.profile_url.as_str()).await {
            Ok(snapshot) => {
                if snapshot.total_posts.is_none() {
                    tracing::warn!(
                        "Post count of user {} unreadable, skipping tick",
                        self.user_id
                    );
                }
                snapshot.total_posts
            }
            Err(e) => {
                tracing::warn!("Failed to poll profile of user {}: {}", self.user_id, e);
                None
            }
        };

        let outcome = self.state.observe(observed);
        match outcome {
            TickOutcome::Baseline(posts) => {
                tracing::info!("User {} baseline: {} posts", self.user_id, posts);
            }
            TickOutcome::Increased { from, to } => {
                tracing::info!("User {} posted: {} -> {} posts", self.user_id, from, to);
            }
            TickOutcome::Unchanged { .. } | TickOutcome::Skipped => {}
        }
        outcome
    }

    /// Moves the detector into its own task, calling `on_new_post` on every increase
    ///
    /// The first tick fires one interval after spawning.
    pub fn spawn<F, Fut>(mut self, mut on_new_post: F) -> PollHandle
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let user_id = self.user_id.clone();

        // Scheduled here so the first deadline does not depend on when the task is first polled.
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let task = tokio::spawn(async move {
            tracing::info!(
                "Polling user {} every {}s",
                self.user_id,
                self.interval.as_secs_f64()
            );

            loop {
                tokio::select! {
                    // A pending stop wins over a tick that is ready at the same time.
                    biased;

                    // Fires on an explicit stop and when the handle is dropped.
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        if self.tick().await.is_new_post() {
                            on_new_post().await;
                        }
                    }
                }
            }

            self.state.stop();
            tracing::info!("Stopped polling user {}", self.user_id);
            self
        });

        PollHandle {
            user_id,
            stop_tx,
            task,
        }
    }
}

/// Starts polling `user_id` every `interval`, calling `on_new_post` when their post count rises
///
/// The returned handle owns the poller: stop it with [`PollHandle::stop`].
/// Dropping the handle stops the poller too.
pub fn start_polling<F, Fut>(
    client: ForumClient,
    user_id: &str,
    interval: Duration,
    on_new_post: F,
) -> Result<PollHandle>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    Ok(ChangeDetector::new(client, user_id, interval)?.spawn(on_new_post))
}

/// Handle to a running detector
#[derive(Debug)]
pub struct PollHandle {
    user_id: String,
    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<ChangeDetector>,
}

impl PollHandle {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Returns true if the polling task has ended
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops polling after any in-flight tick and returns the stopped detector
    ///
    /// Returns `None` if the task panicked (e.g. inside the callback).
    pub async fn stop(self) -> Option<ChangeDetector> {
        // The task may already be gone; nothing to signal then.
        let _ = self.stop_tx.send(());
        match self.task.await {
            Ok(detector) => Some(detector),
            Err(e) => {
                tracing::error!("Poller for user {} failed: {}", self.user_id, e);
                None
            }
        }
    }
}
