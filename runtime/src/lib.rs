//! # Salon Booking Runtime
//!
//! The [`Store`] owns one wizard session: its state, its reducer and its
//! environment. Screens hold a cloned handle, send actions and read (or
//! subscribe to) snapshots.
//!
//! ## Core Components
//!
//! - **Store**: Manages state and executes effects
//! - **Effect Executor**: Spawns effect futures and feeds their actions back
//! - **Snapshots**: A `watch` channel carrying the latest state after every action
//!
//! ## Example
//!
//! ```ignore
//! use salon_booking_runtime::Store;
//!
//! let store = Store::new(AppointmentState::default(), AppointmentReducer::new(), env);
//!
//! store.send(AppointmentAction::SetService { service }).await?;
//! let stage = store.state(AppointmentState::stage).await;
//! ```

use salon_booking_core::{effect::Effect, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// The session was closed and no longer accepts actions
        ///
        /// Effects that were already running still complete, but the actions
        /// they produce are discarded.
        #[error("Store is closed")]
        Closed,

        /// Timeout waiting for a matching action
        ///
        /// Returned by `send_and_wait_for` when the timeout expires before
        /// a matching action is received.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Handle for the effects spawned by one `send`
///
/// Dropping the handle does not cancel anything: effects always run to
/// completion.
#[derive(Debug, Default)]
pub struct EffectHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl EffectHandle {
    /// A handle with nothing left to wait for
    #[must_use]
    pub const fn completed() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Number of effects spawned by the action
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the action spawned no effects
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait until every spawned effect finished and its feedback action was reduced
    pub async fn wait(self) {
        for result in futures::future::join_all(self.tasks).await {
            if let Err(error) = result {
                tracing::error!(error = %error, "Effect task failed");
            }
        }
    }

    /// Wait for completion with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the effects did not finish in time.
    pub async fn wait_with_timeout(self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, Duration, Effect, EffectHandle, JoinHandle, Ordering, Reducer, RwLock,
        StoreError,
    };
    use tokio::sync::{broadcast, watch};

    /// The Store - runtime coordinator for one wizard session
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`; one action is one atomic transition)
    /// 2. Reducer (wizard rules)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    ///
    /// Cloning a Store yields another handle to the same session.
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        closed: Arc<AtomicBool>,
        snapshots: Arc<watch::Sender<S>>,
        /// Actions produced by effects, after they have been reduced.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone + Send + Sync + 'static,
        A: Clone + Send + 'static,
        S: Clone + Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The action broadcast capacity defaults to 16; use
        /// [`Store::with_broadcast_capacity`] for chattier sessions.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_broadcast_capacity(initial_state, reducer, environment, 16)
        }

        /// Create a new store with a custom action broadcast capacity
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: S,
            reducer: R,
            environment: E,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));
            let (snapshots, _) = watch::channel(initial_state.clone());

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                closed: Arc::new(AtomicBool::new(false)),
                snapshots: Arc::new(snapshots),
                action_broadcast,
            }
        }

        /// Send an action through the reducer and spawn the resulting effects
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Closed`] if the session was closed.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            self.send_internal(action).await
        }

        /// Send an action and wait for a matching feedback action
        ///
        /// Subscribes to the action broadcast before sending, so a fast effect
        /// cannot slip past. The returned action has already been reduced.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action before `timeout`
        /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
        /// - [`StoreError::Closed`]: the session was closed
        pub async fn send_and_wait_for<F>(
            &self,
            action: A,
            predicate: F,
            timeout: Duration,
        ) -> Result<A, StoreError>
        where
            F: Fn(&A) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();
            let _handle = self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action broadcast lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to feedback actions produced by effects
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Subscribe to state snapshots
        ///
        /// The receiver always holds the state as of the latest reduced action.
        #[must_use]
        pub fn subscribe(&self) -> watch::Receiver<S> {
            self.snapshots.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let item_count = store.state(|s| s.services.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Clone the current state
        pub async fn snapshot(&self) -> S {
            self.state(Clone::clone).await
        }

        /// End the session
        ///
        /// Further `send`s are rejected. Effects already in flight keep
        /// running; the actions they produce are dropped.
        pub fn close(&self) {
            if !self.closed.swap(true, Ordering::AcqRel) {
                tracing::debug!("Store closed");
            }
        }

        /// Whether [`Store::close`] has been called on any handle
        #[must_use]
        pub fn is_closed(&self) -> bool {
            self.closed.load(Ordering::Acquire)
        }

        async fn send_internal(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.is_closed() {
                tracing::debug!("Rejected action: store is closed");
                metrics::counter!("store.closed.rejected_actions").increment(1);
                return Err(StoreError::Closed);
            }

            metrics::counter!("store.actions.total").increment(1);

            let effects = {
                let mut state = self.state.write().await;

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                // Published under the write lock so snapshots arrive in reduce order.
                self.snapshots.send_replace((*state).clone());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            let mut tasks = Vec::new();
            for effect in effects {
                if let Some(task) = self.execute_effect(effect) {
                    tasks.push(task);
                }
            }

            Ok(EffectHandle { tasks })
        }

        fn execute_effect(&self, effect: Effect<A>) -> Option<JoinHandle<()>> {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                    None
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);

                    let store = self.clone();
                    Some(tokio::spawn(async move {
                        let Some(action) = fut.await else {
                            tracing::trace!("Effect::Future completed with no action");
                            return;
                        };

                        match store.send(action.clone()).await {
                            Ok(_) => {
                                // No receivers is fine.
                                let _ = store.action_broadcast.send(action);
                            },
                            Err(error) => {
                                tracing::debug!(error = %error, "Discarded feedback action");
                            },
                        }
                    }))
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                closed: Arc::clone(&self.closed),
                snapshots: Arc::clone(&self.snapshots),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;
