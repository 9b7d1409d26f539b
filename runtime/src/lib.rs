//! # Composition Runtime
//!
//! Store runtime for the Composition client.
//!
//! The Store coordinates reducer execution and effect handling:
//!
//! ```text
//! Action → Reducer → (State, Effects) → Effect Execution → More Actions
//! ```
//!
//! The client is single-writer by construction: the reducer runs under a
//! write lock, so concurrent `send` calls serialize at the reducer level.
//! Effects (HTTP requests) run in spawned tasks and feed their completion
//! actions back through the same reducer, which is where stale-response
//! checks are applied.
//!
//! ## Example
//!
//! ```ignore
//! use composition_runtime::Store;
//!
//! let store = Store::new(SessionState::default(), SessionReducer::new(), env);
//!
//! let handle = store.send(SessionAction::SignedOut).await?;
//! handle.wait().await;
//!
//! let logged_in = store.state(|s| s.is_logged_in).await;
//! ```

use composition_core::effect::Effect;
use composition_core::reducer::Reducer;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast, watch};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a terminal action
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

/// Handle for tracking effect completion
///
/// Returned by [`Store::send`] to allow waiting for the effects spawned by
/// an action to finish. Waiting is how tests (and the composition root)
/// observe that an in-flight HTTP request has settled.
#[derive(Clone)]
pub struct EffectHandle {
    pending: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let pending = Arc::new(AtomicUsize::new(0));
        let (notifier, completion) = watch::channel(());

        let handle = Self {
            pending: Arc::clone(&pending),
            completion,
        };
        let tracking = EffectTracking { pending, notifier };

        (handle, tracking)
    }

    /// Create a handle that is already complete
    #[must_use]
    pub fn completed() -> Self {
        let (notifier, completion) = watch::channel(());
        let _ = notifier.send(());
        Self {
            pending: Arc::new(AtomicUsize::new(0)),
            completion,
        }
    }

    /// Wait for all effects spawned by the action to complete
    pub async fn wait(&mut self) {
        while self.pending.load(Ordering::SeqCst) > 0 {
            // Sender dropped means all tracking clones are gone, i.e. done.
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires first.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.pending.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: effect tracking context passed through effect execution
struct EffectTracking {
    pending: Arc<AtomicUsize>,
    notifier: watch::Sender<()>,
}

impl EffectTracking {
    fn increment(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

impl Clone for EffectTracking {
    fn clone(&self) -> Self {
        Self {
            pending: Arc::clone(&self.pending),
            notifier: self.notifier.clone(),
        }
    }
}

/// Internal: RAII guard that decrements a tracking counter on drop
///
/// Ensures counters are decremented even if an effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

struct PendingGuard<S, A, E, R>(Arc<Inner<S, A, E, R>>)
where
    R: Reducer<State = S, Action = A, Environment = E>;

impl<S, A, E, R> Drop for PendingGuard<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn drop(&mut self) {
        self.0.pending_effects.fetch_sub(1, Ordering::SeqCst);
    }
}

struct Inner<S, A, E, R> {
    state: RwLock<S>,
    reducer: R,
    environment: E,
    shutdown: AtomicBool,
    pending_effects: AtomicUsize,
    /// Actions produced by effects are broadcast to observers. This is
    /// what `send_and_wait_for` builds on: a view dispatches a command
    /// and waits for the matching completion action.
    action_broadcast: broadcast::Sender<A>,
}

/// The Store - runtime coordinator for a reducer
///
/// The Store manages:
/// 1. State (behind an async `RwLock`)
/// 2. Reducer (feature logic)
/// 3. Environment (injected dependencies)
/// 4. Effect execution (with action feedback loop)
///
/// Cloning a Store is cheap and yields a handle to the same state.
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    inner: Arc<Inner<S, A, E, R>>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + Sync + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    ///
    /// The action broadcast channel holds 16 actions; use
    /// [`Store::with_broadcast_capacity`] if observers are slow.
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
        let (action_broadcast, _) = broadcast::channel(capacity);

        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(initial_state),
                reducer,
                environment,
                shutdown: AtomicBool::new(false),
                pending_effects: AtomicUsize::new(0),
                action_broadcast,
            }),
        }
    }

    /// Send an action to the store
    ///
    /// 1. Acquires the write lock on state
    /// 2. Runs the reducer with (state, action, environment)
    /// 3. Spawns returned effects; actions they produce are dispatched
    ///    back through the reducer and broadcast to observers
    ///
    /// `send` returns after *starting* effect execution, not completion.
    /// Use the returned [`EffectHandle`] to wait for in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    #[tracing::instrument(skip(self, action), name = "store_send")]
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        if self.inner.shutdown.load(Ordering::Acquire) {
            tracing::warn!("Rejected action: store is shutting down");
            return Err(StoreError::ShutdownInProgress);
        }

        metrics::counter!("store.actions.total").increment(1);

        let (handle, tracking) = EffectHandle::new();

        let effects = {
            let mut state = self.inner.state.write().await;
            self.inner
                .reducer
                .reduce(&mut state, action, &self.inner.environment)
        };

        tracing::trace!(count = effects.len(), "Executing effects");
        for effect in effects {
            spawn_effect(Arc::clone(&self.inner), effect, tracking.clone());
        }

        Ok(handle)
    }

    /// Send an action and wait for a matching completion action
    ///
    /// This is the request-response pattern the views use: dispatch a
    /// command, then wait for the terminal action its effect produces.
    /// The subscription is created before sending to avoid a race.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Timeout`]: no matching action within `timeout`
    /// - [`StoreError::ChannelClosed`]: broadcast channel closed
    /// - [`StoreError::ShutdownInProgress`]: store is shutting down
    pub async fn send_and_wait_for<F>(
        &self,
        action: A,
        predicate: F,
        timeout: Duration,
    ) -> Result<A, StoreError>
    where
        F: Fn(&A) -> bool,
    {
        let mut rx = self.inner.action_broadcast.subscribe();

        self.send(action).await?;

        tokio::time::timeout(timeout, async {
            loop {
                match rx.recv().await {
                    Ok(action) if predicate(&action) => return Ok(action),
                    Ok(_) => {},
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Slow consumer; keep waiting, the timeout catches
                        // a dropped terminal action.
                        tracing::warn!(skipped, "Action observer lagged");
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

    /// Subscribe to all actions produced by effects
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
        self.inner.action_broadcast.subscribe()
    }

    /// Read current state via a closure
    ///
    /// ```ignore
    /// let page = store.state(|s| s.page).await;
    /// ```
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.inner.state.read().await;
        f(&state)
    }

    /// Number of effects currently in flight across all actions
    #[must_use]
    pub fn pending_effects(&self) -> usize {
        self.inner.pending_effects.load(Ordering::Acquire)
    }

    /// Initiate graceful shutdown
    ///
    /// Sets the shutdown flag (rejecting new actions) and waits for
    /// pending effects to finish.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownTimeout`] if effects are still
    /// running when the timeout expires.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
        tracing::info!("Initiating graceful shutdown");
        self.inner.shutdown.store(true, Ordering::Release);

        let start = std::time::Instant::now();
        loop {
            let pending = self.inner.pending_effects.load(Ordering::Acquire);
            if pending == 0 {
                tracing::info!("All effects completed, shutdown successful");
                return Ok(());
            }
            if start.elapsed() >= timeout {
                tracing::error!(pending, "Shutdown timeout");
                return Err(StoreError::ShutdownTimeout(pending));
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

/// Spawn a top-level effect returned by the reducer.
fn spawn_effect<S, A, E, R>(inner: Arc<Inner<S, A, E, R>>, effect: Effect<A>, tracking: EffectTracking)
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + Sync + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    if effect.is_none() {
        return;
    }

    tracking.increment();
    inner.pending_effects.fetch_add(1, Ordering::SeqCst);
    let pending_guard = PendingGuard(Arc::clone(&inner));

    tokio::spawn(async move {
        let _tracked = DecrementGuard(tracking);
        let _pending = pending_guard;
        run_effect(inner, effect).await;
    });
}

/// Execute one effect to completion, dispatching produced actions back
/// through the reducer.
fn run_effect<S, A, E, R>(
    inner: Arc<Inner<S, A, E, R>>,
    effect: Effect<A>,
) -> Pin<Box<dyn std::future::Future<Output = ()> + Send>>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + Sync + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    Box::pin(async move {
        match effect {
            Effect::None => {},
            Effect::Parallel(effects) => {
                let futs = effects
                    .into_iter()
                    .map(|e| run_effect(Arc::clone(&inner), e));
                futures::future::join_all(futs).await;
            },
            Effect::Sequential(effects) => {
                for e in effects {
                    run_effect(Arc::clone(&inner), e).await;
                }
            },
            Effect::Delay { duration, action } => {
                tokio::time::sleep(duration).await;
                dispatch_feedback(inner, *action).await;
            },
            Effect::Future(fut) => {
                if let Some(action) = fut.await {
                    dispatch_feedback(inner, action).await;
                }
            },
        }
    })
}

/// Dispatch an action produced by an effect: broadcast it, reduce it, and
/// execute any follow-up effects inline.
async fn dispatch_feedback<S, A, E, R>(inner: Arc<Inner<S, A, E, R>>, action: A)
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + Sync + Clone + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    let effects = {
        let mut state = inner.state.write().await;
        inner
            .reducer
            .reduce(&mut state, action.clone(), &inner.environment)
    };

    // Broadcast after reducing so waiters observe state that already
    // includes the action. The broadcast is unconditional: a discarded
    // stale response is still visible to observers.
    let _ = inner.action_broadcast.send(action);
    metrics::counter!("store.feedback_actions.total").increment(1);

    for effect in effects {
        run_effect(Arc::clone(&inner), effect).await;
    }
}
