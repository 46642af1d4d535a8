//! # Tidy Runtime
//!
//! Runtime implementation for the Tidy architecture.
//!
//! This crate provides the [`Store`]: the single owner of application state.
//! Callers never mutate state directly; they dispatch actions and read
//! snapshots.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, runs the reducer for every dispatched action
//! - **Listeners**: Callbacks notified with the new state after each dispatch
//! - **Action observers**: Broadcast receivers that see every reduced action
//!
//! ## Example
//!
//! ```ignore
//! use tidy_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! let subscription = store.subscribe(|state| println!("{state:?}"));
//!
//! // Dispatch an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! let snapshot = store.snapshot().await;
//!
//! store.unsubscribe(subscription.id());
//! ```

use std::sync::Arc;
use tidy_core::reducer::Reducer;
use tokio::sync::RwLock;

/// Metric names and descriptions recorded by the Store
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use super::SubscriptionId;
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// A listener panicked while being notified
        ///
        /// The new state was already committed and every other listener was
        /// still notified. Only the first panicking listener is reported.
        #[error("Listener {subscription} panicked during notification")]
        ListenerPanicked {
            /// The subscription whose listener panicked
            subscription: SubscriptionId,
        },
    }
}

pub use error::StoreError;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use tidy_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_action_broadcast_capacity(256);
/// assert_eq!(config.action_broadcast_capacity, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of dispatched actions buffered for each action observer
    ///
    /// Observers that fall further behind than this skip ahead and see
    /// `RecvError::Lagged`. Values below 1 are raised to 1.
    pub action_broadcast_capacity: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(action_broadcast_capacity: usize) -> Self {
        Self {
            action_broadcast_capacity,
        }
    }

    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_action_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.action_broadcast_capacity = capacity;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            action_broadcast_capacity: 16,
        }
    }
}

/// Identifier of a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Returns the raw identifier
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle returned by [`Store::subscribe`]
///
/// Dropping the handle does not unsubscribe; pass [`Subscription::id`] to
/// [`Store::unsubscribe`] to stop receiving notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "keep the subscription id to be able to unsubscribe"]
pub struct Subscription {
    id: SubscriptionId,
}

impl Subscription {
    /// The id to pass to [`Store::unsubscribe`]
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }
}

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Registered listeners, in registration order
struct ListenerRegistry<S> {
    next_id: AtomicU64,
    entries: Mutex<Vec<(SubscriptionId, Listener<S>)>>,
}

impl<S> ListenerRegistry<S> {
    fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            entries: Mutex::new(Vec::new()),
        }
    }

    fn insert(&self, listener: Listener<S>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.push((id, listener));

        #[allow(clippy::cast_precision_loss)]
        ::metrics::gauge!(crate::metrics::STORE_SUBSCRIBERS).set(entries.len() as f64);

        id
    }

    fn remove(&self, id: SubscriptionId) -> bool {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);

        #[allow(clippy::cast_precision_loss)]
        ::metrics::gauge!(crate::metrics::STORE_SUBSCRIBERS).set(entries.len() as f64);

        entries.len() != before
    }

    fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Copies the listener list so notification runs without holding the lock
    fn snapshot(&self) -> Vec<(SubscriptionId, Listener<S>)> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

/// The Store implementation
pub mod store {
    use super::{
        Arc, Listener, ListenerRegistry, Reducer, RwLock, StoreConfig, StoreError,
        Subscription, SubscriptionId,
    };
    use crate::metrics::{
        STORE_ACTIONS_TOTAL, STORE_LISTENERS_NOTIFIED, STORE_LISTENERS_PANICKED,
        STORE_REDUCER_DURATION_SECONDS,
    };
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use tokio::sync::broadcast;

    /// The Store - single owner of application state
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Listeners notified after every dispatch
    ///
    /// `Store` is a handle: cloning it is cheap and every clone shares the
    /// same state, listeners, and action observers.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::new(AppState::default(), AppReducer::new(), ());
    ///
    /// store.send(TodoAction::AddTodo { text: "buy milk".into() }).await?;
    /// ```
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        listeners: Arc<ListenerRegistry<S>>,
        /// Every dispatched action, sent after it has been reduced.
        action_broadcast: broadcast::Sender<A>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + std::fmt::Debug + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        ///
        /// # Example
        ///
        /// ```ignore
        /// let config = StoreConfig::default().with_action_broadcast_capacity(256);
        ///
        /// let store = Store::with_config(
        ///     AppState::default(),
        ///     AppReducer::new(),
        ///     (),
        ///     config,
        /// );
        /// ```
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) =
                broadcast::channel(config.action_broadcast_capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                listeners: Arc::new(ListenerRegistry::new()),
                action_broadcast,
            }
        }

        /// Send an action to the store (dispatch)
        ///
        /// 1. Acquires the write lock on state
        /// 2. Computes the next state with (state, action, environment)
        /// 3. Commits it and notifies every listener with the new state
        /// 4. Broadcasts the action to action observers
        ///
        /// All four steps happen under the write lock, so concurrent `send`
        /// calls are processed one at a time and no listener ever observes an
        /// intermediate state. When the returned future completes, the new
        /// state is visible to every reader.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ListenerPanicked`] if a listener panicked.
        /// The state change is kept and the remaining listeners still run.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            tracing::debug!(?action, "Processing action");
            ::metrics::counter!(STORE_ACTIONS_TOTAL).increment(1);

            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let start = std::time::Instant::now();
            let next = {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();
                self.reducer.reduce(&*state, &action, &self.environment)
            };
            ::metrics::histogram!(STORE_REDUCER_DURATION_SECONDS)
                .record(start.elapsed().as_secs_f64());

            *state = next;

            let listeners = self.listeners.snapshot();
            let mut first_panic: Option<SubscriptionId> = None;

            for (id, listener) in &listeners {
                if notify(listener, &*state).is_err() {
                    tracing::error!(subscription = %id, "Listener panicked, continuing");
                    ::metrics::counter!(STORE_LISTENERS_PANICKED).increment(1);
                    first_panic.get_or_insert(*id);
                }
            }
            ::metrics::counter!(STORE_LISTENERS_NOTIFIED).increment(listeners.len() as u64);

            if let Err(broadcast::error::SendError(_)) = self.action_broadcast.send(action) {
                tracing::trace!("No action observers subscribed");
            }

            drop(state);
            tracing::trace!(listeners = listeners.len(), "Action processing completed");

            match first_panic {
                Some(subscription) => Err(StoreError::ListenerPanicked { subscription }),
                None => Ok(()),
            }
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure to ensure the lock is released promptly:
        ///
        /// ```ignore
        /// let todo_count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Return a copy of the current state
        pub async fn snapshot(&self) -> S
        where
            S: Clone,
        {
            self.state.read().await.clone()
        }

        /// Register a listener called with the new state after every dispatch
        ///
        /// Listeners run in registration order while the dispatch still holds
        /// the write lock, so they must not block. A listener registered or
        /// removed during a dispatch takes effect from the next dispatch.
        pub fn subscribe<F>(&self, listener: F) -> Subscription
        where
            F: Fn(&S) + Send + Sync + 'static,
        {
            let listener: Listener<S> = Arc::new(listener);
            let id = self.listeners.insert(listener);
            tracing::debug!(subscription = %id, "Listener subscribed");
            Subscription { id }
        }

        /// Remove a listener
        ///
        /// Returns `false` if no listener with this id is registered.
        pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
            let removed = self.listeners.remove(id);
            tracing::debug!(subscription = %id, removed, "Listener unsubscribed");
            removed
        }

        /// Number of registered listeners
        #[must_use]
        pub fn subscriber_count(&self) -> usize {
            self.listeners.len()
        }

        /// Subscribe to every action dispatched to this store
        ///
        /// Each action is sent after it has been reduced and listeners have
        /// been notified. Useful for action logs and debugging tools.
        ///
        /// ```ignore
        /// let mut rx = store.subscribe_actions();
        ///
        /// while let Ok(action) = rx.recv().await {
        ///     tracing::info!(?action, "dispatched");
        /// }
        /// ```
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }
    }

    /// Invoke one listener, converting a panic into `Err`
    fn notify<S>(listener: &Listener<S>, state: &S) -> Result<(), ()> {
        catch_unwind(AssertUnwindSafe(|| listener(state))).map_err(|_| ())
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                listeners: Arc::clone(&self.listeners),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}

pub use store::Store;
