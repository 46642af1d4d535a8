//! Metrics recorded by the Store.
//!
//! The Store records through the [`metrics`](::metrics) facade. Nothing is
//! exported unless the host application installs a recorder; call
//! [`describe_metrics`] once after installing one so exporters can attach
//! descriptions and units.
//!
//! | Name | Kind | Meaning |
//! |------|------|---------|
//! | `store.actions.total` | counter | Actions dispatched |
//! | `store.reducer.duration_seconds` | histogram | Time spent in the reducer |
//! | `store.listeners.notified` | counter | Listener invocations |
//! | `store.listeners.panicked` | counter | Listener invocations that panicked |
//! | `store.subscribers` | gauge | Currently registered listeners |

use ::metrics::{describe_counter, describe_gauge, describe_histogram, Unit};

/// Actions dispatched through `Store::send`
pub const STORE_ACTIONS_TOTAL: &str = "store.actions.total";

/// Reducer execution time
pub const STORE_REDUCER_DURATION_SECONDS: &str = "store.reducer.duration_seconds";

/// Listener invocations
pub const STORE_LISTENERS_NOTIFIED: &str = "store.listeners.notified";

/// Listener invocations that panicked
pub const STORE_LISTENERS_PANICKED: &str = "store.listeners.panicked";

/// Registered listeners
pub const STORE_SUBSCRIBERS: &str = "store.subscribers";

/// Register descriptions for every Store metric with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(STORE_ACTIONS_TOTAL, "Total number of actions dispatched to stores");
    describe_histogram!(
        STORE_REDUCER_DURATION_SECONDS,
        Unit::Seconds,
        "Time taken to execute the reducer for one action"
    );
    describe_counter!(
        STORE_LISTENERS_NOTIFIED,
        "Total number of listener notifications"
    );
    describe_counter!(
        STORE_LISTENERS_PANICKED,
        "Total number of listener notifications that panicked"
    );
    describe_gauge!(STORE_SUBSCRIBERS, "Number of registered store listeners");
}
