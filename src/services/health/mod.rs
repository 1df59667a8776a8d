//! Endpoint health tracking and node selection.
//!
//! - [`NodePool`] holds the last observation of every endpoint and the pool-wide maximum
//! - [`HeightPoller`] and [`HeightMonitor`] keep the pool current in the background
//! - [`Selector`] picks an endpoint position from the pool

mod monitor;
mod pool;
mod selector;

pub use monitor::{HeightMonitor, HeightPoller, PollSummary};
pub use pool::{EndpointHealth, NodePool, PollOutcome, PoolSnapshot};
pub use selector::{best_index, eligible_indices, Selector};
