//! Mock implementations for testing purposes.
//!
//! - Endpoints with scripted heights, for pool and registry tests
//! - A JSON-RPC transport, for client tests without HTTP
//! - A wallet, for the transaction pipeline
//!
//! The mocks are implemented using the `mockall` crate.

mod endpoints;
mod wallet;

#[allow(unused_imports)]
pub use endpoints::*;
#[allow(unused_imports)]
pub use transports::*;
#[allow(unused_imports)]
pub use wallet::*;
