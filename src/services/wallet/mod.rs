//! Transaction submission on behalf of a wallet.
//!
//! - [`Wallet`], the key store interface
//! - [`TransactionPipeline`], resolve balance, build, sign and broadcast

mod account;
mod error;
mod pipeline;

pub use account::{Wallet, WalletAccount};
pub use error::{TransactionError, TransactionStage, WalletError};
pub use pipeline::TransactionPipeline;
