//! Type definitions for queued Safe transactions

mod confirmation;
mod context;
mod operation;
mod transaction;

pub use confirmation::{Confirmation, SignatureType};
pub use context::SafeContext;
pub use operation::Operation;
pub use transaction::{PendingTransaction, QueuedTransaction, RawTransaction, TxId};
