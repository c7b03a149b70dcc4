//! Canonical ledger documents.
//!
//! Blocks and transactions are built leniently from loosely typed JSON,
//! serialised into their canonical raw forms, and identified by the uppercase
//! SHA-256 of those forms. Construction never fails; strictness lives in
//! explicit operations such as [`parameters::decode_strict`].

pub mod block;
pub mod coerce;
pub mod error;
pub mod parameters;
pub mod raw;
pub mod transaction;

pub use block::{Block, BlockDraft};
pub use error::DocumentError;
pub use transaction::{
    set_recipients, InputRecord, OutputRecord, Recipient, Transaction, TransactionDraft,
    TransactionView,
};
