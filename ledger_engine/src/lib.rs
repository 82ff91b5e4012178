//! Ledger Engine
//!
//! The ledger engine keeps the books for orders that partners refer to the business. It records the money received
//! and spent on each order, and when an order reaches a terminal status it splits the proceeds between the referring
//! partner and the business.
//!
//! The library is divided into these sections:
//! 1. Storage ([`traits`], [`sqlite`]). The traits define what a backend has to provide, chiefly an explicit unit of
//!    work. SQLite is the supported backend. The data types stored are defined in [`db_types`] and are public.
//! 2. Settlement ([`settlement`], [`dispatch`]). The dispatcher compares an order before and after a write and calls
//!    the settlement engine for status and payment changes, inside the same unit of work.
//! 3. The public API ([`ledger_api`]). This is what callers should use.
//!
//! Callers can subscribe to [`events`] that are published after a settlement has been committed.
pub mod clock;
pub mod config;
pub mod db_types;
pub mod dispatch;
pub mod events;
pub mod ledger_api;
pub mod search;
pub mod settlement;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LedgerConfig;
pub use ledger_api::{
    directory_api::DirectoryApi,
    documents_api::DocumentsApi,
    order_flow_api::OrderFlowApi,
    order_objects::{OrderLedger, OrderMutation},
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
pub use traits::{LedgerDatabase, LedgerError, LedgerUnitOfWork, ValidationError};
