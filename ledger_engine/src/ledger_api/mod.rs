//! # Ledger engine public API
//!
//! The `ledger_api` module exposes the programmatic API for the ledger engine. The API is modular, so that callers
//! can pick the parts they need.
//!
//! * [`order_flow_api`] creates and changes orders, records receipts and expenses, and drives settlement.
//! * [`directory_api`] maintains partners, clients, companies, order types and status vocabularies.
//! * [`documents_api`] tracks the documents and comments attached to orders.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements the backend traits the API needs.
//!
//! ```rust,ignore
//! use ledger_engine::{events::EventProducers, OrderFlowApi, SqliteDatabase, SystemClock};
//! let db = SqliteDatabase::new_with_url("sqlite://data/ledger.db").await?;
//! let api = OrderFlowApi::new(db, SystemClock, EventProducers::default());
//! let ledger = api.get_order(42).await?;
//! ```
pub mod directory_api;
pub mod documents_api;
pub mod order_flow_api;
pub mod order_locks;
pub mod order_objects;
