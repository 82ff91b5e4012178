//! # Ledger store contracts.
//!
//! This module defines the interfaces that ledger storage *backends* implement.
//!
//! * [`LedgerDatabase`] hands out [`LedgerUnitOfWork`]s. Every order mutation, and the settlement computed from it,
//!   happens inside one unit of work.
//! * [`DirectoryManagement`] maintains partners, clients, companies, order types and the status vocabularies.
//! * [`DocumentManagement`] keeps track of the documents and comments attached to orders.
mod directory_management;
mod document_management;
mod errors;
mod ledger_database;

pub use directory_management::DirectoryManagement;
pub use document_management::DocumentManagement;
pub use errors::{LedgerError, ValidationError};
pub use ledger_database::{LedgerDatabase, LedgerUnitOfWork};
