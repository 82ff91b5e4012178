use chrono::{DateTime, Utc};

use crate::{
    db_types::{
        Client,
        Company,
        Expense,
        NewLedgerEntry,
        NewSettlement,
        Order,
        OrderStatus,
        OrderType,
        Partner,
        Receipt,
        Settlement,
        ValidatedNewOrder,
    },
    traits::LedgerError,
};

/// This trait defines the highest level of behaviour for backends supporting the ledger engine.
///
/// A backend hands out units of work. Every read and write that has to be consistent with another (e.g. reading an
/// order's expenses and inserting the resulting settlement) goes through the same [`LedgerUnitOfWork`], which is
/// committed or rolled back as a whole.
#[allow(async_fn_in_trait)]
pub trait LedgerDatabase: Clone {
    type UnitOfWork: LedgerUnitOfWork;

    /// The URL of the database
    fn url(&self) -> &str;

    /// Starts a new unit of work.
    async fn begin(&self) -> Result<Self::UnitOfWork, LedgerError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), LedgerError> {
        Ok(())
    }
}

/// An explicit, atomic unit of work against the ledger store.
///
/// Nothing written through a unit of work is visible to others until [`LedgerUnitOfWork::commit`] is called. Dropping
/// a unit of work without committing it discards its writes.
#[allow(async_fn_in_trait)]
pub trait LedgerUnitOfWork {
    /// Fetches the order and takes the store's write lock for it. Mutating flows must call this before reading
    /// anything else they intend to base a write on.
    async fn lock_order(&mut self, order_id: i64) -> Result<Option<Order>, LedgerError>;

    async fn fetch_order(&mut self, order_id: i64) -> Result<Option<Order>, LedgerError>;

    async fn insert_order(&mut self, order: ValidatedNewOrder) -> Result<Order, LedgerError>;

    /// Persists the caller-mutable fields of the order (references, status, money fields and payment flag) along
    /// with `updated_at`. The derived `settlement_status` flag is not written.
    async fn update_order(&mut self, order: &Order) -> Result<Order, LedgerError>;

    /// Deletes the order and, by cascade, all of its children. Returns false if the order did not exist.
    async fn delete_order(&mut self, order_id: i64) -> Result<bool, LedgerError>;

    /// Sets the derived settlement flag. This is reserved for the settlement engine.
    async fn set_settlement_status(
        &mut self,
        order_id: i64,
        settled: bool,
        updated_at: DateTime<Utc>,
    ) -> Result<Order, LedgerError>;

    async fn fetch_order_status(&mut self, status_id: i64) -> Result<Option<OrderStatus>, LedgerError>;

    async fn fetch_order_status_by_name(&mut self, name: &str) -> Result<Option<OrderStatus>, LedgerError>;

    async fn fetch_partner(&mut self, partner_id: i64) -> Result<Option<Partner>, LedgerError>;

    async fn fetch_client(&mut self, client_id: i64) -> Result<Option<Client>, LedgerError>;

    async fn fetch_company(&mut self, company_id: i64) -> Result<Option<Company>, LedgerError>;

    async fn fetch_order_type(&mut self, order_type_id: i64) -> Result<Option<OrderType>, LedgerError>;

    async fn fetch_receipts(&mut self, order_id: i64) -> Result<Vec<Receipt>, LedgerError>;

    async fn fetch_expenses(&mut self, order_id: i64) -> Result<Vec<Expense>, LedgerError>;

    async fn insert_receipt(&mut self, receipt: NewLedgerEntry) -> Result<Receipt, LedgerError>;

    async fn insert_expense(&mut self, expense: NewLedgerEntry) -> Result<Expense, LedgerError>;

    async fn insert_settlement(&mut self, settlement: NewSettlement) -> Result<Settlement, LedgerError>;

    /// Settlements for the order, oldest first.
    async fn fetch_settlements(&mut self, order_id: i64) -> Result<Vec<Settlement>, LedgerError>;

    async fn commit(self) -> Result<(), LedgerError>;

    async fn rollback(self) -> Result<(), LedgerError>;
}
