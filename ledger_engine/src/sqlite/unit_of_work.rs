use chrono::{DateTime, Utc};
use log::*;
use sqlx::{Sqlite, Transaction};

use super::db::{directory, ledger, orders};
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
    traits::{LedgerError, LedgerUnitOfWork},
};

/// A [`LedgerUnitOfWork`] backed by a single SQLite transaction.
///
/// sqlx rolls the transaction back when it is dropped without being committed.
pub struct SqliteUnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl SqliteUnitOfWork {
    pub(crate) fn new(tx: Transaction<'static, Sqlite>) -> Self {
        Self { tx }
    }
}

impl LedgerUnitOfWork for SqliteUnitOfWork {
    async fn lock_order(&mut self, order_id: i64) -> Result<Option<Order>, LedgerError> {
        Ok(orders::lock_order(order_id, &mut self.tx).await?)
    }

    async fn fetch_order(&mut self, order_id: i64) -> Result<Option<Order>, LedgerError> {
        Ok(orders::fetch_order(order_id, &mut self.tx).await?)
    }

    async fn insert_order(&mut self, order: ValidatedNewOrder) -> Result<Order, LedgerError> {
        Ok(orders::insert_order(order, &mut self.tx).await?)
    }

    async fn update_order(&mut self, order: &Order) -> Result<Order, LedgerError> {
        orders::update_order(order, &mut self.tx).await?.ok_or(LedgerError::OrderNotFound(order.id))
    }

    async fn delete_order(&mut self, order_id: i64) -> Result<bool, LedgerError> {
        Ok(orders::delete_order(order_id, &mut self.tx).await?)
    }

    async fn set_settlement_status(
        &mut self,
        order_id: i64,
        settled: bool,
        updated_at: DateTime<Utc>,
    ) -> Result<Order, LedgerError> {
        orders::set_settlement_status(order_id, settled, updated_at, &mut self.tx)
            .await?
            .ok_or(LedgerError::OrderNotFound(order_id))
    }

    async fn fetch_order_status(&mut self, status_id: i64) -> Result<Option<OrderStatus>, LedgerError> {
        Ok(directory::fetch_order_status(status_id, &mut self.tx).await?)
    }

    async fn fetch_order_status_by_name(&mut self, name: &str) -> Result<Option<OrderStatus>, LedgerError> {
        Ok(directory::fetch_order_status_by_name(name, &mut self.tx).await?)
    }

    async fn fetch_partner(&mut self, partner_id: i64) -> Result<Option<Partner>, LedgerError> {
        Ok(directory::fetch_partner(partner_id, &mut self.tx).await?)
    }

    async fn fetch_client(&mut self, client_id: i64) -> Result<Option<Client>, LedgerError> {
        Ok(directory::fetch_client(client_id, &mut self.tx).await?)
    }

    async fn fetch_company(&mut self, company_id: i64) -> Result<Option<Company>, LedgerError> {
        Ok(directory::fetch_company(company_id, &mut self.tx).await?)
    }

    async fn fetch_order_type(&mut self, order_type_id: i64) -> Result<Option<OrderType>, LedgerError> {
        Ok(directory::fetch_order_type(order_type_id, &mut self.tx).await?)
    }

    async fn fetch_receipts(&mut self, order_id: i64) -> Result<Vec<Receipt>, LedgerError> {
        Ok(ledger::fetch_receipts(order_id, &mut self.tx).await?)
    }

    async fn fetch_expenses(&mut self, order_id: i64) -> Result<Vec<Expense>, LedgerError> {
        Ok(ledger::fetch_expenses(order_id, &mut self.tx).await?)
    }

    async fn insert_receipt(&mut self, receipt: NewLedgerEntry) -> Result<Receipt, LedgerError> {
        Ok(ledger::insert_receipt(receipt, &mut self.tx).await?)
    }

    async fn insert_expense(&mut self, expense: NewLedgerEntry) -> Result<Expense, LedgerError> {
        Ok(ledger::insert_expense(expense, &mut self.tx).await?)
    }

    async fn insert_settlement(&mut self, settlement: NewSettlement) -> Result<Settlement, LedgerError> {
        Ok(ledger::insert_settlement(settlement, &mut self.tx).await?)
    }

    async fn fetch_settlements(&mut self, order_id: i64) -> Result<Vec<Settlement>, LedgerError> {
        Ok(ledger::fetch_settlements(order_id, &mut self.tx).await?)
    }

    async fn commit(self) -> Result<(), LedgerError> {
        self.tx.commit().await?;
        trace!("🗃️ Unit of work committed");
        Ok(())
    }

    async fn rollback(self) -> Result<(), LedgerError> {
        self.tx.rollback().await?;
        trace!("🗃️ Unit of work rolled back");
        Ok(())
    }
}
