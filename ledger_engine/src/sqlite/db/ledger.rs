//! Receipts, expenses and settlements. All three are owned by an order.
use log::*;
use sqlx::SqliteConnection;

use crate::db_types::{Expense, NewLedgerEntry, NewSettlement, Receipt, Settlement};

pub async fn insert_receipt(entry: NewLedgerEntry, conn: &mut SqliteConnection) -> Result<Receipt, sqlx::Error> {
    let receipt: Receipt = sqlx::query_as(
        "INSERT INTO receipts (order_id, amount, description, created_at) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(entry.order_id)
    .bind(entry.amount.value())
    .bind(entry.description)
    .bind(entry.created_at)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Receipt #{} of {} recorded for order #{}", receipt.id, receipt.amount, receipt.order_id);
    Ok(receipt)
}

pub async fn insert_expense(entry: NewLedgerEntry, conn: &mut SqliteConnection) -> Result<Expense, sqlx::Error> {
    let expense: Expense = sqlx::query_as(
        "INSERT INTO expenses (order_id, amount, description, created_at) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(entry.order_id)
    .bind(entry.amount.value())
    .bind(entry.description)
    .bind(entry.created_at)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Expense #{} of {} recorded for order #{}", expense.id, expense.amount, expense.order_id);
    Ok(expense)
}

pub async fn fetch_receipts(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Receipt>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM receipts WHERE order_id = $1 ORDER BY created_at, id")
        .bind(order_id)
        .fetch_all(conn)
        .await
}

pub async fn fetch_expenses(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Expense>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM expenses WHERE order_id = $1 ORDER BY created_at, id")
        .bind(order_id)
        .fetch_all(conn)
        .await
}

/// Settlements are insert-only.
pub async fn insert_settlement(
    settlement: NewSettlement,
    conn: &mut SqliteConnection,
) -> Result<Settlement, sqlx::Error> {
    let settlement = sqlx::query_as(
        r#"
            INSERT INTO settlements (order_id, partner_id, partner_amount, self_amount, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(settlement.order_id)
    .bind(settlement.partner_id)
    .bind(settlement.partner_amount.value())
    .bind(settlement.self_amount.value())
    .bind(settlement.created_at)
    .fetch_one(conn)
    .await?;
    Ok(settlement)
}

/// Settlement history of the order, oldest first. Ties on the timestamp keep insertion order.
pub async fn fetch_settlements(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Settlement>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM settlements WHERE order_id = $1 ORDER BY created_at, id")
        .bind(order_id)
        .fetch_all(conn)
        .await
}
