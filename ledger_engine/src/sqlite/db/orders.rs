use chrono::{DateTime, Utc};
use log::*;
use sqlx::SqliteConnection;

use crate::db_types::{Order, ValidatedNewOrder};

/// Fetches the order and acquires the database write lock in the same statement.
///
/// The no-op `UPDATE` makes this connection the writer. Called as the first statement of a transaction, it means the
/// transaction waits (up to the busy timeout) for any other writer, and no other writer can change the order until
/// this transaction ends.
pub async fn lock_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("UPDATE orders SET updated_at = updated_at WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(conn)
        .await?;
    trace!("🗃️ Write lock taken for order #{id}");
    Ok(order)
}

pub async fn fetch_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

/// Inserts a new order. Payment and settlement flags always start out as false.
pub async fn insert_order(order: ValidatedNewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                client_id,
                partner_id,
                order_type_id,
                company_id,
                status_id,
                fees,
                base_charges,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            RETURNING *;
        "#,
    )
    .bind(order.client_id)
    .bind(order.partner_id)
    .bind(order.order_type_id)
    .bind(order.company_id)
    .bind(order.status_id)
    .bind(order.fees.value())
    .bind(order.base_charges.value())
    .bind(order.created_at)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ {order} inserted");
    Ok(order)
}

/// Writes every caller-controlled column of the order. `settlement_status` is left alone.
pub async fn update_order(order: &Order, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let updated = sqlx::query_as(
        r#"
            UPDATE orders SET
                client_id = $1,
                partner_id = $2,
                order_type_id = $3,
                company_id = $4,
                status_id = $5,
                fees = $6,
                base_charges = $7,
                payment_status = $8,
                updated_at = $9
            WHERE id = $10
            RETURNING *;
        "#,
    )
    .bind(order.client_id)
    .bind(order.partner_id)
    .bind(order.order_type_id)
    .bind(order.company_id)
    .bind(order.status_id)
    .bind(order.fees.value())
    .bind(order.base_charges.value())
    .bind(order.payment_status)
    .bind(order.updated_at)
    .bind(order.id)
    .fetch_optional(conn)
    .await?;
    trace!("🗃️ {order} updated");
    Ok(updated)
}

pub async fn set_settlement_status(
    id: i64,
    settled: bool,
    updated_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("UPDATE orders SET settlement_status = $1, updated_at = $2 WHERE id = $3 RETURNING *")
        .bind(settled)
        .bind(updated_at)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Deletes the order. Receipts, expenses, settlements, documents and comments go with it.
pub async fn delete_order(id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1").bind(id).execute(conn).await?;
    let deleted = result.rows_affected() > 0;
    if deleted {
        debug!("🗃️ Order #{id} and its children have been deleted");
    }
    Ok(deleted)
}
