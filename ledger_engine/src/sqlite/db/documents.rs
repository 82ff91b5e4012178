use chrono::{DateTime, Utc};
use log::*;
use sqlx::SqliteConnection;

use crate::db_types::{Comment, NewOrderDocument, OrderDocument, SentDocumentStatus};

pub async fn insert_order_document(
    document: NewOrderDocument,
    conn: &mut SqliteConnection,
) -> Result<OrderDocument, sqlx::Error> {
    let document: OrderDocument = sqlx::query_as(
        r#"
            INSERT INTO order_documents (order_id, document_type_id, file_path, uploaded_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(document.order_id)
    .bind(document.document_type_id)
    .bind(document.file_path)
    .bind(document.uploaded_at)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Document #{} attached to order #{}", document.id, document.order_id);
    Ok(document)
}

pub async fn fetch_order_document(id: i64, conn: &mut SqliteConnection) -> Result<Option<OrderDocument>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_documents WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn update_order_document(
    document: &OrderDocument,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderDocument>, sqlx::Error> {
    sqlx::query_as("UPDATE order_documents SET file_path = $1, status = $2, uploaded_at = $3 WHERE id = $4 RETURNING *")
        .bind(document.file_path.as_deref())
        .bind(document.status.as_str())
        .bind(document.uploaded_at)
        .bind(document.id)
        .fetch_optional(conn)
        .await
}

pub async fn fetch_documents_for_order(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderDocument>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_documents WHERE order_id = $1 ORDER BY id").bind(order_id).fetch_all(conn).await
}

pub async fn insert_sent_document_status(
    order_id: i64,
    document_id: i64,
    status_id: i64,
    created_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<SentDocumentStatus, sqlx::Error> {
    sqlx::query_as(
        r#"
            INSERT INTO sent_document_statuses (order_id, document_id, status_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(document_id)
    .bind(status_id)
    .bind(created_at)
    .fetch_one(conn)
    .await
}

pub async fn fetch_sent_document_statuses(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<SentDocumentStatus>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM sent_document_statuses WHERE order_id = $1 ORDER BY created_at, id")
        .bind(order_id)
        .fetch_all(conn)
        .await
}

pub async fn insert_comment(
    order_id: i64,
    text: &str,
    file_path: Option<&str>,
    created_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO comments (order_id, comment_text, file_path, created_at) VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(order_id)
    .bind(text)
    .bind(file_path)
    .bind(created_at)
    .fetch_one(conn)
    .await
}

pub async fn fetch_comments_for_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Comment>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM comments WHERE order_id = $1 ORDER BY created_at, id")
        .bind(order_id)
        .fetch_all(conn)
        .await
}
