//! Reference data: partners, clients, companies, order and document types, and status vocabularies.
use ledger_common::DEFAULT_REVENUE_SHARE;
use log::*;
use sqlx::SqliteConnection;

use crate::db_types::{
    Client,
    Company,
    DocumentStatusType,
    DocumentType,
    NewClient,
    NewPartner,
    OrderStatus,
    OrderType,
    Partner,
    Registrar,
};

//--------------------------------------       Partners      ---------------------------------------------------------

pub async fn insert_partner(partner: NewPartner, conn: &mut SqliteConnection) -> Result<Partner, sqlx::Error> {
    let partner: Partner = sqlx::query_as(
        r#"
            INSERT INTO partners (name, email, phone, revenue_share, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(partner.name)
    .bind(partner.email)
    .bind(partner.phone)
    .bind(partner.revenue_share.unwrap_or(DEFAULT_REVENUE_SHARE))
    .bind(partner.created_at)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Partner #{} ({}) created", partner.id, partner.email);
    Ok(partner)
}

pub async fn fetch_partner(id: i64, conn: &mut SqliteConnection) -> Result<Option<Partner>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM partners WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_partner_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<Partner>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM partners WHERE email = $1").bind(email).fetch_optional(conn).await
}

pub async fn fetch_partner_by_phone(phone: &str, conn: &mut SqliteConnection) -> Result<Option<Partner>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM partners WHERE phone = $1").bind(phone).fetch_optional(conn).await
}

pub async fn fetch_partners(conn: &mut SqliteConnection) -> Result<Vec<Partner>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM partners ORDER BY name, id").fetch_all(conn).await
}

pub async fn update_partner_revenue_share(
    id: i64,
    share: f64,
    conn: &mut SqliteConnection,
) -> Result<Option<Partner>, sqlx::Error> {
    let partner = sqlx::query_as("UPDATE partners SET revenue_share = $1 WHERE id = $2 RETURNING *")
        .bind(share)
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(partner)
}

//--------------------------------------       Clients       ---------------------------------------------------------

pub async fn insert_client(client: NewClient, conn: &mut SqliteConnection) -> Result<Client, sqlx::Error> {
    let client: Client = sqlx::query_as(
        r#"
            INSERT INTO clients (name, email, phone, address, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(client.name)
    .bind(client.email)
    .bind(client.phone)
    .bind(client.address)
    .bind(client.created_at)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Client #{} ({}) created", client.id, client.email);
    Ok(client)
}

pub async fn fetch_client(id: i64, conn: &mut SqliteConnection) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM clients WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_client_by_email(email: &str, conn: &mut SqliteConnection) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM clients WHERE email = $1").bind(email).fetch_optional(conn).await
}

pub async fn fetch_client_by_phone(phone: &str, conn: &mut SqliteConnection) -> Result<Option<Client>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM clients WHERE phone = $1").bind(phone).fetch_optional(conn).await
}

pub async fn fetch_clients(conn: &mut SqliteConnection) -> Result<Vec<Client>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM clients ORDER BY name, id").fetch_all(conn).await
}

//--------------------------------------  Registrars / Companies ------------------------------------------------------

pub async fn insert_registrar(name: &str, conn: &mut SqliteConnection) -> Result<Registrar, sqlx::Error> {
    sqlx::query_as("INSERT INTO registrars (name) VALUES ($1) RETURNING *").bind(name).fetch_one(conn).await
}

pub async fn fetch_registrars(conn: &mut SqliteConnection) -> Result<Vec<Registrar>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM registrars ORDER BY name").fetch_all(conn).await
}

pub async fn insert_company(
    name: &str,
    registrar_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Company, sqlx::Error> {
    sqlx::query_as("INSERT INTO companies (name, registrar_id) VALUES ($1, $2) RETURNING *")
        .bind(name)
        .bind(registrar_id)
        .fetch_one(conn)
        .await
}

pub async fn fetch_company(id: i64, conn: &mut SqliteConnection) -> Result<Option<Company>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM companies WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_companies(conn: &mut SqliteConnection) -> Result<Vec<Company>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM companies ORDER BY name, id").fetch_all(conn).await
}

//-------------------------------------- Order types / Document types --------------------------------------------------

pub async fn insert_document_type(
    name: &str,
    description: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<DocumentType, sqlx::Error> {
    sqlx::query_as("INSERT INTO document_types (name, description) VALUES ($1, $2) RETURNING *")
        .bind(name)
        .bind(description)
        .fetch_one(conn)
        .await
}

pub async fn fetch_document_types(conn: &mut SqliteConnection) -> Result<Vec<DocumentType>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM document_types ORDER BY name").fetch_all(conn).await
}

pub async fn delete_document_type(id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM document_types WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn insert_order_type(
    name: &str,
    description: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<OrderType, sqlx::Error> {
    sqlx::query_as("INSERT INTO order_types (name, description) VALUES ($1, $2) RETURNING *")
        .bind(name)
        .bind(description)
        .fetch_one(conn)
        .await
}

pub async fn fetch_order_type(id: i64, conn: &mut SqliteConnection) -> Result<Option<OrderType>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_types WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_order_types(conn: &mut SqliteConnection) -> Result<Vec<OrderType>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_types ORDER BY name").fetch_all(conn).await
}

/// Removes the order type together with its required-document links.
pub async fn delete_order_type(id: i64, conn: &mut SqliteConnection) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM order_types WHERE id = $1").bind(id).execute(conn).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn link_document_type(
    order_type_id: i64,
    document_type_id: i64,
    conn: &mut SqliteConnection,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT OR IGNORE INTO order_type_documents (order_type_id, document_type_id) VALUES ($1, $2)")
        .bind(order_type_id)
        .bind(document_type_id)
        .execute(conn)
        .await?;
    trace!("🗃️ Document type #{document_type_id} is required for order type #{order_type_id}");
    Ok(())
}

pub async fn required_documents(
    order_type_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<DocumentType>, sqlx::Error> {
    sqlx::query_as(
        r#"
            SELECT document_types.* FROM document_types
            JOIN order_type_documents ON order_type_documents.document_type_id = document_types.id
            WHERE order_type_documents.order_type_id = $1
            ORDER BY document_types.name
        "#,
    )
    .bind(order_type_id)
    .fetch_all(conn)
    .await
}

//--------------------------------------       Statuses      ---------------------------------------------------------

pub async fn insert_order_status(
    name: &str,
    description: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<OrderStatus, sqlx::Error> {
    sqlx::query_as("INSERT INTO order_statuses (name, description) VALUES ($1, $2) RETURNING *")
        .bind(name)
        .bind(description)
        .fetch_one(conn)
        .await
}

pub async fn fetch_order_status(id: i64, conn: &mut SqliteConnection) -> Result<Option<OrderStatus>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_statuses WHERE id = $1").bind(id).fetch_optional(conn).await
}

pub async fn fetch_order_status_by_name(
    name: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<OrderStatus>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_statuses WHERE name = $1").bind(name).fetch_optional(conn).await
}

pub async fn fetch_order_statuses(conn: &mut SqliteConnection) -> Result<Vec<OrderStatus>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_statuses ORDER BY id").fetch_all(conn).await
}

pub async fn insert_document_status_type(
    name: &str,
    description: Option<&str>,
    conn: &mut SqliteConnection,
) -> Result<DocumentStatusType, sqlx::Error> {
    sqlx::query_as("INSERT INTO document_status_types (name, description) VALUES ($1, $2) RETURNING *")
        .bind(name)
        .bind(description)
        .fetch_one(conn)
        .await
}

pub async fn fetch_document_status_types(conn: &mut SqliteConnection) -> Result<Vec<DocumentStatusType>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM document_status_types ORDER BY id").fetch_all(conn).await
}
