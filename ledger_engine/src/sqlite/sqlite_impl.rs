//! `SqliteDatabase` is a concrete implementation of a ledger engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use log::*;
use sqlx::SqlitePool;

use super::{
    db::{directory, documents, new_pool, run_migrations},
    unit_of_work::SqliteUnitOfWork,
};
use crate::{
    config::LedgerConfig,
    db_types::{
        Client,
        Comment,
        Company,
        DocumentStatusType,
        DocumentType,
        NewClient,
        NewOrderDocument,
        NewPartner,
        OrderDocument,
        OrderStatus,
        OrderType,
        Partner,
        Registrar,
        SentDocumentStatus,
    },
    traits::{DirectoryManagement, DocumentManagement, LedgerDatabase, LedgerError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Opens (creating if necessary) the database at `config.database_url` and brings its schema up to date.
    pub async fn new_with_config(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let pool = new_pool(config).await?;
        run_migrations(&pool).await?;
        info!("🗃️ Ledger database ready at {}", config.database_url);
        Ok(Self { url: config.database_url.clone(), pool })
    }

    /// Creates a new database API object using the default pool settings.
    pub async fn new_with_url(url: &str) -> Result<Self, LedgerError> {
        Self::new_with_config(&LedgerConfig::new(url)).await
    }

    /// Returns a reference to the underlying connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl LedgerDatabase for SqliteDatabase {
    type UnitOfWork = SqliteUnitOfWork;

    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn begin(&self) -> Result<Self::UnitOfWork, LedgerError> {
        let tx = self.pool.begin().await?;
        Ok(SqliteUnitOfWork::new(tx))
    }

    async fn close(&mut self) -> Result<(), LedgerError> {
        self.pool.close().await;
        debug!("🗃️ Connection pool for {} closed", self.url);
        Ok(())
    }
}

impl DirectoryManagement for SqliteDatabase {
    async fn insert_partner(&self, partner: NewPartner) -> Result<Partner, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::insert_partner(partner, &mut conn).await?)
    }

    async fn fetch_partner(&self, id: i64) -> Result<Option<Partner>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::fetch_partner(id, &mut conn).await?)
    }

    async fn fetch_partner_by_email(&self, email: &str) -> Result<Option<Partner>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::fetch_partner_by_email(email, &mut conn).await?)
    }

    async fn fetch_partner_by_phone(&self, phone: &str) -> Result<Option<Partner>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::fetch_partner_by_phone(phone, &mut conn).await?)
    }

    async fn fetch_partners(&self) -> Result<Vec<Partner>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::fetch_partners(&mut conn).await?)
    }

    async fn update_partner_revenue_share(&self, id: i64, share: f64) -> Result<Partner, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        directory::update_partner_revenue_share(id, share, &mut conn)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("partner #{id}")))
    }

    async fn insert_client(&self, client: NewClient) -> Result<Client, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::insert_client(client, &mut conn).await?)
    }

    async fn fetch_client(&self, id: i64) -> Result<Option<Client>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::fetch_client(id, &mut conn).await?)
    }

    async fn fetch_client_by_email(&self, email: &str) -> Result<Option<Client>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::fetch_client_by_email(email, &mut conn).await?)
    }

    async fn fetch_client_by_phone(&self, phone: &str) -> Result<Option<Client>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::fetch_client_by_phone(phone, &mut conn).await?)
    }

    async fn fetch_clients(&self) -> Result<Vec<Client>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::fetch_clients(&mut conn).await?)
    }

    async fn insert_registrar(&self, name: &str) -> Result<Registrar, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::insert_registrar(name, &mut conn).await?)
    }

    async fn fetch_registrars(&self) -> Result<Vec<Registrar>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::fetch_registrars(&mut conn).await?)
    }

    async fn insert_company(&self, name: &str, registrar_id: i64) -> Result<Company, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::insert_company(name, registrar_id, &mut conn).await?)
    }

    async fn fetch_companies(&self) -> Result<Vec<Company>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::fetch_companies(&mut conn).await?)
    }

    async fn insert_document_type(&self, name: &str, description: Option<&str>) -> Result<DocumentType, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::insert_document_type(name, description, &mut conn).await?)
    }

    async fn fetch_document_types(&self) -> Result<Vec<DocumentType>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::fetch_document_types(&mut conn).await?)
    }

    async fn insert_order_type(
        &self,
        name: &str,
        description: Option<&str>,
        required_documents: &[i64],
    ) -> Result<OrderType, LedgerError> {
        let mut tx = self.pool.begin().await?;
        let order_type = directory::insert_order_type(name, description, &mut tx).await?;
        for &document_type_id in required_documents {
            directory::link_document_type(order_type.id, document_type_id, &mut tx).await?;
        }
        tx.commit().await?;
        Ok(order_type)
    }

    async fn fetch_order_types(&self) -> Result<Vec<OrderType>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::fetch_order_types(&mut conn).await?)
    }

    async fn link_document_type(&self, order_type_id: i64, document_type_id: i64) -> Result<(), LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::link_document_type(order_type_id, document_type_id, &mut conn).await?)
    }

    async fn required_documents(&self, order_type_id: i64) -> Result<Vec<DocumentType>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::required_documents(order_type_id, &mut conn).await?)
    }

    async fn delete_document_type(&self, document_type_id: i64) -> Result<bool, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::delete_document_type(document_type_id, &mut conn).await?)
    }

    async fn delete_order_type(&self, order_type_id: i64) -> Result<bool, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::delete_order_type(order_type_id, &mut conn).await?)
    }

    async fn insert_order_status(&self, name: &str, description: Option<&str>) -> Result<OrderStatus, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::insert_order_status(name, description, &mut conn).await?)
    }

    async fn fetch_order_statuses(&self) -> Result<Vec<OrderStatus>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::fetch_order_statuses(&mut conn).await?)
    }

    async fn fetch_order_status_by_name(&self, name: &str) -> Result<Option<OrderStatus>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::fetch_order_status_by_name(name, &mut conn).await?)
    }

    async fn insert_document_status_type(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<DocumentStatusType, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::insert_document_status_type(name, description, &mut conn).await?)
    }

    async fn fetch_document_status_types(&self) -> Result<Vec<DocumentStatusType>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(directory::fetch_document_status_types(&mut conn).await?)
    }
}

impl DocumentManagement for SqliteDatabase {
    async fn insert_order_document(&self, document: NewOrderDocument) -> Result<OrderDocument, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(documents::insert_order_document(document, &mut conn).await?)
    }

    async fn fetch_order_document(&self, id: i64) -> Result<Option<OrderDocument>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(documents::fetch_order_document(id, &mut conn).await?)
    }

    async fn update_order_document(&self, document: &OrderDocument) -> Result<OrderDocument, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        documents::update_order_document(document, &mut conn)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("document #{}", document.id)))
    }

    async fn fetch_documents_for_order(&self, order_id: i64) -> Result<Vec<OrderDocument>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(documents::fetch_documents_for_order(order_id, &mut conn).await?)
    }

    async fn insert_sent_document_status(
        &self,
        order_id: i64,
        document_id: i64,
        status_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<SentDocumentStatus, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(documents::insert_sent_document_status(order_id, document_id, status_id, created_at, &mut conn).await?)
    }

    async fn fetch_sent_document_statuses(&self, order_id: i64) -> Result<Vec<SentDocumentStatus>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(documents::fetch_sent_document_statuses(order_id, &mut conn).await?)
    }

    async fn insert_comment(
        &self,
        order_id: i64,
        text: &str,
        file_path: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<Comment, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(documents::insert_comment(order_id, text, file_path, created_at, &mut conn).await?)
    }

    async fn fetch_comments_for_order(&self, order_id: i64) -> Result<Vec<Comment>, LedgerError> {
        let mut conn = self.pool.acquire().await?;
        Ok(documents::fetch_comments_for_order(order_id, &mut conn).await?)
    }
}
