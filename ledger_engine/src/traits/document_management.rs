use chrono::{DateTime, Utc};

use crate::{
    db_types::{Comment, NewOrderDocument, OrderDocument, SentDocumentStatus},
    traits::LedgerError,
};

/// The `DocumentManagement` trait defines the behaviour for tracking the paperwork attached to an order. File
/// contents are stored elsewhere; only their paths are recorded here.
#[allow(async_fn_in_trait)]
pub trait DocumentManagement {
    async fn insert_order_document(&self, document: NewOrderDocument) -> Result<OrderDocument, LedgerError>;
    async fn fetch_order_document(&self, id: i64) -> Result<Option<OrderDocument>, LedgerError>;
    /// Writes `file_path`, `status` and `uploaded_at` of the document.
    async fn update_order_document(&self, document: &OrderDocument) -> Result<OrderDocument, LedgerError>;
    async fn fetch_documents_for_order(&self, order_id: i64) -> Result<Vec<OrderDocument>, LedgerError>;

    async fn insert_sent_document_status(
        &self,
        order_id: i64,
        document_id: i64,
        status_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<SentDocumentStatus, LedgerError>;
    /// The dispatch log for the order, oldest first.
    async fn fetch_sent_document_statuses(&self, order_id: i64) -> Result<Vec<SentDocumentStatus>, LedgerError>;

    async fn insert_comment(
        &self,
        order_id: i64,
        text: &str,
        file_path: Option<&str>,
        created_at: DateTime<Utc>,
    ) -> Result<Comment, LedgerError>;
    async fn fetch_comments_for_order(&self, order_id: i64) -> Result<Vec<Comment>, LedgerError>;
}
