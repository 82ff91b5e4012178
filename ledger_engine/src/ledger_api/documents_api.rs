use std::fmt::Debug;

use chrono::{DateTime, Utc};
use ledger_common::helpers::non_blank;
use log::*;

use crate::{
    clock::Clock,
    db_types::{Comment, NewOrderDocument, OrderDocument, SentDocumentStatus},
    traits::{DocumentManagement, LedgerError, ValidationError},
};

/// Tracks the paperwork for orders: the documents attached to them, the log of document dispatch states, and
/// comments.
pub struct DocumentsApi<B, C> {
    db: B,
    clock: C,
}

impl<B, C> Debug for DocumentsApi<B, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentsApi")
    }
}

impl<B, C> DocumentsApi<B, C> {
    pub fn new(db: B, clock: C) -> Self {
        Self { db, clock }
    }
}

/// Sets `uploaded_at` on `updated` if its file path differs from `previous` and is not blank.
///
/// Writing the same path again leaves the upload time alone.
pub fn stamp_upload(previous: Option<&str>, updated: &mut OrderDocument, now: DateTime<Utc>) {
    let path = non_blank(updated.file_path.as_deref());
    if path.is_some() && path.as_deref() != previous {
        updated.uploaded_at = Some(now);
    }
    updated.file_path = path;
}

impl<B, C> DocumentsApi<B, C>
where
    B: DocumentManagement,
    C: Clock,
{
    /// Attaches a document to an order. If a file is given, the document counts as uploaded now.
    pub async fn attach_document(&self, document: NewOrderDocument) -> Result<OrderDocument, LedgerError> {
        let file_path = non_blank(document.file_path.as_deref());
        let uploaded_at = file_path.as_ref().map(|_| self.clock.now());
        let document = self.db.insert_order_document(NewOrderDocument { file_path, uploaded_at, ..document }).await?;
        debug!("🗂️ Document #{} attached to order #{}", document.id, document.order_id);
        Ok(document)
    }

    /// Replaces the document's file. `uploaded_at` moves only if the path actually changed.
    pub async fn set_document_file(&self, document_id: i64, file_path: Option<&str>) -> Result<OrderDocument, LedgerError> {
        let current = self.document(document_id).await?;
        let mut updated = current.clone();
        updated.file_path = file_path.map(String::from);
        stamp_upload(current.file_path.as_deref(), &mut updated, self.clock.now());
        if updated == current {
            trace!("🗂️ Document #{document_id} is unchanged");
            return Ok(current);
        }
        self.db.update_order_document(&updated).await
    }

    pub async fn set_document_status(&self, document_id: i64, status: &str) -> Result<OrderDocument, LedgerError> {
        let status = non_blank(Some(status)).ok_or(ValidationError::MissingField("status"))?;
        let mut document = self.document(document_id).await?;
        document.status = status;
        self.db.update_order_document(&document).await
    }

    pub async fn document(&self, document_id: i64) -> Result<OrderDocument, LedgerError> {
        self.db
            .fetch_order_document(document_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("document #{document_id}")))
    }

    pub async fn documents_for_order(&self, order_id: i64) -> Result<Vec<OrderDocument>, LedgerError> {
        self.db.fetch_documents_for_order(order_id).await
    }

    /// Appends an entry to the order's document dispatch log.
    pub async fn record_sent_status(
        &self,
        order_id: i64,
        document_id: i64,
        status_id: i64,
    ) -> Result<SentDocumentStatus, LedgerError> {
        let document = self.document(document_id).await?;
        if document.order_id != order_id {
            return Err(ValidationError::UnknownReference { entity: "document", id: document_id }.into());
        }
        self.db.insert_sent_document_status(order_id, document_id, status_id, self.clock.now()).await
    }

    pub async fn sent_statuses(&self, order_id: i64) -> Result<Vec<SentDocumentStatus>, LedgerError> {
        self.db.fetch_sent_document_statuses(order_id).await
    }

    pub async fn add_comment(&self, order_id: i64, text: &str, file_path: Option<&str>) -> Result<Comment, LedgerError> {
        let text = non_blank(Some(text)).ok_or(ValidationError::MissingField("comment_text"))?;
        let file_path = non_blank(file_path);
        self.db.insert_comment(order_id, &text, file_path.as_deref(), self.clock.now()).await
    }

    pub async fn comments(&self, order_id: i64) -> Result<Vec<Comment>, LedgerError> {
        self.db.fetch_comments_for_order(order_id).await
    }
}
