use crate::{
    db_types::{
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
    },
    traits::LedgerError,
};

/// The `DirectoryManagement` trait defines the behaviour for maintaining the reference data that orders point to:
/// partners, clients, companies and their registrars, order types with their required documents, and the order and
/// document status vocabularies.
#[allow(async_fn_in_trait)]
pub trait DirectoryManagement {
    async fn insert_partner(&self, partner: NewPartner) -> Result<Partner, LedgerError>;
    async fn fetch_partner(&self, id: i64) -> Result<Option<Partner>, LedgerError>;
    async fn fetch_partner_by_email(&self, email: &str) -> Result<Option<Partner>, LedgerError>;
    async fn fetch_partner_by_phone(&self, phone: &str) -> Result<Option<Partner>, LedgerError>;
    async fn fetch_partners(&self) -> Result<Vec<Partner>, LedgerError>;
    async fn update_partner_revenue_share(&self, id: i64, share: f64) -> Result<Partner, LedgerError>;

    async fn insert_client(&self, client: NewClient) -> Result<Client, LedgerError>;
    async fn fetch_client(&self, id: i64) -> Result<Option<Client>, LedgerError>;
    async fn fetch_client_by_email(&self, email: &str) -> Result<Option<Client>, LedgerError>;
    async fn fetch_client_by_phone(&self, phone: &str) -> Result<Option<Client>, LedgerError>;
    async fn fetch_clients(&self) -> Result<Vec<Client>, LedgerError>;

    async fn insert_registrar(&self, name: &str) -> Result<Registrar, LedgerError>;
    async fn fetch_registrars(&self) -> Result<Vec<Registrar>, LedgerError>;
    async fn insert_company(&self, name: &str, registrar_id: i64) -> Result<Company, LedgerError>;
    async fn fetch_companies(&self) -> Result<Vec<Company>, LedgerError>;

    async fn insert_document_type(&self, name: &str, description: Option<&str>) -> Result<DocumentType, LedgerError>;
    async fn fetch_document_types(&self) -> Result<Vec<DocumentType>, LedgerError>;
    /// Creates the order type and its required-document links together. Nothing is written if any link fails.
    async fn insert_order_type(
        &self,
        name: &str,
        description: Option<&str>,
        required_documents: &[i64],
    ) -> Result<OrderType, LedgerError>;
    async fn fetch_order_types(&self) -> Result<Vec<OrderType>, LedgerError>;
    /// Marks the document type as required for orders of the given type. Linking twice is a no-op.
    async fn link_document_type(&self, order_type_id: i64, document_type_id: i64) -> Result<(), LedgerError>;
    async fn required_documents(&self, order_type_id: i64) -> Result<Vec<DocumentType>, LedgerError>;
    /// Fails with a data integrity error while any order type still requires the document type.
    async fn delete_document_type(&self, document_type_id: i64) -> Result<bool, LedgerError>;
    async fn delete_order_type(&self, order_type_id: i64) -> Result<bool, LedgerError>;

    async fn insert_order_status(&self, name: &str, description: Option<&str>) -> Result<OrderStatus, LedgerError>;
    async fn fetch_order_statuses(&self) -> Result<Vec<OrderStatus>, LedgerError>;
    async fn fetch_order_status_by_name(&self, name: &str) -> Result<Option<OrderStatus>, LedgerError>;

    async fn insert_document_status_type(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<DocumentStatusType, LedgerError>;
    async fn fetch_document_status_types(&self) -> Result<Vec<DocumentStatusType>, LedgerError>;
}
