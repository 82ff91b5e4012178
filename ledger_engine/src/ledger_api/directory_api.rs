use std::fmt::Debug;

use ledger_common::{helpers::non_blank, RevenueShare};
use log::*;

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
    traits::{DirectoryManagement, LedgerError, ValidationError},
};

/// Maintains the reference data orders point to.
///
/// Partners and clients need a name and an email. Emails and phone numbers are unique among partners, and among
/// clients.
pub struct DirectoryApi<B> {
    db: B,
}

impl<B> Debug for DirectoryApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DirectoryApi")
    }
}

impl<B> DirectoryApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    non_blank(Some(value)).ok_or(ValidationError::MissingField(field))
}

impl<B> DirectoryApi<B>
where B: DirectoryManagement
{
    pub async fn create_partner(&self, partner: NewPartner) -> Result<Partner, LedgerError> {
        let name = required("name", &partner.name)?;
        let email = required("email", &partner.email)?;
        let phone = non_blank(partner.phone.as_deref());
        if let Some(share) = partner.revenue_share {
            RevenueShare::new(share).map_err(ValidationError::from)?;
        }
        if self.db.fetch_partner_by_email(&email).await?.is_some() {
            return Err(ValidationError::Duplicate("email".into()).into());
        }
        if let Some(phone) = &phone {
            if self.db.fetch_partner_by_phone(phone).await?.is_some() {
                return Err(ValidationError::Duplicate("phone".into()).into());
            }
        }
        let partner = self.db.insert_partner(NewPartner { name, email, phone, ..partner }).await?;
        info!("📇️ Partner #{} ({}) registered", partner.id, partner.name);
        Ok(partner)
    }

    pub async fn create_client(&self, client: NewClient) -> Result<Client, LedgerError> {
        let name = required("name", &client.name)?;
        let email = required("email", &client.email)?;
        let phone = non_blank(client.phone.as_deref());
        let address = non_blank(client.address.as_deref());
        if self.db.fetch_client_by_email(&email).await?.is_some() {
            return Err(ValidationError::Duplicate("email".into()).into());
        }
        if let Some(phone) = &phone {
            if self.db.fetch_client_by_phone(phone).await?.is_some() {
                return Err(ValidationError::Duplicate("phone".into()).into());
            }
        }
        let client = self.db.insert_client(NewClient { name, email, phone, address, ..client }).await?;
        info!("📇️ Client #{} ({}) registered", client.id, client.name);
        Ok(client)
    }

    pub async fn partner(&self, id: i64) -> Result<Option<Partner>, LedgerError> {
        self.db.fetch_partner(id).await
    }

    pub async fn partners(&self) -> Result<Vec<Partner>, LedgerError> {
        self.db.fetch_partners().await
    }

    pub async fn client(&self, id: i64) -> Result<Option<Client>, LedgerError> {
        self.db.fetch_client(id).await
    }

    pub async fn clients(&self) -> Result<Vec<Client>, LedgerError> {
        self.db.fetch_clients().await
    }

    /// Changes the partner's share for settlements recorded from now on. Past settlements are not recomputed.
    pub async fn set_partner_revenue_share(&self, partner_id: i64, share: f64) -> Result<Partner, LedgerError> {
        let share = RevenueShare::new(share).map_err(ValidationError::from)?;
        let partner = self.db.update_partner_revenue_share(partner_id, share.value()).await?;
        debug!("📇️ Partner #{partner_id} now receives {share}");
        Ok(partner)
    }

    pub async fn create_registrar(&self, name: &str) -> Result<Registrar, LedgerError> {
        let name = required("name", name)?;
        self.db.insert_registrar(&name).await
    }

    pub async fn registrars(&self) -> Result<Vec<Registrar>, LedgerError> {
        self.db.fetch_registrars().await
    }

    pub async fn create_company(&self, name: &str, registrar_id: i64) -> Result<Company, LedgerError> {
        let name = required("name", name)?;
        let registrars = self.db.fetch_registrars().await?;
        if !registrars.iter().any(|r| r.id == registrar_id) {
            return Err(ValidationError::UnknownReference { entity: "registrar", id: registrar_id }.into());
        }
        self.db.insert_company(&name, registrar_id).await
    }

    pub async fn companies(&self) -> Result<Vec<Company>, LedgerError> {
        self.db.fetch_companies().await
    }

    pub async fn create_document_type(&self, name: &str, description: Option<&str>) -> Result<DocumentType, LedgerError> {
        let name = required("name", name)?;
        let description = non_blank(description);
        self.db.insert_document_type(&name, description.as_deref()).await
    }

    pub async fn document_types(&self) -> Result<Vec<DocumentType>, LedgerError> {
        self.db.fetch_document_types().await
    }

    /// Fails with [`LedgerError::DataIntegrity`] while an order type or an order document still uses the type.
    pub async fn delete_document_type(&self, document_type_id: i64) -> Result<bool, LedgerError> {
        self.db.delete_document_type(document_type_id).await
    }

    /// Creates an order type and marks the given document types as required for it.
    pub async fn create_order_type(
        &self,
        name: &str,
        description: Option<&str>,
        required_documents: &[i64],
    ) -> Result<OrderType, LedgerError> {
        let name = required("name", name)?;
        let known = self.db.fetch_document_types().await?;
        if let Some(&id) = required_documents.iter().find(|id| !known.iter().any(|d| d.id == **id)) {
            return Err(ValidationError::UnknownReference { entity: "document type", id }.into());
        }
        let description = non_blank(description);
        let order_type = self.db.insert_order_type(&name, description.as_deref(), required_documents).await?;
        debug!("📇️ Order type '{}' requires {} document(s)", order_type.name, required_documents.len());
        Ok(order_type)
    }

    pub async fn order_types(&self) -> Result<Vec<OrderType>, LedgerError> {
        self.db.fetch_order_types().await
    }

    pub async fn require_document(&self, order_type_id: i64, document_type_id: i64) -> Result<(), LedgerError> {
        self.db.link_document_type(order_type_id, document_type_id).await
    }

    pub async fn required_documents(&self, order_type_id: i64) -> Result<Vec<DocumentType>, LedgerError> {
        self.db.required_documents(order_type_id).await
    }

    /// Removes the type and its document links. Fails with [`LedgerError::DataIntegrity`] while any order uses it.
    pub async fn delete_order_type(&self, order_type_id: i64) -> Result<bool, LedgerError> {
        self.db.delete_order_type(order_type_id).await
    }

    pub async fn create_order_status(&self, name: &str, description: Option<&str>) -> Result<OrderStatus, LedgerError> {
        let name = required("name", name)?;
        let description = non_blank(description);
        self.db.insert_order_status(&name, description.as_deref()).await
    }

    pub async fn order_statuses(&self) -> Result<Vec<OrderStatus>, LedgerError> {
        self.db.fetch_order_statuses().await
    }

    pub async fn order_status_by_name(&self, name: &str) -> Result<Option<OrderStatus>, LedgerError> {
        self.db.fetch_order_status_by_name(name).await
    }

    pub async fn create_document_status_type(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<DocumentStatusType, LedgerError> {
        let name = required("name", name)?;
        let description = non_blank(description);
        self.db.insert_document_status_type(&name, description.as_deref()).await
    }

    pub async fn document_status_types(&self) -> Result<Vec<DocumentStatusType>, LedgerError> {
        self.db.fetch_document_status_types().await
    }
}
