use std::fmt::Display;

use chrono::{DateTime, Utc};
use ledger_common::{Money, RevenueShare, RevenueShareError};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

//--------------------------------------       Partner       ---------------------------------------------------------
/// A referral source. Partners receive a share of the proceeds of every order they refer.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Partner {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// The raw fraction as stored. Use [`Partner::revenue_share`] to obtain a validated value.
    #[sqlx(rename = "revenue_share")]
    pub raw_revenue_share: f64,
    pub created_at: DateTime<Utc>,
}

impl Partner {
    pub fn revenue_share(&self) -> Result<RevenueShare, RevenueShareError> {
        RevenueShare::new(self.raw_revenue_share)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPartner {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Defaults to 50% if not provided
    pub revenue_share: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl NewPartner {
    pub fn new<S: Into<String>>(name: S, email: S) -> Self {
        Self { name: name.into(), email: email.into(), created_at: Utc::now(), ..Default::default() }
    }

    pub fn with_phone<S: Into<String>>(mut self, phone: S) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_revenue_share(mut self, share: f64) -> Self {
        self.revenue_share = Some(share);
        self
    }
}

//--------------------------------------       Client        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Client {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewClient {
    pub fn new<S: Into<String>>(name: S, email: S) -> Self {
        Self { name: name.into(), email: email.into(), created_at: Utc::now(), ..Default::default() }
    }

    pub fn with_phone<S: Into<String>>(mut self, phone: S) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address<S: Into<String>>(mut self, address: S) -> Self {
        self.address = Some(address.into());
        self
    }
}

//--------------------------------------  Registrar / Company ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Registrar {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub registrar_id: i64,
}

//-------------------------------------- OrderType / DocumentType ------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// A kind of document that may be required for an order type, e.g. "Certificate of incorporation".
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct DocumentType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

//--------------------------------------     OrderStatus     ---------------------------------------------------------
/// A named order state. The set of statuses is data, not code, but the names `Completed` and `Failed` carry meaning
/// for the settlement engine. See [`TerminalStatus`].
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderStatus {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl OrderStatus {
    pub fn terminal(&self) -> Option<TerminalStatus> {
        TerminalStatus::from_name(&self.name)
    }
}

pub const COMPLETED_STATUS: &str = "Completed";
pub const FAILED_STATUS: &str = "Failed";

/// The order statuses that trigger a settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalStatus {
    Completed,
    Failed,
}

impl TerminalStatus {
    /// Status names are matched exactly. "completed" is not a terminal status.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            COMPLETED_STATUS => Some(Self::Completed),
            FAILED_STATUS => Some(Self::Failed),
            _ => None,
        }
    }
}

impl Display for TerminalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalStatus::Completed => write!(f, "{COMPLETED_STATUS}"),
            TerminalStatus::Failed => write!(f, "{FAILED_STATUS}"),
        }
    }
}

//--------------------------------------        Order        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub client_id: i64,
    pub partner_id: i64,
    pub order_type_id: i64,
    pub company_id: i64,
    pub status_id: i64,
    pub fees: Money,
    pub base_charges: Money,
    pub payment_status: bool,
    /// Derived from `payment_status`. Only the settlement engine sets this flag.
    pub settlement_status: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Order #{}", self.id)
    }
}

//--------------------------------------      NewOrder       ---------------------------------------------------------
/// The details of an order as supplied by the caller. The references are optional here so that incomplete
/// submissions can be rejected with a meaningful validation error rather than a database constraint failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOrder {
    pub client_id: Option<i64>,
    pub partner_id: Option<i64>,
    pub order_type_id: Option<i64>,
    pub company_id: Option<i64>,
    pub status_id: Option<i64>,
    pub fees: Money,
    pub base_charges: Money,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    pub fn new(client_id: i64, partner_id: i64, order_type_id: i64, company_id: i64, status_id: i64) -> Self {
        Self {
            client_id: Some(client_id),
            partner_id: Some(partner_id),
            order_type_id: Some(order_type_id),
            company_id: Some(company_id),
            status_id: Some(status_id),
            ..Default::default()
        }
    }

    pub fn with_fees(mut self, fees: Money) -> Self {
        self.fees = fees;
        self
    }

    pub fn with_base_charges(mut self, base_charges: Money) -> Self {
        self.base_charges = base_charges;
        self
    }
}

/// A [`NewOrder`] whose mandatory references have all been supplied.
#[derive(Debug, Clone)]
pub struct ValidatedNewOrder {
    pub client_id: i64,
    pub partner_id: i64,
    pub order_type_id: i64,
    pub company_id: i64,
    pub status_id: i64,
    pub fees: Money,
    pub base_charges: Money,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------  Receipt / Expense  ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Receipt {
    pub id: i64,
    pub order_id: i64,
    pub amount: Money,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub order_id: i64,
    pub amount: Money,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A money movement against an order. Used to create both receipts and expenses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLedgerEntry {
    pub order_id: i64,
    pub amount: Money,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewLedgerEntry {
    pub fn new(order_id: i64, amount: Money) -> Self {
        Self { order_id, amount, description: None, created_at: Utc::now() }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }
}

//--------------------------------------     Settlement      ---------------------------------------------------------
/// The computed split of an order's proceeds between the referring partner and the business, recorded once for
/// every terminal transition of the order. Settlements are never updated.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Settlement {
    pub id: i64,
    pub order_id: i64,
    pub partner_id: i64,
    pub partner_amount: Money,
    pub self_amount: Money,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSettlement {
    pub order_id: i64,
    pub partner_id: i64,
    pub partner_amount: Money,
    pub self_amount: Money,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------   OrderDocument     ---------------------------------------------------------
pub const DOCUMENT_PENDING: &str = "pending";

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct OrderDocument {
    pub id: i64,
    pub order_id: i64,
    pub document_type_id: i64,
    pub file_path: Option<String>,
    pub status: String,
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrderDocument {
    pub order_id: i64,
    pub document_type_id: i64,
    pub file_path: Option<String>,
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl NewOrderDocument {
    pub fn new(order_id: i64, document_type_id: i64) -> Self {
        Self { order_id, document_type_id, file_path: None, uploaded_at: None }
    }

    pub fn with_file_path<S: Into<String>>(mut self, path: S) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct DocumentStatusType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// One entry in the log of document dispatch states for an order.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct SentDocumentStatus {
    pub id: i64,
    pub order_id: i64,
    pub document_id: i64,
    pub status_id: i64,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      Comment        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub order_id: i64,
    pub comment_text: String,
    pub file_path: Option<String>,
    pub created_at: DateTime<Utc>,
}
