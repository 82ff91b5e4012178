use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use ledger_common::Money;
use ledger_engine::{
    db_types::{NewClient, NewLedgerEntry, NewOrder, NewPartner, Order, Partner},
    events::EventProducers,
    DirectoryApi,
    DocumentsApi,
    LedgerError,
    ManualClock,
    OrderFlowApi,
    OrderMutation,
    SqliteDatabase,
};

use super::prepare_env::{prepare_test_env, random_db_path, tear_down_db};

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

/// A fresh database with one client, one company and one order type, plus the APIs wired to a manual clock.
#[derive(Debug)]
pub struct LedgerFixture {
    pub db: SqliteDatabase,
    pub clock: ManualClock,
    pub orders: OrderFlowApi<SqliteDatabase, ManualClock>,
    pub directory: DirectoryApi<SqliteDatabase>,
    pub documents: DocumentsApi<SqliteDatabase, ManualClock>,
    pub client_id: i64,
    pub company_id: i64,
    pub order_type_id: i64,
    statuses: HashMap<String, i64>,
}

impl LedgerFixture {
    pub async fn new() -> Self {
        Self::with_producers(EventProducers::default()).await
    }

    pub async fn with_producers(producers: EventProducers) -> Self {
        let db = prepare_test_env(&random_db_path()).await;
        let clock = ManualClock::new(start_time());
        let orders = OrderFlowApi::new(db.clone(), clock.clone(), producers);
        let directory = DirectoryApi::new(db.clone());
        let documents = DocumentsApi::new(db.clone(), clock.clone());
        let client = directory
            .create_client(NewClient::new("Jane Doe", "jane@example.test").with_phone("555-0100"))
            .await
            .expect("Error creating client");
        let registrar = directory.create_registrar("Delaware").await.expect("Error creating registrar");
        let company = directory.create_company("Acme Holdings", registrar.id).await.expect("Error creating company");
        let order_type =
            directory.create_order_type("Incorporation", Some("New company"), &[]).await.expect("Error creating type");
        let statuses = directory
            .order_statuses()
            .await
            .expect("Error fetching statuses")
            .into_iter()
            .map(|s| (s.name, s.id))
            .collect();
        Self {
            db,
            clock,
            orders,
            directory,
            documents,
            client_id: client.id,
            company_id: company.id,
            order_type_id: order_type.id,
            statuses,
        }
    }

    pub fn status(&self, name: &str) -> i64 {
        *self.statuses.get(name).unwrap_or_else(|| panic!("Unknown status {name}"))
    }

    pub async fn add_partner(&self, email: &str, share: f64) -> Partner {
        let partner = NewPartner::new("Referral Partner", email).with_revenue_share(share);
        self.directory.create_partner(partner).await.expect("Error creating partner")
    }

    /// Creates a `New` order with the given fees and base charges (in whole currency units).
    pub async fn add_order(&self, partner_id: i64, fees: i64, base_charges: i64) -> Order {
        let order = NewOrder::new(self.client_id, partner_id, self.order_type_id, self.company_id, self.status("New"))
            .with_fees(Money::from_major(fees))
            .with_base_charges(Money::from_major(base_charges));
        self.orders.create_order(order).await.expect("Error creating order")
    }

    pub async fn add_expenses(&self, order_id: i64, amounts: &[i64]) {
        for &amount in amounts {
            let entry = NewLedgerEntry::new(order_id, Money::from_major(amount)).with_description("Filing fee");
            self.orders.add_expense(entry).await.expect("Error adding expense");
        }
    }

    pub async fn add_receipt(&self, order_id: i64, amount: i64) {
        let entry = NewLedgerEntry::new(order_id, Money::from_major(amount)).with_description("Wire transfer");
        self.orders.add_receipt(entry).await.expect("Error adding receipt");
    }

    pub async fn set_status(&self, order_id: i64, status: &str) -> Result<Order, LedgerError> {
        let mutation = OrderMutation::default().with_new_status(self.status(status));
        self.orders.submit_order_mutation(order_id, mutation).await
    }

    pub async fn set_paid(&self, order_id: i64, paid: bool) -> Result<Order, LedgerError> {
        let mutation = OrderMutation::default().with_payment_status(paid);
        self.orders.submit_order_mutation(order_id, mutation).await
    }

    pub async fn count_rows(&self, table: &str, order_id: i64) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table} WHERE order_id = $1"))
            .bind(order_id)
            .fetch_one(self.db.pool())
            .await
            .expect("Error counting rows")
    }

    pub async fn tear_down(self) {
        let Self { db, orders, directory, documents, .. } = self;
        drop((orders, directory, documents));
        tear_down_db(db).await;
    }
}
