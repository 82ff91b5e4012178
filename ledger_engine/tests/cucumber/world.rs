use std::collections::HashMap;

use cucumber::World;
use ledger_engine::LedgerError;

use crate::support::fixtures::LedgerFixture;

#[derive(Default, Debug, World)]
pub struct LedgerWorld {
    pub system: Option<LedgerFixture>,
    /// Partner ids by the name used in the feature file
    pub partners: HashMap<String, i64>,
    /// Order ids by the name used in the feature file
    pub orders: HashMap<String, i64>,
    pub last_error: Option<LedgerError>,
}

impl LedgerWorld {
    pub async fn system(&mut self) -> &LedgerFixture {
        if self.system.is_none() {
            self.system = Some(LedgerFixture::new().await);
        }
        self.system.as_ref().expect("Ledger system not initialised")
    }

    pub fn partner_id(&self, name: &str) -> i64 {
        *self.partners.get(name).unwrap_or_else(|| panic!("Partner '{name}' has not been set up"))
    }

    pub fn order_id(&self, name: &str) -> i64 {
        *self.orders.get(name).unwrap_or_else(|| panic!("Order '{name}' has not been set up"))
    }
}
