//! Process-wide state shared by every request.
//!
//! Constructed once in `main` and handed to the router inside an `Arc`.

use crate::config::PortalConfig;
use crate::store::{AccountStore, DocumentStore, StoreError};

pub struct CoreState {
    pub documents: DocumentStore,
    pub accounts: AccountStore,
    pub config: PortalConfig,
}

impl CoreState {
    /// Empty stores. Demo accounts are seeded when the config asks for them.
    pub fn new(config: PortalConfig) -> Result<Self, StoreError> {
        let accounts = if config.seed_demo_accounts {
            let accounts = AccountStore::with_demo_accounts()?;
            tracing::info!(accounts = accounts.len()?, "Demo accounts seeded");
            accounts
        } else {
            AccountStore::new()
        };

        Ok(Self {
            documents: DocumentStore::new(),
            accounts,
            config,
        })
    }
}
