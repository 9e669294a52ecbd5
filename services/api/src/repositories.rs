//! Collection stores and their bootstrap

use std::path::Path;

use anyhow::{Context, Result};
use auth::{
    models::{USERS_FILE, User},
    repositories::UserRepository,
};
use common::{JsonFileStore, config::BootstrapConfig};
use tracing::info;

use crate::models::{Client, ClientDetails, Details, Product, ProductDetails, Supplier, SupplierDetails};

/// One store per collection file inside the data directory
#[derive(Clone)]
pub struct Collections {
    pub users: JsonFileStore<User>,
    pub products: JsonFileStore<Product>,
    pub clients: JsonFileStore<Client>,
    pub suppliers: JsonFileStore<Supplier>,
}

impl Collections {
    /// Open the collections under `data_dir`
    pub fn open(data_dir: &Path) -> Self {
        Self {
            users: JsonFileStore::in_dir(data_dir, USERS_FILE),
            products: JsonFileStore::in_dir(data_dir, ProductDetails::COLLECTION),
            clients: JsonFileStore::in_dir(data_dir, ClientDetails::COLLECTION),
            suppliers: JsonFileStore::in_dir(data_dir, SupplierDetails::COLLECTION),
        }
    }

    /// Create missing collection files and seed the administrator account
    /// into an empty user collection
    pub async fn bootstrap(&self, admin: &BootstrapConfig) -> Result<()> {
        let seed = UserRepository::admin_seed(
            &admin.admin_username,
            &admin.admin_email,
            &admin.admin_password,
        )?;

        if self
            .users
            .ensure_initialized(vec![seed])
            .await
            .with_context(|| format!("Failed to initialize {}", self.users.path().display()))?
        {
            info!("Seeded default administrator '{}'", admin.admin_username);
        }

        self.products
            .ensure_initialized(Vec::new())
            .await
            .with_context(|| format!("Failed to initialize {}", self.products.path().display()))?;
        self.clients
            .ensure_initialized(Vec::new())
            .await
            .with_context(|| format!("Failed to initialize {}", self.clients.path().display()))?;
        self.suppliers
            .ensure_initialized(Vec::new())
            .await
            .with_context(|| format!("Failed to initialize {}", self.suppliers.path().display()))?;

        Ok(())
    }
}
