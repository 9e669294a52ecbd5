//! Business entity models
//!
//! Every stored entity is a [`Stamped`] wrapper around the client-supplied
//! details, flattened so the JSON stays one flat object per record.

use chrono::{DateTime, Utc};
use common::Record;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

pub mod party;
pub mod product;

pub use party::{BankDetails, ClientDetails, ContactPerson, PartyProfile, SupplierDetails};
pub use product::ProductDetails;

pub type Product = Stamped<ProductDetails>;
pub type Client = Stamped<ClientDetails>;
pub type Supplier = Stamped<SupplierDetails>;

/// Client-editable part of an entity
pub trait Details: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Human-readable entity name used in response messages
    const LABEL: &'static str;
    /// URL segment under `/api`
    const PATH: &'static str;
    /// Collection file name
    const COLLECTION: &'static str;

    /// Check the fields required to create a record
    fn validate(&self) -> Result<(), String>;
}

/// Server-assigned fields around an entity's details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stamped<D> {
    pub id: String,
    #[serde(flatten)]
    pub details: D,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
}

impl<D: Details> Record for Stamped<D> {
    type Draft = D;

    fn from_draft(id: String, now: DateTime<Utc>, details: D) -> Self {
        Stamped {
            id,
            details,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
        self.version += 1;
    }
}

/// Both required fields must be present and not blank
pub(crate) fn require_name_and_category(
    label: &str,
    name: &str,
    category: &str,
) -> Result<(), String> {
    if name.trim().is_empty() || category.trim().is_empty() {
        return Err(format!("{label} name and category are required"));
    }
    Ok(())
}
