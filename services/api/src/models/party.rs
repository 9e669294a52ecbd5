//! Client and supplier models
//!
//! Both are trading parties with the same address, tax and banking profile;
//! only the name and category keys differ.

use serde::{Deserialize, Serialize};

use super::{Details, require_name_and_category};

/// Contact person attached to a party
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactPerson {
    pub name: String,
    pub designation: String,
    pub mobile: String,
    pub email: String,
}

/// Bank account of a party
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankDetails {
    pub account_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub ifsc_code: String,
}

/// Fields shared by clients and suppliers
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartyProfile {
    pub printed_name: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub pincode: String,
    pub gstin: String,
    pub gstin_type: String,
    pub state: String,
    pub country: String,
    pub contact_persons: Vec<ContactPerson>,
    pub bank_details: BankDetails,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientDetails {
    pub client_name: String,
    pub client_category: String,
    #[serde(flatten)]
    pub profile: PartyProfile,
}

impl Details for ClientDetails {
    const LABEL: &'static str = "Client";
    const PATH: &'static str = "clients";
    const COLLECTION: &'static str = "clients.json";

    fn validate(&self) -> Result<(), String> {
        require_name_and_category(Self::LABEL, &self.client_name, &self.client_category)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SupplierDetails {
    pub supplier_name: String,
    pub supplier_category: String,
    #[serde(flatten)]
    pub profile: PartyProfile,
}

impl Details for SupplierDetails {
    const LABEL: &'static str = "Supplier";
    const PATH: &'static str = "suppliers";
    const COLLECTION: &'static str = "suppliers.json";

    fn validate(&self) -> Result<(), String> {
        require_name_and_category(Self::LABEL, &self.supplier_name, &self.supplier_category)
    }
}
