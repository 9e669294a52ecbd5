//! Product model

use serde::{Deserialize, Serialize};

use super::{Details, require_name_and_category};

/// Product fields supplied by clients
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductDetails {
    pub product_name: String,
    pub group_name: String,
    pub description: String,
    pub alias: String,
    pub reorder_point: f64,
    pub product_category: String,
    pub sub_category: String,
    pub opening_stock: f64,
    pub unit: String,
    pub cost_price: f64,
    pub sale_price: f64,
    pub tax: String,
    pub hsn: String,
}

impl Details for ProductDetails {
    const LABEL: &'static str = "Product";
    const PATH: &'static str = "products";
    const COLLECTION: &'static str = "products.json";

    fn validate(&self) -> Result<(), String> {
        require_name_and_category(Self::LABEL, &self.product_name, &self.product_category)
    }
}
