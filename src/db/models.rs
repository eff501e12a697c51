use serde::{Deserialize, Serialize};
use tracing::debug;

/// Free-form, unvalidated card fields a user can edit before saving.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CardFields {
    pub company_name: String,
    pub card_holder: String,
    pub designation: String,
    pub mobile_number: String,
    pub email: String,
    pub website: String,
    pub address: String,
    pub customer_type: String,
    pub remarks: String,
}

impl CardFields {
    /// Set a field by its wire name. Returns `false` for unknown names.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "company_name" => &mut self.company_name,
            "card_holder" => &mut self.card_holder,
            "designation" => &mut self.designation,
            "mobile_number" => &mut self.mobile_number,
            "email" => &mut self.email,
            "website" => &mut self.website,
            "address" => &mut self.address,
            "customer_type" => &mut self.customer_type,
            "remarks" => &mut self.remarks,
            _ => {
                debug!(field = name, "ignoring unknown card field");
                return false;
            }
        };
        *slot = value;
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BusinessCardRecord {
    pub id: u64,
    #[serde(alias = "username", default)]
    pub owner: String,
    #[serde(flatten)]
    pub fields: CardFields,
    #[serde(default)]
    pub image_path: String,
}

impl BusinessCardRecord {
    /// Column names in export order.
    pub const COLUMNS: [&'static str; 12] = [
        "id",
        "owner",
        "company_name",
        "card_holder",
        "designation",
        "mobile_number",
        "email",
        "website",
        "address",
        "customer_type",
        "remarks",
        "image_path",
    ];

    /// Every column after `id`, in `COLUMNS` order.
    pub fn text_columns(&self) -> [&str; 11] {
        let f = &self.fields;
        [
            &self.owner,
            &f.company_name,
            &f.card_holder,
            &f.designation,
            &f.mobile_number,
            &f.email,
            &f.website,
            &f.address,
            &f.customer_type,
            &f.remarks,
            &self.image_path,
        ]
    }
}
