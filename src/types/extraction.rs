use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::db::CardFields;

/// Response body of the extraction service. Every key is optional; a
/// missing or `null` key reads as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedFields {
    #[serde(deserialize_with = "lenient_string")]
    pub business_name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub name_of_card_holder: String,
    #[serde(deserialize_with = "lenient_string")]
    pub designation: String,
    #[serde(deserialize_with = "lenient_string")]
    pub contact_no: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub website: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
}

impl From<ExtractedFields> for CardFields {
    fn from(e: ExtractedFields) -> Self {
        CardFields {
            company_name: e.business_name,
            card_holder: e.name_of_card_holder,
            designation: e.designation,
            mobile_number: e.contact_no,
            email: e.email,
            website: e.website,
            address: e.address,
            ..CardFields::default()
        }
    }
}

/// Accept strings, numbers and booleans as text; `null` and anything
/// structured become empty.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}
