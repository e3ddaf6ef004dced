use serde::{Deserialize, Serialize};
use serde_json::Number;

/// One catalog entry, exactly as it appears in the source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MedicineRecord {
    pub medicine_name: String,
    /// Active ingredients.
    pub composition: String,
    pub uses: String,
    pub sideeffects: String,
    pub image_url: String,
    pub manufacturer: String,
    pub excellent_review_percentage: Number,
    pub average_review_percentage: Number,
    pub poor_review_percentage: Number,
    #[serde(rename = "_id")]
    pub id: String,
    pub price: Price,
    pub packsizelabel: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Prices show up both as bare numbers and as display strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(Number),
    Label(String),
}

impl MedicineRecord {
    /// Text attribute by its wire name, used by the substring filter.
    pub fn text_field(&self, key: &str) -> Option<&str> {
        let value = match key {
            "medicine_name" => &self.medicine_name,
            "composition" => &self.composition,
            "uses" => &self.uses,
            "sideeffects" => &self.sideeffects,
            "image_url" => &self.image_url,
            "manufacturer" => &self.manufacturer,
            "_id" => &self.id,
            "packsizelabel" => &self.packsizelabel,
            "type" => &self.kind,
            _ => return None,
        };
        Some(value.as_str())
    }

    pub fn to_map(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }
}
