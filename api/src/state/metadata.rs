use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// ERC-721 metadata JSON as pinned at mint time and read back during scans.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NftMetadata {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub image: String,

    #[serde(default)]
    pub attributes: Vec<Attribute>,

    /// Fields other tools put in metadata (external_url, edition, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_type: Option<String>,
}

impl Attribute {
    pub fn text(trait_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: Value::String(value.into()),
            display_type: None,
        }
    }

    pub fn number(trait_type: impl Into<String>, value: u64) -> Self {
        Self {
            trait_type: trait_type.into(),
            value: Value::from(value),
            display_type: Some("number".to_string()),
        }
    }

    /// The value without JSON quoting.
    pub fn display_value(&self) -> String {
        match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl NftMetadata {
    pub fn attribute(&self, trait_type: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|a| a.trait_type == trait_type)
            .map(|a| &a.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_foreign_metadata() {
        let json = r#"{
            "name": "Ape #1",
            "image": "ipfs://QmHash/1.png",
            "edition": 1,
            "attributes": [
                {"trait_type": "Eyes", "value": "Laser"},
                {"trait_type": "Level", "value": 4, "display_type": "number"}
            ]
        }"#;
        let meta: NftMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.name, "Ape #1");
        assert_eq!(meta.description, "");
        assert_eq!(meta.attribute("Level"), Some(&Value::from(4)));
        assert_eq!(meta.extra.get("edition"), Some(&Value::from(1)));
    }

    #[test]
    fn test_text_attribute_omits_display_type() {
        let json = serde_json::to_value(Attribute::text("Eyes", "Laser")).unwrap();
        assert_eq!(json, serde_json::json!({"trait_type": "Eyes", "value": "Laser"}));
    }
}
