use nested_attrs::Record;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ID_ATTRIBUTE: &str = "id";

/// Static configuration of a model type.
///
/// ```
/// use nested_model::ModelConfig;
///
/// let config: ModelConfig =
///     serde_json::from_str(r#"{"id_attribute": "uuid", "defaults": {"net": {"mtu": 1500}}}"#).unwrap();
/// assert_eq!(config.id_attribute, "uuid");
/// assert!(config.defaults.contains_key("net"));
///
/// let empty: ModelConfig = serde_json::from_str("{}").unwrap();
/// assert_eq!(empty, ModelConfig::default());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Attribute whose value is cached as the model id.
    pub id_attribute: String,
    /// Attributes every new model starts from; initial attributes are deep
    /// merged on top.
    pub defaults: Record,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            id_attribute: DEFAULT_ID_ATTRIBUTE.to_string(),
            defaults: Record::new(),
        }
    }
}
