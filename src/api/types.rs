//! Wire and domain types shared by the session core and the HTTP client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Classification networks offered by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelId {
    #[serde(rename = "resnet")]
    ResNet,
    #[serde(rename = "efficientnet")]
    EfficientNet,
    #[serde(rename = "mobilenet")]
    MobileNet,
}

/// A model identifier outside the closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown model '{0}' (expected one of: resnet, efficientnet, mobilenet)")]
pub struct UnknownModel(pub String);

impl ModelId {
    pub const ALL: [ModelId; 3] = [ModelId::ResNet, ModelId::EfficientNet, ModelId::MobileNet];

    /// Identifier sent to the service as `model_name`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::ResNet => "resnet",
            ModelId::EfficientNet => "efficientnet",
            ModelId::MobileNet => "mobilenet",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelId::ResNet => "ResNet50",
            ModelId::EfficientNet => "EfficientNet",
            ModelId::MobileNet => "MobileNetV3",
        }
    }

    /// Parse a user choice where the empty string means "no selection".
    pub fn parse_choice(raw: &str) -> Result<Option<ModelId>, UnknownModel> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl FromStr for ModelId {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        ModelId::ALL
            .into_iter()
            .find(|model| model.as_str() == lowered)
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationPayload {
    #[serde(deserialize_with = "de_image_id")]
    pub image_id: u64,
    pub class_name: String,
    /// Preformatted by the service, e.g. "97.12%".
    pub confidence: String,
    pub model_used: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// One past classification, as listed by the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(deserialize_with = "de_image_id")]
    pub image_id: u64,
    #[serde(default)]
    pub class_name: Option<String>,
    #[serde(default)]
    pub confidence: Option<String>,
    /// Image reference relative to the service's media root.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub model_used: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl HistoryRecord {
    pub fn label(&self) -> &str {
        self.class_name.as_deref().unwrap_or("unclassified")
    }
}

/// The service sends ids either as JSON numbers or as numeric strings.
fn de_image_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(id) => Ok(id),
        RawId::Text(text) => text
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid image_id '{}'", text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_choice_accepts_empty_as_none() {
        assert_eq!(ModelId::parse_choice(""), Ok(None));
        assert_eq!(ModelId::parse_choice("   "), Ok(None));
    }

    #[test]
    fn parse_choice_is_case_insensitive() {
        assert_eq!(ModelId::parse_choice("ResNet"), Ok(Some(ModelId::ResNet)));
        assert_eq!(
            ModelId::parse_choice(" mobilenet "),
            Ok(Some(ModelId::MobileNet))
        );
    }

    #[test]
    fn parse_choice_rejects_unknown() {
        let err = ModelId::parse_choice("vgg16").unwrap_err();
        assert_eq!(err, UnknownModel("vgg16".to_string()));
    }

    #[test]
    fn payload_accepts_string_image_id() {
        let json = r#"{
            "image_id": "12",
            "class_name": "Clownfish",
            "confidence": "97.12%",
            "model_used": "resnet",
            "summary": "A small fish.",
            "url": "https://en.wikipedia.org/wiki/Clownfish"
        }"#;
        let payload: ClassificationPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.image_id, 12);
        assert_eq!(payload.confidence, "97.12%");
    }

    #[test]
    fn history_record_tolerates_missing_fields() {
        let record: HistoryRecord = serde_json::from_str(r#"{"image_id": 3}"#).unwrap();
        assert_eq!(record.image_id, 3);
        assert_eq!(record.label(), "unclassified");
    }
}
