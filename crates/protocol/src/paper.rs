//! Paper sizing for print rendering.
//!
//! A paper size is either an explicit width/height pair or a named format;
//! the two representations are alternatives and are never merged. The
//! margin is independent and optional: an absent margin decodes back to
//! `None`, not to a margin of empty strings.

use serde::{Deserialize, Serialize};

/// Paper dimensions and orientation used when rendering to a paged format.
///
/// All dimension fields are engine-syntax strings such as `"5in"` or
/// `"200mm"`; empty strings are omitted from the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperSize {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub width: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub height: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub orientation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<PaperMargin>,
}

impl PaperSize {
    /// True for the natural zero value, i.e. "never set".
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Per-edge margins, independent of the size representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaperMargin {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub top: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bottom: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub left: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub right: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_height_roundtrip() {
        let size = PaperSize {
            width: "5in".into(),
            height: "10in".into(),
            ..PaperSize::default()
        };

        let json = serde_json::to_value(&size).unwrap();
        // The named-format representation is not synthesized.
        assert!(json.get("format").is_none());
        assert!(json.get("margin").is_none());

        let decoded: PaperSize = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, size);
    }

    #[test]
    fn test_named_format_roundtrip() {
        let size = PaperSize {
            format: "A4".into(),
            orientation: "landscape".into(),
            ..PaperSize::default()
        };

        let json = serde_json::to_value(&size).unwrap();
        assert!(json.get("width").is_none());
        assert!(json.get("height").is_none());

        let decoded: PaperSize = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, size);
    }

    #[test]
    fn test_margin_absence_decodes_to_none() {
        let decoded: PaperSize = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(decoded.margin, None);
        assert!(decoded.is_zero());
    }

    #[test]
    fn test_margin_roundtrip() {
        let size = PaperSize {
            margin: Some(PaperMargin {
                top: "1in".into(),
                bottom: "2in".into(),
                left: "3in".into(),
                right: "4in".into(),
            }),
            ..PaperSize::default()
        };

        let json = serde_json::to_value(&size).unwrap();
        let decoded: PaperSize = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, size);
        assert!(!decoded.is_zero());
    }
}
