//! Geometry value types.
//!
//! The zero value doubles as the "never configured" marker: the engine
//! reports an all-zero rect for a page with no clip rectangle set, and the
//! codec keeps that indistinguishable from `Default` on purpose.

use serde::{Deserialize, Serialize};

/// A clipping rectangle in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub top: i64,
    pub left: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub fn new(top: i64, left: i64, width: i64, height: i64) -> Self {
        Self { top, left, width, height }
    }

    /// True for the natural zero value, i.e. "never set".
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// A scroll position in page coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Position {
    pub top: i64,
    pub left: i64,
}

impl Position {
    pub fn new(top: i64, left: i64) -> Self {
        Self { top, left }
    }

    /// True for the natural zero value, i.e. "never set".
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_roundtrip() {
        let rect = Rect::new(1, 2, 3, 4);
        let json = serde_json::to_value(rect).unwrap();
        let decoded: Rect = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, rect);
    }

    #[test]
    fn test_zero_value_is_unset() {
        assert!(Rect::default().is_zero());
        assert!(Position::default().is_zero());
        assert!(!Rect::new(0, 0, 1, 1).is_zero());

        // Missing fields decode to the zero value.
        let decoded: Rect = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(decoded.is_zero());
    }
}
