//! Map coordinates and the tracked-position sum type.
//!
//! While a person is in transit their position is unknown by design.
//! [`TrackedPosition`] makes that a checked state instead of a nullable
//! field: presentation code must handle `InTransit` explicitly.

use serde::{Deserialize, Serialize};

/// A point on the city map, in map units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: i32,
    /// Vertical coordinate.
    pub y: i32,
}

impl Position {
    /// Build a position from coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Where a person currently is, if anywhere fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "position")]
pub enum TrackedPosition {
    /// A fixed, known map position.
    Known(Position),
    /// The person is on a transport line; no fixed position exists.
    InTransit,
}

impl TrackedPosition {
    /// Return the known position, or `None` while in transit.
    pub const fn known(self) -> Option<Position> {
        match self {
            Self::Known(p) => Some(p),
            Self::InTransit => None,
        }
    }

    /// Whether the person is in transit.
    pub const fn is_in_transit(self) -> bool {
        matches!(self, Self::InTransit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_position_is_extractable() {
        let p = TrackedPosition::Known(Position::new(10, -4));
        assert_eq!(p.known(), Some(Position::new(10, -4)));
        assert!(!p.is_in_transit());
    }

    #[test]
    fn in_transit_has_no_position() {
        let p = TrackedPosition::InTransit;
        assert_eq!(p.known(), None);
        assert!(p.is_in_transit());
    }

    #[test]
    fn serde_tags_variants() {
        let json = serde_json::to_string(&TrackedPosition::InTransit).ok();
        assert_eq!(json.as_deref(), Some("{\"kind\":\"in_transit\"}"));
    }
}
