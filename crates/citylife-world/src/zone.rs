//! Zones: named rectangular regions of the city.
//!
//! A zone is immutable after creation. It carries the share of the
//! city's businesses it hosts (percentages sum to 100 across all zones)
//! and the welfare income range that seeds the starting balance of its
//! residents.

use citylife_types::{Position, ZoneId};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle on the city map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in map units.
    pub width: u32,
    /// Height in map units.
    pub height: u32,
}

impl Boundary {
    /// Build a boundary from its origin and size.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the given position lies inside the rectangle.
    ///
    /// Both edges are inclusive, matching the position-to-zone lookup
    /// used by presentation collaborators.
    pub fn contains(&self, position: Position) -> bool {
        let px = i64::from(position.x);
        let py = i64::from(position.y);
        let x0 = i64::from(self.x);
        let y0 = i64::from(self.y);
        px >= x0
            && px <= x0.saturating_add(i64::from(self.width))
            && py >= y0
            && py <= y0.saturating_add(i64::from(self.height))
    }

    /// The center of the rectangle, rounded toward the origin corner.
    pub fn center(&self) -> Position {
        let cx = i64::from(self.x).saturating_add(i64::from(self.width / 2));
        let cy = i64::from(self.y).saturating_add(i64::from(self.height / 2));
        Position::new(
            i32::try_from(cx).unwrap_or(self.x),
            i32::try_from(cy).unwrap_or(self.y),
        )
    }

    /// Draw a uniformly random position inside the rectangle (inclusive).
    pub fn random_position<R: Rng>(&self, rng: &mut R) -> Position {
        let dx = rng.random_range(0..=self.width);
        let dy = rng.random_range(0..=self.height);
        let px = i64::from(self.x).saturating_add(i64::from(dx));
        let py = i64::from(self.y).saturating_add(i64::from(dy));
        Position::new(
            i32::try_from(px).unwrap_or(self.x),
            i32::try_from(py).unwrap_or(self.y),
        )
    }
}

/// The welfare income range of a zone.
///
/// New residents draw their starting money uniformly from this range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRange {
    /// Minimum starting balance.
    pub min: u64,
    /// Maximum starting balance.
    pub max: u64,
}

impl IncomeRange {
    /// Build an income range; `min` and `max` are swapped if reversed.
    pub const fn new(min: u64, max: u64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Draw a uniformly random income from the range (inclusive).
    pub fn sample<R: Rng>(&self, rng: &mut R) -> u64 {
        if self.min >= self.max {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }
}

/// A named rectangular region of the city.
///
/// Identity is the name (unique across the simulation). Zones are
/// referenced by ID, never copied, by persons, businesses, and
/// transport lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Unique identifier.
    pub id: ZoneId,
    /// Unique human-readable name.
    pub name: String,
    /// Rectangular boundary on the map.
    pub boundary: Boundary,
    /// Share of the city's businesses hosted here, in percent (0-100).
    pub business_share: u8,
    /// Welfare income range for residents.
    pub welfare: IncomeRange,
}

impl Zone {
    /// Create a zone with a freshly generated ID.
    pub fn new(
        name: impl Into<String>,
        boundary: Boundary,
        business_share: u8,
        welfare: IncomeRange,
    ) -> Self {
        Self {
            id: ZoneId::new(),
            name: name.into(),
            boundary,
            business_share,
            welfare,
        }
    }

    /// Draw a random position inside the zone boundary.
    pub fn random_position<R: Rng>(&self, rng: &mut R) -> Position {
        self.boundary.random_position(rng)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn test_zone() -> Zone {
        Zone::new(
            "Centro",
            Boundary::new(100, 200, 50, 40),
            30,
            IncomeRange::new(500, 1500),
        )
    }

    #[test]
    fn boundary_contains_edges() {
        let b = Boundary::new(0, 0, 10, 10);
        assert!(b.contains(Position::new(0, 0)));
        assert!(b.contains(Position::new(10, 10)));
        assert!(!b.contains(Position::new(11, 10)));
        assert!(!b.contains(Position::new(-1, 5)));
    }

    #[test]
    fn random_position_stays_inside() {
        let zone = test_zone();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let p = zone.random_position(&mut rng);
            assert!(zone.boundary.contains(p));
        }
    }

    #[test]
    fn income_sample_stays_in_range() {
        let range = IncomeRange::new(500, 1500);
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            let income = range.sample(&mut rng);
            assert!((500..=1500).contains(&income));
        }
    }

    #[test]
    fn income_range_normalizes_reversed_bounds() {
        let range = IncomeRange::new(900, 100);
        assert_eq!(range.min, 100);
        assert_eq!(range.max, 900);
    }

    #[test]
    fn degenerate_income_range_is_constant() {
        let range = IncomeRange::new(700, 700);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(range.sample(&mut rng), 700);
    }

    #[test]
    fn center_is_inside() {
        let zone = test_zone();
        assert!(zone.boundary.contains(zone.boundary.center()));
    }
}
