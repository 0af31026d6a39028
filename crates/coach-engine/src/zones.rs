//! Semantic map zone classification
//!
//! Maps a raw 2D position plus team affiliation to a coarse map zone.
//! The geometry is approximate (the river is modeled as a diagonal band,
//! jungles as quadrants) and injectable so thresholds can be tuned
//! independently of detection logic.

use crate::models::{Position, TeamSide};
use serde::{Deserialize, Serialize};

/// Zones that carry risk for the visiting team. Positions outside all
/// three are neutral ground and classify as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    River,
    EnemyJungle,
    EnemyTerritory,
}

impl Zone {
    pub fn label(&self) -> &'static str {
        match self {
            Zone::River => "river",
            Zone::EnemyJungle => "enemy jungle",
            Zone::EnemyTerritory => "enemy territory",
        }
    }
}

/// Approximate map geometry. The map is a square of `map_size` units
/// with the river running along the anti-diagonal.
#[derive(Debug, Clone, Copy)]
pub struct MapGeometry {
    pub map_size: f64,
    pub center: f64,
    /// Half-width of the diagonal river band.
    pub river_half_width: f64,
    /// How far past the anti-diagonal a position must be to count as
    /// deep enemy territory.
    pub territory_offset: f64,
}

impl Default for MapGeometry {
    fn default() -> Self {
        Self {
            map_size: 15_000.0,
            center: 7_500.0,
            river_half_width: 3_000.0,
            territory_offset: 5_000.0,
        }
    }
}

/// Pure classifier: identical inputs always yield identical outputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZoneClassifier {
    geometry: MapGeometry,
}

impl ZoneClassifier {
    pub fn new(geometry: MapGeometry) -> Self {
        Self { geometry }
    }

    /// Classify a position for a participant on the given side.
    pub fn classify(&self, position: Position, side: TeamSide) -> Option<Zone> {
        if self.in_river(position) {
            return Some(Zone::River);
        }
        if self.in_enemy_jungle(position, side) {
            return Some(Zone::EnemyJungle);
        }
        if self.in_enemy_territory(position, side) {
            return Some(Zone::EnemyTerritory);
        }
        None
    }

    fn in_river(&self, p: Position) -> bool {
        // Distance from the anti-diagonal x + y = map_size.
        let diag_dist = (p.x - (self.geometry.map_size - p.y)).abs();
        diag_dist < self.geometry.river_half_width
    }

    fn in_enemy_jungle(&self, p: Position, side: TeamSide) -> bool {
        let c = self.geometry.center;
        match side {
            // Blue spawns bottom-left; enemy jungle is the top-right quadrant.
            TeamSide::Blue => p.x > c && p.y > c && !self.in_river(p),
            TeamSide::Red => p.x < c && p.y < c && !self.in_river(p),
        }
    }

    fn in_enemy_territory(&self, p: Position, side: TeamSide) -> bool {
        let sum = p.x + p.y;
        match side {
            TeamSide::Blue => sum > self.geometry.map_size + self.geometry.territory_offset,
            TeamSide::Red => sum < self.geometry.map_size - self.geometry.territory_offset,
        }
    }
}
