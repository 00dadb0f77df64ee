//! Terrain and river queries
//!
//! The height-field and river geometry are owned by the world; behaviors see
//! them only through [`Environment`]. The river flows along +z and its water
//! edges at a given `z` are reported as two x positions.

use crate::math;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Width of the band between dry land and open water
pub const DEFAULT_MARGIN: f32 = 2.0;

/// Height and normal of the ground at a point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainSample {
    /// Ground height
    pub height: f32,
    /// Surface normal
    pub normal: Vec3,
}

impl TerrainSample {
    /// Flat ground at a height
    pub fn flat(height: f32) -> Self {
        Self {
            height,
            normal: Vec3::Y,
        }
    }
}

/// Coarse classification of a point relative to the river
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Dry land
    Land,
    /// Shallow band next to the bank
    Margin,
    /// Open water
    Water,
}

/// Zone with the signed cross-bank distance (negative on land)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneSample {
    /// Classification
    pub zone: Zone,
    /// Distance past the nearest water edge
    pub distance: f32,
}

/// Which side of the river
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BankSide {
    /// Smaller x
    Left,
    /// Larger x
    Right,
}

impl BankSide {
    /// Unit x direction pointing from this bank into the river
    pub fn into_water(&self) -> f32 {
        match self {
            BankSide::Left => 1.0,
            BankSide::Right => -1.0,
        }
    }
}

/// Water edge x positions at a longitudinal coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BankPositions {
    /// Left water edge
    pub left: f32,
    /// Right water edge
    pub right: f32,
}

impl BankPositions {
    /// Midpoint of the river
    pub fn center(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    /// River width
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Edge x for a side
    pub fn edge(&self, side: BankSide) -> f32 {
        match side {
            BankSide::Left => self.left,
            BankSide::Right => self.right,
        }
    }

    /// Side of the river an x position is closest to
    pub fn nearest_side(&self, x: f32) -> BankSide {
        if x < self.center() {
            BankSide::Left
        } else {
            BankSide::Right
        }
    }

    /// Signed distance past the nearest edge (positive over water)
    pub fn distance_into_water(&self, x: f32) -> f32 {
        (x - self.left).min(self.right - x)
    }
}

/// Terrain/river collaborator
pub trait Environment {
    /// Ground height and normal at a world point
    fn sample(&self, x: f32, z: f32) -> TerrainSample;

    /// Water edges at `z`
    fn bank_positions(&self, z: f32) -> BankPositions;

    /// Rate of change of the river's x position along z
    fn river_derivative(&self, z: f32) -> f32;

    /// Height of the water surface
    fn water_level(&self) -> f32 {
        0.0
    }

    /// Width of the margin band
    fn margin(&self) -> f32 {
        DEFAULT_MARGIN
    }

    /// Zone classification with signed cross-bank distance
    fn zone(&self, x: f32, z: f32) -> ZoneSample {
        let distance = self.bank_positions(z).distance_into_water(x);
        let zone = if distance < 0.0 {
            Zone::Land
        } else if distance < self.margin() {
            Zone::Margin
        } else {
            Zone::Water
        };
        ZoneSample { zone, distance }
    }

    /// Height a creature rests at: ground, or the water surface above it
    fn ground_height(&self, point: Vec2) -> f32 {
        self.sample(point.x, point.y).height.max(self.water_level())
    }

    /// Unit tangent of the river at `z`, pointing downstream
    fn river_tangent(&self, z: f32) -> Vec2 {
        math::try_normalize(Vec2::new(self.river_derivative(z), 1.0)).unwrap_or(Vec2::Y)
    }
}

/// Straight (optionally slanted) river with flat banks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StraightRiver {
    /// Left edge at z = 0
    pub left: f32,
    /// Right edge at z = 0
    pub right: f32,
    /// Edge drift in x per unit z
    pub slope: f32,
    /// Height of dry land
    pub land_height: f32,
    /// Height of the river bed
    pub bed_height: f32,
    /// Water surface height
    pub water_level: f32,
}

impl Default for StraightRiver {
    fn default() -> Self {
        Self {
            left: -20.0,
            right: 20.0,
            slope: 0.0,
            land_height: 1.0,
            bed_height: -3.0,
            water_level: 0.0,
        }
    }
}

impl StraightRiver {
    /// River between two x positions
    pub fn new(left: f32, right: f32) -> Self {
        Self {
            left,
            right,
            ..Default::default()
        }
    }

    /// Set bank drift
    pub fn with_slope(mut self, slope: f32) -> Self {
        self.slope = slope;
        self
    }

    /// Set land height
    pub fn with_land_height(mut self, height: f32) -> Self {
        self.land_height = height;
        self
    }
}

impl Environment for StraightRiver {
    fn sample(&self, x: f32, z: f32) -> TerrainSample {
        if self.bank_positions(z).distance_into_water(x) < 0.0 {
            TerrainSample::flat(self.land_height)
        } else {
            TerrainSample::flat(self.bed_height)
        }
    }

    fn bank_positions(&self, z: f32) -> BankPositions {
        BankPositions {
            left: self.left + self.slope * z,
            right: self.right + self.slope * z,
        }
    }

    fn river_derivative(&self, _z: f32) -> f32 {
        self.slope
    }

    fn water_level(&self) -> f32 {
        self.water_level
    }
}
