//! Collision layers and filtering

use serde::{Deserialize, Serialize};

/// A collision layer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CollisionLayer(pub u32);

impl CollisionLayer {
    /// Default layer
    pub const DEFAULT: Self = Self(0);
    /// Terrain height-field and river banks
    pub const TERRAIN: Self = Self(1);
    /// The player's boat
    pub const BOAT: Self = Self(2);
    /// Creatures driven by behaviors
    pub const CREATURES: Self = Self(3);

    /// Layer as a bitmask
    pub const fn as_mask(&self) -> u32 {
        1 << self.0
    }
}

/// Membership and filter masks of a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionGroups {
    /// Layers the body belongs to
    pub memberships: u32,
    /// Layers the body collides with
    pub filter: u32,
}

impl CollisionGroups {
    /// Collide with everything
    pub const ALL: Self = Self {
        memberships: u32::MAX,
        filter: u32::MAX,
    };

    /// Collide with nothing
    pub const NONE: Self = Self {
        memberships: 0,
        filter: 0,
    };

    /// Everything except one layer (walkers pass through the terrain
    /// collider and follow the height-field instead)
    pub const fn all_except(layer: CollisionLayer) -> Self {
        Self {
            memberships: u32::MAX,
            filter: !layer.as_mask(),
        }
    }

    /// Check if the filter accepts a layer
    pub fn collides_with(&self, layer: CollisionLayer) -> bool {
        self.filter & layer.as_mask() != 0
    }

    /// Check if two bodies can touch
    pub fn can_collide(&self, other: &CollisionGroups) -> bool {
        (self.memberships & other.filter) != 0 && (other.memberships & self.filter) != 0
    }
}

impl Default for CollisionGroups {
    fn default() -> Self {
        Self::ALL
    }
}
