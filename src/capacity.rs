//! Capacity model: team size to carryable weight and back.
//!
//! Every weight comparison in the crate goes through this module.

use std::fmt;

use crate::error::CapacityError;
use crate::types::Weight;

/// Capacity tier a robot is currently working under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TeamState {
    Single,
    Pair,
    Triple,
}

impl TeamState {
    /// All tiers, smallest team first.
    pub const ALL: [TeamState; 3] = [TeamState::Single, TeamState::Pair, TeamState::Triple];

    /// Number of robots in a team of this tier.
    pub fn size(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Pair => 2,
            Self::Triple => 3,
        }
    }

    /// Heaviest item a team of this tier can carry.
    pub fn max_weight(self) -> Weight {
        match self {
            Self::Single => 2000,
            Self::Pair => 2600,
            Self::Triple => 3000,
        }
    }

    /// Tier for a team of `size` robots.
    pub fn from_size(size: usize) -> Result<Self, CapacityError> {
        match size {
            0 => Err(CapacityError::NotEnoughRobots),
            1 => Ok(Self::Single),
            2 => Ok(Self::Pair),
            3 => Ok(Self::Triple),
            _ => Err(CapacityError::TooManyRobots {
                size,
                max: MAX_TEAM_SIZE,
            }),
        }
    }

    /// Smallest tier that can carry `weight`.
    pub fn for_weight(weight: Weight) -> Result<Self, CapacityError> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.max_weight() >= weight)
            .ok_or(CapacityError::Unsupported {
                weight,
                max: Self::Triple.max_weight(),
            })
    }
}

impl fmt::Display for TeamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Pair => write!(f, "pair"),
            Self::Triple => write!(f, "triple"),
        }
    }
}

/// Largest team the capacity model supports.
pub const MAX_TEAM_SIZE: usize = 3;

/// Maximum weight a team of `size` robots may carry.
pub fn team_weight(size: usize) -> Result<Weight, CapacityError> {
    TeamState::from_size(size).map(TeamState::max_weight)
}

/// Minimum number of robots needed to carry `weight`.
pub fn required_robots(weight: Weight) -> Result<usize, CapacityError> {
    TeamState::for_weight(weight).map(TeamState::size)
}

/// Whether an item is too heavy for one robot and forces a team.
pub fn is_heavy(weight: Weight) -> bool {
    weight > TeamState::Single.max_weight()
}
