//! One delivery leg: a destination plus the robots carrying toward it.
//!
//! Tasks are values. A robot replaces its task wholesale at every leg
//! transition instead of editing the one in flight.

use std::collections::BTreeSet;

use crate::capacity::TeamState;
use crate::error::CapacityError;
use crate::types::{Floor, MAILROOM_FLOOR, RobotId, Weight};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    destination: Floor,
    leader: RobotId,
    supporters: BTreeSet<RobotId>,
    /// Fixed at construction from the number of robots.
    team: TeamState,
}

impl Task {
    /// Single-robot leg.
    pub fn solo(robot: RobotId, destination: Floor) -> Self {
        Self {
            destination,
            leader: robot,
            supporters: BTreeSet::new(),
            team: TeamState::Single,
        }
    }

    /// Multi-robot leg carrying a load of `load` weight. The first robot
    /// leads; the rest support.
    pub fn for_team(
        robots: &[RobotId],
        destination: Floor,
        load: Weight,
    ) -> Result<Self, CapacityError> {
        let (&leader, rest) = robots.split_first().ok_or(CapacityError::NotEnoughRobots)?;
        let team = TeamState::from_size(robots.len())?;
        let needed = TeamState::for_weight(load)?;
        if needed > team {
            return Err(CapacityError::Unsupported {
                weight: load,
                max: team.max_weight(),
            });
        }
        Ok(Self {
            destination,
            leader,
            supporters: rest.iter().copied().collect(),
            team,
        })
    }

    /// Follow-on leg for `robot` heading to its reserve item's floor.
    pub fn next_task(&self, robot: RobotId, destination: Floor) -> Self {
        Self::solo(robot, destination)
    }

    /// Leg taking `robot` back to the mailroom.
    pub fn return_task(&self, robot: RobotId) -> Self {
        Self::solo(robot, MAILROOM_FLOOR)
    }

    pub fn is_leading(&self, robot: RobotId) -> bool {
        self.leader == robot
    }

    pub fn destination(&self) -> Floor {
        self.destination
    }

    pub fn leader(&self) -> RobotId {
        self.leader
    }

    pub fn supporters(&self) -> impl Iterator<Item = RobotId> + '_ {
        self.supporters.iter().copied()
    }

    pub fn num_robots(&self) -> usize {
        self.supporters.len() + 1
    }

    pub fn team_state(&self) -> TeamState {
        self.team
    }
}
