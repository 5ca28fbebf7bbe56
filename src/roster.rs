//! The ordered list of active carriers and the factory that fills it.

use tracing::debug;

use crate::carrier::{Carrier, StepContext};
use crate::error::{SimError, StepError};
use crate::robot::Robot;
use crate::types::{RobotId, RobotIdIssuer};

/// Builds robots with ids from an issuer it owns.
#[derive(Debug, Default)]
pub struct RobotFactory {
    ids: RobotIdIssuer,
}

impl RobotFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_robot(&mut self) -> Robot {
        Robot::new(self.ids.issue())
    }
}

/// Carriers stepped once per tick in insertion order.
#[derive(Default)]
pub struct Roster {
    carriers: Vec<Box<dyn Carrier>>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// A roster of `count` fresh robots.
    pub fn with_robots(factory: &mut RobotFactory, count: usize) -> Self {
        let mut roster = Self::new();
        for _ in 0..count {
            roster.push(Box::new(factory.create_robot()));
        }
        roster
    }

    pub fn push(&mut self, carrier: Box<dyn Carrier>) {
        self.carriers.push(carrier);
    }

    pub fn len(&self) -> usize {
        self.carriers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Carrier> + '_ {
        self.carriers.iter().map(|carrier| carrier.as_ref())
    }

    /// Robots across all carriers.
    pub fn robot_count(&self) -> usize {
        self.carriers
            .iter()
            .map(|carrier| carrier.list_robots().len())
            .sum()
    }

    fn solo_index(&self, robot: RobotId) -> Option<usize> {
        self.carriers
            .iter()
            .position(|carrier| carrier.list_robots() == [robot])
    }

    /// The carrier made of `robot` alone.
    pub fn find_solo_mut(&mut self, robot: RobotId) -> Option<&mut (dyn Carrier + 'static)> {
        let index = self.solo_index(robot)?;
        Some(self.carriers[index].as_mut())
    }

    /// Remove the solo carriers for `robots`, returned in the order asked.
    /// Nothing is removed unless every robot is found.
    pub fn take_robots(&mut self, robots: &[RobotId]) -> Result<Vec<Robot>, SimError> {
        if let Some(&missing) = robots.iter().find(|&&id| self.solo_index(id).is_none()) {
            return Err(SimError::MissingRobot { robot: missing });
        }
        let mut taken = Vec::with_capacity(robots.len());
        for &id in robots {
            let index = self
                .solo_index(id)
                .ok_or(SimError::MissingRobot { robot: id })?;
            taken.extend(self.carriers.remove(index).into_robots());
        }
        Ok(taken)
    }

    /// Step every carrier, then drop disbanded ones and append what they
    /// spawned.
    pub fn step_all(&mut self, ctx: &mut StepContext<'_>) -> Result<(), StepError> {
        let mut spawned = Vec::new();
        for carrier in &mut self.carriers {
            spawned.extend(carrier.step(ctx)?);
        }
        let before = self.carriers.len();
        self.carriers.retain(|carrier| !carrier.is_disbanded());
        if self.carriers.len() != before {
            debug!(tick = ctx.now, "[ROSTER] {} team(s) disbanded", before - self.carriers.len());
        }
        self.carriers.extend(spawned);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::DeliveryLog;
    use crate::robot::RobotState;
    use crate::robot::tests::RecordingPool;
    use crate::team::RobotTeam;
    use crate::types::MailItem;

    fn idle_roster(count: usize) -> (Roster, RecordingPool) {
        let mut factory = RobotFactory::new();
        let mut roster = Roster::with_robots(&mut factory, count);
        let mut pool = RecordingPool::default();
        let mut log = DeliveryLog::new();
        let mut ctx = StepContext {
            now: 1,
            pool: &mut pool,
            reporter: &mut log,
        };
        roster.step_all(&mut ctx).unwrap();
        (roster, pool)
    }

    #[test]
    fn new_roster_is_empty_until_filled() {
        let mut roster = Roster::new();
        assert!(roster.is_empty());
        roster.push(Box::new(RobotFactory::new().create_robot()));
        assert!(!roster.is_empty());
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn robots_register_in_insertion_order() {
        let (roster, pool) = idle_roster(3);
        assert_eq!(pool.waiting, vec![0, 1, 2]);
        assert_eq!(roster.robot_count(), 3);
    }

    #[test]
    fn take_robots_preserves_requested_order() {
        let (mut roster, _) = idle_roster(3);
        let taken = roster.take_robots(&[2, 0]).unwrap();
        let ids: Vec<_> = taken.iter().map(Robot::id).collect();
        assert_eq!(ids, vec![2, 0]);
        assert!(taken.iter().all(|robot| robot.state() == RobotState::Waiting));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn take_robots_is_all_or_nothing() {
        let (mut roster, _) = idle_roster(2);
        assert!(matches!(
            roster.take_robots(&[0, 9]),
            Err(SimError::MissingRobot { robot: 9 })
        ));
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn team_members_rejoin_after_disbanding() {
        let (mut roster, _) = idle_roster(2);
        let mut team = RobotTeam::new();
        team.add_mail_item(MailItem::new(1, 2, 1, 2300)).unwrap();
        for robot in roster.take_robots(&[0, 1]).unwrap() {
            team.add_robot(robot).unwrap();
        }
        team.dispatch().unwrap();
        roster.push(Box::new(team));
        assert_eq!(roster.len(), 1);
        assert!(roster.find_solo_mut(0).is_none());

        let mut pool = RecordingPool::default();
        let mut log = DeliveryLog::new();
        for now in 2..10 {
            let mut ctx = StepContext {
                now,
                pool: &mut pool,
                reporter: &mut log,
            };
            roster.step_all(&mut ctx).unwrap();
        }
        assert_eq!(log.delivered_count(), 1);
        assert_eq!(roster.len(), 2);
        assert!(roster.find_solo_mut(0).is_some());
        assert!(roster.find_solo_mut(1).is_some());
        assert_eq!(pool.waiting, vec![0, 1]);
    }
}
