//! The stepping loop: one pool step, then every carrier, per tick.

use crate::carrier::StepContext;
use crate::delivery::DeliveryReporter;
use crate::error::SimError;
use crate::pool::MailPool;
use crate::roster::{RobotFactory, Roster};
use crate::types::Tick;

pub struct Automail<P, D> {
    pool: P,
    reporter: D,
    roster: Roster,
    clock: Tick,
}

impl<P: MailPool, D: DeliveryReporter> Automail<P, D> {
    /// Wire `robots` fresh robots from `factory` to the pool and reporter.
    pub fn new(pool: P, reporter: D, factory: &mut RobotFactory, robots: usize) -> Self {
        Self {
            pool,
            reporter,
            roster: Roster::with_robots(factory, robots),
            clock: 0,
        }
    }

    /// Advance one tick. The pool always steps before any carrier so that
    /// dispatches it makes are acted on in the same tick.
    pub fn step(&mut self) -> Result<(), SimError> {
        self.clock += 1;
        self.pool.step(self.clock, &mut self.roster)?;
        let mut ctx = StepContext {
            now: self.clock,
            pool: &mut self.pool,
            reporter: &mut self.reporter,
        };
        self.roster.step_all(&mut ctx)?;
        Ok(())
    }

    /// Last completed tick.
    pub fn clock(&self) -> Tick {
        self.clock
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut P {
        &mut self.pool
    }

    pub fn reporter(&self) -> &D {
        &self.reporter
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::DeliveryLog;
    use crate::pool::SortingPool;
    use crate::types::MailItem;

    fn automail(robots: usize) -> Automail<SortingPool, DeliveryLog> {
        let mut factory = RobotFactory::new();
        Automail::new(SortingPool::new(), DeliveryLog::new(), &mut factory, robots)
    }

    #[test]
    fn robots_become_idle_on_first_tick() {
        let mut automail = automail(3);
        automail.step().unwrap();
        assert_eq!(automail.clock(), 1);
        assert_eq!(automail.pool().waiting_robots(), 3);
    }

    #[test]
    fn dispatch_is_acted_on_in_the_same_tick() {
        let mut automail = automail(1);
        automail.step().unwrap();
        automail
            .pool_mut()
            .arrive(MailItem::new(1, 2, 1, 100))
            .unwrap();
        automail.step().unwrap();
        let carrier = automail.roster().iter().next().expect("robot on roster");
        assert_eq!(carrier.list_mail_items().len(), 1);
        assert!(!carrier.can_dispatch(), "robot already left the mailroom");
        automail.step().unwrap();
        automail.step().unwrap();
        assert_eq!(automail.reporter().delivered_count(), 1);
    }
}
