//! The mail pool: pending mail, idle robots, and who carries what next.

use std::collections::VecDeque;

use tracing::{debug, info};

use crate::capacity::required_robots;
use crate::carrier::Carrier;
use crate::error::{CapacityError, SimError};
use crate::plan::select_plan;
use crate::roster::Roster;
use crate::team::RobotTeam;
use crate::types::{MailId, MailItem, RobotId, Tick};

/// Pool contract robots and the stepping loop rely on.
pub trait MailPool {
    /// Load and dispatch idle robots. Runs before any carrier steps.
    fn step(&mut self, now: Tick, roster: &mut Roster) -> Result<(), SimError>;

    /// Take back an item a robot did not deliver.
    fn add_to_pool(&mut self, item: MailItem);

    /// A robot is idle at the mailroom and can take new work.
    fn register_waiting(&mut self, robot: RobotId);
}

/// Keeps pending mail ordered by priority, then arrival, and hands it out in
/// greedy plans to robots in the order they became idle.
#[derive(Debug, Default)]
pub struct SortingPool {
    pending: Vec<MailItem>,
    waiting: VecDeque<RobotId>,
    deferred: Option<MailId>,
}

impl SortingPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit newly arrived mail. Mail no team can carry is refused.
    pub fn arrive(&mut self, item: MailItem) -> Result<(), CapacityError> {
        required_robots(item.weight)?;
        debug!(tick = item.arrival, "[POOL] arrived [{item}]");
        self.insert(item);
        Ok(())
    }

    pub fn pending(&self) -> &[MailItem] {
        &self.pending
    }

    pub fn waiting_robots(&self) -> usize {
        self.waiting.len()
    }

    fn insert(&mut self, item: MailItem) {
        let index = self
            .pending
            .partition_point(|existing| sort_key(existing) <= sort_key(&item));
        self.pending.insert(index, item);
    }

    fn remove_items(&mut self, items: &[MailItem]) {
        self.pending
            .retain(|pending| !items.iter().any(|item| item.id == pending.id));
    }
}

/// Higher priority first (plain mail last), then earlier arrival, then id.
fn sort_key(item: &MailItem) -> (std::cmp::Reverse<u32>, Tick, MailId) {
    (
        std::cmp::Reverse(item.priority.unwrap_or(0)),
        item.arrival,
        item.id,
    )
}

impl MailPool for SortingPool {
    fn step(&mut self, now: Tick, roster: &mut Roster) -> Result<(), SimError> {
        while !self.waiting.is_empty() && !self.pending.is_empty() {
            let plan = select_plan(&self.pending)?;
            if !plan.has_enough_robots(self.waiting.len()) {
                let head = plan.items.first().map(|item| item.id);
                if self.deferred != head {
                    info!(
                        tick = now,
                        needed = plan.required_robots,
                        idle = self.waiting.len(),
                        "[POOL] deferring plan until more robots are idle"
                    );
                    self.deferred = head;
                }
                break;
            }
            self.deferred = None;
            self.remove_items(&plan.items);
            let robots: Vec<RobotId> = self.waiting.drain(..plan.required_robots).collect();

            if let &[robot] = robots.as_slice() {
                let carrier = roster
                    .find_solo_mut(robot)
                    .ok_or(SimError::MissingRobot { robot })?;
                for item in &plan.items {
                    carrier.add_mail_item(*item)?;
                }
                carrier.dispatch()?;
                debug!(tick = now, items = plan.items.len(), "[POOL] dispatched R{robot}");
            } else {
                let mut team = RobotTeam::new();
                for item in &plan.items {
                    team.add_mail_item(*item)?;
                }
                for robot in roster.take_robots(&robots)? {
                    team.add_robot(robot)?;
                }
                team.dispatch()?;
                debug!(tick = now, ?robots, "[POOL] dispatched team");
                roster.push(Box::new(team));
            }
        }
        Ok(())
    }

    fn add_to_pool(&mut self, item: MailItem) {
        self.insert(item);
    }

    fn register_waiting(&mut self, robot: RobotId) {
        self.waiting.push_back(robot);
    }
}
