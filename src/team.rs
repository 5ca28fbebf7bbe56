//! Robots grouped to carry an item too heavy for one of them.

use std::collections::HashSet;

use tracing::debug;

use crate::capacity::{MAX_TEAM_SIZE, is_heavy};
use crate::carrier::{Carrier, StepContext};
use crate::error::{AddItemError, CapacityError, DispatchError, StepError, TeamError};
use crate::plan::{can_admit, required_robots_for};
use crate::robot::{Robot, RobotState};
use crate::task::Task;
use crate::types::{MailItem, RobotId};

/// A team collects its mail first, then exactly as many robots as the
/// heaviest item needs. On dispatch every member takes the heaviest item in
/// hand and the first member leads; a light companion goes into the first
/// supporter's tube. Members leave the team one by one as they get back to
/// the mailroom.
#[derive(Debug, Default)]
pub struct RobotTeam {
    members: Vec<Robot>,
    unloaded: Vec<MailItem>,
    dispatched: bool,
}

impl RobotTeam {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn members(&self) -> &[Robot] {
        &self.members
    }

    pub fn team_size(&self) -> usize {
        self.members.len()
    }

    /// Mail added but not yet handed to a member.
    pub fn pending_items(&self) -> &[MailItem] {
        &self.unloaded
    }

    /// Robots needed for the pending mail, `None` while nothing is pending.
    pub fn required_robots(&self) -> Result<Option<usize>, CapacityError> {
        if self.unloaded.is_empty() {
            return Ok(None);
        }
        required_robots_for(&self.unloaded).map(Some)
    }

    pub fn has_enough_members(&self) -> bool {
        matches!(self.required_robots(), Ok(Some(needed)) if needed == self.members.len())
    }

    /// Pending mail already has every robot it needs; nothing more may join it.
    fn is_staffed_for_pending(&self) -> bool {
        !self.unloaded.is_empty() && self.has_enough_members()
    }

    pub fn add_robot(&mut self, robot: Robot) -> Result<(), TeamError> {
        if self.dispatched {
            return Err(TeamError::AlreadyDispatched);
        }
        if robot.state() != RobotState::Waiting || !robot.is_empty() {
            return Err(TeamError::RobotBusy { robot: robot.id() });
        }
        let limit = match self.required_robots() {
            Ok(Some(needed)) => needed,
            _ => MAX_TEAM_SIZE,
        };
        if self.members.len() >= limit {
            return Err(TeamError::Full { size: limit });
        }
        debug!(robot = robot.id(), "[TEAM] R{} joined", robot.id());
        self.members.push(robot);
        Ok(())
    }

    fn load_members(&mut self) -> Result<(), DispatchError> {
        let primary_index = self
            .unloaded
            .iter()
            .position(|item| is_heavy(item.weight))
            .unwrap_or(0);
        let primary = self.unloaded.remove(primary_index);
        let ids = self.list_robots();
        let task = Task::for_team(&ids, primary.destination, primary.weight)?;
        for member in &mut self.members {
            member.add_to_hand(primary, task.clone())?;
        }

        let companions = std::mem::take(&mut self.unloaded);
        let first_tube = usize::from(self.members.len() > 1);
        for (slot, item) in companions.into_iter().enumerate() {
            let member = self
                .members
                .get_mut(first_tube + slot)
                .ok_or(AddItemError::NoSpace { item: item.id })?;
            member.add_to_tube(item)?;
        }
        Ok(())
    }
}

impl Carrier for RobotTeam {
    fn list_mail_items(&self) -> Vec<MailItem> {
        let mut seen = HashSet::new();
        self.members
            .iter()
            .flat_map(|member| member.list_mail_items())
            .chain(self.unloaded.iter().copied())
            .filter(|item| seen.insert(item.id))
            .collect()
    }

    fn list_robots(&self) -> Vec<RobotId> {
        self.members.iter().map(Robot::id).collect()
    }

    fn can_add_mail_item(&self, item: &MailItem) -> bool {
        !self.dispatched
            && !self.is_staffed_for_pending()
            && matches!(can_admit(&self.unloaded, item), Ok(true))
    }

    fn add_mail_item(&mut self, item: MailItem) -> Result<(), AddItemError> {
        if self.dispatched || self.is_staffed_for_pending() {
            return Err(AddItemError::Incompatible { item: item.id });
        }
        // Reject mail no tier can carry even when the team is still empty.
        crate::capacity::required_robots(item.weight)?;
        if !can_admit(&self.unloaded, &item)? {
            return Err(AddItemError::Incompatible { item: item.id });
        }
        self.unloaded.push(item);
        Ok(())
    }

    fn can_dispatch(&self) -> bool {
        !self.dispatched && self.has_enough_members()
    }

    fn dispatch(&mut self) -> Result<(), DispatchError> {
        if !self.can_dispatch() {
            return Err(DispatchError::NotReady {
                robots: self.list_robots(),
            });
        }
        self.load_members()?;
        for member in &mut self.members {
            member.signal_dispatch();
        }
        self.dispatched = true;
        debug!(robots = ?self.list_robots(), "[TEAM] dispatched");
        Ok(())
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<Vec<Box<dyn Carrier>>, StepError> {
        for member in &mut self.members {
            member.step(ctx)?;
        }
        if !self.dispatched {
            return Ok(Vec::new());
        }
        let (done, busy): (Vec<Robot>, Vec<Robot>) =
            std::mem::take(&mut self.members).into_iter().partition(|member| {
                member.state() == RobotState::Waiting
                    && !member.has_dispatch_signal()
                    && member.is_empty()
            });
        self.members = busy;
        for member in &done {
            debug!(tick = ctx.now, "[TEAM] R{} left the team", member.id());
        }
        Ok(done
            .into_iter()
            .map(|member| Box::new(member) as Box<dyn Carrier>)
            .collect())
    }

    fn is_disbanded(&self) -> bool {
        self.dispatched && self.members.is_empty()
    }

    fn into_robots(self: Box<Self>) -> Vec<Robot> {
        self.members
    }
}
