//! Capability surface shared by single robots and robot teams.

use crate::delivery::DeliveryReporter;
use crate::error::{AddItemError, DispatchError, StepError};
use crate::pool::MailPool;
use crate::robot::Robot;
use crate::types::{MailItem, RobotId, Tick};

/// Collaborators a carrier may call into while stepping.
pub struct StepContext<'a> {
    pub now: Tick,
    pub pool: &'a mut dyn MailPool,
    pub reporter: &'a mut dyn DeliveryReporter,
}

/// Anything the stepping loop drives: a lone [`Robot`] or a
/// [`RobotTeam`](crate::team::RobotTeam). Callers only go through this trait.
pub trait Carrier {
    /// Mail currently held or pending load, each item once.
    fn list_mail_items(&self) -> Vec<MailItem>;

    /// Robots making up this carrier.
    fn list_robots(&self) -> Vec<RobotId>;

    fn can_add_mail_item(&self, item: &MailItem) -> bool;

    fn add_mail_item(&mut self, item: MailItem) -> Result<(), AddItemError>;

    fn can_dispatch(&self) -> bool;

    fn dispatch(&mut self) -> Result<(), DispatchError>;

    /// Advance one tick. Returns carriers that must join the stepping list
    /// from the next tick on.
    fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<Vec<Box<dyn Carrier>>, StepError>;

    /// A carrier with nothing left to do that can leave the stepping list.
    fn is_disbanded(&self) -> bool {
        false
    }

    /// Give up the constituent robots, e.g. to merge them into a team.
    fn into_robots(self: Box<Self>) -> Vec<Robot>;
}
