//! Shared identifiers and the mail item model used across the system.

use std::fmt;

/// Unique identifier for a robot, issued once by [`RobotIdIssuer`].
pub type RobotId = u64;
/// Unique identifier for a mail item.
pub type MailId = u64;
/// Building floor number (the mailroom is floor 1).
pub type Floor = u32;
/// Discrete simulation time.
pub type Tick = u64;
/// Mail weight in grams.
pub type Weight = u32;

/// Floor where idle robots wait and reserve items go back to the pool.
pub const MAILROOM_FLOOR: Floor = 1;

/// One piece of mail. Immutable after creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MailItem {
    /// Stable identifier used for delivery bookkeeping.
    pub id: MailId,
    pub destination: Floor,
    /// Tick at which the item reached the mailroom.
    pub arrival: Tick,
    pub weight: Weight,
    /// Priority level for priority mail; `None` for plain mail.
    pub priority: Option<u32>,
}

impl MailItem {
    /// Construct a plain (non-priority) mail item.
    pub fn new(id: MailId, destination: Floor, arrival: Tick, weight: Weight) -> Self {
        Self {
            id,
            destination,
            arrival,
            weight,
            priority: None,
        }
    }

    /// Construct a priority mail item.
    pub fn priority(
        id: MailId,
        destination: Floor,
        arrival: Tick,
        weight: Weight,
        level: u32,
    ) -> Self {
        Self {
            priority: Some(level),
            ..Self::new(id, destination, arrival, weight)
        }
    }
}

impl fmt::Display for MailItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Mail {:>4} | Arrival: {:>4} | Destination: {:>2} | Weight: {:>4}",
            self.id, self.arrival, self.destination, self.weight
        )?;
        if let Some(level) = self.priority {
            write!(f, " | Priority: {level:>3}")?;
        }
        Ok(())
    }
}

/// Hands out robot ids; owned by whoever builds the robots.
#[derive(Debug, Default)]
pub struct RobotIdIssuer {
    next: RobotId,
}

impl RobotIdIssuer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next unused id.
    pub fn issue(&mut self) -> RobotId {
        let id = self.next;
        self.next += 1;
        id
    }
}
