//! Error taxonomy for the scheduling core and the simulation driver.

use std::path::PathBuf;

use thiserror::Error;

use crate::capacity::TeamState;
use crate::types::{MailId, RobotId, Tick, Weight};

/// Capacity model failures: invalid team sizes and items no tier can carry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapacityError {
    #[error("a team needs at least one robot")]
    NotEnoughRobots,

    #[error("teams of {size} robots are not supported (max {max})")]
    TooManyRobots { size: usize, max: usize },

    #[error("mail weighing {weight} exceeds every capacity tier (max {max})")]
    Unsupported { weight: Weight, max: Weight },
}

/// Loading a mail item onto a robot or team failed; nothing was changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddItemError {
    #[error("robot R{robot} is not waiting at the mailroom")]
    NotAvailable { robot: RobotId },

    #[error("no space left for mail {item}")]
    NoSpace { item: MailId },

    #[error("mail {item} cannot be combined with the pending load")]
    Incompatible { item: MailId },

    #[error("mail {item} weighs {weight}, above the {limit} limit of a {team} team")]
    TooHeavy {
        item: MailId,
        weight: Weight,
        limit: Weight,
        team: TeamState,
    },

    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

/// Dispatching a carrier failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("carrier {robots:?} is not ready to dispatch")]
    NotReady { robots: Vec<RobotId> },

    #[error("loading team members failed: {0}")]
    Load(#[from] AddItemError),

    #[error(transparent)]
    Capacity(#[from] CapacityError),
}

/// Team membership changes that were refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TeamError {
    #[error("team already has the {size} robots it needs")]
    Full { size: usize },

    #[error("robot R{robot} is not idle and cannot join a team")]
    RobotBusy { robot: RobotId },

    #[error("team has already been dispatched")]
    AlreadyDispatched,
}

/// Delivery reporter failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("mail {item} delivered twice (again at tick {now})")]
    AlreadyDelivered { item: MailId, now: Tick },
}

/// Fatal conditions raised while stepping a robot. These indicate a
/// scheduling bug, never an expected runtime state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StepError {
    #[error("robot R{robot} made {count} deliveries in one trip")]
    ExcessiveDelivery { robot: RobotId, count: u32 },

    #[error("robot R{robot} is delivering without a task")]
    MissingTask { robot: RobotId },

    #[error("robot R{robot} is delivering with an empty hand")]
    EmptyHand { robot: RobotId },

    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Anything that halts the stepping loop.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Capacity(#[from] CapacityError),

    #[error(transparent)]
    AddItem(#[from] AddItemError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Team(#[from] TeamError),

    #[error(transparent)]
    Step(#[from] StepError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("idle robot R{robot} is not on the roster")]
    MissingRobot { robot: RobotId },

    #[error("simulation stalled after {ticks} ticks with {delivered}/{total} items delivered")]
    Stalled {
        ticks: Tick,
        delivered: usize,
        total: usize,
    },
}
