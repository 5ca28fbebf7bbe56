//! Mail delivery robots moving items between the floors of a building in
//! discrete time steps: capacity tiers, delivery plans, the per-robot state
//! machine, robot teams, and the loop that steps them.

pub mod automail;
pub mod capacity;
pub mod carrier;
pub mod config;
pub mod delivery;
pub mod error;
pub mod generator;
pub mod logging;
pub mod plan;
pub mod pool;
pub mod robot;
pub mod roster;
pub mod sim;
pub mod task;
pub mod team;
pub mod types;

pub use automail::Automail;
pub use carrier::{Carrier, StepContext};
pub use config::SimConfig;
pub use error::SimError;
pub use robot::{Robot, RobotState};
pub use team::RobotTeam;
pub use types::{MAILROOM_FLOOR, MailItem};
