//! A single delivery robot and its return/wait/deliver state machine.

use std::fmt;

use tracing::debug;

use crate::capacity::TeamState;
use crate::carrier::{Carrier, StepContext};
use crate::error::{AddItemError, DispatchError, StepError};
use crate::task::Task;
use crate::types::{Floor, MAILROOM_FLOOR, MailItem, RobotId, Tick};

/// Deliveries one robot can make between two dispatches (hand, then tube).
const MAX_TRIP_DELIVERIES: u32 = 2;

/// Possible states the robot can be in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RobotState {
    /// Idle at the mailroom, eligible for loading and dispatch.
    Waiting,
    Delivering,
    /// Heading back to the mailroom.
    Returning,
}

impl fmt::Display for RobotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Waiting => write!(f, "WAITING"),
            Self::Delivering => write!(f, "DELIVERING"),
            Self::Returning => write!(f, "RETURNING"),
        }
    }
}

#[derive(Debug)]
pub struct Robot {
    id: RobotId,
    floor: Floor,
    state: RobotState,
    task: Option<Task>,
    hand: Option<MailItem>,
    /// Reserve item, promoted to the hand after the current delivery.
    tube: Option<MailItem>,
    dispatched: bool,
    deliveries: u32,
    team: TeamState,
}

impl Robot {
    /// A robot at the mailroom, starting out in `RETURNING`.
    pub fn new(id: RobotId) -> Self {
        Self::starting_at(id, MAILROOM_FLOOR)
    }

    /// A robot returning to the mailroom from `floor`.
    pub fn starting_at(id: RobotId, floor: Floor) -> Self {
        Self {
            id,
            floor,
            state: RobotState::Returning,
            task: None,
            hand: None,
            tube: None,
            dispatched: false,
            deliveries: 0,
            team: TeamState::Single,
        }
    }

    pub fn id(&self) -> RobotId {
        self.id
    }

    pub fn floor(&self) -> Floor {
        self.floor
    }

    pub fn state(&self) -> RobotState {
        self.state
    }

    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    pub fn hand(&self) -> Option<&MailItem> {
        self.hand.as_ref()
    }

    pub fn tube(&self) -> Option<&MailItem> {
        self.tube.as_ref()
    }

    pub fn team_state(&self) -> TeamState {
        self.team
    }

    pub fn has_dispatch_signal(&self) -> bool {
        self.dispatched
    }

    pub fn is_empty(&self) -> bool {
        self.hand.is_none() && self.tube.is_none()
    }

    /// Ask the robot to leave once loaded. Setting it twice is the same as once.
    pub fn signal_dispatch(&mut self) {
        self.dispatched = true;
    }

    /// Load the item carried on `task`. The task's team tier must cover the
    /// item's weight.
    pub fn add_to_hand(&mut self, item: MailItem, task: Task) -> Result<(), AddItemError> {
        self.ensure_waiting()?;
        if self.hand.is_some() {
            return Err(AddItemError::NoSpace { item: item.id });
        }
        let team = task.team_state();
        if item.weight > team.max_weight() {
            return Err(AddItemError::TooHeavy {
                item: item.id,
                weight: item.weight,
                limit: team.max_weight(),
                team,
            });
        }
        debug!(robot = self.id, mail = item.id, %team, "[ROBOT] R{} loaded hand", self.id);
        self.hand = Some(item);
        self.task = Some(task);
        self.team = team;
        Ok(())
    }

    /// Load a reserve item. The tube only backs up an active carry and only
    /// ever holds what one robot can lift.
    pub fn add_to_tube(&mut self, item: MailItem) -> Result<(), AddItemError> {
        self.ensure_waiting()?;
        if self.hand.is_none() {
            return Err(AddItemError::Incompatible { item: item.id });
        }
        if self.tube.is_some() {
            return Err(AddItemError::NoSpace { item: item.id });
        }
        let single = TeamState::Single;
        if item.weight > single.max_weight() {
            return Err(AddItemError::TooHeavy {
                item: item.id,
                weight: item.weight,
                limit: single.max_weight(),
                team: single,
            });
        }
        debug!(robot = self.id, mail = item.id, "[ROBOT] R{} loaded tube", self.id);
        self.tube = Some(item);
        Ok(())
    }

    /// Advance the state machine by one tick.
    pub fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), StepError> {
        match self.state {
            RobotState::Returning => {
                if self.floor != MAILROOM_FLOOR {
                    let target = self.task.as_ref().map_or(MAILROOM_FLOOR, Task::destination);
                    self.move_towards(target);
                    return Ok(());
                }
                if let Some(item) = self.tube.take() {
                    debug!(mail = item.id, "[ROBOT] R{} returned tube item to pool", self.id);
                    ctx.pool.add_to_pool(item);
                }
                ctx.pool.register_waiting(self.id);
                self.change_state(RobotState::Waiting, ctx.now);
                self.task = None;
                self.team = TeamState::Single;
            }
            RobotState::Waiting => {
                if !self.is_empty() && self.dispatched {
                    self.dispatched = false;
                    self.deliveries = 0;
                    self.change_state(RobotState::Delivering, ctx.now);
                }
            }
            RobotState::Delivering => self.deliver_step(ctx)?,
        }
        Ok(())
    }

    fn deliver_step(&mut self, ctx: &mut StepContext<'_>) -> Result<(), StepError> {
        let task = self
            .task
            .take()
            .ok_or(StepError::MissingTask { robot: self.id })?;
        if self.floor != task.destination() {
            self.move_towards(task.destination());
            self.task = Some(task);
            return Ok(());
        }

        let item = self.hand.take().ok_or(StepError::EmptyHand { robot: self.id })?;
        // Supporting robots share the carry but only the leader reports it.
        if task.is_leading(self.id) {
            ctx.reporter.deliver(&item, ctx.now)?;
        }
        self.deliveries += 1;
        if self.deliveries > MAX_TRIP_DELIVERIES {
            return Err(StepError::ExcessiveDelivery {
                robot: self.id,
                count: self.deliveries,
            });
        }

        match self.tube.take() {
            None => {
                self.task = Some(task.return_task(self.id));
                self.change_state(RobotState::Returning, ctx.now);
            }
            Some(next) => {
                self.task = Some(task.next_task(self.id, next.destination));
                self.hand = Some(next);
                self.team = TeamState::Single;
                self.change_state(RobotState::Delivering, ctx.now);
            }
        }
        Ok(())
    }

    fn move_towards(&mut self, destination: Floor) {
        if self.floor < destination {
            self.floor += 1;
        } else if self.floor > destination {
            self.floor -= 1;
        }
    }

    fn ensure_waiting(&self) -> Result<(), AddItemError> {
        if self.state == RobotState::Waiting {
            Ok(())
        } else {
            Err(AddItemError::NotAvailable { robot: self.id })
        }
    }

    fn change_state(&mut self, next: RobotState, now: Tick) {
        // Cannot be holding mail in the tube but not in hand.
        debug_assert!(
            !(self.hand.is_none() && self.tube.is_some()),
            "robot R{} has a tube item without a hand item",
            self.id
        );
        if self.state != next {
            debug!(tick = now, "[ROBOT] R{} changed from {} to {}", self.id, self.state, next);
        }
        self.state = next;
        if next == RobotState::Delivering {
            if let Some(item) = &self.hand {
                debug!(tick = now, "[ROBOT] R{} -> [{item}]", self.id);
            }
        }
    }
}

impl Carrier for Robot {
    fn list_mail_items(&self) -> Vec<MailItem> {
        self.hand.iter().chain(self.tube.iter()).copied().collect()
    }

    fn list_robots(&self) -> Vec<RobotId> {
        vec![self.id]
    }

    fn can_add_mail_item(&self, item: &MailItem) -> bool {
        self.state == RobotState::Waiting
            && self.tube.is_none()
            && item.weight <= TeamState::Single.max_weight()
    }

    fn add_mail_item(&mut self, item: MailItem) -> Result<(), AddItemError> {
        if self.hand.is_none() {
            self.add_to_hand(item, Task::solo(self.id, item.destination))
        } else {
            self.add_to_tube(item)
        }
    }

    fn can_dispatch(&self) -> bool {
        self.state == RobotState::Waiting && !self.is_empty()
    }

    fn dispatch(&mut self) -> Result<(), DispatchError> {
        if !self.can_dispatch() {
            return Err(DispatchError::NotReady {
                robots: vec![self.id],
            });
        }
        self.signal_dispatch();
        Ok(())
    }

    fn step(&mut self, ctx: &mut StepContext<'_>) -> Result<Vec<Box<dyn Carrier>>, StepError> {
        Robot::step(self, ctx)?;
        Ok(Vec::new())
    }

    fn into_robots(self: Box<Self>) -> Vec<Robot> {
        vec![*self]
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::delivery::DeliveryLog;
    use crate::error::SimError;
    use crate::pool::MailPool;
    use crate::roster::Roster;

    /// Pool double that records what robots hand back.
    #[derive(Default)]
    pub(crate) struct RecordingPool {
        pub returned: Vec<MailItem>,
        pub waiting: Vec<RobotId>,
    }

    impl MailPool for RecordingPool {
        fn step(&mut self, _now: Tick, _roster: &mut Roster) -> Result<(), SimError> {
            Ok(())
        }

        fn add_to_pool(&mut self, item: MailItem) {
            self.returned.push(item);
        }

        fn register_waiting(&mut self, robot: RobotId) {
            self.waiting.push(robot);
        }
    }

    fn step(robot: &mut Robot, pool: &mut RecordingPool, log: &mut DeliveryLog, now: Tick) {
        let mut ctx = StepContext {
            now,
            pool,
            reporter: log,
        };
        robot.step(&mut ctx).expect("step failed");
    }

    fn waiting_robot(id: RobotId) -> Robot {
        let mut robot = Robot::new(id);
        let mut pool = RecordingPool::default();
        let mut log = DeliveryLog::new();
        step(&mut robot, &mut pool, &mut log, 1);
        robot
    }

    #[test]
    fn starts_returning_and_registers_at_mailroom() {
        let mut robot = Robot::new(0);
        assert_eq!(robot.state(), RobotState::Returning);
        let mut pool = RecordingPool::default();
        let mut log = DeliveryLog::new();
        step(&mut robot, &mut pool, &mut log, 1);
        assert_eq!(robot.state(), RobotState::Waiting);
        assert_eq!(pool.waiting, vec![0]);
        assert!(robot.task().is_none());
    }

    #[test]
    fn returning_robot_walks_home_one_floor_per_tick() {
        let mut robot = Robot::starting_at(2, 4);
        let mut pool = RecordingPool::default();
        let mut log = DeliveryLog::new();
        for (tick, expected) in [(1, 3), (2, 2), (3, 1)] {
            step(&mut robot, &mut pool, &mut log, tick);
            assert_eq!(robot.floor(), expected);
            assert_eq!(robot.state(), RobotState::Returning);
        }
        assert!(pool.waiting.is_empty());
        step(&mut robot, &mut pool, &mut log, 4);
        assert_eq!(robot.state(), RobotState::Waiting);
        assert_eq!(pool.waiting, vec![2]);
    }

    #[test]
    fn waiting_robot_needs_items_and_dispatch() {
        let mut robot = waiting_robot(0);
        let mut pool = RecordingPool::default();
        let mut log = DeliveryLog::new();

        robot.signal_dispatch();
        step(&mut robot, &mut pool, &mut log, 2);
        assert_eq!(robot.state(), RobotState::Waiting);
        assert_eq!(robot.floor(), MAILROOM_FLOOR);

        robot.add_mail_item(MailItem::new(1, 3, 1, 500)).unwrap();
        step(&mut robot, &mut pool, &mut log, 3);
        assert_eq!(robot.state(), RobotState::Delivering);
        assert!(!robot.has_dispatch_signal());
    }

    #[test]
    fn dispatch_signal_is_idempotent() {
        let mut robot = waiting_robot(0);
        robot.add_mail_item(MailItem::new(1, 2, 1, 500)).unwrap();
        robot.signal_dispatch();
        robot.signal_dispatch();
        let mut pool = RecordingPool::default();
        let mut log = DeliveryLog::new();
        step(&mut robot, &mut pool, &mut log, 2);
        assert_eq!(robot.state(), RobotState::Delivering);
        assert!(!robot.has_dispatch_signal());
    }

    #[test]
    fn delivers_hand_then_tube_then_returns() {
        let mut robot = waiting_robot(0);
        robot.add_mail_item(MailItem::new(1, 3, 1, 500)).unwrap();
        robot.add_mail_item(MailItem::new(2, 2, 1, 700)).unwrap();
        robot.dispatch().unwrap();

        let mut pool = RecordingPool::default();
        let mut log = DeliveryLog::new();
        let mut now = 1;
        while log.delivered_count() < 2 {
            now += 1;
            step(&mut robot, &mut pool, &mut log, now);
            assert!(robot.hand().is_some() || robot.tube().is_none());
            assert!(now < 20, "robot never finished delivering");
        }
        assert_eq!(robot.state(), RobotState::Returning);
        assert_eq!(robot.task().map(Task::destination), Some(MAILROOM_FLOOR));
        let ids: Vec<_> = log.records().iter().map(|record| record.item.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn empty_robot_is_never_delivering() {
        let mut robot = waiting_robot(0);
        robot.add_mail_item(MailItem::new(1, 4, 1, 500)).unwrap();
        robot.add_mail_item(MailItem::new(2, 2, 1, 700)).unwrap();
        robot.dispatch().unwrap();

        let mut pool = RecordingPool::default();
        let mut log = DeliveryLog::new();
        for now in 2..20 {
            step(&mut robot, &mut pool, &mut log, now);
            assert!(
                !(robot.is_empty() && robot.state() == RobotState::Delivering),
                "R0 delivering with nothing on board at tick {now}"
            );
        }
        assert_eq!(log.delivered_count(), 2);
        assert_eq!(robot.state(), RobotState::Waiting);
    }

    #[test]
    fn arriving_without_reserve_turns_back() {
        let item = MailItem::new(9, 5, 1, 800);
        let mut robot = Robot {
            floor: 5,
            state: RobotState::Delivering,
            task: Some(Task::solo(4, 5)),
            hand: Some(item),
            ..Robot::new(4)
        };
        let mut pool = RecordingPool::default();
        let mut log = DeliveryLog::new();
        step(&mut robot, &mut pool, &mut log, 10);
        assert_eq!(robot.state(), RobotState::Returning);
        assert_eq!(robot.task().map(Task::destination), Some(MAILROOM_FLOOR));
        assert!(robot.is_empty());
        assert_eq!(log.delivered_count(), 1);
    }

    #[test]
    fn supporter_does_not_report_delivery() {
        let item = MailItem::new(9, 5, 1, 2400);
        let task = Task::for_team(&[1, 2], 5, 2400).unwrap();
        let mut supporter = Robot {
            floor: 5,
            state: RobotState::Delivering,
            task: Some(task),
            hand: Some(item),
            team: TeamState::Pair,
            ..Robot::new(2)
        };
        let mut pool = RecordingPool::default();
        let mut log = DeliveryLog::new();
        step(&mut supporter, &mut pool, &mut log, 3);
        assert_eq!(log.delivered_count(), 0);
        assert_eq!(supporter.state(), RobotState::Returning);
        assert_eq!(supporter.team_state(), TeamState::Pair);
    }

    #[test]
    fn third_delivery_in_one_trip_is_fatal() {
        let mut robot = Robot {
            floor: 5,
            state: RobotState::Delivering,
            task: Some(Task::solo(0, 5)),
            hand: Some(MailItem::new(1, 5, 1, 100)),
            deliveries: 2,
            ..Robot::new(0)
        };
        let mut pool = RecordingPool::default();
        let mut log = DeliveryLog::new();
        let mut ctx = StepContext {
            now: 7,
            pool: &mut pool,
            reporter: &mut log,
        };
        let err = robot.step(&mut ctx).unwrap_err();
        assert_eq!(err, StepError::ExcessiveDelivery { robot: 0, count: 3 });
    }

    #[test]
    fn delivering_without_task_is_fatal() {
        let mut robot = Robot {
            state: RobotState::Delivering,
            hand: Some(MailItem::new(1, 5, 1, 100)),
            ..Robot::new(3)
        };
        let mut pool = RecordingPool::default();
        let mut log = DeliveryLog::new();
        let mut ctx = StepContext {
            now: 1,
            pool: &mut pool,
            reporter: &mut log,
        };
        assert_eq!(
            robot.step(&mut ctx),
            Err(StepError::MissingTask { robot: 3 })
        );
    }

    #[test]
    fn leftover_tube_item_goes_back_to_pool() {
        let reserve = MailItem::new(5, 6, 1, 300);
        let mut robot = Robot {
            hand: Some(MailItem::new(4, 6, 1, 300)),
            tube: Some(reserve),
            ..Robot::new(1)
        };
        let mut pool = RecordingPool::default();
        let mut log = DeliveryLog::new();
        step(&mut robot, &mut pool, &mut log, 1);
        assert_eq!(pool.returned, vec![reserve]);
        assert_eq!(pool.waiting, vec![1]);
        assert!(robot.tube().is_none());
    }

    #[test]
    fn full_robot_rejects_more_mail() {
        let mut robot = waiting_robot(0);
        robot.add_mail_item(MailItem::new(1, 3, 1, 500)).unwrap();
        robot.add_mail_item(MailItem::new(2, 3, 1, 500)).unwrap();
        let extra = MailItem::new(3, 3, 1, 500);
        assert!(!robot.can_add_mail_item(&extra));
        assert_eq!(
            robot.add_mail_item(extra),
            Err(AddItemError::NoSpace { item: 3 })
        );
        assert_eq!(robot.list_mail_items().len(), 2);
    }

    #[test]
    fn lone_robot_cannot_take_heavy_mail() {
        let mut robot = waiting_robot(0);
        let heavy = MailItem::new(1, 3, 1, 2400);
        assert!(!robot.can_add_mail_item(&heavy));
        assert!(matches!(
            robot.add_mail_item(heavy),
            Err(AddItemError::TooHeavy { limit: 2000, .. })
        ));
        assert!(robot.is_empty());
    }

    #[test]
    fn tube_requires_hand() {
        let mut robot = waiting_robot(0);
        assert_eq!(
            robot.add_to_tube(MailItem::new(1, 3, 1, 100)),
            Err(AddItemError::Incompatible { item: 1 })
        );
    }

    #[test]
    fn busy_robot_cannot_be_loaded_or_dispatched() {
        let mut robot = Robot::new(6);
        assert_eq!(
            robot.add_mail_item(MailItem::new(1, 3, 1, 100)),
            Err(AddItemError::NotAvailable { robot: 6 })
        );
        assert_eq!(
            robot.dispatch(),
            Err(DispatchError::NotReady { robots: vec![6] })
        );
    }
}
