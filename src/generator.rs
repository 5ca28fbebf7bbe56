//! Seeded mail arrival schedule.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::SimConfig;
use crate::types::{MAILROOM_FLOOR, MailId, MailItem, Tick};

/// Priority levels handed to priority mail.
const PRIORITY_LEVELS: [u32; 2] = [10, 100];

/// All mail for a run, generated up front and released tick by tick.
#[derive(Debug)]
pub struct MailGenerator {
    schedule: BTreeMap<Tick, Vec<MailItem>>,
    total: usize,
}

impl MailGenerator {
    pub fn new(config: &SimConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut schedule: BTreeMap<Tick, Vec<MailItem>> = BTreeMap::new();
        for id in 0..config.mail_to_create as MailId {
            let arrival = rng.random_range(1..=config.arrival_window);
            let destination = rng.random_range(MAILROOM_FLOOR..=config.floors);
            let weight = rng.random_range(config.mail_min_weight..=config.mail_max_weight);
            let item = if rng.random_bool(config.priority_probability) {
                let level = PRIORITY_LEVELS[rng.random_range(0..PRIORITY_LEVELS.len())];
                MailItem::priority(id, destination, arrival, weight, level)
            } else {
                MailItem::new(id, destination, arrival, weight)
            };
            schedule.entry(arrival).or_default().push(item);
        }
        Self {
            schedule,
            total: config.mail_to_create,
        }
    }

    /// Mail arriving at `now`, removed from the schedule.
    pub fn arrivals(&mut self, now: Tick) -> Vec<MailItem> {
        self.schedule.remove(&now).unwrap_or_default()
    }

    /// Items generated for the whole run.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Items not yet released.
    pub fn remaining(&self) -> usize {
        self.schedule.values().map(Vec::len).sum()
    }
}
