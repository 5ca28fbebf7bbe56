//! Delivery reporting and scoring.

use std::collections::HashSet;

use tracing::debug;

use crate::error::DeliveryError;
use crate::types::{MailId, MailItem, Tick};

/// Exponent applied to the delivery delay when scoring.
const DELAY_PENALTY: f64 = 1.2;

/// Receives one report per delivered item, from the leading robot only.
pub trait DeliveryReporter {
    fn deliver(&mut self, item: &MailItem, now: Tick) -> Result<(), DeliveryError>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeliveryRecord {
    pub item: MailItem,
    pub delivered: Tick,
}

/// Records deliveries in order and keeps a running score.
#[derive(Debug, Default)]
pub struct DeliveryLog {
    records: Vec<DeliveryRecord>,
    seen: HashSet<MailId>,
    score: f64,
}

impl DeliveryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[DeliveryRecord] {
        &self.records
    }

    pub fn delivered_count(&self) -> usize {
        self.records.len()
    }

    /// Total penalty so far; lower is better.
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Score contribution of `item` delivered at `now`.
pub fn delivery_score(item: &MailItem, now: Tick) -> f64 {
    let delay = now.saturating_sub(item.arrival) as f64;
    let priority = f64::from(item.priority.unwrap_or(1));
    delay.powf(DELAY_PENALTY) * (1.0 + priority.sqrt())
}

impl DeliveryReporter for DeliveryLog {
    fn deliver(&mut self, item: &MailItem, now: Tick) -> Result<(), DeliveryError> {
        if !self.seen.insert(item.id) {
            return Err(DeliveryError::AlreadyDelivered { item: item.id, now });
        }
        self.score += delivery_score(item, now);
        self.records.push(DeliveryRecord {
            item: *item,
            delivered: now,
        });
        debug!(tick = now, "[DELIVERY] delivered [{item}]");
        Ok(())
    }
}
