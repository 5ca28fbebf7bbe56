//! Greedy delivery plan selection.
//!
//! A plan carries at most one heavy item. A plan without a heavy item holds
//! up to two light items (hand and tube of one robot); a plan built around a
//! heavy item takes at most one light companion, and only while the team it
//! needs still has a free supporter.

use crate::capacity::{is_heavy, required_robots};
use crate::error::CapacityError;
use crate::types::MailItem;

/// Light items one robot can hold (hand plus tube).
const MAX_LIGHT_ITEMS: usize = 2;
/// Light items that may ride along with a heavy one.
const MAX_COMPANIONS: usize = 1;

/// Items selected to travel together and the team size they need.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveryPlan {
    pub items: Vec<MailItem>,
    pub required_robots: usize,
}

impl DeliveryPlan {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `available` idle robots are enough to carry this plan.
    pub fn has_enough_robots(&self, available: usize) -> bool {
        available >= self.required_robots
    }
}

/// Pick the plan for the next dispatch from `pending`, in order, without
/// reordering or backtracking. Rejected items stay for a later pass.
pub fn select_plan(pending: &[MailItem]) -> Result<DeliveryPlan, CapacityError> {
    let mut items: Vec<MailItem> = Vec::new();
    for candidate in pending {
        if can_admit(&items, candidate)? {
            items.push(*candidate);
        }
    }
    let required_robots = if items.is_empty() {
        0
    } else {
        required_robots_for(&items)?
    };
    Ok(DeliveryPlan {
        items,
        required_robots,
    })
}

/// Admission rule shared by the selector and by teams collecting items.
pub fn can_admit(plan: &[MailItem], candidate: &MailItem) -> Result<bool, CapacityError> {
    if plan.is_empty() {
        return Ok(true);
    }
    if is_heavy(candidate.weight) {
        return Ok(false);
    }
    let has_heavy = plan.iter().any(|item| is_heavy(item.weight));
    if !has_heavy {
        return Ok(plan.len() < MAX_LIGHT_ITEMS);
    }
    let supporters = required_robots_for(plan)? - 1;
    let companions = plan.iter().filter(|item| !is_heavy(item.weight)).count();
    Ok(companions < supporters.min(MAX_COMPANIONS))
}

/// Team size needed by the heaviest item in `items`.
pub fn required_robots_for(items: &[MailItem]) -> Result<usize, CapacityError> {
    let heaviest = items.iter().map(|item| item.weight).max().unwrap_or(0);
    required_robots(heaviest)
}

/// Whether `available` idle robots can carry `plan`.
pub fn has_enough_robots(available: usize, plan: &DeliveryPlan) -> bool {
    plan.has_enough_robots(available)
}
