//! Configuration options for an export run.

use serde::{Deserialize, Serialize};

use crate::carrier::Carrier;
use crate::error::{ConfigError, Result};
use crate::state::OrderState;

/// First order number handed out by a run unless configured otherwise.
pub const DEFAULT_ORDER_BASE: u64 = 1_873_036;

/// How states are picked for emitted lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateMode {
    /// Every line gets the first selected state.
    #[default]
    Unique,
    /// States rotate line after line, across order boundaries.
    Cyclic,
    /// States are drawn uniformly at random.
    Random,
}

/// Granularity of random state draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RandomScope {
    /// One draw per order, shared by all of its lines.
    #[default]
    PerOrder,
    /// One draw per emitted line.
    PerLine,
}

/// How a carrier is chosen for each order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CarrierMode {
    /// `carriers[orders_emitted % len]`.
    #[default]
    RoundRobin,
    /// Uniform random pick per order.
    Mixed,
}

/// When the order-number counter advances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderNumbering {
    /// After every emitted order.
    #[default]
    EveryOrder,
    /// Only after an order with at least one in-delivery line.
    DeliveryOnly,
}

/// Splits a line into a shipped part and a remainder.
///
/// A line whose quantity exceeds `quantity` becomes two records: the first
/// with `quantity` units in `state_a`, the second with the remainder in
/// `state_b`. A missing state falls back to the run's state policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialSplit {
    pub quantity: u32,
    #[serde(default)]
    pub state_a: Option<OrderState>,
    #[serde(default)]
    pub state_b: Option<OrderState>,
}

/// Options controlling state, carrier and numbering assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Enabled states, in selection order. Must not be empty.
    pub states: Vec<OrderState>,
    /// Enabled carriers, in selection order. Must not be empty.
    pub carriers: Vec<Carrier>,
    pub mode: StateMode,
    pub random_scope: RandomScope,
    pub carrier_mode: CarrierMode,
    pub order_numbering: OrderNumbering,
    pub order_base: u64,
    /// Maximum number of emitted orders; `None` means unlimited.
    pub max_orders: Option<usize>,
    pub partial_split: Option<PartialSplit>,
    /// Seed for the random policies; entropy when absent.
    pub seed: Option<u64>,
}

impl ExportOptions {
    pub fn new(states: Vec<OrderState>, carriers: Vec<Carrier>) -> Self {
        Self {
            states,
            carriers,
            mode: StateMode::default(),
            random_scope: RandomScope::default(),
            carrier_mode: CarrierMode::default(),
            order_numbering: OrderNumbering::default(),
            order_base: DEFAULT_ORDER_BASE,
            max_orders: None,
            partial_split: None,
            seed: None,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: StateMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_random_scope(mut self, scope: RandomScope) -> Self {
        self.random_scope = scope;
        self
    }

    #[must_use]
    pub fn with_carrier_mode(mut self, mode: CarrierMode) -> Self {
        self.carrier_mode = mode;
        self
    }

    #[must_use]
    pub fn with_order_numbering(mut self, numbering: OrderNumbering) -> Self {
        self.order_numbering = numbering;
        self
    }

    #[must_use]
    pub fn with_order_base(mut self, base: u64) -> Self {
        self.order_base = base;
        self
    }

    /// `0` is treated as unlimited.
    #[must_use]
    pub fn with_max_orders(mut self, max_orders: Option<usize>) -> Self {
        self.max_orders = max_orders.filter(|&max| max > 0);
        self
    }

    #[must_use]
    pub fn with_partial_split(mut self, split: Option<PartialSplit>) -> Self {
        self.partial_split = split;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Rejects configurations a run cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.states.is_empty() {
            return Err(ConfigError::NoStates);
        }
        if self.carriers.is_empty() {
            return Err(ConfigError::NoCarriers);
        }
        if let Some(split) = &self.partial_split
            && split.quantity == 0
        {
            return Err(ConfigError::InvalidSplitQuantity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carrier() -> Carrier {
        Carrier::new("Colissimo", "COLISSIMO", "TRK1")
    }

    #[test]
    fn validate_rejects_missing_selections() {
        let no_states = ExportOptions::new(vec![], vec![carrier()]);
        assert_eq!(no_states.validate(), Err(ConfigError::NoStates));

        let no_carriers = ExportOptions::new(vec![OrderState::Delete], vec![]);
        assert_eq!(no_carriers.validate(), Err(ConfigError::NoCarriers));
    }

    #[test]
    fn validate_rejects_zero_split_quantity() {
        let options = ExportOptions::new(vec![OrderState::Delete], vec![carrier()])
            .with_partial_split(Some(PartialSplit {
                quantity: 0,
                state_a: None,
                state_b: None,
            }));
        assert_eq!(options.validate(), Err(ConfigError::InvalidSplitQuantity));
    }

    #[test]
    fn zero_max_orders_means_unlimited() {
        let options = ExportOptions::new(vec![OrderState::Delete], vec![carrier()])
            .with_max_orders(Some(0));
        assert_eq!(options.max_orders, None);
        assert_eq!(options.order_base, DEFAULT_ORDER_BASE);
        assert!(options.validate().is_ok());
    }
}
