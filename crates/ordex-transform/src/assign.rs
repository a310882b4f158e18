//! State and carrier assignment.
//!
//! Cross-row state lives in [`RunCounters`], which the caller threads through
//! every call in source-row order. Nothing here is global.

use rand::Rng;

use ordex_model::{
    AssignedRecord, Carrier, CarrierMode, ExplodedLine, ExportOptions, ExportOrder,
    OrderNumbering, OrderState, RandomScope, StateMode,
};

use crate::normalize::quantity_for_split;

/// Counters carried from one order to the next within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunCounters {
    /// Order number the next emitted order receives.
    pub next_order_number: u64,
    /// Records emitted so far; drives the cyclic state policy.
    pub lines_emitted: u64,
    /// Orders emitted so far; drives round-robin carrier selection.
    pub orders_emitted: usize,
}

impl RunCounters {
    pub fn new(order_base: u64) -> Self {
        Self {
            next_order_number: order_base,
            lines_emitted: 0,
            orders_emitted: 0,
        }
    }

    fn finish_order(&mut self, numbering: OrderNumbering, has_delivery: bool) {
        self.orders_emitted += 1;
        let advance = match numbering {
            OrderNumbering::EveryOrder => true,
            OrderNumbering::DeliveryOnly => has_delivery,
        };
        if advance {
            self.next_order_number += 1;
        }
    }
}

/// A record whose state is final but which is not numbered yet.
struct RecordDraft<'l> {
    line: &'l ExplodedLine,
    state: OrderState,
    quantity: String,
}

impl RecordDraft<'_> {
    fn finish(self, line_number: u32, order_number: u64, carrier: &Carrier) -> AssignedRecord {
        let tracking_number = if self.state.is_in_delivery() {
            carrier.tracking_code.clone()
        } else {
            String::new()
        };
        AssignedRecord {
            transaction_ref: self.line.transaction_ref.clone(),
            line_number,
            order_number,
            state: self.state,
            tracking_number,
            carrier_id: carrier.id.clone(),
            article_code: self.line.article_code.clone(),
            label: self.line.label.clone(),
            quantity: self.quantity,
            unit_sale_price: self.line.unit_sale_price.clone(),
            purchase_price: self.line.purchase_price.clone(),
        }
    }
}

/// Applies the configured state, carrier and split policies to one order.
///
/// Only built from validated options, so `states` and `carriers` are
/// non-empty.
#[derive(Debug, Clone, Copy)]
pub struct Assigner<'a> {
    options: &'a ExportOptions,
}

impl<'a> Assigner<'a> {
    /// Validates `options` and wraps them.
    pub fn new(options: &'a ExportOptions) -> ordex_model::Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub(crate) fn from_validated(options: &'a ExportOptions) -> Self {
        Self { options }
    }

    /// Picks the carrier for the next order.
    pub fn pick_carrier<R: Rng + ?Sized>(
        &self,
        counters: &RunCounters,
        rng: &mut R,
    ) -> &'a Carrier {
        let carriers = &self.options.carriers;
        let idx = match self.options.carrier_mode {
            CarrierMode::RoundRobin => counters.orders_emitted % carriers.len(),
            CarrierMode::Mixed => rng.gen_range(0..carriers.len()),
        };
        &carriers[idx]
    }

    fn draw_state<R: Rng + ?Sized>(&self, rng: &mut R) -> OrderState {
        let states = &self.options.states;
        states[rng.gen_range(0..states.len())]
    }

    /// Policy state for the next emitted record. Advances the line counter.
    fn next_state<R: Rng + ?Sized>(
        &self,
        order_state: Option<OrderState>,
        counters: &mut RunCounters,
        rng: &mut R,
    ) -> OrderState {
        let states = &self.options.states;
        let state = match self.options.mode {
            StateMode::Unique => states[0],
            StateMode::Cyclic => {
                let idx = counters.lines_emitted % states.len() as u64;
                states[idx as usize]
            }
            StateMode::Random => match order_state {
                Some(state) => state,
                None => self.draw_state(rng),
            },
        };
        counters.lines_emitted += 1;
        state
    }

    /// Assigns states, carrier, line and order numbers to one order's lines.
    ///
    /// Returns `None` for an empty line list; counters are then untouched.
    pub fn assign_order<R: Rng + ?Sized>(
        &self,
        source_index: usize,
        lines: &[ExplodedLine],
        counters: &mut RunCounters,
        rng: &mut R,
    ) -> Option<ExportOrder> {
        if lines.is_empty() {
            return None;
        }
        let carrier = self.pick_carrier(counters, rng);
        let order_state = match (self.options.mode, self.options.random_scope) {
            (StateMode::Random, RandomScope::PerOrder) => Some(self.draw_state(rng)),
            _ => None,
        };
        let order_number = counters.next_order_number;

        let mut drafts = Vec::with_capacity(lines.len());
        for line in lines {
            let quantity = quantity_for_split(&line.quantity);
            match self.options.partial_split {
                Some(split) if quantity > i64::from(split.quantity) => {
                    let first = self.next_state(order_state, counters, rng);
                    let second = self.next_state(order_state, counters, rng);
                    drafts.push(RecordDraft {
                        line,
                        state: split.state_a.unwrap_or(first),
                        quantity: split.quantity.to_string(),
                    });
                    drafts.push(RecordDraft {
                        line,
                        state: split.state_b.unwrap_or(second),
                        quantity: (quantity - i64::from(split.quantity)).to_string(),
                    });
                }
                _ => {
                    let state = self.next_state(order_state, counters, rng);
                    drafts.push(RecordDraft {
                        line,
                        state,
                        quantity: line.quantity.clone(),
                    });
                }
            }
        }

        let records: Vec<AssignedRecord> = drafts
            .into_iter()
            .zip(1u32..)
            .map(|(draft, line_number)| draft.finish(line_number, order_number, carrier))
            .collect();
        let order = ExportOrder {
            source_index,
            order_number,
            carrier_id: carrier.id.clone(),
            records,
        };
        counters.finish_order(self.options.order_numbering, order.has_delivery());
        Some(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordex_model::PartialSplit;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn line(reference: &str, code: &str, quantity: &str) -> ExplodedLine {
        ExplodedLine {
            source_index: 0,
            sub_index: 0,
            transaction_ref: reference.to_string(),
            article_code: code.to_string(),
            label: String::new(),
            quantity: quantity.to_string(),
            unit_sale_price: String::new(),
            purchase_price: String::new(),
        }
    }

    fn carriers() -> Vec<Carrier> {
        vec![
            Carrier::new("Colissimo", "COLISSIMO", "TRK1"),
            Carrier::new("DPD", "DPD", "TRK2"),
        ]
    }

    #[test]
    fn unique_mode_uses_first_state_and_tracks_delivery() {
        let options = ExportOptions::new(
            vec![OrderState::EnCoursDeLivraison, OrderState::Delete],
            carriers(),
        );
        let assigner = Assigner::new(&options).unwrap();
        let mut counters = RunCounters::new(100);
        let mut rng = StdRng::seed_from_u64(1);

        let lines = [line("T1", "C1", "3"), line("T2", "C2", "5")];
        let order = assigner
            .assign_order(0, &lines, &mut counters, &mut rng)
            .unwrap();

        assert_eq!(order.order_number, 100);
        assert_eq!(order.carrier_id, "COLISSIMO");
        assert!(order.records.iter().all(|r| r.state == OrderState::EnCoursDeLivraison));
        assert!(order.records.iter().all(|r| r.tracking_number == "TRK1"));
        assert_eq!(order.records[1].line_number, 2);
        assert_eq!(counters.next_order_number, 101);
        assert_eq!(counters.orders_emitted, 1);
    }

    #[test]
    fn round_robin_carrier_follows_orders_emitted() {
        let options = ExportOptions::new(vec![OrderState::EnCoursDeLivraison], carriers());
        let assigner = Assigner::new(&options).unwrap();
        let mut counters = RunCounters::new(1);
        let mut rng = StdRng::seed_from_u64(1);
        let lines = [line("T1", "C1", "1")];

        let ids: Vec<String> = (0..3)
            .filter_map(|idx| assigner.assign_order(idx, &lines, &mut counters, &mut rng))
            .map(|order| order.records[0].tracking_number.clone())
            .collect();

        assert_eq!(ids, vec!["TRK1", "TRK2", "TRK1"]);
    }

    #[test]
    fn partial_split_consumes_two_line_numbers() {
        let options = ExportOptions::new(vec![OrderState::EnCoursDeTraitement], carriers())
            .with_partial_split(Some(PartialSplit {
                quantity: 2,
                state_a: Some(OrderState::EnCoursDeLivraison),
                state_b: Some(OrderState::EnCoursDeReapprovisionnement),
            }));
        let assigner = Assigner::new(&options).unwrap();
        let mut counters = RunCounters::new(1);
        let mut rng = StdRng::seed_from_u64(1);

        let order = assigner
            .assign_order(
                0,
                &[line("T1", "C1", "1"), line("T2", "C2", "5"), line("T3", "C3", "2")],
                &mut counters,
                &mut rng,
            )
            .unwrap();

        let summary: Vec<(u32, &str, OrderState, &str)> = order
            .records
            .iter()
            .map(|r| (r.line_number, r.quantity.as_str(), r.state, r.tracking_number.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, "1", OrderState::EnCoursDeTraitement, ""),
                (2, "2", OrderState::EnCoursDeLivraison, "TRK1"),
                (3, "3", OrderState::EnCoursDeReapprovisionnement, ""),
                (4, "2", OrderState::EnCoursDeTraitement, ""),
            ]
        );
        assert_eq!(order.records[2].transaction_ref, "T2");
        assert_eq!(order.records[2].article_code, "C2");
    }

    #[test]
    fn partial_split_without_states_uses_policy() {
        let options = ExportOptions::new(
            vec![OrderState::Delete, OrderState::EnTraitement],
            carriers(),
        )
        .with_mode(StateMode::Cyclic)
        .with_partial_split(Some(PartialSplit {
            quantity: 1,
            state_a: None,
            state_b: None,
        }));
        let assigner = Assigner::new(&options).unwrap();
        let mut counters = RunCounters::new(1);
        let mut rng = StdRng::seed_from_u64(1);

        let order = assigner
            .assign_order(0, &[line("T1", "C1", "4")], &mut counters, &mut rng)
            .unwrap();

        assert_eq!(order.records[0].state, OrderState::Delete);
        assert_eq!(order.records[1].state, OrderState::EnTraitement);
        assert_eq!(order.records[1].quantity, "3");
        assert_eq!(counters.lines_emitted, 2);
    }

    #[test]
    fn delivery_only_numbering_waits_for_delivery_state() {
        let options = ExportOptions::new(
            vec![OrderState::EnCoursDePreparation, OrderState::EnCoursDeLivraison],
            carriers(),
        )
        .with_mode(StateMode::Cyclic)
        .with_order_numbering(OrderNumbering::DeliveryOnly);
        let assigner = Assigner::new(&options).unwrap();
        let mut counters = RunCounters::new(500);
        let mut rng = StdRng::seed_from_u64(1);
        let lines = [line("T1", "C1", "1")];

        let numbers: Vec<u64> = (0..4)
            .filter_map(|idx| assigner.assign_order(idx, &lines, &mut counters, &mut rng))
            .map(|order| order.order_number)
            .collect();

        // preparation, delivery, preparation, delivery
        assert_eq!(numbers, vec![500, 500, 501, 501]);
        assert_eq!(counters.next_order_number, 502);
    }

    #[test]
    fn random_per_order_shares_one_state() {
        let options = ExportOptions::new(OrderState::ALL.to_vec(), carriers())
            .with_mode(StateMode::Random);
        let assigner = Assigner::new(&options).unwrap();
        let mut counters = RunCounters::new(1);
        let mut rng = StdRng::seed_from_u64(7);
        let lines: Vec<ExplodedLine> = (0..6).map(|i| line(&format!("T{i}"), "C", "1")).collect();

        for idx in 0..10 {
            let order = assigner
                .assign_order(idx, &lines, &mut counters, &mut rng)
                .unwrap();
            let first = order.records[0].state;
            assert!(order.records.iter().all(|r| r.state == first));
        }
    }

    #[test]
    fn empty_lines_leave_counters_untouched() {
        let options = ExportOptions::new(vec![OrderState::Delete], carriers());
        let assigner = Assigner::new(&options).unwrap();
        let mut counters = RunCounters::new(9);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(assigner.assign_order(0, &[], &mut counters, &mut rng).is_none());
        assert_eq!(counters, RunCounters::new(9));
    }

    #[test]
    fn new_rejects_invalid_options() {
        let options = ExportOptions::new(vec![], carriers());
        assert!(Assigner::new(&options).is_err());
    }
}
