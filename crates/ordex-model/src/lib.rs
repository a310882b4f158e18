//! Data model for the order-state export.

pub mod carrier;
pub mod error;
pub mod options;
pub mod record;
pub mod state;

pub use carrier::{Carrier, CarrierCatalog};
pub use error::{ConfigError, Result};
pub use options::{
    CarrierMode, DEFAULT_ORDER_BASE, ExportOptions, OrderNumbering, PartialSplit, RandomScope,
    StateMode,
};
pub use record::{
    AssignedRecord, EXPORT_HEADER, ExplodedLine, ExportOrder, OutputFile, SourceColumn, SourceRow,
};
pub use state::OrderState;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_serialize_with_state_labels() {
        let options = ExportOptions::new(
            vec![OrderState::EnCoursDeLivraison],
            vec![Carrier::new("GLS", "GLS", "ZH8KQ24F")],
        )
        .with_mode(StateMode::Cyclic);
        let json = serde_json::to_value(&options).expect("serialize options");
        assert_eq!(json["states"][0], "En cours de livraison");
        assert_eq!(json["mode"], "cyclic");
        let round: ExportOptions = serde_json::from_value(json).expect("deserialize options");
        assert_eq!(round, options);
    }

    #[test]
    fn record_cells_follow_header_order() {
        let record = AssignedRecord {
            transaction_ref: "T1".to_string(),
            line_number: 2,
            order_number: 1_873_036,
            state: OrderState::EnCoursDeLivraison,
            tracking_number: "TRK1".to_string(),
            carrier_id: "COLISSIMO".to_string(),
            article_code: "C1".to_string(),
            label: "Bâche".to_string(),
            quantity: "3".to_string(),
            unit_sale_price: "123,45".to_string(),
            purchase_price: "".to_string(),
        };
        let cells = record.cells();
        assert_eq!(cells.len(), EXPORT_HEADER.len());
        assert_eq!(cells[1], "2");
        assert_eq!(cells[2], "1873036");
        assert_eq!(cells[3], "En cours de livraison");
        assert_eq!(cells[7], "Bâche");
    }
}
