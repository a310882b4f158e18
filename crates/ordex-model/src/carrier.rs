//! Carrier catalog.

use serde::{Deserialize, Serialize};

/// A shipping provider with the tracking code used for in-delivery lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carrier {
    pub name: String,
    pub id: String,
    pub tracking_code: String,
}

impl Carrier {
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        tracking_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            tracking_code: tracking_code.into(),
        }
    }
}

/// Ordered list of known carriers, looked up by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarrierCatalog {
    carriers: Vec<Carrier>,
}

impl Default for CarrierCatalog {
    fn default() -> Self {
        Self::new(vec![
            Carrier::new("Colissimo", "COLISSIMO", "XR475205445TS"),
            Carrier::new("Chronopost", "CHRONOPOST", "XT120045873FR"),
            Carrier::new("DPD", "DPD", "250071930146"),
            Carrier::new("GLS", "GLS", "ZH8KQ24F"),
        ])
    }
}

impl CarrierCatalog {
    pub fn new(carriers: Vec<Carrier>) -> Self {
        Self { carriers }
    }

    pub fn carriers(&self) -> &[Carrier] {
        &self.carriers
    }

    pub fn is_empty(&self) -> bool {
        self.carriers.is_empty()
    }

    /// Case-insensitive lookup by carrier id.
    pub fn get(&self, id: &str) -> Option<&Carrier> {
        let id = id.trim();
        self.carriers
            .iter()
            .find(|carrier| carrier.id.eq_ignore_ascii_case(id))
    }

    /// Resolves every id, failing on the first unknown one.
    pub fn select<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Carrier>, String> {
        ids.iter()
            .map(|id| {
                self.get(id.as_ref())
                    .cloned()
                    .ok_or_else(|| id.as_ref().trim().to_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_four_carriers() {
        let catalog = CarrierCatalog::default();
        assert_eq!(catalog.carriers().len(), 4);
        assert_eq!(
            catalog.get("colissimo").map(|c| c.tracking_code.as_str()),
            Some("XR475205445TS")
        );
    }

    #[test]
    fn select_reports_unknown_id() {
        let catalog = CarrierCatalog::default();
        let selected = catalog.select(&["DPD", "gls"]).expect("known ids");
        assert_eq!(selected[0].id, "DPD");
        assert_eq!(selected[1].id, "GLS");
        assert_eq!(catalog.select(&["UPS "]), Err("UPS".to_string()));
    }
}
