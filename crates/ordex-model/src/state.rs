//! Order-line states understood by the downstream order-management system.
//!
//! The domain is closed: the downstream importer rejects any other label.
//! Only [`OrderState::EnCoursDeLivraison`] carries behaviour (tracking number
//! assignment and, under [`crate::OrderNumbering::DeliveryOnly`], order
//! number increments).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order-line state as written in the `Etat` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OrderState {
    #[serde(rename = "Delete")]
    Delete,
    #[serde(rename = "En attente de paiement")]
    EnAttenteDePaiement,
    #[serde(rename = "En cours de preparation")]
    EnCoursDePreparation,
    #[serde(rename = "En cours de reapprovisionnement")]
    EnCoursDeReapprovisionnement,
    #[serde(rename = "En cours de traitement")]
    EnCoursDeTraitement,
    #[serde(rename = "En cours de livraison")]
    EnCoursDeLivraison,
    #[serde(rename = "En traitement")]
    EnTraitement,
}

impl OrderState {
    /// Every state, in the order the downstream system documents them.
    pub const ALL: [OrderState; 7] = [
        OrderState::Delete,
        OrderState::EnAttenteDePaiement,
        OrderState::EnCoursDePreparation,
        OrderState::EnCoursDeReapprovisionnement,
        OrderState::EnCoursDeTraitement,
        OrderState::EnCoursDeLivraison,
        OrderState::EnTraitement,
    ];

    /// Returns the label written to the export file.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderState::Delete => "Delete",
            OrderState::EnAttenteDePaiement => "En attente de paiement",
            OrderState::EnCoursDePreparation => "En cours de preparation",
            OrderState::EnCoursDeReapprovisionnement => "En cours de reapprovisionnement",
            OrderState::EnCoursDeTraitement => "En cours de traitement",
            OrderState::EnCoursDeLivraison => "En cours de livraison",
            OrderState::EnTraitement => "En traitement",
        }
    }

    /// True for the delivery-in-progress state.
    pub fn is_in_delivery(&self) -> bool {
        matches!(self, OrderState::EnCoursDeLivraison)
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrderState {
    type Err = String;

    /// Parses a state label. Matching ignores case, surrounding whitespace and
    /// accepts `-`/`_` in place of spaces (`en-cours-de-livraison`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = normalize_label(s);
        OrderState::ALL
            .into_iter()
            .find(|state| normalize_label(state.as_str()) == normalized)
            .ok_or_else(|| format!("unknown order state: {}", s.trim()))
    }
}

fn normalize_label(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|ch| match ch {
            '-' | '_' => ' ',
            other => other,
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
