use serde::{Deserialize, Serialize};
use std::fmt;

use taskweave_core::Timestamp;

/// Lifecycle state of a confirmation item.
///
/// `Pending` transitions exactly once, to `Approved` or `Rejected`; both are
/// terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStatus {
    Pending,
    Approved,
    Rejected,
}

impl fmt::Display for ConfirmationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfirmationStatus::Pending => write!(f, "pending"),
            ConfirmationStatus::Approved => write!(f, "approved"),
            ConfirmationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for ConfirmationStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ConfirmationStatus::Pending),
            "approved" => Ok(ConfirmationStatus::Approved),
            "rejected" => Ok(ConfirmationStatus::Rejected),
            _ => Err(format!("Unknown confirmation status: {}", s)),
        }
    }
}

/// A candidate fact awaiting explicit human approval.
///
/// Ids are generation-ordered (`"{type}-{seq}"`) and never reused within a
/// store, including across restarts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfirmationItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub data: serde_json::Value,
    pub confidence: f64,
    pub status: ConfirmationStatus,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(default)]
    pub edited: bool,
}
