use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Lifecycle of a booked parcel, in delivery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    Pending,
    Collected,
    Dispatched,
    InTransit,
    OutForDelivery,
    Delivered,
}

impl ParcelStatus {
    pub const ALL: [ParcelStatus; 6] = [
        ParcelStatus::Pending,
        ParcelStatus::Collected,
        ParcelStatus::Dispatched,
        ParcelStatus::InTransit,
        ParcelStatus::OutForDelivery,
        ParcelStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParcelStatus::Pending => "pending",
            ParcelStatus::Collected => "collected",
            ParcelStatus::Dispatched => "dispatched",
            ParcelStatus::InTransit => "in_transit",
            ParcelStatus::OutForDelivery => "out_for_delivery",
            ParcelStatus::Delivered => "delivered",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParcelStatus::Pending => "Pending",
            ParcelStatus::Collected => "Collected",
            ParcelStatus::Dispatched => "Dispatched",
            ParcelStatus::InTransit => "In Transit",
            ParcelStatus::OutForDelivery => "Out for Delivery",
            ParcelStatus::Delivered => "Delivered",
        }
    }

    /// Statuses counted as "in transit" on a sender's dashboard.
    /// `OutForDelivery` is not one of them.
    pub fn is_moving(&self) -> bool {
        matches!(
            self,
            ParcelStatus::Collected | ParcelStatus::Dispatched | ParcelStatus::InTransit
        )
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParcelStatus {
    type Err = ParseError;

    /// Accepts the stored form (`in_transit`) and the display label (`In Transit`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        ParcelStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| ParseError::UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub status: ParcelStatus,
    pub timestamp: DateTime<Utc>,
    pub location: String,
    pub description: String,
}

impl StatusEvent {
    pub fn new(
        status: ParcelStatus,
        timestamp: DateTime<Utc>,
        location: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        StatusEvent {
            status,
            timestamp,
            location: location.into(),
            description: description.into(),
        }
    }
}
