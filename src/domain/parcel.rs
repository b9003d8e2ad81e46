use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::constant::REWARD_UNIT;
use crate::domain::types::{District, PriorityClass, ShipmentRequest, SizeClass};
use crate::tracking::status::{ParcelStatus, StatusEvent};

/// What a sender submits when confirming a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub sender: String,
    #[serde(default)]
    pub sender_phone: String,
    pub recipient: String,
    #[serde(default)]
    pub recipient_phone: String,
    /// Free-form description such as `documents` or `electronics`.
    #[serde(default)]
    pub package_type: String,
    /// Where in the origin district the parcel is picked up.
    #[serde(default)]
    pub pickup_location: String,
    /// Where in the destination district it is handed over.
    #[serde(default)]
    pub delivery_location: String,
    pub request: ShipmentRequest,
}

impl Booking {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, request: ShipmentRequest) -> Self {
        Booking {
            sender: sender.into(),
            sender_phone: String::new(),
            recipient: recipient.into(),
            recipient_phone: String::new(),
            package_type: String::new(),
            pickup_location: String::new(),
            delivery_location: String::new(),
            request,
        }
    }

    pub fn with_phones(mut self, sender_phone: impl Into<String>, recipient_phone: impl Into<String>) -> Self {
        self.sender_phone = sender_phone.into();
        self.recipient_phone = recipient_phone.into();
        self
    }

    pub fn with_package_type(mut self, package_type: impl Into<String>) -> Self {
        self.package_type = package_type.into();
        self
    }

    pub fn with_locations(mut self, pickup: impl Into<String>, delivery: impl Into<String>) -> Self {
        self.pickup_location = pickup.into();
        self.delivery_location = delivery.into();
        self
    }
}

/// Totals shown on a sender's dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SenderStats {
    pub total_parcels: u64,
    pub delivered_parcels: u64,
    /// Collected, dispatched or in transit.
    pub in_transit_parcels: u64,
    pub pending_parcels: u64,
    pub total_revenue: u64,
    pub reward_points: u64,
    /// Newest first, at most ten.
    pub recent: Vec<Parcel>,
}

/// A booked parcel as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parcel {
    pub tracking_number: String,
    pub sender: String,
    pub sender_phone: String,
    pub recipient: String,
    pub recipient_phone: String,
    pub package_type: String,
    pub pickup_location: String,
    pub delivery_location: String,
    pub origin: District,
    pub destination: District,
    pub weight_kg: f64,
    pub size: SizeClass,
    pub priority: PriorityClass,
    pub insured: bool,
    pub cost_units: u64,
    pub eta_label: String,
    pub status: ParcelStatus,
    pub created_at: DateTime<Utc>,
    pub history: Vec<StatusEvent>,
}

impl Parcel {
    pub fn reward_points(&self) -> u64 {
        reward_points(self.cost_units)
    }
}

/// Loyalty points earned for a parcel: one per full 1000 UGX paid.
pub fn reward_points(cost_units: u64) -> u64 {
    cost_units / REWARD_UNIT
}
