use serde::{Deserialize, Serialize};

use crate::domain::parcel::Parcel;
use crate::tracking::status::{ParcelStatus, StatusEvent};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub status: ParcelStatus,
    pub label: String,
    pub location: String,
    pub time: String,
    pub completed: bool,
}

/// Customer-facing view of a parcel's journey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    pub tracking_number: String,
    pub status: String,
    pub sender: String,
    pub recipient: String,
    pub from: String,
    pub to: String,
    pub weight: String,
    pub parcel_type: String,
    pub pickup_location: String,
    pub delivery_location: String,
    pub current_location: String,
    pub eta: String,
    pub timeline: Vec<TimelineEntry>,
}

impl TrackingView {
    pub fn from_parcel(parcel: &Parcel) -> Self {
        TrackingView {
            tracking_number: parcel.tracking_number.clone(),
            status: parcel.status.label().to_string(),
            sender: parcel.sender.clone(),
            recipient: parcel.recipient.clone(),
            from: parcel.origin.clone(),
            to: parcel.destination.clone(),
            weight: format!("{}kg", parcel.weight_kg),
            parcel_type: parcel.package_type.clone(),
            pickup_location: parcel.pickup_location.clone(),
            delivery_location: parcel.delivery_location.clone(),
            current_location: current_location(&parcel.history, &parcel.origin).to_string(),
            eta: parcel.eta_label.clone(),
            timeline: build_timeline(&parcel.history, &parcel.destination),
        }
    }
}

/// One completed entry per recorded event, then a pending delivery entry at
/// the recipient's district until a delivery has been recorded.
pub fn build_timeline(history: &[StatusEvent], recipient_district: &str) -> Vec<TimelineEntry> {
    let mut timeline: Vec<TimelineEntry> = history
        .iter()
        .map(|event| TimelineEntry {
            status: event.status,
            label: if event.description.is_empty() {
                event.status.label().to_string()
            } else {
                event.description.clone()
            },
            location: event.location.clone(),
            time: event.timestamp.format(TIME_FORMAT).to_string(),
            completed: true,
        })
        .collect();

    if !timeline.iter().any(|t| t.status == ParcelStatus::Delivered) {
        timeline.push(TimelineEntry {
            status: ParcelStatus::Delivered,
            label: ParcelStatus::Delivered.label().to_string(),
            location: recipient_district.to_string(),
            time: "Pending".to_string(),
            completed: false,
        });
    }

    timeline
}

/// Location of the latest event, or the sender's district before any has one.
pub fn current_location<'a>(history: &'a [StatusEvent], sender_district: &'a str) -> &'a str {
    history
        .last()
        .map(|event| event.location.as_str())
        .filter(|location| !location.is_empty())
        .unwrap_or(sender_district)
}
