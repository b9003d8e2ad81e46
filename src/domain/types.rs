use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Named administrative region used as shipment origin or destination.
pub type District = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    #[default]
    Small,
    Medium,
    Large,
}

impl SizeClass {
    pub const ALL: [SizeClass; 3] = [SizeClass::Small, SizeClass::Medium, SizeClass::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizeClass {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(SizeClass::Small),
            "medium" => Ok(SizeClass::Medium),
            "large" => Ok(SizeClass::Large),
            _ => Err(ParseError::UnknownSize(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityClass {
    #[default]
    Standard,
    Express,
    Urgent,
}

impl PriorityClass {
    pub const ALL: [PriorityClass; 3] = [
        PriorityClass::Standard,
        PriorityClass::Express,
        PriorityClass::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityClass::Standard => "standard",
            PriorityClass::Express => "express",
            PriorityClass::Urgent => "urgent",
        }
    }
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityClass {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(PriorityClass::Standard),
            "express" => Ok(PriorityClass::Express),
            "urgent" => Ok(PriorityClass::Urgent),
            _ => Err(ParseError::UnknownPriority(s.to_string())),
        }
    }
}

/// Attributes of a shipment to be priced. Built fresh for every estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentRequest {
    pub origin: District,
    pub destination: District,
    #[serde(default)]
    pub weight_kg: f64,
    #[serde(default)]
    pub size: SizeClass,
    #[serde(default)]
    pub priority: PriorityClass,
    #[serde(default)]
    pub insured: bool,
}

impl ShipmentRequest {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>, weight_kg: f64) -> Self {
        ShipmentRequest {
            origin: origin.into(),
            destination: destination.into(),
            weight_kg,
            size: SizeClass::default(),
            priority: PriorityClass::default(),
            insured: false,
        }
    }

    pub fn with_size(mut self, size: SizeClass) -> Self {
        self.size = size;
        self
    }

    pub fn with_priority(mut self, priority: PriorityClass) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_insurance(mut self, insured: bool) -> Self {
        self.insured = insured;
        self
    }
}

/// Transit time window in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eta {
    pub min_hours: u32,
    pub max_hours: u32,
    pub via_connecting_route: bool,
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} hours", self.min_hours, self.max_hours)?;
        if self.via_connecting_route {
            f.write_str(" (via connecting route)")?;
        }
        Ok(())
    }
}

/// Every intermediate amount of the cost pipeline, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    pub distance_km: f64,
    pub distance_units: u64,
    pub base: f64,
    pub floored: f64,
    pub after_size: f64,
    pub after_priority: f64,
    pub after_insurance: f64,
    pub capped: f64,
    pub cost_units: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub cost_units: u64,
    pub eta_label: String,
    pub eta: Eta,
    pub breakdown: CostBreakdown,
}
