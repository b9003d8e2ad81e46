use serde::{Deserialize, Serialize};

use crate::config::constant::*;
use crate::domain::types::{PriorityClass, SizeClass};

/// Prices and transit times the estimator works from. `Default` is the
/// published FWEN tariff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tariff {
    pub rate_per_unit_per_kg: f64,
    pub distance_unit_km: f64,
    pub minimum_charge: f64,
    pub maximum_charge: f64,
    pub insurance_surcharge: f64,
    pub size_multipliers: [f64; 3],
    pub priority_multipliers: [f64; 3],
    pub base_hours: [u32; 3],
    pub direct_route_slack: u32,
    pub connecting_route_slack: u32,
    pub eta_ceiling: u32,
}

impl Default for Tariff {
    fn default() -> Self {
        Tariff {
            rate_per_unit_per_kg: RATE_PER_UNIT_PER_KG,
            distance_unit_km: DISTANCE_UNIT_KM,
            minimum_charge: MINIMUM_CHARGE,
            maximum_charge: MAXIMUM_CHARGE,
            insurance_surcharge: INSURANCE_SURCHARGE,
            size_multipliers: [
                SIZE_MULTIPLIER_SMALL,
                SIZE_MULTIPLIER_MEDIUM,
                SIZE_MULTIPLIER_LARGE,
            ],
            priority_multipliers: [
                PRIORITY_MULTIPLIER_STANDARD,
                PRIORITY_MULTIPLIER_EXPRESS,
                PRIORITY_MULTIPLIER_URGENT,
            ],
            base_hours: [ETA_BASE_STANDARD, ETA_BASE_EXPRESS, ETA_BASE_URGENT],
            direct_route_slack: DIRECT_ROUTE_SLACK,
            connecting_route_slack: CONNECTING_ROUTE_SLACK,
            eta_ceiling: ETA_CEILING,
        }
    }
}

impl Tariff {
    pub fn size_multiplier(&self, size: SizeClass) -> f64 {
        self.size_multipliers[size_index(size)]
    }

    pub fn priority_multiplier(&self, priority: PriorityClass) -> f64 {
        self.priority_multipliers[priority_index(priority)]
    }

    pub fn base_hours(&self, priority: PriorityClass) -> u32 {
        self.base_hours[priority_index(priority)]
    }
}

fn size_index(size: SizeClass) -> usize {
    match size {
        SizeClass::Small => 0,
        SizeClass::Medium => 1,
        SizeClass::Large => 2,
    }
}

fn priority_index(priority: PriorityClass) -> usize {
    match priority {
        PriorityClass::Standard => 0,
        PriorityClass::Express => 1,
        PriorityClass::Urgent => 2,
    }
}
