use std::env;
use std::path::PathBuf;

use dotenv::dotenv;
use tracing::{info, warn};

pub mod constant {
    // Tariff, in UGX.
    pub const RATE_PER_UNIT_PER_KG: f64 = 6_000.0;
    pub const DISTANCE_UNIT_KM: f64 = 50.0;
    pub const MINIMUM_CHARGE: f64 = 6_000.0;
    pub const MAXIMUM_CHARGE: f64 = 50_000.0;
    pub const INSURANCE_SURCHARGE: f64 = 4_000.0;

    pub const SIZE_MULTIPLIER_SMALL: f64 = 1.0;
    pub const SIZE_MULTIPLIER_MEDIUM: f64 = 1.3;
    pub const SIZE_MULTIPLIER_LARGE: f64 = 1.6;

    pub const PRIORITY_MULTIPLIER_STANDARD: f64 = 1.0;
    pub const PRIORITY_MULTIPLIER_EXPRESS: f64 = 1.5;
    pub const PRIORITY_MULTIPLIER_URGENT: f64 = 2.0;

    // ETA, in hours.
    pub const ETA_BASE_STANDARD: u32 = 12;
    pub const ETA_BASE_EXPRESS: u32 = 8;
    pub const ETA_BASE_URGENT: u32 = 4;
    pub const DIRECT_ROUTE_SLACK: u32 = 3;
    pub const CONNECTING_ROUTE_SLACK: u32 = 5;
    pub const ETA_CEILING: u32 = 15;

    pub const HUB_DISTRICT: &str = "Kampala";
    pub const DEFAULT_LEG_KM: f64 = 200.0;

    pub const TRACKING_PREFIX: &str = "FWEN";
    pub const TRACKING_NUMBER_ATTEMPTS: usize = 8;
    pub const REWARD_UNIT: u64 = 1_000;
    pub const RECENT_PARCELS: u32 = 10;

    pub const DEFAULT_DATABASE_URL: &str = "sqlite:fwen_parcels.sqlite";
}

/// Runtime settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub distances_csv: Option<PathBuf>,
    pub bus_routes_csv: Option<PathBuf>,
    pub hub: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: constant::DEFAULT_DATABASE_URL.to_string(),
            distances_csv: None,
            bus_routes_csv: None,
            hub: constant::HUB_DISTRICT.to_string(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Settings::default();

        let database_url = get("DATABASE_URL").unwrap_or_else(|| {
            warn!(
                "DATABASE_URL not set, using default SQLite file {}",
                defaults.database_url
            );
            defaults.database_url.clone()
        });

        let hub = get("FWEN_HUB").unwrap_or(defaults.hub);
        let distances_csv = get("FWEN_DISTANCES_CSV").map(PathBuf::from);
        let bus_routes_csv = get("FWEN_BUS_ROUTES_CSV").map(PathBuf::from);

        info!(
            "Settings: hub={}, distances={:?}, bus routes={:?}",
            hub, distances_csv, bus_routes_csv
        );

        Settings {
            database_url,
            distances_csv,
            bus_routes_csv,
            hub,
        }
    }
}
