use std::error::Error;

use dotenv::dotenv;
use tracing::{info, span, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Settings;
use crate::distance::bus_routes::BusRouteTable;
use crate::distance::catalog::RouteCatalog;
use crate::error::CatalogError;
use crate::pricing::CostEstimator;

/// Initialize tracing and environment
pub fn init_tracing_and_env() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_target(false))
        .init();

    dotenv().ok();
    Ok(())
}

/// Builds the estimator from the configured tables, falling back to the
/// built-in ones when no override is set.
pub fn load_estimator(settings: &Settings) -> Result<CostEstimator, CatalogError> {
    let span = span!(Level::INFO, "load_estimator");
    let _guard = span.enter();

    let catalog = match &settings.distances_csv {
        Some(path) => RouteCatalog::from_csv_path(path)?,
        None => RouteCatalog::default(),
    }
    .with_hub(settings.hub.as_str());

    let bus_routes = match &settings.bus_routes_csv {
        Some(path) => BusRouteTable::from_csv_path(path)?,
        None => BusRouteTable::default(),
    };

    info!(
        "Estimator ready: {} district distances, {} bus routes, hub {}",
        catalog.len(),
        bus_routes.len(),
        catalog.hub()
    );

    Ok(CostEstimator::new(catalog, bus_routes))
}
