use rayon::prelude::*;
use tracing::{debug, info, span, Level};

use crate::distance::bus_routes::BusRouteTable;
use crate::distance::catalog::RouteCatalog;
use crate::domain::types::{CostBreakdown, Eta, Quote, ShipmentRequest};
use crate::pricing::cost::compute_cost;
use crate::pricing::eta::compute_eta;
use crate::pricing::tariff::Tariff;

/// Quotes price and transit time for shipments. Holds only immutable tables,
/// so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct CostEstimator {
    catalog: RouteCatalog,
    bus_routes: BusRouteTable,
    tariff: Tariff,
}

impl CostEstimator {
    pub fn new(catalog: RouteCatalog, bus_routes: BusRouteTable) -> Self {
        CostEstimator {
            catalog,
            bus_routes,
            tariff: Tariff::default(),
        }
    }

    pub fn with_tariff(mut self, tariff: Tariff) -> Self {
        self.tariff = tariff;
        self
    }

    pub fn catalog(&self) -> &RouteCatalog {
        &self.catalog
    }

    pub fn bus_routes(&self) -> &BusRouteTable {
        &self.bus_routes
    }

    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    pub fn estimate_distance(&self, from: &str, to: &str) -> f64 {
        self.catalog.estimate_distance(from, to)
    }

    pub fn compute_cost(&self, request: &ShipmentRequest) -> CostBreakdown {
        compute_cost(request, &self.catalog, &self.tariff)
    }

    pub fn compute_eta(&self, request: &ShipmentRequest) -> Eta {
        compute_eta(request, &self.bus_routes, &self.tariff)
    }

    pub fn estimate(&self, request: &ShipmentRequest) -> Quote {
        let breakdown = self.compute_cost(request);
        let eta = self.compute_eta(request);

        debug!(
            "Quote {} -> {} ({} kg, {}, {}, insured={}): {} km, {} UGX, {}",
            request.origin,
            request.destination,
            request.weight_kg,
            request.size,
            request.priority,
            request.insured,
            breakdown.distance_km,
            breakdown.cost_units,
            eta
        );

        Quote {
            cost_units: breakdown.cost_units,
            eta_label: eta.to_string(),
            eta,
            breakdown,
        }
    }

    /// Quotes every request in parallel; output order matches input order.
    pub fn estimate_batch(&self, requests: &[ShipmentRequest]) -> Vec<Quote> {
        let batch_span = span!(Level::INFO, "estimate_batch", size = requests.len());
        let _guard = batch_span.enter();

        let quotes: Vec<Quote> = requests.par_iter().map(|r| self.estimate(r)).collect();
        info!("Quoted {} shipments", quotes.len());
        quotes
    }
}
