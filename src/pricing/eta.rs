use crate::distance::bus_routes::BusRouteTable;
use crate::domain::types::{Eta, ShipmentRequest};
use crate::pricing::tariff::Tariff;

/// Transit window: base hours by priority, plus slack that depends on whether a
/// direct bus serves the pair. The upper bound never exceeds the ceiling.
pub fn compute_eta(request: &ShipmentRequest, bus_routes: &BusRouteTable, tariff: &Tariff) -> Eta {
    let min_hours = tariff.base_hours(request.priority).min(tariff.eta_ceiling);
    let direct = bus_routes.has_direct_route(&request.origin, &request.destination);

    let slack = if direct {
        tariff.direct_route_slack
    } else {
        tariff.connecting_route_slack
    };

    Eta {
        min_hours,
        max_hours: (min_hours + slack).min(tariff.eta_ceiling),
        via_connecting_route: !direct,
    }
}
