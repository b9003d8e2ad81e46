pub mod bus_routes;
pub mod catalog;
pub(crate) mod table;
