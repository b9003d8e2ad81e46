pub mod parcels;
pub mod sqlx;
