pub mod cost;
pub mod estimator;
pub mod eta;
pub mod tariff;

pub use estimator::CostEstimator;
