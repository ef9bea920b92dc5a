pub mod metrics;
pub mod table;
