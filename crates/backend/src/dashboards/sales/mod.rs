pub mod charts;
pub mod filters;
pub mod metrics;
pub mod service;
