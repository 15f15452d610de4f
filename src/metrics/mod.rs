//! Prometheus metrics for the Secret Santa service

pub mod collector;

pub use collector::MetricsCollector;
