//! Services orchestrating the analysis core and external collaborators.

pub mod advisor;

pub use advisor::{build_snapshot, indicator_bundle, rule_based_advice, AdvisorService, IndicatorBundle};
