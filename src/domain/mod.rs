// Record types and rounding
pub mod record;

// Derived-metric computation and input validation
pub mod factory;

// Aggregation and status classification
pub mod statistics;

// Field-level predicates and descriptor tables
pub mod validation;

// Domain-specific error types
pub mod errors;
