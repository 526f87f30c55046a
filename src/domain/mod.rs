// Journal record model, form normalization and KPIs
pub mod journal;

// Sink traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
