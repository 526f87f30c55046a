// Sink wiring from configuration
pub mod bootstrap;

// Record numbering and multi-sink appends
pub mod trade_store;
