pub mod mock;
pub mod persistence;
pub mod sheets;
