pub mod audit;
pub mod engine;
pub mod error;
pub mod models;
pub mod providers;
pub mod registry;
