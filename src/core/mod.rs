//! Core business logic abstractions

pub mod config;
pub mod country;
pub mod format;
pub mod log;
pub mod price;
pub mod series;
pub mod structure;
pub mod tax;

// Re-export main types for cleaner imports
pub use country::{Country, CountryProfile};
pub use price::{LivePrice, PriceProvider};
pub use structure::Structure;
pub use tax::{CalculationInput, CalculationResult};
