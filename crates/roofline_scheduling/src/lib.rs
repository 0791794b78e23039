// --- File: crates/roofline_scheduling/src/lib.rs ---
// Declare modules within this crate
#[cfg(feature = "openapi")]
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod replace;
pub mod routes;
pub mod selection;
#[cfg(test)]
mod selection_test;
pub mod service;

pub use routes::routes;
pub use service::CrmSchedulingService;
