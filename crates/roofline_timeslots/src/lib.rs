// --- File: crates/roofline_timeslots/src/lib.rs ---
// Declare modules within this crate
#[cfg(feature = "openapi")]
pub mod doc;
pub mod editor;
#[cfg(test)]
mod editor_test;
pub mod handlers;
pub mod logic;
pub mod routes;
pub mod store;

pub use editor::{EditorPhase, RuleEditor};
pub use routes::routes;
pub use store::{CrmRuleStore, RuleStore};
