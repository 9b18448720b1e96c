//! Tempora application: composition root and orchestration.
//!
//! The pipeline crates stay surface-agnostic; this crate wires them
//! together, maps pipeline failures to the one user-visible message, and
//! renders view models as terminal text.

pub mod dashboard;
pub mod surface;

pub use dashboard::{Dashboard, DashboardView};
