//! In-memory project/issue store for the Debtrix web application.
//!
//! [`ProjectStore`] keeps the signed-in user's projects (with nested
//! issues) synchronized with the backend on every mutation and exposes
//! a derived current-project view that is structurally equal to the
//! matching list entry after every settled operation. The [`stats`]
//! module aggregates loaded data for the dashboard and analytics views.

mod error;
pub mod stats;
mod store;

pub use error::{StoreError, StoreResult};
pub use stats::{per_project, DebtSummary, ProjectBreakdown, SeverityCounts, StatusCounts};
pub use store::ProjectStore;
