//! Captured leads and the views derived from them.

pub mod dashboard;
pub mod model;
pub mod scoring;
pub mod store;

pub use dashboard::{Dashboard, DashboardTotals, LeadRow};
pub use model::{Lead, LeadDetails, LeadField, UserType};
pub use scoring::{ScoreBand, score};
pub use store::LeadStore;
