//! Core domain entities
//!
//! Pure data structures with no I/O. Records come from the users API and
//! are never mutated by the core.

mod filter;
mod session;
mod stats;
mod user;
pub mod result;

pub use filter::{FilterField, UserFilters};
pub use session::{AuthUser, Credentials, DEFAULT_DISPLAY_NAME, DEFAULT_EMAIL, DEFAULT_PASSWORD};
pub use stats::{DashboardStats, LOANS_PLACEHOLDER_PERCENT, SAVINGS_PLACEHOLDER_PERCENT};
pub use user::{AdditionalGuarantor, BankDetails, Guarantor, User, UserStatus, USER_TIER, USER_TIER_MAX};
