//! Service layer for business logic
//!
//! Shared by the HTTP handlers and the integration tests; every service holds
//! an `Arc<dyn LinkStore>` and is cheap to clone.

pub mod alias;
mod analytics_service;
mod link_service;
mod redirect;

pub use alias::{AliasAllocator, LinkDraft, validate_alias};
pub use analytics_service::*;
pub use link_service::*;
pub use redirect::RedirectResolver;
