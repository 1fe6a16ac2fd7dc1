//! Liftoff Git - Git repository lookups
//!
//! This crate discovers the project repository and resolves its remotes
//! into browsable URLs used in store metadata.

mod remote;
mod repository;

pub use remote::normalize_remote_url;
pub use repository::{GitRepo, Result};
