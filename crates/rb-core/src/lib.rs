//! rusty-blog/crates/rb-core/src/lib.rs
//!
//! The shared data model and interface definitions for Rusty-Blog.

pub mod models;
pub mod traits;
pub mod error;

// Re-exporting for easier access in other crates
pub use models::*;
pub use traits::*;
pub use error::*;
