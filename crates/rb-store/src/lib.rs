//! # rb-store
//!
//! Client-side stores for folders and posts.
//!
//! Each store owns its flat collections and is the single place they change.
//! Mutations go to the gateway first and touch local state only after the
//! backend answered, so a failed call leaves every store exactly as it was.

pub mod folder_store;
pub mod post_store;
pub mod session;
pub mod tree;

pub use folder_store::FolderStore;
pub use post_store::{Pagination, PostStore};
pub use session::BlogSession;
pub use tree::{build_folder_tree, FolderTreeNode};

use rb_core::error::AppError;

/// Logs a failed gateway call and hands the error back untouched.
pub(crate) fn log_failure(action: &'static str) -> impl FnOnce(AppError) -> AppError {
    move |err| {
        tracing::error!(error = %err, "failed to {}", action);
        err
    }
}
