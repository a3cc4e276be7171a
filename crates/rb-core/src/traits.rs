//! # Core Traits (Ports)
//!
//! Any gateway plugin must implement these traits to back the stores.

use crate::error::Result;
use crate::models::{
    CreateFolder, CreatePost, Folder, FolderId, MoveFolder, Page, Post, PostId, UpdateFolder,
    UpdatePost,
};
use async_trait::async_trait;

/// Remote data contract for folders and posts.
///
/// Every call maps to exactly one backend request. Implementations reshape
/// backend records into the client models and surface failures unchanged:
/// no retries, no local validation, no ordering beyond what the backend returns.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BlogGateway: Send + Sync {
    // Folder Operations
    async fn list_root_folders(&self) -> Result<Vec<Folder>>;
    async fn list_child_folders(&self, parent_id: FolderId) -> Result<Vec<Folder>>;
    async fn create_folder(&self, data: &CreateFolder) -> Result<Folder>;
    async fn update_folder(&self, id: FolderId, data: &UpdateFolder) -> Result<Folder>;
    async fn move_folder(&self, id: FolderId, data: &MoveFolder) -> Result<Folder>;
    async fn delete_folder(&self, id: FolderId) -> Result<()>;

    // Post Operations
    /// Posts owned by the current session's user. A backend that answers with a
    /// bare array yields page 0 with unknown (zero) totals.
    async fn list_my_posts(&self, page: u32, size: u32) -> Result<Page<Post>>;
    async fn get_post(&self, id: PostId) -> Result<Post>;
    async fn create_post(&self, data: &CreatePost) -> Result<Post>;
    async fn update_post(&self, id: PostId, data: &UpdatePost) -> Result<Post>;
    async fn move_post(&self, id: PostId, folder_id: Option<FolderId>) -> Result<Post>;
    async fn delete_post(&self, id: PostId) -> Result<()>;
}
