//! # BlogSession
//!
//! Owns both stores for one signed-in session and is the choke point that
//! keeps them consistent: post mutations refresh the folder tree's post
//! counts, and the filtered post view reads the folder selection.
//! Construct one per session and drop it on logout.

use crate::folder_store::FolderStore;
use crate::post_store::{Pagination, PostStore};
use rb_core::error::Result;
use rb_core::models::{CreatePost, FolderId, Post, PostId, SortOption, UpdatePost};
use rb_core::traits::BlogGateway;
use std::sync::Arc;

pub struct BlogSession {
    folders: FolderStore,
    posts: PostStore,
}

impl BlogSession {
    pub fn new(gateway: Arc<dyn BlogGateway>, page_size: u32, sort_option: SortOption) -> Self {
        Self {
            folders: FolderStore::new(gateway.clone()).with_sort_option(sort_option),
            posts: PostStore::new(gateway, page_size),
        }
    }

    pub fn folders(&self) -> &FolderStore {
        &self.folders
    }

    /// Folder operations never touch posts, so the folder store is handed out
    /// directly. Post counts can only be fed from here.
    pub fn folders_mut(&mut self) -> &mut FolderStore {
        &mut self.folders
    }

    pub fn posts(&self) -> &PostStore {
        &self.posts
    }

    /// Loaded posts in the selected folder, or all of them without a selection.
    pub fn filtered_posts(&self) -> Vec<&Post> {
        self.posts.filtered_posts(self.folders.selected_folder_id())
    }

    pub async fn fetch_my_posts(&mut self, page: u32, size: u32) -> Result<Pagination> {
        let pagination = self.posts.fetch_my_posts(page, size).await?;
        self.sync_post_counts();
        Ok(pagination)
    }

    pub async fn get_post_by_id(&mut self, id: PostId) -> Result<Post> {
        self.posts.get_post_by_id(id).await
    }

    pub fn set_current_post(&mut self, post: Post) {
        self.posts.set_current_post(post);
    }

    pub fn clear_current_post(&mut self) {
        self.posts.clear_current_post();
    }

    pub async fn create_post(&mut self, data: &CreatePost) -> Result<Post> {
        let created = self.posts.create_post(data).await?;
        self.sync_post_counts();
        Ok(created)
    }

    pub async fn update_post(&mut self, id: PostId, data: &UpdatePost) -> Result<Post> {
        let updated = self.posts.update_post(id, data).await?;
        self.sync_post_counts();
        Ok(updated)
    }

    pub async fn move_post(&mut self, id: PostId, folder_id: Option<FolderId>) -> Result<Post> {
        let moved = self.posts.move_post(id, folder_id).await?;
        self.sync_post_counts();
        Ok(moved)
    }

    pub async fn delete_post(&mut self, id: PostId) -> Result<()> {
        self.posts.delete_post(id).await?;
        self.sync_post_counts();
        Ok(())
    }

    fn sync_post_counts(&mut self) {
        self.folders.sync_posts(self.posts.posts());
    }
}
