//! # PostStore
//!
//! The current page of the user's posts, the post being viewed and the
//! pagination cursor.

use crate::log_failure;
use rb_core::error::Result;
use rb_core::models::{CreatePost, FolderId, Post, PostId, UpdatePost};
use rb_core::traits::BlogGateway;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl Pagination {
    pub fn new(size: u32) -> Self {
        Self {
            page: 0,
            size,
            total_pages: 0,
            total_elements: 0,
        }
    }
}

pub struct PostStore {
    gateway: Arc<dyn BlogGateway>,
    posts: Vec<Post>,
    current_post: Option<Post>,
    pagination: Pagination,
}

impl PostStore {
    pub fn new(gateway: Arc<dyn BlogGateway>, page_size: u32) -> Self {
        Self {
            gateway,
            posts: Vec::new(),
            current_post: None,
            pagination: Pagination::new(page_size),
        }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn current_post(&self) -> Option<&Post> {
        self.current_post.as_ref()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Posts filed under `folder_id`, or every loaded post when nothing is selected.
    pub fn filtered_posts(&self, folder_id: Option<FolderId>) -> Vec<&Post> {
        match folder_id {
            None => self.posts.iter().collect(),
            Some(id) => self.posts.iter().filter(|p| p.folder_id == Some(id)).collect(),
        }
    }

    pub fn set_current_post(&mut self, post: Post) {
        self.current_post = Some(post);
    }

    pub fn clear_current_post(&mut self) {
        self.current_post = None;
    }

    /// Replaces the loaded posts and the cursor with one page from the backend.
    pub async fn fetch_my_posts(&mut self, page: u32, size: u32) -> Result<Pagination> {
        let result = self
            .gateway
            .list_my_posts(page, size)
            .await
            .map_err(log_failure("fetch my posts"))?;

        self.posts = result.content;
        self.pagination = Pagination {
            page: result.number,
            size: result.size,
            total_pages: result.total_pages,
            total_elements: result.total_elements,
        };
        debug!(count = self.posts.len(), page = self.pagination.page, "loaded posts");
        Ok(self.pagination)
    }

    pub async fn get_post_by_id(&mut self, id: PostId) -> Result<Post> {
        let post = self
            .gateway
            .get_post(id)
            .await
            .map_err(log_failure("get post by id"))?;

        self.current_post = Some(post.clone());
        Ok(post)
    }

    /// New posts go to the front of the page and count towards the total.
    pub async fn create_post(&mut self, data: &CreatePost) -> Result<Post> {
        let created = self
            .gateway
            .create_post(data)
            .await
            .map_err(log_failure("create post"))?;

        self.posts.insert(0, created.clone());
        self.pagination.total_elements += 1;
        Ok(created)
    }

    pub async fn update_post(&mut self, id: PostId, data: &UpdatePost) -> Result<Post> {
        let updated = self
            .gateway
            .update_post(id, data)
            .await
            .map_err(log_failure("update post"))?;

        self.replace(id, &updated);
        Ok(updated)
    }

    /// Files the post under `folder_id`, or unfiles it for `None`.
    pub async fn move_post(&mut self, id: PostId, folder_id: Option<FolderId>) -> Result<Post> {
        let moved = self
            .gateway
            .move_post(id, folder_id)
            .await
            .map_err(log_failure("move post"))?;

        self.replace(id, &moved);
        Ok(moved)
    }

    pub async fn delete_post(&mut self, id: PostId) -> Result<()> {
        self.gateway
            .delete_post(id)
            .await
            .map_err(log_failure("delete post"))?;

        self.posts.retain(|p| p.id != id);
        self.pagination.total_elements = self.pagination.total_elements.saturating_sub(1);
        if self.current_post.as_ref().is_some_and(|p| p.id == id) {
            self.current_post = None;
        }
        Ok(())
    }

    fn replace(&mut self, id: PostId, post: &Post) {
        if let Some(existing) = self.posts.iter_mut().find(|p| p.id == id) {
            *existing = post.clone();
        }
        if let Some(current) = self.current_post.as_mut().filter(|p| p.id == id) {
            *current = post.clone();
        }
    }
}
