//! # FolderStore
//!
//! Holds every known folder as a flat list, the root subset, the current
//! selection and the derived tree. Every method that changes the flat list
//! rebuilds the tree before returning.

use crate::log_failure;
use crate::tree::{build_folder_tree, FolderTreeNode};
use rb_core::error::Result;
use rb_core::models::{CreateFolder, Folder, FolderId, MoveFolder, Post, SortOption, UpdateFolder};
use rb_core::traits::BlogGateway;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct FolderStore {
    gateway: Arc<dyn BlogGateway>,
    folders: Vec<Folder>,
    root_folders: Vec<Folder>,
    selected_folder_id: Option<FolderId>,
    tree: Vec<FolderTreeNode>,
    sort_option: SortOption,
    /// Folder of each loaded post, for the per-node post counts
    post_folder_ids: Vec<Option<FolderId>>,
}

impl FolderStore {
    pub fn new(gateway: Arc<dyn BlogGateway>) -> Self {
        Self {
            gateway,
            folders: Vec::new(),
            root_folders: Vec::new(),
            selected_folder_id: None,
            tree: Vec::new(),
            sort_option: SortOption::default(),
            post_folder_ids: Vec::new(),
        }
    }

    pub fn with_sort_option(mut self, sort_option: SortOption) -> Self {
        self.sort_option = sort_option;
        self
    }

    // -- Read access --

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn root_folders(&self) -> &[Folder] {
        &self.root_folders
    }

    pub fn tree(&self) -> &[FolderTreeNode] {
        &self.tree
    }

    pub fn sort_option(&self) -> SortOption {
        self.sort_option
    }

    pub fn selected_folder_id(&self) -> Option<FolderId> {
        self.selected_folder_id
    }

    /// The selected folder, if it is still in the flat list.
    pub fn selected_folder(&self) -> Option<&Folder> {
        self.selected_folder_id.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    // -- Local state --

    pub fn select_folder(&mut self, id: FolderId) {
        self.selected_folder_id = Some(id);
    }

    pub fn clear_selection(&mut self) {
        self.selected_folder_id = None;
    }

    pub fn set_sort_option(&mut self, sort_option: SortOption) {
        self.sort_option = sort_option;
        self.rebuild_tree();
    }

    /// Refreshes the per-folder post counts from the currently loaded posts.
    /// Only `BlogSession` feeds this, always with the post store's page.
    pub(crate) fn sync_posts(&mut self, posts: &[Post]) {
        self.post_folder_ids = posts.iter().map(|p| p.folder_id).collect();
        self.rebuild_tree();
    }

    fn rebuild_tree(&mut self) {
        self.tree = build_folder_tree(&self.folders, None, &self.post_folder_ids, self.sort_option);
    }

    // -- Remote operations --

    /// Replaces both the flat list and the root list with the backend's roots.
    /// Previously loaded non-root folders are dropped.
    pub async fn fetch_root_folders(&mut self) -> Result<Vec<Folder>> {
        let roots = self
            .gateway
            .list_root_folders()
            .await
            .map_err(log_failure("fetch root folders"))?;

        self.folders = roots.clone();
        self.root_folders = roots.clone();
        self.rebuild_tree();
        Ok(roots)
    }

    /// Upserts the children of `parent_id` into the flat list. Roots are untouched.
    pub async fn fetch_child_folders(&mut self, parent_id: FolderId) -> Result<Vec<Folder>> {
        let children = self
            .gateway
            .list_child_folders(parent_id)
            .await
            .map_err(log_failure("fetch child folders"))?;

        for child in &children {
            upsert(&mut self.folders, child.clone());
        }
        self.rebuild_tree();
        Ok(children)
    }

    /// Loads the roots, then walks depth-first through every folder flagged
    /// `has_children`, one request at a time, in the order the backend listed
    /// them. State is committed only once the whole walk succeeded.
    pub async fn load_all_folders(&mut self) -> Result<()> {
        let roots = self
            .gateway
            .list_root_folders()
            .await
            .map_err(log_failure("load all folders"))?;

        let mut folders = roots.clone();
        let mut visited: HashSet<FolderId> = HashSet::new();
        let mut pending: Vec<FolderId> = roots
            .iter()
            .rev()
            .filter(|f| f.has_children)
            .map(|f| f.id)
            .collect();

        while let Some(parent_id) = pending.pop() {
            if !visited.insert(parent_id) {
                continue;
            }
            let children = self
                .gateway
                .list_child_folders(parent_id)
                .await
                .map_err(log_failure("load all folders"))?;
            debug!(parent_id, count = children.len(), "fetched child folders");

            pending.extend(children.iter().rev().filter(|c| c.has_children).map(|c| c.id));
            for child in children {
                upsert(&mut folders, child);
            }
        }

        self.folders = folders;
        self.root_folders = roots;
        self.rebuild_tree();
        info!(
            folders = self.folders.len(),
            roots = self.root_folders.len(),
            "loaded folder hierarchy"
        );
        Ok(())
    }

    pub async fn create_folder(&mut self, data: &CreateFolder) -> Result<Folder> {
        let created = self
            .gateway
            .create_folder(data)
            .await
            .map_err(log_failure("create folder"))?;

        if self.get(created.id).is_some() {
            warn!(folder_id = created.id, "created folder is already known, not adding it twice");
        } else {
            self.folders.push(created.clone());
        }

        if created.parent_id.is_none() && !self.root_folders.iter().any(|f| f.id == created.id) {
            self.root_folders.push(created.clone());
        }

        self.rebuild_tree();
        Ok(created)
    }

    pub async fn update_folder(&mut self, id: FolderId, data: &UpdateFolder) -> Result<Folder> {
        let updated = self
            .gateway
            .update_folder(id, data)
            .await
            .map_err(log_failure("update folder"))?;

        replace(&mut self.folders, id, &updated);
        replace(&mut self.root_folders, id, &updated);
        self.rebuild_tree();
        Ok(updated)
    }

    /// Moves a folder under `new_parent_id`, or to the top level for `None`.
    pub async fn move_folder(&mut self, id: FolderId, new_parent_id: Option<FolderId>) -> Result<Folder> {
        let moved = self
            .gateway
            .move_folder(id, &MoveFolder { parent_id: new_parent_id })
            .await
            .map_err(log_failure("move folder"))?;

        replace(&mut self.folders, id, &moved);
        if moved.parent_id.is_none() {
            upsert(&mut self.root_folders, moved.clone());
        } else {
            self.root_folders.retain(|f| f.id != id);
        }

        self.rebuild_tree();
        Ok(moved)
    }

    /// Deletes a folder and drops it and all of its descendants locally.
    pub async fn delete_folder(&mut self, id: FolderId) -> Result<()> {
        self.gateway
            .delete_folder(id)
            .await
            .map_err(log_failure("delete folder"))?;

        let removed = subtree_ids(&self.folders, id);
        self.folders.retain(|f| !removed.contains(&f.id));
        self.root_folders.retain(|f| !removed.contains(&f.id));

        if self.selected_folder_id.is_some_and(|sel| removed.contains(&sel)) {
            self.selected_folder_id = None;
        }

        self.rebuild_tree();
        debug!(folder_id = id, removed = removed.len(), "deleted folder subtree");
        Ok(())
    }
}

/// Replaces the entry with the same id, or appends.
fn upsert(list: &mut Vec<Folder>, folder: Folder) {
    match list.iter_mut().find(|f| f.id == folder.id) {
        Some(existing) => *existing = folder,
        None => list.push(folder),
    }
}

/// Replaces the entry with `id` if present; never appends.
fn replace(list: &mut [Folder], id: FolderId, folder: &Folder) {
    if let Some(existing) = list.iter_mut().find(|f| f.id == id) {
        *existing = folder.clone();
    }
}

/// `id` plus every transitive descendant, found by scanning parent ids.
fn subtree_ids(folders: &[Folder], id: FolderId) -> HashSet<FolderId> {
    let mut removed = HashSet::from([id]);
    let mut frontier = vec![id];
    while let Some(parent) = frontier.pop() {
        for child in folders.iter().filter(|f| f.parent_id == Some(parent)) {
            if removed.insert(child.id) {
                frontier.push(child.id);
            }
        }
    }
    removed
}
