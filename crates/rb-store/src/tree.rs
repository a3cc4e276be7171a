//! # Folder tree reconstruction
//!
//! The flat folder list is the only source of truth. Trees are derived from it
//! on demand and never edited in place.

use rb_core::models::{Folder, FolderId, SortOption};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// A folder plus its freshly resolved children.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderTreeNode {
    pub folder: Folder,
    pub children: Vec<FolderTreeNode>,
    /// Loaded posts whose folder is this one (direct only)
    pub post_count: usize,
}

/// Builds the ordered subtree hanging off `parent_id` (`None` = top level).
///
/// `post_folder_ids` holds one entry per loaded post. The sort option is
/// applied to every sibling group independently, with `order_index` and then
/// `id` as tie-breakers, so equal inputs always give equal trees.
pub fn build_folder_tree(
    folders: &[Folder],
    parent_id: Option<FolderId>,
    post_folder_ids: &[Option<FolderId>],
    sort: SortOption,
) -> Vec<FolderTreeNode> {
    // One pass to index children by parent, instead of rescanning per node
    let mut by_parent: HashMap<Option<FolderId>, Vec<&Folder>> = HashMap::new();
    for folder in folders {
        by_parent.entry(folder.parent_id).or_default().push(folder);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by(|a, b| compare_siblings(a, b, sort));
    }

    let mut post_counts: HashMap<FolderId, usize> = HashMap::new();
    for id in post_folder_ids.iter().flatten() {
        *post_counts.entry(*id).or_insert(0) += 1;
    }

    let mut ancestors: Vec<FolderId> = parent_id.into_iter().collect();
    build_level(&by_parent, &post_counts, parent_id, &mut ancestors)
}

fn build_level(
    by_parent: &HashMap<Option<FolderId>, Vec<&Folder>>,
    post_counts: &HashMap<FolderId, usize>,
    parent_id: Option<FolderId>,
    ancestors: &mut Vec<FolderId>,
) -> Vec<FolderTreeNode> {
    let Some(siblings) = by_parent.get(&parent_id) else {
        return Vec::new();
    };

    let mut nodes = Vec::with_capacity(siblings.len());
    for folder in siblings {
        // A parent cycle in backend data must not recurse forever
        if ancestors.contains(&folder.id) {
            continue;
        }
        ancestors.push(folder.id);
        let children = build_level(by_parent, post_counts, Some(folder.id), ancestors);
        ancestors.pop();

        nodes.push(FolderTreeNode {
            folder: (*folder).clone(),
            children,
            post_count: post_counts.get(&folder.id).copied().unwrap_or(0),
        });
    }
    nodes
}

fn compare_siblings(a: &Folder, b: &Folder, sort: SortOption) -> Ordering {
    let primary = match sort {
        SortOption::NameAsc => compare_names(a, b),
        SortOption::NameDesc => compare_names(b, a),
        SortOption::UpdatedAsc => compare_times(&a.updated_at, &b.updated_at, false),
        SortOption::UpdatedDesc => compare_times(&a.updated_at, &b.updated_at, true),
        SortOption::CreatedAsc => compare_times(&a.created_at, &b.created_at, false),
        SortOption::CreatedDesc => compare_times(&a.created_at, &b.created_at, true),
    };
    primary
        .then_with(|| a.order_index.cmp(&b.order_index))
        .then_with(|| a.id.cmp(&b.id))
}

fn compare_names(a: &Folder, b: &Folder) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

/// Missing timestamps go last in both directions.
fn compare_times<T: Ord>(a: &Option<T>, b: &Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) if descending => y.cmp(x),
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
