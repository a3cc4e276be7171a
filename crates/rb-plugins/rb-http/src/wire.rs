//! # Backend wire shapes
//!
//! The backend keys its records by `folderId` / `postId` / `userId` and omits
//! optional fields freely. Everything here is deserialize-only and converts
//! into the `rb-core` models, filling the defaults the stores rely on.

use chrono::{DateTime, NaiveDateTime, Utc};
use rb_core::models::{
    EntityRef, Folder, FolderId, Page, Post, PostId, PostStatus, User, UserId, Visibility,
};
use serde::{de, Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FolderRecord {
    folder_id: FolderId,
    #[serde(default)]
    name: String,
    description: Option<String>,
    parent_id: Option<FolderId>,
    order_index: Option<i32>,
    post_count: Option<u32>,
    child_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    updated_at: Option<DateTime<Utc>>,
    children: Option<Vec<FolderRecord>>,
}

impl From<FolderRecord> for Folder {
    fn from(rec: FolderRecord) -> Self {
        let children: Vec<Folder> = rec
            .children
            .unwrap_or_default()
            .into_iter()
            .map(Folder::from)
            .collect();
        let child_count = rec.child_count.unwrap_or(0);

        Folder {
            id: rec.folder_id,
            name: rec.name,
            description: rec.description,
            parent_id: rec.parent_id,
            order_index: rec.order_index.unwrap_or(0),
            post_count: rec.post_count.unwrap_or(0),
            child_count,
            created_at: rec.created_at,
            updated_at: rec.updated_at,
            has_children: !children.is_empty() || child_count > 0,
            children,
        }
    }
}

/// Users may carry `userId`, `id` or both.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserRecord {
    user_id: Option<UserId>,
    id: Option<UserId>,
    login_id: Option<String>,
    nickname: Option<String>,
}

impl UserRecord {
    /// `None` when neither key is present.
    fn into_user(self) -> Option<User> {
        Some(User {
            id: self.user_id.or(self.id)?,
            login_id: self.login_id,
            nickname: self.nickname,
        })
    }
}

/// Inlined `folder` / `category` / `series` object. `id` wins over the
/// entity-specific key when both are sent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RefRecord {
    id: Option<i64>,
    folder_id: Option<i64>,
    category_id: Option<i64>,
    series_id: Option<i64>,
    name: Option<String>,
}

impl RefRecord {
    fn into_ref(self) -> Option<EntityRef> {
        let id = self
            .id
            .or(self.folder_id)
            .or(self.category_id)
            .or(self.series_id)?;
        Some(EntityRef { id, name: self.name })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PostRecord {
    post_id: PostId,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    summary: Option<String>,
    thumbnail_url: Option<String>,
    slug: Option<String>,
    status: Option<PostStatus>,
    visibility: Option<Visibility>,
    folder_id: Option<FolderId>,
    category_id: Option<i64>,
    series_id: Option<i64>,
    view_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    updated_at: Option<DateTime<Utc>>,
    author: Option<UserRecord>,
    category: Option<RefRecord>,
    series: Option<RefRecord>,
    folder: Option<RefRecord>,
}

impl From<PostRecord> for Post {
    fn from(rec: PostRecord) -> Self {
        let folder = rec.folder.and_then(RefRecord::into_ref);
        let category = rec.category.and_then(RefRecord::into_ref);
        let series = rec.series.and_then(RefRecord::into_ref);

        Post {
            id: rec.post_id,
            title: rec.title,
            content: rec.content,
            summary: rec.summary,
            thumbnail_url: rec.thumbnail_url,
            slug: rec.slug,
            status: rec.status.unwrap_or_default(),
            visibility: rec.visibility.unwrap_or_default(),
            // Scalar key wins; the inlined object is the fallback
            folder_id: rec.folder_id.or(folder.as_ref().map(|f| f.id)),
            category_id: rec.category_id.or(category.as_ref().map(|c| c.id)),
            series_id: rec.series_id.or(series.as_ref().map(|s| s.id)),
            view_count: rec.view_count.unwrap_or(0),
            created_at: rec.created_at,
            updated_at: rec.updated_at,
            author: rec.author.and_then(UserRecord::into_user),
            category,
            series,
            folder,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageRecord {
    content: Vec<PostRecord>,
    number: Option<u32>,
    size: Option<u32>,
    total_pages: Option<u32>,
    total_elements: Option<u64>,
}

/// `GET /posts/my` answers with a page envelope, or with a bare array on
/// backends that don't paginate.
#[derive(Debug)]
pub(crate) enum PostListing {
    Paged(PageRecord),
    Plain(Vec<PostRecord>),
}

// Shape is picked from the JSON kind so a bad record reports its own error.
impl<'de> Deserialize<'de> for PostListing {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let listing = if value.is_array() {
            serde_json::from_value(value).map(PostListing::Plain)
        } else {
            serde_json::from_value(value).map(PostListing::Paged)
        };
        listing.map_err(de::Error::custom)
    }
}

impl PostListing {
    /// Fills whatever the backend left out from the request that produced it.
    pub(crate) fn into_page(self, page: u32, size: u32) -> Page<Post> {
        match self {
            PostListing::Paged(rec) => Page {
                content: rec.content.into_iter().map(Post::from).collect(),
                number: rec.number.unwrap_or(page),
                size: rec.size.unwrap_or(size),
                total_pages: rec.total_pages.unwrap_or(0),
                total_elements: rec.total_elements.unwrap_or(0),
            },
            PostListing::Plain(records) => Page {
                content: records.into_iter().map(Post::from).collect(),
                number: 0,
                size,
                total_pages: 0,
                total_elements: 0,
            },
        }
    }
}

/// Accepts RFC 3339 or a zone-less ISO-8601 stamp (read as UTC).
/// Anything else, including non-string values, becomes `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn folder(value: serde_json::Value) -> Folder {
        serde_json::from_value::<FolderRecord>(value).unwrap().into()
    }

    fn post(value: serde_json::Value) -> Post {
        serde_json::from_value::<PostRecord>(value).unwrap().into()
    }

    #[test]
    fn test_folder_key_and_defaults() {
        let f = folder(json!({ "folderId": 4, "name": "Notes", "parentId": null }));
        assert_eq!(f.id, 4);
        assert_eq!(f.name, "Notes");
        assert_eq!(f.parent_id, None);
        assert_eq!(f.post_count, 0);
        assert_eq!(f.child_count, 0);
        assert_eq!(f.order_index, 0);
        assert!(f.children.is_empty());
        assert!(!f.has_children);
    }

    #[test]
    fn test_has_children_from_count_or_inlined_list() {
        let by_count = folder(json!({ "folderId": 1, "name": "A", "childCount": 2 }));
        assert!(by_count.has_children);

        let by_list = folder(json!({
            "folderId": 1,
            "name": "A",
            "childCount": 0,
            "children": [{ "folderId": 2, "name": "B", "parentId": 1 }]
        }));
        assert!(by_list.has_children);
        assert_eq!(by_list.children.len(), 1);
        assert_eq!(by_list.children[0].id, 2);
        assert_eq!(by_list.children[0].parent_id, Some(1));
    }

    #[test]
    fn test_post_defaults() {
        let p = post(json!({ "postId": 9, "title": "Hi", "content": "body" }));
        assert_eq!(p.id, 9);
        assert_eq!(p.status, PostStatus::Draft);
        assert_eq!(p.visibility, Visibility::Private);
        assert_eq!(p.view_count, 0);
        assert_eq!(p.folder_id, None);
        assert!(p.author.is_none());
    }

    #[test]
    fn test_post_falls_back_to_inlined_references() {
        let p = post(json!({
            "postId": 1,
            "title": "T",
            "content": "C",
            "status": "PUBLISHED",
            "visibility": "PUBLIC",
            "folder": { "id": 3, "name": "Rust" },
            "category": { "id": 5, "name": "Dev" },
            "seriesId": 8,
            "series": { "id": 99 },
            "author": { "userId": 42, "loginId": "kim", "nickname": "Kim" }
        }));
        assert_eq!(p.status, PostStatus::Published);
        assert_eq!(p.visibility, Visibility::Public);
        assert_eq!(p.folder_id, Some(3));
        assert_eq!(p.category_id, Some(5));
        assert_eq!(p.series_id, Some(8));
        assert_eq!(p.folder.as_ref().and_then(|f| f.name.as_deref()), Some("Rust"));

        let author = p.author.unwrap();
        assert_eq!(author.id, 42);
        assert_eq!(author.login_id.as_deref(), Some("kim"));
    }

    #[test]
    fn test_inlined_objects_may_carry_both_id_keys() {
        let p = post(json!({
            "postId": 1,
            "folder": { "folderId": 3, "id": 3, "name": "Rust" },
            "category": { "categoryId": 6 },
            "author": { "userId": 42, "id": 42, "nickname": "Kim" }
        }));
        assert_eq!(p.folder_id, Some(3));
        assert_eq!(p.category_id, Some(6));
        assert_eq!(p.author.map(|a| a.id), Some(42));
    }

    #[test]
    fn test_inlined_objects_without_any_id_are_dropped() {
        let p = post(json!({
            "postId": 1,
            "folder": { "name": "Nameless" },
            "author": { "nickname": "ghost" }
        }));
        assert!(p.folder.is_none());
        assert_eq!(p.folder_id, None);
        assert!(p.author.is_none());
    }

    #[test]
    fn test_unknown_status_and_visibility_pass_through() {
        let listing: PostListing = serde_json::from_value(json!({
            "content": [
                { "postId": 1, "status": "PUBLISHED", "visibility": "PUBLIC" },
                { "postId": 2, "status": "SCHEDULED", "visibility": "UNLISTED" }
            ]
        }))
        .unwrap();
        let page = listing.into_page(0, 20);
        assert_eq!(page.content[1].status, PostStatus::Other("SCHEDULED".into()));
        assert_eq!(page.content[1].visibility, Visibility::Other("UNLISTED".into()));
    }

    #[test]
    fn test_bad_record_in_listing_reports_its_field() {
        let err = serde_json::from_value::<PostListing>(json!({
            "content": [{ "title": "no id" }]
        }))
        .unwrap_err();
        assert!(err.to_string().contains("postId"), "{}", err);

        let err = serde_json::from_value::<PostListing>(json!([{ "postId": "x" }])).unwrap_err();
        assert!(err.to_string().contains("invalid type"), "{}", err);
    }

    #[test]
    fn test_timestamps_with_and_without_zone() {
        let f = folder(json!({
            "folderId": 1,
            "name": "A",
            "createdAt": "2024-03-01T10:15:30",
            "updatedAt": "2024-03-02T10:15:30.250+09:00"
        }));
        assert_eq!(f.created_at, Some(Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap()));
        assert_eq!(
            f.updated_at.map(|t| t.to_rfc3339()),
            Some("2024-03-02T01:15:30.250+00:00".to_string())
        );

        let garbage = folder(json!({ "folderId": 1, "name": "A", "createdAt": [2024, 3, 1] }));
        assert_eq!(garbage.created_at, None);
    }

    #[test]
    fn test_paged_listing_keeps_backend_cursor() {
        let listing: PostListing = serde_json::from_value(json!({
            "content": [{ "postId": 1, "title": "a", "content": "" }],
            "number": 2,
            "size": 10,
            "totalPages": 5,
            "totalElements": 41
        }))
        .unwrap();
        let page = listing.into_page(0, 20);
        assert_eq!(page.content.len(), 1);
        assert_eq!((page.number, page.size, page.total_pages, page.total_elements), (2, 10, 5, 41));
    }

    #[test]
    fn test_plain_listing_is_page_zero_with_unknown_totals() {
        let listing: PostListing = serde_json::from_value(json!([
            { "postId": 1, "title": "a", "content": "" },
            { "postId": 2, "title": "b", "content": "" }
        ]))
        .unwrap();
        let page = listing.into_page(3, 20);
        assert_eq!(page.content.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!((page.number, page.size, page.total_pages, page.total_elements), (0, 20, 0, 0));
    }
}
