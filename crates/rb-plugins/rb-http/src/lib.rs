//! # rb-http Implementation
//!
//! This module implements `BlogGateway` over the backend's REST API and maps
//! its record shapes onto the `rb-core` domain models.

mod wire;

use async_trait::async_trait;
use rb_config::ClientSettings;
use rb_core::error::{AppError, Result};
use rb_core::models::{
    CreateFolder, CreatePost, Folder, FolderId, MoveFolder, Page, Post, PostId, UpdateFolder,
    UpdatePost,
};
use rb_core::traits::BlogGateway;
use reqwest::{Client, Method, RequestBuilder};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use wire::{FolderRecord, PostListing, PostRecord};

/// Immutable handle on one backend. Cheap to share behind an `Arc`.
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    /// Builds a gateway rooted at `base_url` (e.g. `https://host/api/v1`).
    pub fn new(base_url: &str, api_token: Option<&str>, timeout: Duration) -> Result<Self> {
        if base_url.trim().is_empty() {
            return Err(AppError::Config("api base url is empty".into()));
        }

        let mut builder = Client::builder().timeout(timeout);

        if let Some(token) = api_token {
            let mut headers = reqwest::header::HeaderMap::new();
            let value = format!("Bearer {}", token)
                .parse()
                .map_err(|_| AppError::Config("api token is not a valid header value".into()))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        let client = builder
            .build()
            .map_err(|e| AppError::Config(format!("http client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        Self::new(
            &settings.api_base_url,
            settings.api_token.as_ref().map(|t| t.expose_secret()),
            settings.timeout(),
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{}", self.base_url, path))
    }

    /// Sends the request and returns the raw body of a 2xx response.
    async fn send(&self, req: RequestBuilder) -> Result<String> {
        let resp = req
            .send()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| AppError::Transport(e.to_string()))?;

        tracing::debug!(status = status.as_u16(), bytes = body.len(), "backend response");

        if !status.is_success() {
            return Err(AppError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let body = self.send(req).await?;
        serde_json::from_str(&body).map_err(|e| AppError::Decode(e.to_string()))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        tracing::debug!(%path, "GET");
        self.fetch(self.request(Method::GET, path)).await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        tracing::debug!(%path, "POST");
        self.fetch(self.request(Method::POST, path).json(body)).await
    }

    async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        tracing::debug!(%path, "PATCH");
        self.fetch(self.request(Method::PATCH, path).json(body)).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        tracing::debug!(%path, "DELETE");
        self.send(self.request(Method::DELETE, path)).await.map(|_| ())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MovePostBody {
    folder_id: Option<FolderId>,
}

fn folders(records: Vec<FolderRecord>) -> Vec<Folder> {
    records.into_iter().map(Folder::from).collect()
}

#[async_trait]
impl BlogGateway for HttpGateway {
    async fn list_root_folders(&self) -> Result<Vec<Folder>> {
        let records: Vec<FolderRecord> = self.get("/folders").await?;
        Ok(folders(records))
    }

    async fn list_child_folders(&self, parent_id: FolderId) -> Result<Vec<Folder>> {
        let records: Vec<FolderRecord> = self.get(&format!("/folders/{}/children", parent_id)).await?;
        Ok(folders(records))
    }

    async fn create_folder(&self, data: &CreateFolder) -> Result<Folder> {
        let record: FolderRecord = self.post("/folders", data).await?;
        Ok(record.into())
    }

    async fn update_folder(&self, id: FolderId, data: &UpdateFolder) -> Result<Folder> {
        let record: FolderRecord = self.patch(&format!("/folders/{}", id), data).await?;
        Ok(record.into())
    }

    async fn move_folder(&self, id: FolderId, data: &MoveFolder) -> Result<Folder> {
        let record: FolderRecord = self.patch(&format!("/folders/{}/move", id), data).await?;
        Ok(record.into())
    }

    async fn delete_folder(&self, id: FolderId) -> Result<()> {
        self.delete(&format!("/folders/{}", id)).await
    }

    async fn list_my_posts(&self, page: u32, size: u32) -> Result<Page<Post>> {
        tracing::debug!(page, size, "GET /posts/my");
        let req = self
            .request(Method::GET, "/posts/my")
            .query(&[("page", page), ("size", size)]);
        let listing: PostListing = self.fetch(req).await?;
        Ok(listing.into_page(page, size))
    }

    async fn get_post(&self, id: PostId) -> Result<Post> {
        let record: PostRecord = self.get(&format!("/posts/id/{}", id)).await?;
        Ok(record.into())
    }

    async fn create_post(&self, data: &CreatePost) -> Result<Post> {
        let record: PostRecord = self.post("/posts", data).await?;
        Ok(record.into())
    }

    async fn update_post(&self, id: PostId, data: &UpdatePost) -> Result<Post> {
        let record: PostRecord = self.patch(&format!("/posts/{}", id), data).await?;
        Ok(record.into())
    }

    async fn move_post(&self, id: PostId, folder_id: Option<FolderId>) -> Result<Post> {
        let body = MovePostBody { folder_id };
        let record: PostRecord = self.patch(&format!("/posts/{}/move", id), &body).await?;
        Ok(record.into())
    }

    async fn delete_post(&self, id: PostId) -> Result<()> {
        self.delete(&format!("/posts/{}", id)).await
    }
}
