//! VK photo source.
//!
//! Reads one album through `photos.get` and normalizes each item into a
//! [`PhotoRecord`]. Only the first page the API returns is read.

use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::photos::PhotoRecord;
use crate::response::parse_response;

pub const DEFAULT_BASE_URL: &str = "https://api.vk.com/method";
pub const DEFAULT_API_VERSION: &str = "5.199";

/// Album id that selects the owner's profile photos
pub const PROFILE_ALBUM: &str = "profile";

#[derive(Debug, Deserialize)]
struct PhotosGetResponse {
    response: PhotosPage,
}

#[derive(Debug, Deserialize)]
struct PhotosPage {
    items: Vec<VkPhoto>,
}

#[derive(Debug, Deserialize)]
struct VkPhoto {
    date: i64,
    likes: VkLikes,
    orig_photo: VkOrigPhoto,
}

#[derive(Debug, Deserialize)]
struct VkLikes {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct VkOrigPhoto {
    url: String,
    height: u32,
    width: u32,
}

impl TryFrom<VkPhoto> for PhotoRecord {
    type Error = Error;

    fn try_from(photo: VkPhoto) -> Result<Self> {
        let url = photo.orig_photo.url;
        let parsed =
            Url::parse(&url).map_err(|e| Error::Decode(format!("invalid photo url {url}: {e}")))?;
        if parsed.scheme() != "https" {
            return Err(Error::Decode(format!("photo url is not https: {url}")));
        }

        Ok(PhotoRecord {
            popularity: photo.likes.count,
            url,
            created_at: photo.date,
            height: photo.orig_photo.height,
            width: photo.orig_photo.width,
        })
    }
}

/// Client for the VK photos API, bound to one token and album owner
pub struct VkClient {
    client: Client,
    base_url: String,
    access_token: String,
    owner_id: String,
    api_version: String,
    photo_count: Option<u32>,
}

impl VkClient {
    pub fn new(access_token: impl Into<String>, owner_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: access_token.into(),
            owner_id: owner_id.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            photo_count: None,
        }
    }

    /// Points the client at another API root (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Limits how many photos the single page request asks for
    pub fn with_photo_count(mut self, photo_count: Option<u32>) -> Self {
        self.photo_count = photo_count;
        self
    }

    /// Fetches the photos of `album_id` in album order
    pub async fn fetch_album_photos(&self, album_id: &str) -> Result<Vec<PhotoRecord>> {
        let url = format!("{}/photos.get", self.base_url.trim_end_matches('/'));

        let mut params = vec![
            ("access_token", self.access_token.clone()),
            ("owner_id", self.owner_id.clone()),
            ("album_id", album_id.to_string()),
            ("extended", "1".to_string()),
            ("v", self.api_version.clone()),
        ];
        if let Some(count) = self.photo_count {
            params.push(("count", count.to_string()));
        }

        debug!("GET {url} (owner {}, album {album_id})", self.owner_id);
        let response = self.client.get(&url).query(&params).send().await?;
        let body: PhotosGetResponse = parse_response(response).await?;

        let total = body.response.items.len();
        let mut records = Vec::with_capacity(total);
        for (i, photo) in body.response.items.into_iter().enumerate() {
            let record = PhotoRecord::try_from(photo)?;
            info!("[{}/{}] Fetched photo with {} likes", i + 1, total, record.popularity);
            records.push(record);
        }

        Ok(records)
    }
}
