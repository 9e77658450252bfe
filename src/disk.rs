//! Yandex Disk destination.
//!
//! Creates the backup folder and asks the storage service to fetch every
//! photo by URL into it. Requests run one after another in album order; the
//! first failure aborts the whole upload.

use log::{debug, info};
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;

use crate::error::Result;
use crate::manifest::{Manifest, UploadedFile};
use crate::photos::NamedPhotoRecord;
use crate::response::parse_response;

pub const DEFAULT_BASE_URL: &str = "https://cloud-api.yandex.net/v1/disk/resources";
pub const DEFAULT_AUTH_SCHEME: &str = "OAuth";

/// Link descriptor returned by the storage API for created resources and
/// accepted operations
#[derive(Debug, Clone, Deserialize)]
pub struct FolderDescriptor {
    pub href: String,
}

#[derive(Debug, Deserialize)]
struct UploadAccepted {
    href: String,
}

/// Client for the Yandex Disk resources API, bound to one token
pub struct DiskClient {
    client: Client,
    base_url: String,
    authorization: String,
}

impl DiskClient {
    pub fn new(token: &str) -> Self {
        Self::with_auth_scheme(token, DEFAULT_AUTH_SCHEME)
    }

    /// Builds a client whose Authorization header is `<scheme> <token>`,
    /// or the bare token when `scheme` is empty
    pub fn with_auth_scheme(token: &str, scheme: &str) -> Self {
        let authorization = if scheme.is_empty() {
            token.to_string()
        } else {
            format!("{scheme} {token}")
        };
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            authorization,
        }
    }

    /// Points the client at another API root (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn resources_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Creates the folder at `path`.
    ///
    /// An already existing folder is reported by the service as 409 and
    /// surfaces as a client error; it is never reused silently.
    pub async fn create_folder(&self, path: &str) -> Result<FolderDescriptor> {
        debug!("PUT {} (path {path})", self.resources_url());
        let response = self
            .client
            .put(self.resources_url())
            .header(AUTHORIZATION, &self.authorization)
            .query(&[("path", path)])
            .send()
            .await?;

        parse_response(response).await
    }

    /// Asks the service to fetch `source_url` into `path`, returning the
    /// link the service hands back for the stored object
    async fn upload_from_url(&self, path: &str, source_url: &str) -> Result<String> {
        let url = format!("{}/upload", self.resources_url());
        debug!("POST {url} (path {path})");
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, &self.authorization)
            .query(&[("path", path), ("url", source_url)])
            .send()
            .await?;

        let accepted: UploadAccepted = parse_response(response).await?;
        Ok(accepted.href)
    }

    /// Creates `folder_name` and uploads every record into it, in order
    pub async fn upload(
        &self,
        records: &[NamedPhotoRecord],
        folder_name: &str,
    ) -> Result<Manifest> {
        let folder = self.create_folder(folder_name).await?;
        info!("Created folder {folder_name}");

        let mut manifest = Manifest::new(folder.href, folder_name.to_string());
        let total = records.len();

        for (i, named) in records.iter().enumerate() {
            let path = format!("{folder_name}/{}", named.assigned_name);
            let href = self.upload_from_url(&path, &named.record.url).await?;
            info!("[{}/{}] Uploaded {}", i + 1, total, named.assigned_name);

            manifest.push(UploadedFile {
                name: named.assigned_name.clone(),
                href,
                height: named.record.height,
                width: named.record.width,
            });
        }

        Ok(manifest)
    }
}
