//! End-to-end backup run: fetch the album, name the photos, upload them and
//! persist the manifest. The manifest file is only written once every step
//! has succeeded.

use anyhow::{Context, Result};
use log::info;
use std::path::Path;

use crate::disk::DiskClient;
use crate::manifest::Manifest;
use crate::photos::assign_names;
use crate::vk::VkClient;

/// What to back up and where
#[derive(Debug, Clone)]
pub struct BackupRequest<'a> {
    pub album_id: &'a str,
    pub folder_name: &'a str,
    pub manifest_path: &'a Path,
}

pub async fn run_backup(
    source: &VkClient,
    sink: &DiskClient,
    request: &BackupRequest<'_>,
) -> Result<Manifest> {
    info!("Fetching photos from album {}", request.album_id);
    let records = source
        .fetch_album_photos(request.album_id)
        .await
        .with_context(|| format!("Failed to fetch album {}", request.album_id))?;
    info!("Fetched {} photos", records.len());

    let named = assign_names(&records).context("Failed to assign file names")?;

    info!("Uploading {} photos to {}", named.len(), request.folder_name);
    let manifest = sink
        .upload(&named, request.folder_name)
        .await
        .with_context(|| format!("Failed to upload photos to {}", request.folder_name))?;

    manifest.save(request.manifest_path)?;
    info!(
        "Saved manifest with {} files to {}",
        manifest.count,
        request.manifest_path.display()
    );

    Ok(manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use tempfile::tempdir;

    async fn mock_album(
        server: &mut mockito::ServerGuard,
        status: usize,
        body: serde_json::Value,
    ) -> mockito::Mock {
        server
            .mock("GET", "/vk/photos.get")
            .match_query(Matcher::Any)
            .with_status(status)
            .with_body(body.to_string())
            .create_async()
            .await
    }

    fn single_photo_album() -> serde_json::Value {
        json!({
            "response": {
                "count": 1,
                "items": [{
                    "date": 1619870400,
                    "likes": {"count": 9},
                    "orig_photo": {"url": "https://example.com/9.jpg", "height": 720, "width": 1280}
                }]
            }
        })
    }

    fn clients(server: &mockito::ServerGuard) -> (VkClient, DiskClient) {
        let source = VkClient::new("vk-token", "1").with_base_url(format!("{}/vk", server.url()));
        let sink = DiskClient::new("disk-token").with_base_url(format!("{}/disk", server.url()));
        (source, sink)
    }

    #[tokio::test]
    async fn test_single_photo_backup() -> Result<()> {
        let temp_dir = tempdir()?;
        let manifest_path = temp_dir.path().join("output.json");
        let mut server = mockito::Server::new_async().await;

        let _album = mock_album(&mut server, 200, single_photo_album()).await;
        let _folder = server
            .mock("PUT", "/disk")
            .match_query(Matcher::UrlEncoded("path".into(), "backup".into()))
            .with_status(201)
            .with_body(json!({"href": "https://disk/backup"}).to_string())
            .create_async()
            .await;
        let upload = server
            .mock("POST", "/disk/upload")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("path".into(), "backup/9".into()),
                Matcher::UrlEncoded("url".into(), "https://example.com/9.jpg".into()),
            ]))
            .with_status(202)
            .with_body(json!({"href": "https://disk/op/9"}).to_string())
            .create_async()
            .await;

        let (source, sink) = clients(&server);
        let request = BackupRequest {
            album_id: "profile",
            folder_name: "backup",
            manifest_path: &manifest_path,
        };
        let manifest = run_backup(&source, &sink, &request).await?;

        assert_eq!(manifest.count, 1);
        assert_eq!(manifest.items.len(), 1);
        assert_eq!(manifest.items[0].name, "9");
        assert_eq!(manifest.items[0].href, "https://disk/op/9");
        assert_eq!(manifest.folder_href, "https://disk/backup");
        upload.assert_async().await;

        let saved = Manifest::load(&manifest_path)?;
        assert_eq!(saved.count, 1);
        assert_eq!(saved.items, manifest.items);

        Ok(())
    }

    #[tokio::test]
    async fn test_source_failure_writes_nothing() -> Result<()> {
        let temp_dir = tempdir()?;
        let manifest_path = temp_dir.path().join("output.json");
        let mut server = mockito::Server::new_async().await;

        let _album = mock_album(&mut server, 401, json!({})).await;
        let folder = server
            .mock("PUT", "/disk")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let (source, sink) = clients(&server);
        let request = BackupRequest {
            album_id: "profile",
            folder_name: "backup",
            manifest_path: &manifest_path,
        };
        let err = run_backup(&source, &sink, &request).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<crate::error::Error>(),
            Some(crate::error::Error::Client(401))
        ));
        assert!(!manifest_path.exists());
        folder.assert_async().await;

        Ok(())
    }

    #[tokio::test]
    async fn test_api_error_writes_nothing() -> Result<()> {
        let temp_dir = tempdir()?;
        let manifest_path = temp_dir.path().join("output.json");
        let mut server = mockito::Server::new_async().await;

        let _album = mock_album(
            &mut server,
            200,
            json!({"error": {"error_code": 30, "error_msg": "This profile is private"}}),
        )
        .await;

        let (source, sink) = clients(&server);
        let request = BackupRequest {
            album_id: "profile",
            folder_name: "backup",
            manifest_path: &manifest_path,
        };
        let err = run_backup(&source, &sink, &request).await.unwrap_err();

        assert!(format!("{err:#}").contains("This profile is private"));
        assert!(!manifest_path.exists());

        Ok(())
    }

    #[tokio::test]
    async fn test_sink_failure_writes_nothing() -> Result<()> {
        let temp_dir = tempdir()?;
        let manifest_path = temp_dir.path().join("output.json");
        let mut server = mockito::Server::new_async().await;

        let _album = mock_album(&mut server, 200, single_photo_album()).await;
        let _folder = server
            .mock("PUT", "/disk")
            .match_query(Matcher::Any)
            .with_status(201)
            .with_body(json!({"href": "https://disk/backup"}).to_string())
            .create_async()
            .await;
        let _upload = server
            .mock("POST", "/disk/upload")
            .match_query(Matcher::Any)
            .with_status(507)
            .create_async()
            .await;

        let (source, sink) = clients(&server);
        let request = BackupRequest {
            album_id: "profile",
            folder_name: "backup",
            manifest_path: &manifest_path,
        };
        let err = run_backup(&source, &sink, &request).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<crate::error::Error>(),
            Some(crate::error::Error::Server(507))
        ));
        assert!(!manifest_path.exists());

        Ok(())
    }
}
