//! The record of one backup run: the destination folder and every file
//! that was stored in it, in album order.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A photo stored in the destination folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    /// Link returned by the storage service for the stored object
    pub href: String,
    pub height: u32,
    pub width: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub folder_href: String,
    pub folder_name: String,
    pub created_at: DateTime<Utc>,
    pub count: usize,
    pub items: Vec<UploadedFile>,
}

impl Manifest {
    /// Starts an empty manifest for a freshly created folder
    pub fn new(folder_href: String, folder_name: String) -> Self {
        Self {
            folder_href,
            folder_name,
            created_at: Utc::now(),
            count: 0,
            items: Vec::new(),
        }
    }

    /// Appends an uploaded file, keeping `count` in step with `items`
    pub fn push(&mut self, item: UploadedFile) {
        self.items.push(item);
        self.count = self.items.len();
    }

    /// Writes the manifest as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory for {}", path.display())
                })?;
            }
        }

        let json = serde_json::to_string_pretty(self)
            .with_context(|| "Failed to serialize manifest to JSON")?;

        fs::write(path, json)
            .with_context(|| format!("Failed to write manifest to {}", path.display()))?;

        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest from {}", path.display()))?;

        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse manifest from {}", path.display()))
    }
}
