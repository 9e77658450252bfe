#![allow(non_snake_case)]
//! # vkAlbum2disk
//!
//! A command-line tool that backs up a VK photo album into a Yandex Disk folder.
//!
//! The album is read through the VK API, every photo is named after its like
//! count, and Yandex Disk is asked to fetch each photo by URL into the
//! destination folder. A JSON manifest of the stored files is written once
//! the whole run has succeeded.
//!
//! ## Naming
//!
//! - A photo whose like count is unique in the album is stored as `<likes>`
//! - Photos sharing a like count are stored as `<likes>-<dd>_<mm>_<yyyy>`
//! - Photos sharing both get a further `-<n>` suffix

// Export modules for integration testing
pub mod backup;
pub mod config;
pub mod disk;
pub mod error;
pub mod manifest;
pub mod photos;
pub mod response;
pub mod vk;
