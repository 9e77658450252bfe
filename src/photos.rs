//! Photo records and the filename-assignment pass.
//!
//! A photo is stored under its like count. When several photos in the album
//! share a like count, each of them gets the upload date appended
//! (`<likes>-<dd>_<mm>_<yyyy>`), and photos that still clash after that get
//! a running `-<n>` suffix so no two uploads target the same path.

use chrono::{Local, TimeZone};
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Date format used to disambiguate photos with the same like count
pub const DATE_SUFFIX_FORMAT: &str = "%d_%m_%Y";

/// A photo as normalized from the source album
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRecord {
    /// Like count at fetch time
    pub popularity: u64,
    /// Original-resolution photo URL
    pub url: String,
    /// Upload time, unix seconds
    pub created_at: i64,
    pub height: u32,
    pub width: u32,
}

/// A photo record paired with the file name it will be stored under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedPhotoRecord {
    pub record: PhotoRecord,
    pub assigned_name: String,
}

impl PhotoRecord {
    /// Decimal like count, the name used when it is unique in the album
    pub fn base_name(&self) -> String {
        self.popularity.to_string()
    }

    /// Base name plus the upload date in `tz`
    pub fn dated_name<Tz: TimeZone>(&self, tz: &Tz) -> Result<String>
    where
        Tz::Offset: std::fmt::Display,
    {
        let created = tz
            .timestamp_opt(self.created_at, 0)
            .single()
            .ok_or(Error::Format(self.created_at))?;
        Ok(format!(
            "{}-{}",
            self.base_name(),
            created.format(DATE_SUFFIX_FORMAT)
        ))
    }
}

/// Assigns output names using the local calendar date for disambiguation
pub fn assign_names(records: &[PhotoRecord]) -> Result<Vec<NamedPhotoRecord>> {
    assign_names_in(records, &Local)
}

/// Assigns output names, formatting dates in the given time zone.
///
/// The output has the same length and order as `records`.
pub fn assign_names_in<Tz: TimeZone>(
    records: &[PhotoRecord],
    tz: &Tz,
) -> Result<Vec<NamedPhotoRecord>>
where
    Tz::Offset: std::fmt::Display,
{
    let mut like_counts: HashMap<u64, usize> = HashMap::new();
    for record in records {
        *like_counts.entry(record.popularity).or_default() += 1;
    }

    let mut taken: HashMap<String, usize> = HashMap::new();
    let mut named = Vec::with_capacity(records.len());

    for record in records {
        let candidate = if like_counts[&record.popularity] > 1 {
            record.dated_name(tz)?
        } else {
            record.base_name()
        };

        let seen = taken.entry(candidate.clone()).or_default();
        *seen += 1;
        let assigned_name = if *seen == 1 {
            candidate
        } else {
            format!("{candidate}-{seen}")
        };

        named.push(NamedPhotoRecord {
            record: record.clone(),
            assigned_name,
        });
    }

    Ok(named)
}
