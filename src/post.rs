//! Defines the [`RawInput`] collected from a front-end and the [`PostRecord`]
//! which is persisted in the index file.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The date format stamped into each record, e.g. `June 05, 2025`.
pub const DATE_FORMAT: &str = "%B %d, %Y";

/// The six unvalidated string fields gathered by a
/// [`crate::collect::Collector`]. Validation is the publisher's job so that
/// front-ends stay interchangeable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawInput {
    pub title: String,
    pub category: String,
    pub image: String,
    pub description: String,
    pub popularity: String,
    pub content: String,
}

/// One entry in the index file. Fields serialize in declaration order, which
/// is the order the index file has always used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Unique, positive and never reassigned.
    pub id: u64,

    /// Image URL or path. May be empty.
    pub image: String,

    /// Human-readable creation date (see [`DATE_FORMAT`]).
    pub date: String,

    pub category: String,
    pub title: String,
    pub description: String,

    /// Relative location of the rendered page. Always [`post_url`] of the
    /// output folder and `id`.
    pub url: String,

    /// Expected to be within `1..=100` but only the type is enforced.
    pub popularity: i64,
}

/// Returns the file name of the rendered page for post `id`.
pub fn file_name(id: u64) -> String {
    format!("post{}.html", id)
}

/// Returns the relative URL of the rendered page for post `id` within
/// `output_folder`.
pub fn post_url(output_folder: &str, id: u64) -> String {
    format!("{}/{}", output_folder.trim_end_matches('/'), file_name(id))
}

/// Formats `date` the way records store it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
