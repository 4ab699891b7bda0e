//! Page builders.
//!
//! [`category`] turns one category's feed sources into an ordered card list
//! and its rendered page; [`home`] merges all category lists into the
//! deduplicated homepage. The home builder runs strictly after every
//! category build has finished.

pub mod category;
pub mod home;

/// Entries taken from each feed source per build, by feed order.
pub const PER_SOURCE_CAP: usize = 12;

/// Sentences requested from the summarizer per card.
pub const SUMMARY_SENTENCES: usize = 2;

/// Cards taken per category when assembling the homepage.
pub const HOME_PER_CATEGORY: usize = 3;

/// Total homepage capacity after merging and sorting.
pub const HOME_CAP: usize = 27;
