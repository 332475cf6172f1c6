//! Local persistence of reflections and the weekly roll-up built from them.

pub mod store;
pub mod weekly;

pub use store::{JournalEntry, JournalStore};
pub use weekly::WeeklyDigest;
