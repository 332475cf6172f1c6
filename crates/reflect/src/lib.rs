//! Turns an unreliable free-text model reply into a fixed, display-safe and
//! speech-safe structure.
//!
//! The pipeline is: direct JSON parse → [`extract`] salvage → positional
//! line fallback, always finished by [`normalize`] which runs every string
//! through the [`LineCleaner`].  Nothing in this crate performs I/O and no
//! input makes it fail.

pub mod assemble;
pub mod clean;
pub mod extract;
pub mod fields;
pub mod normalize;
pub mod prompt;
pub mod rules;

pub use assemble::{assemble, assemble_with_source, Assembled, CandidateSource};
pub use clean::LineCleaner;
pub use extract::extract;
pub use fields::{FieldKind, FieldSpec, FieldValue, NormalizedReply, ReplyFields};
pub use normalize::normalize;
pub use prompt::Prompt;
pub use rules::CharacterRules;
