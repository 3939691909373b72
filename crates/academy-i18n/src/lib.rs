//! Cadet Academy: Localization.
//!
//! Maps a key and an active language to a display string, falling back to
//! English and finally to a visibly bracketed key.

pub mod localizer;

pub use localizer::Localizer;
