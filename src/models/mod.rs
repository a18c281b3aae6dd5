//! Froyocomb data models
//!
//! Commit records extracted from Gitiles, per-site reference points,
//! and the datetime formats shared by both.

pub mod commit;
pub mod reference;
pub mod time;

pub use commit::*;
pub use reference::*;
pub use time::{from_epoch_millis, parse_datetime, to_iso_millis};
