//! Min Search
//!
//! Read-side helpers for the search bar:
//! - fuzzy scoring and the match predicate shared by task and tab search
//! - `!bang` commands, looked up through an explicit registry
//!
//! Supported bangs:
//! - `!task`: switch to a task
//! - `!movetotask` / `!movetotaskfollow`: move the current tab to a task
//! - `!newtask`, `!closetask`, `!nametask`: task lifecycle
//! - `!sort`: order tabs by recent activity
//! - `!playing`: find tabs playing audio

mod bang;
mod error;
mod fuzzy;

pub use bang::{BangDef, BangInvocation, BangKind, BangRegistry};
pub use error::SearchError;
pub use fuzzy::{is_match, score, substring_match, DEFAULT_FUZZINESS, MATCH_THRESHOLD};

pub type Result<T> = std::result::Result<T, SearchError>;
