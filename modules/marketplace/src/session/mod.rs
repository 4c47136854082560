//! Application state store: one session snapshot plus the commands the
//! views issue against it.

mod context;
mod page;

pub use context::{AppContext, Notice, NoticeKind, SessionSnapshot};
pub use page::{route, Page};
