//! Request activity log: what was asked, which model answered, and when.

pub mod activity_log;
pub mod entry;
pub mod error;
pub mod recorder;
pub mod store;

pub use activity_log::{parse_since, ActivityLog, ActivityStats, DEFAULT_MAX_ENTRIES};
pub use entry::{query_preview, ActivityEntry, MAX_QUERY_PREVIEW, UNKNOWN_QUERY};
pub use error::{ActivityError, ActivityResult};
pub use recorder::{ActivityRecorder, ActivityWorker, DEFAULT_CHANNEL_CAPACITY};
pub use store::{ActivityStore, JsonFileActivityStore, MemoryActivityStore, ACTIVITY_FILE_NAME};
