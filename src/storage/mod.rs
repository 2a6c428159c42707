pub mod blob;
pub mod json_store;

use crate::errors::FlowError;
use crate::flow::draft::Draft;

pub type Result<T> = std::result::Result<T, FlowError>;

/// Abstraction over persistence backends holding in-progress drafts.
///
/// One draft exists per flow key. `load` degrades to an empty draft when the
/// backend is unavailable or holds malformed data; `merge` and `clear`
/// surface their failures to the caller.
pub trait DraftStore: Send + Sync {
    /// Returns the last-persisted draft for the flow, or empty if none.
    fn load(&self, flow_key: &str) -> Result<Draft>;

    /// Shallow-merges `partial` into the stored draft and writes the full
    /// draft back in one atomic serialize-and-store operation. Returns the
    /// merged draft.
    fn merge(&self, flow_key: &str, partial: &Draft) -> Result<Draft>;

    /// Removes the persisted draft entirely (cancel or final success).
    fn clear(&self, flow_key: &str) -> Result<()>;

    /// Records the resumable query state so the flow position survives a
    /// restart.
    fn record_resume(&self, flow_key: &str, query: &str) -> Result<()>;

    /// Returns the last-recorded resumable query state, if any.
    fn load_resume(&self, flow_key: &str) -> Result<Option<String>>;
}

pub use blob::BlobStore;
pub use json_store::JsonDraftStore;
