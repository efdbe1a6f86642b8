//! The contract between stored documents and the record store

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::id::RecordId;

/// A document that can be kept in a [`RecordStore`](crate::storage::RecordStore).
///
/// The store only ever looks at the identifier; everything else is payload
/// that is serialized as-is.
pub trait Record: Serialize + DeserializeOwned + Clone + Send {
    /// Returns the identifier, or `None` if the record was never saved
    fn id(&self) -> Option<RecordId>;

    /// Returns the record with its identifier set
    fn with_id(self, id: RecordId) -> Self;
}
