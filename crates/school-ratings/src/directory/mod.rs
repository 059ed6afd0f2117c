//! School records as the rest of the service reads them, and the in-memory
//! directory standing in for the external data store.

mod memory;
mod record;

pub use memory::InMemoryDirectory;
pub use record::{SchoolProfile, SchoolRecord, StoredRating};

use crate::ratings::Urn;
use crate::sources::LookupError;

/// Location-scoped search feeding area rankings and summaries.
pub trait LocationSearch: Send + Sync {
    /// Schools whose local authority or town matches `area`, in store order.
    fn schools_in_area(&self, area: &str) -> Result<Vec<SchoolRecord>, LookupError>;
}

/// Profile lookups by URN.
pub trait SchoolDirectory: LocationSearch {
    fn school(&self, urn: &Urn) -> Result<Option<SchoolRecord>, LookupError>;
}
