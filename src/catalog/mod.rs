//! Medicine catalog: strict record schema, startup loader and the
//! in-memory store used for exact/substring retrieval.

mod loader;
mod record;
mod store;

pub use loader::{parse_catalog, CatalogLoadError, CatalogSource};
pub use record::{MedicineRecord, Price};
pub use store::CatalogStore;
