mod astra;
mod store;

pub use astra::AstraStore;
pub use store::{VectorQuery, VectorStore};
