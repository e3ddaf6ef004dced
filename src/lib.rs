pub mod catalog;
pub mod core;
pub mod llm;
pub mod pipeline;
pub mod server;
pub mod state;
pub mod vector;
