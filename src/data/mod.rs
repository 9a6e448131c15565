pub mod history;
pub mod models;

// Re-export commonly used types
pub use history::History;
pub use models::*;
