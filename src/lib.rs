pub mod analyzer;
pub mod config;
pub mod news;
pub mod pipeline;
pub mod sectors;
pub mod sheets;
