pub mod config;
pub mod corrections;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod transform;
