pub mod common;
pub mod profile;
pub mod progress;
pub mod recommendation;
