pub mod entities;
pub mod value_objects;

pub use entities::{normalize_token, SkinProfile};
pub use value_objects::RawProfileInput;
