pub mod image_analysis;
pub mod ingredient;
pub mod product;
pub mod recommendation_record;
pub mod routine_plan;

pub use image_analysis::*;
pub use ingredient::*;
pub use product::*;
pub use recommendation_record::*;
pub use routine_plan::*;
