pub mod ingredients;
pub mod products;
pub mod recommendations;
