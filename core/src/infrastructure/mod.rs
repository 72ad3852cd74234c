pub mod catalog;
pub mod llm;
pub mod marketplace;
pub mod recommendation;
