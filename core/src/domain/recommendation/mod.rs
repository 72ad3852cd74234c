pub mod entities;
pub mod insights;
pub mod parser;
pub mod ports;
pub mod ranking;
pub mod routine;
pub mod rules;
pub mod services;
pub mod value_objects;
