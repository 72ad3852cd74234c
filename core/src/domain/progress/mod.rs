pub mod ports;
pub mod services;
pub mod tracker;
pub mod value_objects;
