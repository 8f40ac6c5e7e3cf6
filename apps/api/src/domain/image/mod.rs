pub mod entity;
pub mod errors;
pub mod value_objects;
