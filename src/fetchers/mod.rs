pub mod base;
pub mod polygon;
pub mod frankfurter;
