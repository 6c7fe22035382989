pub mod cleaning;
pub mod join;
pub mod pipeline;
