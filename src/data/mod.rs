pub mod batch;
pub mod examples;
pub mod image;
pub mod synthetic;
