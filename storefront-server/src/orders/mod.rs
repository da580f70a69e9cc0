//! Order domain logic

pub mod processor;

pub use processor::OrderProcessor;
