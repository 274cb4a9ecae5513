//! Pipe delivery: stage a piped message and hand it to the processor.

pub mod adapter;
pub mod processor;
pub mod stage;
pub mod types;

pub use adapter::PipeAdapter;
pub use processor::Processor;
pub use stage::StagedMessage;
pub use types::{DeliveryArgs, DeliveryOutcome, ProcessorStatus};
