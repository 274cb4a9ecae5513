//! Mail pipe — stages a piped message and hands it to an archive processor.

pub mod config;
pub mod error;
pub mod message;
pub mod pipeline;
