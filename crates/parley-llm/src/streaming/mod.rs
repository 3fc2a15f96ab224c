//! Streaming pipeline: adapter stream → aggregator → wire frames

pub mod aggregator;
pub mod encoder;

pub use aggregator::ResponseAggregator;
pub use encoder::{FrameStream, WireEncoder};
