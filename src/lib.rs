pub mod config;
pub mod error;
pub mod types {
    pub mod segment;
}
pub mod parsing;
pub mod structurer;
pub mod quest_io;
pub mod pipeline;

pub use error::{Error, Result};
pub use parsing::classify_line;
pub use structurer::{DialogueStructurer, SegmentCounters};
pub use types::segment::{DialogueSegment, SegmentType};
