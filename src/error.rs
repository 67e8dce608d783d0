//! Error type for meter construction and demo command parsing.
//!
//! Render paths never fail; everything here is raised either while building
//! the engine from configuration or while parsing host-supplied demo payloads.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterError {
    #[error("color level table is empty")]
    EmptyColorTable,

    #[error("color level thresholds not strictly ascending at entry {index}")]
    UnsortedColorTable { index: usize },

    #[error("bolt shape has zero extent")]
    DegenerateBolt,

    #[error("bolt shape needs an even number of coordinates, at least 3 points")]
    MalformedBolt,

    #[error("invalid fraction: {0}")]
    InvalidFraction(&'static str),

    #[error("capacity exceeded: {0}")]
    CapacityExceeded(&'static str),

    #[error("invalid demo payload: {0}")]
    InvalidDemoPayload(&'static str),

    #[error("unknown demo command")]
    UnknownDemoCommand,
}

pub type Result<T> = core::result::Result<T, MeterError>;
