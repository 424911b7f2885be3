//! Error handling stuff
use displaydoc::Display;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Error type for [`crate::sysfs::parse_node`]
#[derive(Debug, Display, Error)]
pub enum NodeError {
    /// IO Failed
    Io(#[from] io::Error),

    /// Couldn't parse `{1}` from {0}
    Parse(PathBuf, String),
}

impl NodeError {
    /// Whether this error came from reading the node, rather than its
    /// contents.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Error type for [`crate::ir::Transmitter`]
#[derive(Debug, Display, Error)]
pub enum TransmitError {
    /// Couldn't open IR device: {0}
    Open(#[source] io::Error),

    /// Couldn't set carrier frequency {0}Hz: {1}
    Carrier(i32, #[source] io::Error),

    /// Couldn't write {0} pattern entries: {1}
    Write(usize, #[source] io::Error),
}

/// Error text.
pub(crate) mod text {
    pub const NO_NODE: &str = "no accessible node";

    pub const NOT_COMPILED: &str = "not supported by this build";

    pub const UNKNOWN_VALUE: &str = "unknown node value";

    pub const BAD_VALUE: &str = "invalid node value";
}
