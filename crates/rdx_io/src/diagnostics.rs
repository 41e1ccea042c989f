//! Non-fatal findings reported by the codecs
//!
//! Captured game data is full of harmless slack: trailing garbage after a text block,
//! unknown character codes, missing sentinels. None of that should stop an extraction, so
//! the codecs report it to a [`Diagnostics`] sink owned by the caller instead.

use derive_more::{Deref, Display};
use tracing::{debug, warn};

/// A recoverable condition found while reading or writing a container
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Warning {
    /// A character code has no entry in the code table
    #[display("no table entry for character code {code:#06X}")]
    UnknownCode {
        /// The unmapped code
        code: u16,
    },

    /// A plain token has no code and was written as `0x0000`
    #[display("no character code for {token:?}, writing 0x0000")]
    UnmappedToken {
        /// The unmapped token
        token: String,
    },

    /// An END code was found in the parameter slot of a control code
    #[display("run {run} has an END code as control parameter at {offset:#x}")]
    TerminatorInParameter {
        /// Index of the run in its block
        run: usize,
        /// Offset of the parameter, relative to the block start
        offset: u64,
    },

    /// The code after the last run is not the block terminator
    #[display("expected block terminator at {offset:#x}, found {found:?}")]
    BlockTerminator {
        /// The code that was found, `None` at end of stream
        found: Option<u16>,
        /// Offset relative to the block start
        offset: u64,
    },

    /// A sequence ended at end of stream without its sentinel
    #[display("sequence ended at {offset:#x} without a sentinel")]
    MissingSentinel {
        /// Offset of the end of stream
        offset: u64,
    },

    /// Bytes that cannot start another block were left at the end of a container
    #[display("ignoring {len} trailing byte(s) at {offset:#x}")]
    TrailingBytes {
        /// Offset of the first ignored byte
        offset: u64,
        /// Number of ignored bytes
        len: u64,
    },
}

/// Receiver for [`Warning`]s
pub trait Diagnostics {
    /// Report a warning
    fn warning(&mut self, warning: Warning);
}

/// Forwards every warning to `tracing` at `WARN` level
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warning(&mut self, warning: Warning) {
        warn!("{warning}");
    }
}

/// Keeps every warning in memory
#[derive(Debug, Default, Clone, PartialEq, Eq, Deref)]
pub struct CollectedDiagnostics(Vec<Warning>);

impl CollectedDiagnostics {
    /// Create an empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the collected warnings
    pub fn into_inner(self) -> Vec<Warning> {
        self.0
    }
}

impl Diagnostics for CollectedDiagnostics {
    fn warning(&mut self, warning: Warning) {
        debug!("{warning}");
        self.0.push(warning);
    }
}
