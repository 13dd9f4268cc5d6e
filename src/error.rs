//! Error types for the pager and its input files

use thiserror::Error;

/// Result type alias for paging operations
pub type Result<T> = std::result::Result<T, VmError>;

/// Errors raised while servicing an access event
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VmError {
    /// The free-frame pool was empty when the process needed to grow
    #[error("could not get a free frame for page {vpage} of process {pid}")]
    ResourceExhausted { pid: u32, vpage: usize },

    /// A frame owned by the process has no valid page bound to it
    #[error("could not find frame {frame} in the page table of process {pid}")]
    FrameNotFound { pid: u32, frame: usize },

    /// A replacement scan found no valid page to evict
    #[error("no valid page of process {pid} available for eviction")]
    NoEvictablePage { pid: u32 },

    #[error("page {vpage} is outside the {num_pages}-page address space of process {pid}")]
    PageOutOfRange {
        pid: u32,
        vpage: usize,
        num_pages: usize,
    },

    /// A replacement was requested for a page that already holds a frame
    #[error("page {vpage} of process {pid} is already resident")]
    PageAlreadyResident { pid: u32, vpage: usize },

    #[error("unknown process {0}")]
    UnknownProcess(u32),

    #[error("process {0} is already defined")]
    DuplicateProcess(u32),

    /// The process was stopped after an earlier invariant violation
    #[error("process {0} was halted after corrupted paging state")]
    ProcessHalted(u32),

    #[error("clock for process {pid} went from {last} back to {clock}")]
    ClockWentBackwards { pid: u32, last: f64, clock: f64 },
}

impl VmError {
    /// Corrupted page-table state; the owning process must not run any further.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::FrameNotFound { .. } | Self::NoEvictablePage { .. })
    }
}

/// Errors raised while reading init and trace files
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unknown paging algorithm '{0}' (expected fifo, lru, clock or count)")]
    InvalidAlgorithm(String),

    #[error("failed to encode report: {0}")]
    Report(#[from] serde_json::Error),

    #[error(transparent)]
    Vm(#[from] VmError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invariant_violations_are_flagged() {
        assert!(VmError::FrameNotFound { pid: 1, frame: 3 }.is_invariant_violation());
        assert!(VmError::NoEvictablePage { pid: 1 }.is_invariant_violation());
        assert!(!VmError::ResourceExhausted { pid: 1, vpage: 0 }.is_invariant_violation());
        assert!(!VmError::ProcessHalted(1).is_invariant_violation());
        assert!(!VmError::PageAlreadyResident { pid: 1, vpage: 0 }.is_invariant_violation());
    }

    #[test]
    fn test_messages_name_the_process() {
        let msg = VmError::ResourceExhausted { pid: 4, vpage: 9 }.to_string();
        assert!(msg.contains("page 9"));
        assert!(msg.contains("process 4"));

        let msg = ConfigError::Parse { line: 3, message: "bad token".into() }.to_string();
        assert_eq!(msg, "line 3: bad token");
    }
}
