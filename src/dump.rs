//! Diagnostic dump of a process's paging state

use std::fmt;

use serde::Serialize;

use crate::page_table::PageTableEntry;
use crate::process::Process;

/// Snapshot of one process taken for inspection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessDump {
    pub pid: u32,
    pub working_set: Vec<usize>,
    pub page_table: Vec<PageTableEntry>,
    pub allocated_frames: Vec<usize>,
    pub max_allocated_frames: usize,
    pub frame_ptr: usize,
    pub halted: bool,
}

impl ProcessDump {
    pub fn capture(prc: &Process) -> Self {
        ProcessDump {
            pid: prc.pid,
            working_set: prc.working_set.clone(),
            page_table: prc.page_table.clone(),
            allocated_frames: prc.allocated_frames.clone(),
            max_allocated_frames: prc.max_allocated_frames,
            frame_ptr: prc.frame_ptr,
            halted: prc.halted,
        }
    }
}

impl fmt::Display for ProcessDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-------------- Process {} --------------", self.pid)?;
        writeln!(f, "Virtual pages: {}", self.page_table.len())?;
        if self.halted {
            writeln!(f, "HALTED: paging state is corrupted")?;
        }

        write!(f, "Working set:")?;
        for page in &self.working_set {
            write!(f, " {}", page)?;
        }
        writeln!(f)?;

        writeln!(f, "Page table")?;
        for (page, entry) in self.page_table.iter().enumerate() {
            if entry.valid {
                writeln!(
                    f,
                    "   Page {} (valid): frame {} used {} count {} time stamp {}",
                    page, entry.frame_num, entry.used, entry.count, entry.timestamp
                )?;
            } else {
                writeln!(f, "   Page {} is invalid (not loaded)", page)?;
            }
        }

        writeln!(
            f,
            "Allocated frames (max is {}) (frame pointer is {})",
            self.max_allocated_frames, self.frame_ptr
        )?;
        for frame in &self.allocated_frames {
            write!(f, " {}", frame)?;
        }
        writeln!(f)?;
        write!(f, "----------------------------------------")
    }
}

/// Render the state of `prc` as text
pub fn dump_process(prc: &Process) -> String {
    ProcessDump::capture(prc).to_string()
}
