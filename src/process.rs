use serde::Serialize;

use crate::page_table::{PageTable, PageTableEntry};

/// Paging counters for one process
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ProcessStats {
    pub accesses: u64,
    pub hits: u64,
    /// Faults resolved by growing the frame allocation or by replacement
    pub faults: u64,
    /// Faults resolved by evicting another page
    pub replacements: u64,
    /// Faults left unresolved because the frame pool was empty
    pub unresolved: u64,
}

impl ProcessStats {
    /// Fraction of accesses that faulted, resolved or not
    pub fn fault_rate(&self) -> f64 {
        if self.accesses == 0 {
            return 0.0;
        }
        (self.faults + self.unresolved) as f64 / self.accesses as f64
    }
}

/// Memory state of one simulated process
#[derive(Debug, Clone)]
pub struct Process {
    pub pid: u32,
    pub page_table: PageTable,
    /// Frames owned by the process in acquisition order
    pub allocated_frames: Vec<usize>,
    /// Cursor into `allocated_frames` used by FIFO and CLOCK
    pub frame_ptr: usize,
    pub max_allocated_frames: usize,
    /// Pages the process is expected to touch in its current phase; informational only
    pub working_set: Vec<usize>,
    pub halted: bool,
    pub last_clock: Option<f64>,
    pub stats: ProcessStats,
}

impl Process {
    pub fn new(pid: u32, num_pages: usize, max_allocated_frames: usize) -> Self {
        Process {
            pid,
            page_table: vec![PageTableEntry::default(); num_pages],
            allocated_frames: Vec::with_capacity(max_allocated_frames),
            frame_ptr: 0,
            max_allocated_frames,
            working_set: Vec::new(),
            halted: false,
            last_clock: None,
            stats: ProcessStats::default(),
        }
    }

    pub fn with_working_set(mut self, working_set: Vec<usize>) -> Self {
        self.working_set = working_set;
        self
    }

    #[inline]
    pub fn num_pages(&self) -> usize {
        self.page_table.len()
    }

    /// True once the process owns its full frame quota
    #[inline]
    pub fn allocated_frames_full(&self) -> bool {
        self.allocated_frames.len() >= self.max_allocated_frames
    }

    /// Frame holding `vpage`, if it is resident
    pub fn resident_frame(&self, vpage: usize) -> Option<usize> {
        self.page_table
            .get(vpage)
            .filter(|entry| entry.valid)
            .map(|entry| entry.frame_num)
    }

    /// Number of valid page-table entries
    pub fn resident_pages(&self) -> usize {
        self.page_table.iter().filter(|entry| entry.valid).count()
    }

    /// Check that valid entries and owned frames are in one-to-one correspondence
    pub fn frames_consistent(&self) -> bool {
        let mut table_frames: Vec<usize> = self
            .page_table
            .iter()
            .filter(|entry| entry.valid)
            .map(|entry| entry.frame_num)
            .collect();
        let mut owned = self.allocated_frames.clone();
        table_frames.sort_unstable();
        owned.sort_unstable();
        let no_duplicates = owned.windows(2).all(|w| w[0] != w[1]);
        no_duplicates && table_frames == owned
    }

    /// Move the FIFO/CLOCK cursor one frame forward, wrapping around
    #[inline]
    pub(crate) fn advance_frame_ptr(&mut self) {
        self.frame_ptr = (self.frame_ptr + 1) % self.allocated_frames.len();
    }
}
