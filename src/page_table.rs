use serde::Serialize;

/// One entry per virtual page of a process
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PageTableEntry {
    /// Resident in a physical frame
    pub valid: bool,
    /// Physical frame index, meaningful only while `valid`
    pub frame_num: usize,
    /// Recency bit read by CLOCK and COUNT
    pub used: bool,
    /// Logical time of the last access, read by LRU
    pub timestamp: f64,
    /// Aging-weighted access frequency, read by COUNT
    pub count: u32,
}

impl PageTableEntry {
    /// Bind this page to `frame` and mark it resident
    #[inline]
    pub fn load(&mut self, frame: usize) {
        self.frame_num = frame;
        self.valid = true;
    }

    /// Mark the page as no longer resident; its frame is left for the caller to rebind
    #[inline]
    pub fn evict(&mut self) {
        self.valid = false;
    }
}

pub type PageTable = Vec<PageTableEntry>;

/// Find the virtual page whose valid entry is bound to `frame`
pub fn locate_page_owning_frame(page_table: &[PageTableEntry], frame: usize) -> Option<usize> {
    page_table
        .iter()
        .position(|entry| entry.valid && entry.frame_num == frame)
}
