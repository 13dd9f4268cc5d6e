use std::collections::VecDeque;

/// Tracks which physical frames are available for allocation
///
/// Shared by every process; frames are handed out lowest-first and are not
/// returned while a simulation runs.
#[derive(Debug, Clone)]
pub struct FreeFrameList {
    free: VecDeque<usize>,
    num_frames: usize,
}

impl FreeFrameList {
    /// Create a pool holding frames `0..num_frames`
    pub fn new(num_frames: usize) -> Self {
        FreeFrameList {
            free: (0..num_frames).collect(),
            num_frames,
        }
    }

    /// Remove a frame from the pool without handing it to a process
    ///
    /// Returns false if the frame was not free.
    pub fn mark_occupied(&mut self, frame: usize) -> bool {
        match self.free.iter().position(|&f| f == frame) {
            Some(idx) => {
                self.free.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Take the next free frame, or `None` once the pool is exhausted
    pub fn take_frame(&mut self) -> Option<usize> {
        self.free.pop_front()
    }

    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.free.is_empty()
    }

    /// Total frames in physical memory, free or not
    #[inline]
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_handed_out_lowest_first() {
        let mut ffl = FreeFrameList::new(3);
        assert_eq!(ffl.free_count(), 3);
        assert_eq!(ffl.take_frame(), Some(0));
        assert_eq!(ffl.take_frame(), Some(1));
        assert_eq!(ffl.take_frame(), Some(2));
        assert_eq!(ffl.take_frame(), None);
        assert!(ffl.is_empty());
        assert_eq!(ffl.num_frames(), 3);
    }

    #[test]
    fn test_mark_occupied_skips_reserved_frames() {
        let mut ffl = FreeFrameList::new(4);
        assert!(ffl.mark_occupied(0));
        assert!(ffl.mark_occupied(2));
        // Already taken
        assert!(!ffl.mark_occupied(2));
        // Out of range
        assert!(!ffl.mark_occupied(9));

        assert_eq!(ffl.free_count(), 2);
        assert_eq!(ffl.take_frame(), Some(1));
        assert_eq!(ffl.take_frame(), Some(3));
        assert_eq!(ffl.take_frame(), None);
    }

    #[test]
    fn test_empty_pool() {
        let mut ffl = FreeFrameList::new(0);
        assert!(ffl.is_empty());
        assert_eq!(ffl.take_frame(), None);
    }
}
