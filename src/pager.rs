use log::{debug, warn};

use crate::error::{Result, VmError};
use crate::kernel::Kernel;
use crate::process::Process;
use crate::replacement;

/// Result of servicing a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultOutcome {
    /// Page was already resident; nothing changed
    Hit,
    /// Page loaded into a frame newly taken from the free pool
    Loaded { frame: usize },
    /// Page loaded into a frame taken from `victim`
    Replaced { frame: usize, victim: usize },
}

impl FaultOutcome {
    /// Frame holding the page after the fault, if any
    pub fn frame(&self) -> Option<usize> {
        match self {
            FaultOutcome::Hit => None,
            FaultOutcome::Loaded { frame } | FaultOutcome::Replaced { frame, .. } => Some(*frame),
        }
    }
}

fn check_page(vpage: usize, prc: &Process) -> Result<()> {
    if vpage >= prc.num_pages() {
        return Err(VmError::PageOutOfRange {
            pid: prc.pid,
            vpage,
            num_pages: prc.num_pages(),
        });
    }
    Ok(())
}

/// Make `vpage` resident, growing the allocation or replacing a page
///
/// Leaves the process untouched when the page is already valid or when the
/// free-frame pool is exhausted.
pub fn handle_fault(vpage: usize, prc: &mut Process, krn: &mut Kernel) -> Result<FaultOutcome> {
    check_page(vpage, prc)?;
    if prc.page_table[vpage].valid {
        return Ok(FaultOutcome::Hit);
    }

    if !prc.allocated_frames_full() {
        return add_page_frame(vpage, prc, krn);
    }

    let victim = replacement::replace(vpage, prc, krn.algorithm)?;
    Ok(FaultOutcome::Replaced {
        frame: prc.page_table[vpage].frame_num,
        victim,
    })
}

/// Take a frame from the kernel pool and load `vpage` into it
fn add_page_frame(vpage: usize, prc: &mut Process, krn: &mut Kernel) -> Result<FaultOutcome> {
    let Some(frame) = krn.frames.take_frame() else {
        warn!("process {}: could not get a free frame for page {}", prc.pid, vpage);
        return Err(VmError::ResourceExhausted { pid: prc.pid, vpage });
    };

    prc.allocated_frames.push(frame);
    prc.page_table[vpage].load(frame);
    debug!(
        "process {}: loaded page {} into new frame {} ({}/{} frames)",
        prc.pid,
        vpage,
        frame,
        prc.allocated_frames.len(),
        prc.max_allocated_frames
    );
    Ok(FaultOutcome::Loaded { frame })
}

/// Stamp reference metadata for an access to `vpage` at time `clock`
pub fn record_access(vpage: usize, prc: &mut Process, clock: f64) -> Result<()> {
    check_page(vpage, prc)?;
    let entry = &mut prc.page_table[vpage];
    entry.used = true;
    entry.timestamp = clock;
    entry.count = entry.count.saturating_add(1);
    Ok(())
}
