//! Page replacement policies
//!
//! Each policy picks one resident page of a process whose frame quota is full.
//! The victim's frame is then rebound to the faulting page in place, so the
//! allocated-frame list never changes length here.

use log::debug;

use crate::constants::COUNT_BOOST;
use crate::error::{Result, VmError};
use crate::kernel::Algorithm;
use crate::page_table::locate_page_owning_frame;
use crate::process::Process;

/// Evict one resident page of `prc` and load `vpage` into its frame
///
/// Returns the evicted virtual page. Fails without touching the process if
/// `vpage` is out of range or already resident.
pub fn replace(vpage: usize, prc: &mut Process, algorithm: Algorithm) -> Result<usize> {
    match prc.page_table.get(vpage) {
        None => {
            return Err(VmError::PageOutOfRange {
                pid: prc.pid,
                vpage,
                num_pages: prc.num_pages(),
            });
        }
        Some(entry) if entry.valid => {
            return Err(VmError::PageAlreadyResident { pid: prc.pid, vpage });
        }
        Some(_) => {}
    }

    let victim = select_victim(prc, algorithm)?;
    let frame = prc.page_table[victim].frame_num;

    prc.page_table[victim].evict();
    prc.page_table[vpage].load(frame);

    match algorithm {
        Algorithm::Clock => prc.page_table[vpage].used = true,
        Algorithm::Count => prc.page_table[vpage].count = 0,
        Algorithm::Fifo | Algorithm::Lru => {}
    }

    debug!(
        "process {}: {} evicted page {} from frame {} for page {}",
        prc.pid, algorithm, victim, frame, vpage
    );
    Ok(victim)
}

/// Choose the page to evict under `algorithm`
///
/// CLOCK and COUNT update reference metadata while scanning, and FIFO and
/// CLOCK move the frame cursor, so this is not a pure query.
pub fn select_victim(prc: &mut Process, algorithm: Algorithm) -> Result<usize> {
    match algorithm {
        Algorithm::Fifo => select_fifo(prc),
        Algorithm::Lru => select_lru(prc),
        Algorithm::Clock => select_clock(prc),
        Algorithm::Count => select_count(prc),
    }
}

/// Page resident in the frame under the cursor
fn page_under_cursor(prc: &Process) -> Result<usize> {
    let frame = *prc
        .allocated_frames
        .get(prc.frame_ptr)
        .ok_or(VmError::NoEvictablePage { pid: prc.pid })?;
    locate_page_owning_frame(&prc.page_table, frame).ok_or(VmError::FrameNotFound {
        pid: prc.pid,
        frame,
    })
}

fn select_fifo(prc: &mut Process) -> Result<usize> {
    let victim = page_under_cursor(prc)?;
    prc.advance_frame_ptr();
    Ok(victim)
}

fn select_clock(prc: &mut Process) -> Result<usize> {
    // The first sweep clears every used bit, so the second must find a victim
    for _ in 0..2 * prc.allocated_frames.len() {
        let page = page_under_cursor(prc)?;
        prc.advance_frame_ptr();
        if !prc.page_table[page].used {
            return Ok(page);
        }
        prc.page_table[page].used = false;
    }
    Err(VmError::NoEvictablePage { pid: prc.pid })
}

fn select_lru(prc: &Process) -> Result<usize> {
    let mut victim = None;
    let mut oldest = f64::INFINITY;
    for (page, entry) in prc.page_table.iter().enumerate() {
        if entry.valid && (victim.is_none() || entry.timestamp < oldest) {
            oldest = entry.timestamp;
            victim = Some(page);
        }
    }
    victim.ok_or(VmError::NoEvictablePage { pid: prc.pid })
}

fn select_count(prc: &mut Process) -> Result<usize> {
    let mut victim = None;
    let mut smallest = u32::MAX;
    for (page, entry) in prc.page_table.iter_mut().enumerate() {
        if !entry.valid {
            continue;
        }
        entry.count >>= 1;
        if entry.used {
            entry.count = entry.count.saturating_add(COUNT_BOOST);
            entry.used = false;
        }
        if victim.is_none() || entry.count < smallest {
            smallest = entry.count;
            victim = Some(page);
        }
    }
    victim.ok_or(VmError::NoEvictablePage { pid: prc.pid })
}
