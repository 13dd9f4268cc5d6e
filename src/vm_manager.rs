use std::collections::BTreeMap;

use log::{error, info, warn};
use serde::Serialize;

use crate::constants::NO_FRAME;
use crate::error::{Result, VmError};
use crate::kernel::{Algorithm, Kernel};
use crate::pager::{self, FaultOutcome};
use crate::process::{Process, ProcessStats};

/// One simulated memory access
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccessEvent {
    pub pid: u32,
    pub vpage: usize,
    pub clock: f64,
}

/// Per-process line of the end-of-run report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessReport {
    pub pid: u32,
    pub frames: usize,
    pub max_frames: usize,
    pub halted: bool,
    pub fault_rate: f64,
    #[serde(flatten)]
    pub stats: ProcessStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub algorithm: Algorithm,
    pub free_frames: usize,
    pub processes: Vec<ProcessReport>,
}

/// Owns the kernel context and every process, and feeds access events to the pager
#[derive(Debug)]
pub struct VmManager {
    kernel: Kernel,
    processes: BTreeMap<u32, Process>,
}

impl VmManager {
    pub fn new(kernel: Kernel) -> Self {
        VmManager {
            kernel,
            processes: BTreeMap::new(),
        }
    }

    pub fn add_process(&mut self, prc: Process) -> Result<()> {
        if self.processes.contains_key(&prc.pid) {
            return Err(VmError::DuplicateProcess(prc.pid));
        }
        self.processes.insert(prc.pid, prc);
        Ok(())
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    pub fn process(&self, pid: u32) -> Option<&Process> {
        self.processes.get(&pid)
    }

    /// Processes in pid order
    pub fn processes(&self) -> impl Iterator<Item = &Process> {
        self.processes.values()
    }

    /// Service one access: resolve a fault if needed, then record the reference
    ///
    /// An invariant violation halts the process; later accesses to it fail
    /// with `ProcessHalted`.
    pub fn access(&mut self, pid: u32, vpage: usize, clock: f64) -> Result<FaultOutcome> {
        let prc = self
            .processes
            .get_mut(&pid)
            .ok_or(VmError::UnknownProcess(pid))?;
        if prc.halted {
            return Err(VmError::ProcessHalted(pid));
        }
        if let Some(last) = prc.last_clock {
            if clock.is_nan() || clock < last {
                return Err(VmError::ClockWentBackwards { pid, last, clock });
            }
        } else if clock.is_nan() {
            return Err(VmError::ClockWentBackwards {
                pid,
                last: f64::NEG_INFINITY,
                clock,
            });
        }

        let outcome = match pager::handle_fault(vpage, prc, &mut self.kernel) {
            Ok(outcome) => outcome,
            Err(err @ VmError::PageOutOfRange { .. }) => return Err(err),
            Err(err) => {
                prc.stats.accesses += 1;
                prc.last_clock = Some(clock);
                if err.is_invariant_violation() {
                    error!("process {} halted: {}", pid, err);
                    prc.halted = true;
                } else {
                    prc.stats.unresolved += 1;
                }
                return Err(err);
            }
        };

        prc.stats.accesses += 1;
        prc.last_clock = Some(clock);
        match outcome {
            FaultOutcome::Hit => prc.stats.hits += 1,
            FaultOutcome::Loaded { .. } => prc.stats.faults += 1,
            FaultOutcome::Replaced { .. } => {
                prc.stats.faults += 1;
                prc.stats.replacements += 1;
            }
        }
        pager::record_access(vpage, prc, clock)?;
        Ok(outcome)
    }

    /// Drive a whole trace, returning the frame holding each accessed page
    /// afterwards, or `NO_FRAME` where the access failed
    pub fn run_trace(&mut self, events: &[AccessEvent]) -> Vec<i64> {
        events
            .iter()
            .map(|event| match self.access(event.pid, event.vpage, event.clock) {
                Ok(_) => self
                    .process(event.pid)
                    .and_then(|prc| prc.resident_frame(event.vpage))
                    .map_or(NO_FRAME, |frame| frame as i64),
                Err(err) => {
                    // Pool exhaustion and corruption were already reported by the pager
                    if !err.is_invariant_violation()
                        && !matches!(err, VmError::ResourceExhausted { .. })
                    {
                        warn!("access to page {} rejected: {}", event.vpage, err);
                    }
                    NO_FRAME
                }
            })
            .collect()
    }

    pub fn report(&self) -> SimulationReport {
        let processes: Vec<ProcessReport> = self
            .processes
            .values()
            .map(|prc| ProcessReport {
                pid: prc.pid,
                frames: prc.allocated_frames.len(),
                max_frames: prc.max_allocated_frames,
                halted: prc.halted,
                fault_rate: prc.stats.fault_rate(),
                stats: prc.stats,
            })
            .collect();

        for p in &processes {
            info!(
                "process {}: {} accesses, {} faults, {} replacements, fault rate {:.3}",
                p.pid, p.stats.accesses, p.stats.faults, p.stats.replacements, p.fault_rate
            );
        }

        SimulationReport {
            algorithm: self.kernel.algorithm,
            free_frames: self.kernel.frames.free_count(),
            processes,
        }
    }
}
