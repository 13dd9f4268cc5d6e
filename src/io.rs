use std::fs;
use std::path::Path;

use log::warn;

use crate::constants::*;
use crate::error::ConfigError;
use crate::kernel::{Algorithm, Kernel};
use crate::memory::FreeFrameList;
use crate::process::Process;
use crate::vm_manager::{AccessEvent, SimulationReport, VmManager};

/// Process definition read from the init file
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSpec {
    pub pid: u32,
    pub num_pages: usize,
    pub quota: usize,
    pub working_set: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitData {
    pub num_frames: usize,
    pub algorithm: Option<Algorithm>,
    pub reserved: Vec<usize>,
    pub processes: Vec<ProcessSpec>,
}

impl Default for InitData {
    fn default() -> Self {
        InitData {
            num_frames: DEFAULT_NUM_FRAMES,
            algorithm: None,
            reserved: Vec::new(),
            processes: Vec::new(),
        }
    }
}

fn read_file<P: AsRef<Path>>(path: P) -> Result<String, ConfigError> {
    fs::read_to_string(path.as_ref()).map_err(|source| ConfigError::Io {
        path: path.as_ref().display().to_string(),
        source,
    })
}

fn parse_error(line: usize, message: String) -> ConfigError {
    ConfigError::Parse { line, message }
}

fn parse_num<T: std::str::FromStr>(token: &str, what: &str, line: usize) -> Result<T, ConfigError> {
    token
        .parse()
        .map_err(|_| parse_error(line, format!("Invalid {}: {}", what, token)))
}

/// Strip a trailing `#` comment
fn strip_comment(line: &str) -> &str {
    line.split('#').next().unwrap_or("")
}

impl InitData {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::parse(&read_file(path)?)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut init = InitData::default();
        let mut reserved_at = Vec::new();

        for (idx, raw) in content.lines().enumerate() {
            let line = idx + 1;
            let tokens: Vec<&str> = strip_comment(raw).split_whitespace().collect();
            let Some((&keyword, args)) = tokens.split_first() else {
                continue;
            };

            match keyword {
                "frames" => {
                    let [value] = args else {
                        return Err(parse_error(line, "frames takes one value".to_string()));
                    };
                    init.num_frames = parse_num(value, "frame count", line)?;
                }
                "algorithm" => {
                    let [name] = args else {
                        return Err(parse_error(line, "algorithm takes one name".to_string()));
                    };
                    init.algorithm = Some(name.parse()?);
                }
                "reserved" => {
                    for token in args {
                        let frame: usize = parse_num(token, "frame number", line)?;
                        if init.reserved.contains(&frame) {
                            return Err(parse_error(
                                line,
                                format!("Frame {} is already reserved", frame),
                            ));
                        }
                        init.reserved.push(frame);
                        reserved_at.push((frame, line));
                    }
                }
                "process" => init.processes.push(Self::parse_process_line(args, line)?),
                _ => return Err(parse_error(line, format!("Unknown keyword: {}", keyword))),
            }
        }

        // `frames` may follow `reserved`, so ranges are checked once the file is read
        for (frame, line) in reserved_at {
            if frame >= init.num_frames {
                let max = init.num_frames.saturating_sub(1);
                return Err(parse_error(
                    line,
                    format!("Reserved frame {} exceeds max {}", frame, max),
                ));
            }
        }

        Ok(init)
    }

    /// `<pid> pages <n> quota <q> [ws <page>...]`
    fn parse_process_line(args: &[&str], line: usize) -> Result<ProcessSpec, ConfigError> {
        let [pid, "pages", pages, "quota", quota, rest @ ..] = args else {
            return Err(parse_error(
                line,
                "expected: process <pid> pages <n> quota <q> [ws <page>...]".to_string(),
            ));
        };

        let spec_pid: u32 = parse_num(pid, "process id", line)?;
        let num_pages: usize = parse_num(pages, "page count", line)?;
        let quota: usize = parse_num(quota, "frame quota", line)?;
        if quota == 0 {
            return Err(parse_error(
                line,
                format!("Process {} needs a frame quota of at least 1", spec_pid),
            ));
        }

        let working_set = match rest {
            [] => Vec::new(),
            ["ws", pages @ ..] => {
                let mut ws = Vec::with_capacity(pages.len());
                for token in pages {
                    let page: usize = parse_num(token, "working set page", line)?;
                    if page >= num_pages {
                        let max = num_pages.saturating_sub(1);
                        return Err(parse_error(
                            line,
                            format!("Working set page {} exceeds max {}", page, max),
                        ));
                    }
                    ws.push(page);
                }
                ws
            }
            _ => {
                return Err(parse_error(
                    line,
                    format!("Unexpected tokens: {}", rest.join(" ")),
                ));
            }
        };

        Ok(ProcessSpec {
            pid: spec_pid,
            num_pages,
            quota,
            working_set,
        })
    }

    /// Build the simulator, with `algorithm` overriding the file's choice
    pub fn build(&self, algorithm: Option<Algorithm>) -> Result<VmManager, ConfigError> {
        let mut ffl = FreeFrameList::new(self.num_frames);
        for &frame in &self.reserved {
            if !ffl.mark_occupied(frame) {
                warn!("reserved frame {} is not in the free pool", frame);
            }
        }

        let algorithm = algorithm.or(self.algorithm).unwrap_or_default();
        let mut vm = VmManager::new(Kernel::new(algorithm, ffl));
        for spec in &self.processes {
            let prc = Process::new(spec.pid, spec.num_pages, spec.quota)
                .with_working_set(spec.working_set.clone());
            vm.add_process(prc)?;
        }
        Ok(vm)
    }
}

/// Read an access trace: one `<pid> <vpage> [clock]` per line
///
/// A missing clock defaults to the 1-based position of the access in the trace.
pub fn read_trace<P: AsRef<Path>>(path: P) -> Result<Vec<AccessEvent>, ConfigError> {
    parse_trace(&read_file(path)?)
}

pub fn parse_trace(content: &str) -> Result<Vec<AccessEvent>, ConfigError> {
    let mut events = Vec::new();
    for (idx, raw) in content.lines().enumerate() {
        let line = idx + 1;
        let tokens: Vec<&str> = strip_comment(raw).split_whitespace().collect();
        let event = match tokens.as_slice() {
            [] => continue,
            [pid, vpage] => AccessEvent {
                pid: parse_num(pid, "process id", line)?,
                vpage: parse_num(vpage, "virtual page", line)?,
                clock: (events.len() + 1) as f64,
            },
            [pid, vpage, clock] => AccessEvent {
                pid: parse_num(pid, "process id", line)?,
                vpage: parse_num(vpage, "virtual page", line)?,
                clock: parse_num(clock, "clock", line)?,
            },
            _ => {
                return Err(parse_error(
                    line,
                    format!("Access line has {} tokens, expected 2 or 3", tokens.len()),
                ));
            }
        };
        events.push(event);
    }
    Ok(events)
}

pub fn write_results<P: AsRef<Path>>(path: P, results: &[i64]) -> Result<(), ConfigError> {
    let output: Vec<String> = results.iter().map(|r| r.to_string()).collect();
    fs::write(path.as_ref(), output.join(" ")).map_err(|source| ConfigError::Io {
        path: path.as_ref().display().to_string(),
        source,
    })
}

pub fn report_json(report: &SimulationReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_INIT: &str = "\
# two processes sharing eight frames
frames 8
algorithm clock
reserved 0 1      # kernel frames
process 1 pages 10 quota 3 ws 0 1 2
process 2 pages 4 quota 2
";

    #[test]
    fn test_parse_init() {
        let init = InitData::parse(SAMPLE_INIT).unwrap();
        assert_eq!(init.num_frames, 8);
        assert_eq!(init.algorithm, Some(Algorithm::Clock));
        assert_eq!(init.reserved, vec![0, 1]);
        assert_eq!(
            init.processes,
            vec![
                ProcessSpec { pid: 1, num_pages: 10, quota: 3, working_set: vec![0, 1, 2] },
                ProcessSpec { pid: 2, num_pages: 4, quota: 2, working_set: vec![] },
            ]
        );
    }

    #[test]
    fn test_parse_init_defaults() {
        let init = InitData::parse("process 1 pages 4 quota 1").unwrap();
        assert_eq!(init.num_frames, DEFAULT_NUM_FRAMES);
        assert_eq!(init.algorithm, None);
    }

    #[test]
    fn test_parse_init_errors() {
        assert!(matches!(
            InitData::parse("frames eight"),
            Err(ConfigError::Parse { line: 1, .. })
        ));
        assert!(matches!(
            InitData::parse("frames 4\nalgorithm optimal"),
            Err(ConfigError::InvalidAlgorithm(_))
        ));
        assert!(matches!(
            InitData::parse("\n\nprocess 1 pages 4"),
            Err(ConfigError::Parse { line: 3, .. })
        ));
        assert!(InitData::parse("process 1 pages 4 quota 1 ws 4").is_err());
        assert!(InitData::parse("frames 2\nreserved 2").is_err());
        assert!(InitData::parse("swap 12").is_err());
    }

    #[test]
    fn test_zero_quota_rejected() {
        let err = InitData::parse("frames 4\nprocess 1 pages 4 quota 0").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { line: 2, .. }));
        assert!(err.to_string().contains("quota"));
    }

    #[test]
    fn test_duplicate_reserved_frame_rejected() {
        assert!(matches!(
            InitData::parse("frames 4\nreserved 1\nreserved 2 1"),
            Err(ConfigError::Parse { line: 3, .. })
        ));
    }

    #[test]
    fn test_build_tolerates_hand_built_duplicate_reservation() {
        let init = InitData {
            num_frames: 4,
            reserved: vec![1, 1],
            ..InitData::default()
        };
        let vm = init.build(None).unwrap();
        assert_eq!(vm.kernel().frames.free_count(), 3);
    }

    #[test]
    fn test_build_reserves_frames() {
        let init = InitData::parse(SAMPLE_INIT).unwrap();
        let mut vm = init.build(None).unwrap();
        assert_eq!(vm.kernel().algorithm, Algorithm::Clock);
        assert_eq!(vm.kernel().frames.free_count(), 6);
        assert_eq!(vm.process(1).unwrap().working_set, vec![0, 1, 2]);

        // First free frame after the reserved ones
        vm.access(2, 3, 1.0).unwrap();
        assert_eq!(vm.process(2).unwrap().resident_frame(3), Some(2));
    }

    #[test]
    fn test_build_algorithm_override_and_duplicates() {
        let init = InitData::parse(SAMPLE_INIT).unwrap();
        assert_eq!(init.build(Some(Algorithm::Lru)).unwrap().kernel().algorithm, Algorithm::Lru);

        let dup = InitData::parse("process 1 pages 2 quota 1\nprocess 1 pages 2 quota 1").unwrap();
        assert!(matches!(dup.build(None), Err(ConfigError::Vm(_))));
    }

    #[test]
    fn test_parse_trace() {
        let events = parse_trace("1 4\n# comment\n\n2 0 7.5\n1 3").unwrap();
        assert_eq!(
            events,
            vec![
                AccessEvent { pid: 1, vpage: 4, clock: 1.0 },
                AccessEvent { pid: 2, vpage: 0, clock: 7.5 },
                AccessEvent { pid: 1, vpage: 3, clock: 3.0 },
            ]
        );
        assert!(matches!(parse_trace("1 2 3 4"), Err(ConfigError::Parse { line: 1, .. })));
        assert!(parse_trace("1 x").is_err());
    }

    #[test]
    fn test_end_to_end_trace() {
        let init = InitData::parse("frames 4\nalgorithm fifo\nprocess 1 pages 8 quota 2").unwrap();
        let mut vm = init.build(None).unwrap();
        let events = parse_trace("1 3\n1 4\n1 3\n1 5").unwrap();
        assert_eq!(vm.run_trace(&events), vec![0, 1, 0, 0]);

        let json = report_json(&vm.report()).unwrap();
        assert!(json.contains("\"algorithm\": \"fifo\""));
        assert!(json.contains("\"replacements\": 1"));
    }

    #[test]
    fn test_write_results() {
        let name = format!("page_replacement_results_{}.txt", std::process::id());
        let path = std::env::temp_dir().join(name);
        write_results(&path, &[0, 1, NO_FRAME]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "0 1 -1");
        fs::remove_file(&path).unwrap();
    }
}
