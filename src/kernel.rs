use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ConfigError;
use crate::memory::FreeFrameList;

/// Page replacement policy, fixed for a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Fifo,
    Lru,
    Clock,
    Count,
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(Algorithm::Fifo),
            "lru" => Ok(Algorithm::Lru),
            "clock" => Ok(Algorithm::Clock),
            "count" => Ok(Algorithm::Count),
            _ => Err(ConfigError::InvalidAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Fifo => "FIFO",
            Algorithm::Lru => "LRU",
            Algorithm::Clock => "CLOCK",
            Algorithm::Count => "COUNT",
        };
        f.write_str(name)
    }
}

/// Kernel-wide paging context passed into every fault
#[derive(Debug)]
pub struct Kernel {
    pub algorithm: Algorithm,
    pub frames: FreeFrameList,
}

impl Kernel {
    pub fn new(algorithm: Algorithm, frames: FreeFrameList) -> Self {
        Kernel { algorithm, frames }
    }

    /// Shorthand for a kernel owning a fresh pool of `num_frames` frames
    pub fn with_frames(algorithm: Algorithm, num_frames: usize) -> Self {
        Kernel::new(algorithm, FreeFrameList::new(num_frames))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("fifo".parse::<Algorithm>().unwrap(), Algorithm::Fifo);
        assert_eq!("LRU".parse::<Algorithm>().unwrap(), Algorithm::Lru);
        assert_eq!("Clock".parse::<Algorithm>().unwrap(), Algorithm::Clock);
        assert_eq!("count".parse::<Algorithm>().unwrap(), Algorithm::Count);
        assert!(matches!(
            "optimal".parse::<Algorithm>(),
            Err(ConfigError::InvalidAlgorithm(name)) if name == "optimal"
        ));
    }

    #[test]
    fn test_algorithm_display() {
        assert_eq!(Algorithm::Fifo.to_string(), "FIFO");
        assert_eq!(Algorithm::Count.to_string(), "COUNT");
    }

    #[test]
    fn test_kernel_with_frames() {
        let krn = Kernel::with_frames(Algorithm::Lru, 8);
        assert_eq!(krn.algorithm, Algorithm::Lru);
        assert_eq!(krn.frames.free_count(), 8);
    }
}
