pub mod constants;
pub mod dump;
pub mod error;
pub mod io;
pub mod kernel;
pub mod memory;
pub mod page_table;
pub mod pager;
pub mod process;
pub mod replacement;
pub mod vm_manager;

// Re-export commonly used items for convenience
pub use constants::*;
pub use error::{ConfigError, Result, VmError};
pub use kernel::{Algorithm, Kernel};
pub use pager::FaultOutcome;
pub use process::Process;
pub use vm_manager::{AccessEvent, VmManager};
