/// Physical frames in the pool when the init file does not say otherwise.
pub const DEFAULT_NUM_FRAMES: usize = 64;

/// Added to a page's COUNT value when its used bit is found set during aging.
pub const COUNT_BOOST: u32 = 128;

/// Output code for an access that left no page resident.
pub const NO_FRAME: i64 = -1;
