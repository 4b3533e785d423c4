// Default settings for the replay engine

/// Maximum number of steps a producer may record before it is halted
/// A program that runs longer is treated as stuck in an infinite loop
pub const DEFAULT_STEP_LIMIT: usize = 10_000;

/// Line printed ahead of program output, as if typed at a shell prompt
pub const OUTPUT_BANNER: &str = "> program.exe\n";

/// Character used to mark the active statement in the highlight mask
pub const HIGHLIGHT_BLOCK: char = '█';

/// Width in bytes of a pointer in the simulated target
pub const POINTER_WIDTH: usize = 4;

/// Interval between automatic steps while playing in the viewer
pub const AUTO_PLAY_INTERVAL_MS: u64 = 400;
