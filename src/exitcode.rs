//! Standard exit codes (BSD sysexits.h compatible)

/// Command line usage error (bad subcommand, malformed edit spec)
pub const USAGE: i32 = 64;

/// Data format error (invalid seed forest)
pub const DATAERR: i32 = 65;

/// Cannot open input (seed file missing)
pub const NOINPUT: i32 = 66;

/// Internal software error
pub const SOFTWARE: i32 = 70;

/// Input/output error
pub const IOERR: i32 = 74;

/// Configuration error
pub const CONFIG: i32 = 78;
