//! Exit code constants for binaries that render build metadata.
//!
//! - 0: Success
//! - 1: User error (bad args, unreadable template file)
//! - 2: Template failure (malformed template, unknown field)
//! - 3: Git operation failure (build scripts only)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or an input file that could not be read.
pub const USER_ERROR: i32 = 1;

/// Template failure: the template could not be parsed or referenced an unknown field.
pub const TEMPLATE_FAILURE: i32 = 2;

/// Git operation failure while probing version-control metadata.
pub const GIT_FAILURE: i32 = 3;
