pub mod parse_command;
pub mod print;
pub mod render_command;
pub mod reports;

pub const EXIT_SUCCESS: i32 = exitcode::OK;
/// Some test did not pass.
pub const EXIT_FAILURE: i32 = 1;
