//! CLI command handlers. Each command is in its own file.

mod checksum;
mod probe;
mod run;

pub use checksum::run_checksum;
pub use probe::run_probe;
pub use run::run_index;
