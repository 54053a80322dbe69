// Handler modules
pub mod check;
pub mod policies;
pub mod report;
pub mod utils;

// Re-export all handler functions
pub use check::handle_check;
pub use policies::handle_policies;
pub use report::{ReportCommand, handle_report};
pub use utils::{build_aggregator, parse_severity, resolve_options};
