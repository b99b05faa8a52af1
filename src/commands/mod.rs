//! Subcommand-style flows that run instead of a full harvest.

mod dry_run;

pub use dry_run::run_dry_run_preview;
