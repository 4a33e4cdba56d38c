//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Commands
//!
//! | Command | Input | Output |
//! |---------|-------|--------|
//! | `query <SRC_DIR>` | every `*.yaml` components document in a directory | components document |
//! | `dot` | one components document (file or stdin), optional faces document | DOT graph |
//!
//! Both commands take the same query flags:
//! - `--filter key=value` selects the seed components (default: all visible)
//! - `--complementation dep=N|rdep=N` expands the seeds along dependencies
//!   or reverse dependencies, `N` hops deep (negative = unbounded, the default)
//!
//! ## Output Formats
//!
//! `query` supports the `--format` flag:
//! - `yaml` (default)
//! - `json`
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! felipe --verbose query ./components
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod dot;
mod options;
mod output;
mod query;

pub use app::{run, Cli, Commands};
pub use options::{Complementation, LabelPredicate, PredicateError, QueryOptions};
pub use output::{Output, OutputFormat};
