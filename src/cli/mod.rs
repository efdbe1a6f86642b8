//! # Command-Line Interface
//!
//! User-facing commands over the invoice store.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `save` | Insert or update an invoice from JSON |
//! | `show`, `list` | Read invoices (list filters by date, buyer, seller) |
//! | `delete`, `clear` | Remove one or all invoices |
//! | `count`, `exists` | Quick checks |
//! | `config` | Print the resolved configuration |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output; store events are logged
//! through `tracing` and `RUST_LOG` overrides the filter:
//! ```bash
//! invoices --verbose list
//! RUST_LOG=invoice_store=trace invoices count
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod invoice;
mod output;

pub use app::{run, Cli, Commands};
pub use output::{format_amount, Output, OutputFormat};
