//! invoices - command-line access to the invoice store

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = invoice_store::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
