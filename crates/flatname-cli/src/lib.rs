//! flatname CLI library
//!
//! This module contains the core CLI logic for the flatname decoder.

pub mod error_adapter;
pub mod report;

mod args;
mod config;
mod input;

pub use args::Args;

use std::fs;

use log::info;

use flatname::{FlatnameError, NestedNameFormatter, decode};

use input::InputElement;

/// Run the flatname CLI application
///
/// This function reads the element list, decodes it, and writes the report
/// to the output file, or to stdout when no output file is given.
///
/// # Errors
///
/// Returns `FlatnameError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed input files
/// - Decode errors
pub fn run(args: &Args) -> Result<(), FlatnameError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Decoding element names"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let entries = input::parse_input(&source)?
        .into_iter()
        .map(InputElement::into_entry);

    let mut registry = decode(entries, &app_config)?;
    let report = report::render_report(&mut registry, &NestedNameFormatter)?;

    match &args.output {
        Some(output) => {
            fs::write(output, report)?;
            info!(output_file = output; "Report written");
        }
        None => print!("{report}"),
    }

    Ok(())
}
