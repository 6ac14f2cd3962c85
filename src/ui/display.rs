//! Styled terminal output for operation results.

use std::path::Path;

use bytesize::ByteSize;
use console::style;

/// Prints the success line after an operation, with both sizes.
pub fn show_result(action: &str, output: &Path, in_bytes: u64, out_bytes: u64) {
    let name = output.file_name().map_or_else(|| output.display().to_string(), |n| n.to_string_lossy().into_owned());

    println!(
        "{} {} {} ({} -> {})",
        style("ok").green().bold(),
        action,
        style(name).white().bright(),
        ByteSize(in_bytes).display(),
        ByteSize(out_bytes).display(),
    );
}

/// Prints a styled error line to stderr.
pub fn show_error(message: &str) {
    eprintln!("{} {message}", style("error:").red().bold());
}
