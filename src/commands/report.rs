//! The `fraction-drill report` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(log_file: PathBuf, output_dir: PathBuf) -> Result<()> {
    println!("Generating report from {} into {}...", log_file.display(), output_dir.display());
    let files = fraction_drill::report::generate_report(&log_file, &output_dir)?;
    println!("Report written to {}", files.html.display());
    println!("Summary written to {}", files.summary.display());
    Ok(())
}
