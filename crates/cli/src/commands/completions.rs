//! # CLI Completions Command
//!
//! Shell completions generation for the Sirius CLI.

use std::io::Write;

use clap::Command;
use clap_complete::Shell;
use error::Result;

/// Binary name completions are generated for
pub const BIN_NAME: &str = "sirius";

/// Writes shell completions for `cmd` to `out`
pub fn completions(shell: Shell, cmd: &mut Command, out: &mut dyn Write) -> Result<()> {
    clap_complete::generate(shell, cmd, BIN_NAME, out);
    out.flush()?;
    Ok(())
}
