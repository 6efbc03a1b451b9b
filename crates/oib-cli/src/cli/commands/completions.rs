//! `oib completions <shell>` and `oib man`.

use anyhow::Result;
use clap::CommandFactory;

use crate::cli::Cli;

/// Generate shell completions and print to stdout.
pub fn run_completions(shell: clap_complete::Shell) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "oib", &mut std::io::stdout());
    Ok(())
}

/// Generate a man page and print to stdout.
pub fn run_manpage() -> Result<()> {
    let man = clap_mangen::Man::new(Cli::command());
    let mut buf = Vec::new();
    man.render(&mut buf)?;
    std::io::Write::write_all(&mut std::io::stdout(), &buf)?;
    Ok(())
}
