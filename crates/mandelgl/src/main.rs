mod bootstrap;
mod cli;
mod run;

use anyhow::Result;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    run::run(cli.run).inspect_err(|err| {
        tracing::error!("mandelgl aborted: {err:#}");
    })
}
