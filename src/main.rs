use anyhow::Context;
use std::process;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let code = runseq::cli::run()
        .await
        .context("runseq could not start the run")?;
    process::exit(code);
}
