use clap::Parser;
use stitchmine_cli::CliArgs;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    stitchmine_cli::run(args).await?;
    Ok(())
}
