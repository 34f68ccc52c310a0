use anyhow::Result;
use logseq2course::{cli::parse_args, run_pipeline};

#[tokio::main]
async fn main() -> Result<()> {
    let config = parse_args()?;

    let level = match config.verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    run_pipeline(config).await?;
    Ok(())
}
