mod smoke;

use anyhow::Result;
use clap::Parser;
use replyfetch_common::observability::{LogConfig, LogFormat, init_logging};
use replyfetch_config::EndpointConfigLoader;
use replyfetch_social::twitter::RepliesApi;
use smoke::{Args, run_smoke_test};

const DEFAULT_CONFIG_FILE: &str = "replyfetch.yaml";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1) Load config (env wins over files)
    let mut loader = EndpointConfigLoader::new().with_optional_file(DEFAULT_CONFIG_FILE);
    if let Some(path) = &args.config {
        loader = loader.with_file(path);
    }
    let cfg = loader.load()?;

    let log_path = init_logging(LogConfig {
        format: if args.log_json {
            LogFormat::Json
        } else {
            LogFormat::Text
        },
        ..LogConfig::default()
    })?;
    tracing::debug!(log_path = %log_path.display(), ?cfg, "replyfetch starting");

    let api = RepliesApi::new(cfg)?;
    if let Err(err) = run_smoke_test(&api, &args).await {
        println!("Error during testing: {err}");
    }
    Ok(())
}
