//! Manual smoke test that drives all three replies operations in sequence.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use replyfetch_social::twitter::RepliesApi;

/// Example post whose replies are fetched when no id is given.
pub const DEFAULT_POST_ID: &str = "1902962796993843331";

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Fetch replies to a post, print them with metadata, and save them to a JSON file"
)]
pub struct Args {
    #[arg(long, default_value = DEFAULT_POST_ID)]
    pub post_id: String,

    #[arg(long, default_value_t = 5)]
    pub max_replies: u32,

    /// Extra YAML/TOML/JSON config file; TWITTER_* env vars still win.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub log_json: bool,
}

pub async fn run_smoke_test(api: &RepliesApi, args: &Args) -> Result<()> {
    let post_id = args.post_id.as_str();
    let max_replies = Some(args.max_replies);

    println!("\nTesting fetch_replies...");
    let replies = api.fetch_replies(post_id, max_replies).await?;
    println!("Fetched {} replies", replies.len());

    println!("\nTesting fetch_with_metadata...");
    let result = api.fetch_with_metadata(post_id, max_replies).await?;
    println!("Metadata: {}", serde_json::to_string_pretty(&result)?);

    println!("\nTesting save_to_file...");
    let path = api.save_to_file(post_id, None, max_replies).await?;
    println!("Saved replies to: {}", path.display());

    Ok(())
}
