use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use tracing_subscriber::EnvFilter;

use coin_scraper::error::Result;
use coin_scraper::scraper::{CoinMarketCapCfg, CoinMarketCapFactory};
use coin_scraper::task::{SCRAPE_COIN_DATA, ScrapeCoinData, TaskRegistry};

mod config;

#[derive(Parser)]
struct Args {
    #[clap(short, long)]
    config: String,

    /// Coins to scrape; when empty the jobs listed in the config run instead
    coins: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config::Cfg { scraper, jobs } = config::Parser::parse_yaml(&args.config)?;
    let registry = init_registry(scraper.try_into()?)?;

    let jobs = if args.coins.is_empty() {
        jobs.into_iter()
            .map(|job| -> Result<(String, serde_json::Value)> {
                let task_args = job.json_args()?;
                Ok((job.task, task_args))
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        vec![(SCRAPE_COIN_DATA.to_string(), serde_json::to_value(&args.coins)?)]
    };

    if jobs.is_empty() {
        info!("nothing to do, no coins given and no jobs configured");
    }

    for (task, task_args) in jobs {
        let ret = registry.dispatch(&task, task_args).await?;
        println!("{}", serde_json::to_string_pretty(&ret)?);
    }

    Ok(())
}

fn init_registry(cfg: CoinMarketCapCfg) -> Result<TaskRegistry> {
    let factory = Arc::new(CoinMarketCapFactory::new(cfg));
    let mut registry = TaskRegistry::new();
    registry.register(Arc::new(ScrapeCoinData::new(factory)))?;
    Ok(registry)
}
