mod cli;

use proxybridge::{
    config,
    dispatch::{HttpWorkerPool, JobDispatcher, WorkerPool},
    host::remote::RemoteHost,
    inventory, matcher,
    operator::ConsoleOperator,
    reconcile::{Reconciler, RunOutcome},
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "proxybridge=trace".to_string()
        } else {
            "proxybridge=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Run { yes } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run(cli.config.as_deref(), yes))
        }
        Commands::Link { dir } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(link(cli.config.as_deref(), dir.as_deref()))
        }
        Commands::CheckPool => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(check_pool(cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("proxybridge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn run(config_path: Option<&Path>, assume_yes: bool) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let host = RemoteHost::new(&config.host);
    let pool: Arc<dyn WorkerPool> = Arc::new(HttpWorkerPool::new(&config.pool));
    let dispatcher = JobDispatcher::new(pool, &config.pool);
    let operator = ConsoleOperator::new(assume_yes);

    let reconciler = Reconciler::new(&host, &dispatcher, &operator, &config);

    match reconciler.run().await? {
        RunOutcome::NothingToDo => {
            anyhow::bail!("No clips to queue.")
        }
        RunOutcome::AlreadyHandled | RunOutcome::Declined | RunOutcome::Completed(_) => Ok(()),
    }
}

async fn link(config_path: Option<&Path>, dir: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let root = dir.unwrap_or(&config.paths.proxy_root);
    let candidates = matcher::walk::find_proxy_files(root, &config.paths.extensions)?;
    tracing::info!(
        "Found {} candidate proxy file(s) under {:?}",
        candidates.len(),
        root
    );

    let host = RemoteHost::new(&config.host);
    let mut clips = inventory::collect_clips(&host).await?;
    let report = matcher::link_proxies(&host, &candidates, &mut clips).await?;

    println!("{} proxy(s) linked.", report.linked.len());
    if !report.failed.is_empty() {
        println!("These files matched but couldn't be linked. Consider re-rendering them:");
        for name in report.failed_names() {
            println!("  {}", name);
        }
    }

    Ok(())
}

async fn check_pool(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let pool = HttpWorkerPool::new(&config.pool);

    if pool.ping().await? {
        println!("✓ Worker pool reachable at {}", config.pool.url);
        Ok(())
    } else {
        anyhow::bail!("Worker pool is not reachable at {}", config.pool.url)
    }
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Host bridge: {}", config.host.url);
            println!("  Worker pool: {}", config.pool.url);
            println!("  Proxy root: {:?}", config.paths.proxy_root);
            println!("  Proxy extension: {}", config.paths.proxy_ext);
            println!(
                "  Max wait: {}",
                config
                    .pool
                    .max_wait_secs
                    .map(|s| format!("{}s", s))
                    .unwrap_or_else(|| "unbounded".to_string())
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Host bridge: {}", config.host.url);
            println!("  Worker pool: {}", config.pool.url);
        }
    }

    Ok(())
}
