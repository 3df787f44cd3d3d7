//! Tokencache CLI
//!
//! Operator tool for the access-token cache: print the effective cache
//! policy, or drive a cache-aside simulation and report the resulting stats.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use colored::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tokencache_core::{AccessToken, PlatformType, TenantId, TokenSource};
use tokencache_service::{TokenCacheConfig, TokenCacheService};

/// Tokencache - tenant-aware access-token cache
#[derive(Parser)]
#[command(name = "tokencache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective cache policy (from env / .env)
    Info,

    /// Run a cache-aside simulation against an in-memory token source
    Simulate {
        /// Number of tenants
        #[arg(short, long, default_value = "10")]
        tenants: usize,
        /// Number of token lookups
        #[arg(short, long, default_value = "10000")]
        requests: usize,
        /// Token TTL in seconds (defaults to the configured TTL)
        #[arg(long, env = "TOKEN_CACHE_SIM_TTL_SECS")]
        ttl_secs: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "tokencache=debug,tokencache_service=debug,tokencache_store=debug,info"
    } else {
        "tokencache=info,warn"
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config = TokenCacheConfig::from_env().context("Invalid token cache configuration")?;

    match cli.command {
        Commands::Info => cmd_info(config),
        Commands::Simulate {
            tenants,
            requests,
            ttl_secs,
        } => cmd_simulate(config, tenants, requests, ttl_secs).await,
    }
}

/// Print the cache policy
fn cmd_info(config: TokenCacheConfig) -> Result<()> {
    let cache = TokenCacheService::new(config);
    let info = cache.cache_info();

    println!("{}", "Token cache policy".cyan().bold());
    println!("   {} {}", "TTL:".dimmed(), info.ttl_description);
    println!(
        "   {} {}",
        "Platforms:".dimmed(),
        info.supported_platforms
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("\n{}", serde_json::to_string_pretty(&info)?);

    Ok(())
}

/// In-memory stand-in for the integrations table.
struct MemorySource {
    tokens: HashMap<(TenantId, PlatformType), String>,
    fetches: AtomicUsize,
}

impl MemorySource {
    fn seeded(tenants: &[TenantId]) -> Self {
        let mut tokens = HashMap::new();
        for tenant in tenants {
            for platform in PlatformType::ALL {
                tokens.insert(
                    (tenant.clone(), *platform),
                    format!("{}-{}-token", tenant, platform.as_str().to_lowercase()),
                );
            }
        }
        Self {
            tokens,
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl TokenSource for MemorySource {
    type Error = Infallible;

    async fn fetch_token(
        &self,
        tenant: &TenantId,
        platform: PlatformType,
    ) -> std::result::Result<Option<AccessToken>, Self::Error> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .tokens
            .get(&(tenant.clone(), platform))
            .map(|t| AccessToken::new(t.as_str())))
    }
}

/// Run the cache-aside simulation
async fn cmd_simulate(
    config: TokenCacheConfig,
    tenant_count: usize,
    requests: usize,
    ttl_secs: Option<u64>,
) -> Result<()> {
    anyhow::ensure!(tenant_count > 0, "at least one tenant is required");

    let config = match ttl_secs {
        Some(secs) => config.with_ttl_seconds(secs),
        None => config,
    };
    config.validate().context("Invalid --ttl-secs")?;
    let cache = Arc::new(TokenCacheService::new(config));
    let _sweeper = cache.spawn_sweeper();

    let tenants = (0..tenant_count)
        .map(|i| TenantId::new(format!("company-{}", i)))
        .collect::<tokencache_core::Result<Vec<_>>>()?;
    let source = MemorySource::seeded(&tenants);

    println!(
        "{} {} lookups across {} tenants",
        "Simulating".cyan().bold(),
        requests,
        tenant_count
    );

    let start = Instant::now();
    let mut misses = 0usize;
    for i in 0..requests {
        let tenant = &tenants[i % tenants.len()];
        let platform = PlatformType::ALL[(i / tenants.len()) % PlatformType::ALL.len()];

        // Halfway through, the first tenant re-authenticates
        if i == requests / 2 {
            let removed = cache.clear_company_tokens(&tenants[0]);
            info!(tenant = %tenants[0], removed, "Simulated re-authentication");
        }

        let before = source.fetches();
        let token = cache
            .get_or_fetch(&source, tenant, platform)
            .await
            .unwrap_or_else(|never| match never {});
        if source.fetches() > before {
            misses += 1;
        }
        anyhow::ensure!(token.is_some(), "no token seeded for {} on {}", tenant, platform);
    }
    let elapsed = start.elapsed();

    let hits = requests - misses;
    let hit_ratio = if requests > 0 {
        hits as f64 / requests as f64 * 100.0
    } else {
        0.0
    };

    println!("\n{}", "Results:".green().bold());
    println!("   {} {}", "Hits:".dimmed(), hits);
    println!("   {} {}", "Misses (database fetches):".dimmed(), misses);
    println!("   {} {:.1}%", "Hit ratio:".dimmed(), hit_ratio);
    println!("   {} {:?}", "Elapsed:".dimmed(), elapsed);

    println!("\n{}", "Cache stats (JSON):".yellow().bold());
    println!("{}", serde_json::to_string_pretty(&cache.get_cache_stats())?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulate_accepts_ttl_secs() {
        let cli = Cli::try_parse_from(["tokencache", "simulate", "--tenants", "3", "--ttl-secs", "60"])
            .unwrap();

        match cli.command {
            Commands::Simulate { tenants, requests, ttl_secs } => {
                assert_eq!(tenants, 3);
                assert_eq!(requests, 10_000);
                assert_eq!(ttl_secs, Some(60));
            }
            Commands::Info => panic!("expected simulate"),
        }
    }

    #[test]
    fn test_simulate_rejects_millisecond_flags() {
        assert!(Cli::try_parse_from(["tokencache", "simulate", "--ttl-ms", "500"]).is_err());
        assert!(Cli::try_parse_from(["tokencache", "simulate", "--pause-us", "10"]).is_err());
    }

    #[tokio::test]
    async fn test_simulate_rejects_zero_ttl() {
        let result = cmd_simulate(TokenCacheConfig::default().no_sweep(), 2, 10, Some(0)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_simulate_runs_with_ttl_secs() {
        let result = cmd_simulate(TokenCacheConfig::default().no_sweep(), 2, 40, Some(60)).await;
        assert!(result.is_ok());
    }
}
