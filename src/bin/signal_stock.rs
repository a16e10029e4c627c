use signal_stock::config::Config;
use signal_stock::engine::StockEngine;
use signal_stock::models::profile::UserProfile;
use signal_stock::models::stock::StockResult;
use signal_stock::services::stock_service::StockService;
use signal_stock::sources::base::ProfileSource;
use signal_stock::sources::github::GitHubSource;
use signal_stock::util;

use anyhow::{bail, Context};
use clap::{App, Arg, ArgMatches, SubCommand};
use log::{error, info};
use serde_json::json;
use std::sync::Arc;

fn user_arg() -> Arg<'static> {
    Arg::with_name("user")
        .short('u')
        .long("user")
        .value_name("LOGIN")
        .help("GitHub login")
        .required(true)
        .takes_value(true)
}

fn format_arg() -> Arg<'static> {
    Arg::with_name("format")
        .long("format")
        .value_name("FORMAT")
        .help("Output format (json, table)")
        .possible_values(["json", "table"])
        .takes_value(true)
        .default_value("json")
}

fn limit_arg() -> Arg<'static> {
    Arg::with_name("limit")
        .short('l')
        .long("limit")
        .value_name("LIMIT")
        .help("Number of most recent candles to show in table output")
        .takes_value(true)
        .default_value("30")
}

fn print_stock(login: &str, stock: &StockResult, matches: &ArgMatches) -> anyhow::Result<()> {
    let limit = matches.value_of("limit")
        .unwrap_or("30")
        .parse::<usize>()
        .unwrap_or(30);

    println!("{}: ${:.2} ({:+.2}%, {})", login, stock.price, stock.change, stock.change_direction.as_str());
    println!(
        "Volume {:.1} | Consistency {:.1} | Recognition {:.1} | Social {:.1} | Momentum {:.1}",
        stock.metrics.volume, stock.metrics.consistency, stock.metrics.recognition,
        stock.metrics.social_proof, stock.metrics.momentum
    );
    let candles = util::latest_candles(&stock.candlesticks, limit, login);
    for line in util::format_candle_table(&candles) {
        println!("{}", line);
    }
    if stock.candlesticks.len() > candles.len() {
        println!("... and {} earlier candles", stock.candlesticks.len() - candles.len());
    }
    Ok(())
}

fn not_found(login: &str) -> ! {
    error!("User not found: {}", login);
    println!("{}", json!({ "error": format!("User not found: {}", login) }));
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init();

    let app = App::new("Signal")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Signal Team")
        .about("Turns public GitHub activity into a stock price")
        .arg(
            Arg::with_name("endpoint")
                .long("endpoint")
                .value_name("URL")
                .help("GitHub GraphQL endpoint (overrides SIGNAL_GITHUB_ENDPOINT)")
                .global(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("token")
                .long("token")
                .value_name("TOKEN")
                .help("GitHub token (overrides GITHUB_TOKEN)")
                .global(true)
                .takes_value(true),
        );

    // 添加子命令
    let app = app
        .subcommand(
            SubCommand::with_name("quote")
                .about("Fetch an account and print its stock")
                .arg(user_arg())
                .arg(format_arg())
                .arg(limit_arg()),
        )
        .subcommand(
            SubCommand::with_name("breakdown")
                .about("Print the diagnostic score breakdown of an account")
                .arg(user_arg()),
        )
        .subcommand(
            SubCommand::with_name("simulate")
                .about("Compute the stock from a saved profile JSON file")
                .arg(
                    Arg::with_name("input")
                        .short('i')
                        .long("input")
                        .value_name("FILE")
                        .help("Path to a profile JSON file")
                        .required(true)
                        .takes_value(true),
                )
                .arg(format_arg())
                .arg(limit_arg()),
        )
        .subcommand(
            SubCommand::with_name("exists")
                .about("Check whether a GitHub account exists")
                .arg(user_arg()),
        );

    let matches = app.get_matches();

    let mut config = Config::from_env();
    if let Some(endpoint) = matches.value_of("endpoint") {
        config = config.with_github_endpoint(endpoint);
    }
    if let Some(token) = matches.value_of("token") {
        config = config.with_github_token(token);
    }

    match matches.subcommand() {
        Some(("quote", sub)) => {
            let login = sub.value_of("user").context("missing --user")?;
            let source: Arc<dyn ProfileSource + Send + Sync> = Arc::new(GitHubSource::new(&config)?);
            let service = StockService::new(config, source);

            let report = match service.lookup(login).await {
                Ok(report) => report,
                Err(e) if e.is_not_found() => not_found(login),
                Err(e) => return Err(e).context("Failed to fetch user data"),
            };

            if sub.value_of("format") == Some("table") {
                print_stock(&report.user.login, &report.stock, sub)?;
            } else {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Some(("breakdown", sub)) => {
            let login = sub.value_of("user").context("missing --user")?;
            let source: Arc<dyn ProfileSource + Send + Sync> = Arc::new(GitHubSource::new(&config)?);
            let service = StockService::new(config, source);

            match service.breakdown(login).await {
                Ok(breakdown) => println!("{}", breakdown),
                Err(e) if e.is_not_found() => not_found(login),
                Err(e) => return Err(e).context("Failed to fetch user data"),
            }
        }
        Some(("simulate", sub)) => {
            let path = sub.value_of("input").context("missing --input")?;
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path))?;
            let profile: UserProfile = serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse profile from {}", path))?;
            info!("Loaded {} days of activity for {}", profile.contribution_days.len(), profile.login);

            let engine = StockEngine::new(config.model);
            let stock = engine.compute(&profile);

            if sub.value_of("format") == Some("table") {
                print_stock(&profile.login, &stock, sub)?;
            } else {
                let report = json!({ "user": profile.summary(), "stock": stock });
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Some(("exists", sub)) => {
            let login = sub.value_of("user").context("missing --user")?;
            let source = GitHubSource::new(&config)?;
            if source.user_exists(login).await? {
                println!("{} exists", login);
            } else {
                not_found(login);
            }
        }
        Some((other, _)) => bail!("Unknown command: {}", other),
        None => {
            info!("No command specified. Use --help for usage information.");
        }
    }

    Ok(())
}
