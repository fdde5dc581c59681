use stockalyse::chart;
use stockalyse::config::{Config, DateStyle, StalePolicy};
use stockalyse::models::query::{DayCount, Query};
use stockalyse::providers::FmpClient;
use stockalyse::services::input::HELP;
use stockalyse::services::{Completions, Input, Session};
use stockalyse::util;
use stockalyse::view::View;

use clap::{App, Arg, ArgMatches, SubCommand};
use log::{error, info};
use std::error::Error;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // 读取 .env 中的 API key，再初始化日志
    dotenvy::dotenv().ok();
    env_logger::init();

    let query_args = [
        Arg::with_name("symbol")
            .short('s')
            .long("symbol")
            .value_name("SYMBOL")
            .help("Ticker symbol to look up")
            .takes_value(true),
        Arg::with_name("url")
            .short('u')
            .long("url")
            .value_name("URL")
            .help("Page URL whose 'symbol' query parameter seeds the lookup")
            .takes_value(true)
            .conflicts_with("symbol"),
        Arg::with_name("days")
            .short('d')
            .long("days")
            .value_name("DAYS")
            .help("Number of points to show")
            .possible_values(["7", "14", "21", "28"])
            .takes_value(true)
            .default_value("7"),
    ];

    let app = App::new("Stockalyse")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Look up a ticker and chart its recent price history")
        .arg(
            Arg::with_name("base-url")
                .long("base-url")
                .value_name("URL")
                .help("Provider base URL (overrides FMP_BASE_URL)")
                .takes_value(true)
                .global(true),
        )
        .arg(
            Arg::with_name("calendar-dates")
                .long("calendar-dates")
                .help("Send ISO YYYY-MM-DD dates instead of the legacy zero-based month format")
                .takes_value(false)
                .global(true),
        )
        .arg(
            Arg::with_name("keep-stale")
                .long("keep-stale")
                .help("Apply responses of superseded requests (last resolved wins)")
                .takes_value(false)
                .global(true),
        )
        .subcommand(
            SubCommand::with_name("show")
                .about("Fetch once and print the report")
                .args(query_args.clone())
                .arg(
                    Arg::with_name("html")
                        .long("html")
                        .value_name("FILE")
                        .help("Also write the chart as a standalone HTML page")
                        .takes_value(true),
                ),
        )
        .subcommand(
            SubCommand::with_name("interactive")
                .about("Type symbols and commands, the view updates as responses arrive")
                .args(query_args),
        );

    let matches = app.get_matches();
    let config = build_config(&matches);

    if let Some(matches) = matches.subcommand_matches("show") {
        let query = build_query(matches)?;
        let html_path = matches.value_of("html");
        show(config, query, html_path).await?;
    } else if let Some(matches) = matches.subcommand_matches("interactive") {
        let query = build_query(matches)?;
        interactive(config, query).await?;
    } else {
        info!("No command specified. Use --help for usage information.");
    }

    Ok(())
}

fn build_config(matches: &ArgMatches) -> Config {
    let mut config = Config::from_env();
    if let Some(base_url) = matches.value_of("base-url") {
        config = config.with_base_url(base_url);
    }
    if matches.is_present("calendar-dates") {
        config = config.with_date_style(DateStyle::Calendar);
    }
    if matches.is_present("keep-stale") {
        config = config.with_stale_policy(StalePolicy::LastResolvedWins);
    }
    config
}

fn build_query(matches: &ArgMatches) -> Result<Query, Box<dyn Error>> {
    let symbol = match (matches.value_of("symbol"), matches.value_of("url")) {
        (Some(symbol), _) => util::normalize_symbol(symbol),
        (None, Some(url)) => util::symbol_from_url(url)?,
        (None, None) => None,
    };
    let day_count = matches.value_of("days").unwrap_or("7").parse::<DayCount>()?;
    Ok(Query::new(symbol).with_day_count(day_count))
}

async fn show(config: Config, query: Query, html_path: Option<&str>) -> Result<(), Box<dyn Error>> {
    let provider = Arc::new(FmpClient::new(&config)?);
    let (mut session, mut completions) = Session::new(provider, &config, query);

    session.mount();
    if session.requests_issued() > 0 {
        if let Some(completion) = completions.recv().await {
            session.complete(completion);
        }
    }

    let view = session.view();
    print!("{}", view);

    if let Some(path) = html_path {
        match &view {
            View::Report { symbol, day_count, rows } => {
                let chart = chart::build_chart(symbol, *day_count, rows);
                let html = chart::render_html(&chart, symbol, config.chart_width, config.chart_height)?;
                tokio::fs::write(path, html).await?;
                info!("Chart written to {}", path);
            }
            _ => error!("Nothing to chart, {} was not written", path),
        }
    }
    Ok(())
}

async fn interactive(config: Config, query: Query) -> Result<(), Box<dyn Error>> {
    let provider = Arc::new(FmpClient::new(&config)?);
    let (mut session, mut completions): (Session<FmpClient>, Completions) =
        Session::new(provider, &config, query);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    session.mount();
    print!("{}", session.view());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Input::parse(&line) {
                    Ok(Input::Submit(symbol)) => session.submit_symbol(&symbol),
                    Ok(Input::Days(day_count)) => session.select_day_count(day_count),
                    Ok(Input::Help) => {
                        println!("{}", HELP);
                        continue;
                    }
                    Ok(Input::Quit) => break,
                    Err(e) => {
                        println!("{}", e);
                        continue;
                    }
                }
                print!("{}", session.view());
            }
            Some(completion) = completions.recv() => {
                session.complete(completion);
                print!("{}", session.view());
            }
        }
    }

    info!("Issued {} requests, bye", session.requests_issued());
    Ok(())
}
