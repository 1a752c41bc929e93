//! weather-forecast — 单次天气查询的命令行入口
//!
//! Usage:
//!   weather-forecast --lat <LAT> --lon <LON> [--date <YYYY-MM-DD>]
//!
//! Configuration is read from the environment (see `AppConfig::from_env`).

use anyhow::{bail, Context};
use std::sync::Arc;
use weather_forecast_cache::config::AppConfig;
use weather_forecast_cache::logging;
use weather_forecast_cache::service::{ForecastQuery, WeatherService};

const STORE_CAPACITY: usize = 10_000;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return Ok(());
    }
    let query = parse_args(&args)?;

    let config = AppConfig::from_env().context("loading configuration")?;
    logging::init(config.log_format);

    let store = Arc::new(config.memory_store(STORE_CAPACITY));
    let service = WeatherService::from_config(&config, store).context("building weather service")?;

    tracing::info!(table = %config.table_name, ttl_minutes = config.ttl_minutes, "Starting weather forecast lookup");
    let response = service.handle_request(query).await;

    println!("{}", response.status);
    println!("{}", response.body);
    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn parse_args(args: &[String]) -> anyhow::Result<ForecastQuery> {
    let mut query = ForecastQuery::default();
    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .with_context(|| format!("missing value for {flag}"))?;
        match flag.as_str() {
            "--lat" => query.latitude = value.clone(),
            "--lon" => query.longitude = value.clone(),
            "--date" => query.date = Some(value.clone()),
            other => {
                print_usage();
                bail!("unknown argument: {other}");
            }
        }
    }
    Ok(query)
}

fn print_usage() {
    println!(
        r#"weather-forecast — forecast lookup through the read-through cache

USAGE:
    weather-forecast --lat <LAT> --lon <LON> [--date <YYYY-MM-DD>]

ENVIRONMENT:
    OPEN_METEO_URL              Forecast URL template with {{lat}} and {{lon}} (required)
    CACHE_TABLE                 Cache table name (default WeatherCache)
    TTL_MINUTES                 Cache record lifetime (default 10)
    HTTP_TIMEOUT_SECS           Provider request timeout (default 30)
    CACHE_WRITE_CONCURRENCY     Concurrent cache writes after a fetch (default 8)
    LOG_FORMAT                  json | pretty (default json)
    RUST_LOG                    Log filter (default info)"#
    );
}
