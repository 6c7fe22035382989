use stock_fx_etl::fetchers::base::ReqwestClient;
use stock_fx_etl::sink::ArrowStagingSink;
use stock_fx_etl::util::arrow_utils;
use stock_fx_etl::{Config, DateRange, EtlService};

use arrow::util::pretty::pretty_format_batches;
use clap::{App, Arg};
use log::{error, info};
use std::error::Error;
use std::path::Path;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logger, info by default
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("stock_fx_etl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Fetch daily stock prices and exchange rates, join them on date")
        .arg(
            Arg::with_name("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("JSON configuration file")
                .takes_value(true)
                .default_value("config.json"),
        )
        .arg(
            Arg::with_name("start")
                .short('s')
                .long("start")
                .value_name("DATE")
                .help("First date to fetch (YYYY-MM-DD), defaults to yesterday")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("end")
                .short('e')
                .long("end")
                .value_name("DATE")
                .help("Last date to fetch (YYYY-MM-DD), defaults to yesterday")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("base-currency")
                .short('b')
                .long("base-currency")
                .value_name("CODE")
                .help("Currency the exchange rates are quoted against")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("data-dir")
                .long("data-dir")
                .value_name("DIR")
                .help("Directory the staging table is written to")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("Print exchange rates and the joined table as JSON instead of text tables")
                .takes_value(false),
        )
        .arg(
            Arg::with_name("sql-script")
                .long("sql-script")
                .value_name("PATH")
                .help("Stage the joined table and finalize it with this SQL script")
                .takes_value(true),
        )
        .get_matches();

    let mut config = Config::load(matches.value_of("config").unwrap_or("config.json"))?;
    if let Some(currency) = matches.value_of("base-currency") {
        config = config.with_base_currency(currency);
    }
    if let Some(dir) = matches.value_of("data-dir") {
        config = config.with_data_dir(dir);
    }

    // 默认日期在调用时计算
    let range = DateRange::resolve(
        matches.value_of("start"),
        matches.value_of("end"),
        chrono::Local::now().date_naive(),
    )?;
    info!("Running for {} to {}", range.start, range.end);

    let client = Arc::new(ReqwestClient::new(config.request_timeout_secs)?);
    let data_dir = config.data_dir.clone();
    let service = EtlService::new(config, client);

    let report = service.run(&range, &range).await?;
    let as_json = matches.is_present("json");

    if let Some(raw) = report.raw_stocks.as_ref().filter(|r| !r.is_empty()) {
        println!("Polygon.io Data (Sample):");
        println!("{}", serde_json::to_string_pretty(&raw.to_json())?);
    }

    if let Some(currency) = &report.currency {
        println!("\nFrankfurter Exchange Rate Data:");
        if as_json {
            println!("{}", serde_json::to_string_pretty(&currency.rows)?);
        } else {
            let batch = arrow_utils::currency_table_to_record_batch(currency)?;
            println!("{}", pretty_format_batches(&[batch])?);
        }
    }

    if let Some(joined) = &report.joined {
        if as_json {
            println!("{}", serde_json::to_string_pretty(&joined.rows)?);
        } else {
            let batch = arrow_utils::joined_table_to_record_batch(joined)?;
            println!("{}", pretty_format_batches(&[batch])?);
        }

        if let Some(script) = matches.value_of("sql-script") {
            let mut sink = ArrowStagingSink::new(&data_dir);
            if let Err(e) = service.load(joined, &mut sink, Path::new(script)) {
                error!("Failed to load joined data: {}", e);
                return Err(e.into());
            }
        }
    }

    Ok(())
}
