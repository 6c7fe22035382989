use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use std::path::PathBuf;
use stock_fx_etl::sink::{ArrowStagingSink, STAGING_TABLE};
use stock_fx_etl::util::arrow_utils;

fn main() -> Result<()> {
    // 数据目录可通过第一个参数指定
    let data_dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("data"));
    let sink = ArrowStagingSink::new(&data_dir);
    let path = sink.table_path();
    if !path.exists() {
        bail!("{} 不存在，请先运行 'cargo run --bin stock_fx_etl -- --sql-script load_sql.sql'", path.display());
    }

    let table = arrow_utils::read_joined_from_arrow(&path)
        .with_context(|| format!("读取 {} 失败", path.display()))?;

    println!("暂存表: {}", STAGING_TABLE);
    println!("行数: {}", table.len());
    match table.date_span() {
        Some((first, last)) => println!("日期范围: {} ~ {}", first, last),
        None => println!("未找到有效的日期"),
    }

    let tickers: BTreeSet<_> = table.rows.iter().filter_map(|r| r.stock_ticker.as_deref()).collect();
    let currencies: BTreeSet<_> = table.rows.iter().map(|r| r.currency.as_str()).collect();
    let unmatched = table.rows.iter().filter(|r| r.stock_ticker.is_none()).count();
    println!("股票: {}", tickers.into_iter().collect::<Vec<_>>().join(", "));
    println!("币种数量: {}", currencies.len());
    println!("无股票匹配的汇率行: {}", unmatched);

    if sink.script_path().exists() {
        println!("收尾脚本: {}", sink.script_path().display());
    }

    Ok(())
}
