use std::env;
use std::path::Path;

fn main() {
    // 获取项目根目录
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());

    // 检查 config.json 是否存在
    let config_file = Path::new(&manifest_dir).join("config.json");
    if !config_file.exists() {
        println!("cargo:warning=config.json not found. stock_fx_etl will refuse to start without it.");
        println!("cargo:warning=Copy config.example.json to config.json and fill in your Polygon.io API key.");
    }
    println!("cargo:rerun-if-changed=config.json");
}
