use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://www.mit4mit.co.il";
pub const DEFAULT_CATEGORY_PATH: &str = "/top/54719c753be563f2f3059220?onlyPhone&&page=";

#[derive(Debug, Clone, Parser)]
#[command(name = "vendor-scraper")]
#[command(about = "Collect vendor listings from the directory site into a JSON file")]
pub struct Cli {
    /// Site root; detail links are resolved against it
    #[arg(long, env = "SCRAPER_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Listing path, the page number is appended to it
    #[arg(long, default_value = DEFAULT_CATEGORY_PATH)]
    pub category_path: String,

    /// Last listing page to visit
    #[arg(long, default_value_t = 15)]
    pub max_pages: u32,

    #[arg(short, long, default_value = "providers.json")]
    pub output: PathBuf,
}

impl Cli {
    pub fn listing_url(&self, page: u32) -> String {
        format!("{}{}{}", self.base_url, self.category_path, page)
    }
}
