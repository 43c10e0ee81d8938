pub mod server;

use std::path::PathBuf;

#[derive(Debug)]
pub enum Action {
    Server {
        port: u16,
        cookie_dir: PathBuf,
        cookie_retention: u64,
        browser_timeout: u64,
        browser_workers: usize,
        chrome_path: Option<PathBuf>,
        diary_url: String,
        esia_url: String,
        admins: Vec<String>,
    },
}
