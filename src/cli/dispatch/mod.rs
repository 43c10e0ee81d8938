use crate::cli::actions::Action;
use anyhow::Result;
use std::path::PathBuf;

pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    Ok(Action::Server {
        port: matches.get_one::<u16>("port").copied().unwrap_or(8080),
        cookie_dir: matches
            .get_one::<String>("cookie-dir")
            .map_or_else(|| PathBuf::from("cookies"), PathBuf::from),
        cookie_retention: matches
            .get_one::<u64>("cookie-retention")
            .copied()
            .unwrap_or(300),
        browser_timeout: matches
            .get_one::<u64>("browser-timeout")
            .copied()
            .unwrap_or(30),
        browser_workers: matches
            .get_one::<usize>("browser-workers")
            .copied()
            .unwrap_or(4),
        chrome_path: matches.get_one::<String>("chrome-path").map(PathBuf::from),
        diary_url: matches.get_one::<String>("diary-url").map_or_else(
            || "https://sh-open.ris61edu.ru".to_string(),
            String::to_string,
        ),
        esia_url: matches.get_one::<String>("esia-url").map_or_else(
            || "https://esia.gosuslugi.ru".to_string(),
            String::to_string,
        ),
        admins: matches
            .get_many::<String>("admin")
            .map(|values| values.map(String::to_string).collect())
            .unwrap_or_default(),
    })
}
