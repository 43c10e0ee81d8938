use clap::{
    builder::{
        styling::{AnsiColor, Effects, Styles},
        ValueParser,
    },
    Arg, ColorChoice, Command,
};

pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    Command::new("dnevnik-gate")
        .about("ESIA login automation and session gateway for the school diary portal")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("DNEVNIK_GATE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("cookie-dir")
                .long("cookie-dir")
                .help("Directory holding persisted cookie jar entries")
                .default_value("cookies")
                .env("DNEVNIK_GATE_COOKIE_DIR"),
        )
        .arg(
            Arg::new("cookie-retention")
                .long("cookie-retention")
                .help("Seconds a persisted cookie jar entry survives before deletion")
                .default_value("300")
                .env("DNEVNIK_GATE_COOKIE_RETENTION")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("browser-timeout")
                .long("browser-timeout")
                .help("Seconds to wait for any page or element state in the browser")
                .default_value("30")
                .env("DNEVNIK_GATE_BROWSER_TIMEOUT")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new("browser-workers")
                .long("browser-workers")
                .help("Upper bound on concurrent blocking browser-driver calls")
                .default_value("4")
                .env("DNEVNIK_GATE_BROWSER_WORKERS")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("chrome-path")
                .long("chrome-path")
                .help("Path to the Chrome/Chromium binary, autodetected when omitted")
                .env("DNEVNIK_GATE_CHROME_PATH"),
        )
        .arg(
            Arg::new("diary-url")
                .long("diary-url")
                .help("Base URL of the diary portal")
                .default_value("https://sh-open.ris61edu.ru")
                .env("DNEVNIK_GATE_DIARY_URL"),
        )
        .arg(
            Arg::new("esia-url")
                .long("esia-url")
                .help("Base URL of the ESIA identity provider")
                .default_value("https://esia.gosuslugi.ru")
                .env("DNEVNIK_GATE_ESIA_URL"),
        )
        .arg(
            Arg::new("admin")
                .long("admin")
                .help("Identity granted admin standing, repeatable or comma-separated")
                .env("DNEVNIK_GATE_ADMINS")
                .action(clap::ArgAction::Append)
                .value_delimiter(','),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("DNEVNIK_GATE_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
}
