use crate::{api, cli::config::Config};
use anyhow::Result;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub config: Config,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable or the listener cannot bind.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args.config);

    api::new(&args.config).await
}

fn log_startup_args(config: &Config) {
    let token_ttl = config
        .token_ttl()
        .map_or_else(|| "never".to_string(), |ttl| format!("{}s", ttl.as_secs()));
    let entries = [
        ("listen", format!("tcp:{}", config.port())),
        ("database_url", crate::cli::config::redact_dsn(config.database_url())),
        ("token_ttl", token_ttl),
        ("commit", short_commit(crate::GIT_COMMIT_HASH)),
    ];
    info!("{}", format_entries("Startup configuration", &entries));
}

fn format_entries(title: &str, entries: &[(&str, String)]) -> String {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {}\n\n{title}:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    message
}

fn short_commit(hash: &str) -> String {
    hash.trim().chars().take(7).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_entries_aligns_keys() {
        let entries = [("a", "1".to_string()), ("long_key", "2".to_string())];
        let message = format_entries("Title", &entries);
        assert!(message.contains("Title:"));
        assert!(message.contains("\n  a:        1"));
        assert!(message.contains("\n  long_key: 2"));
    }

    #[test]
    fn test_short_commit() {
        assert_eq!(short_commit("0123456789abcdef"), "0123456");
        assert_eq!(short_commit("abc"), "abc");
        assert_eq!(short_commit(" unknown "), "unknown");
    }
}
