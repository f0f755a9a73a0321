use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const CRATES: [&str; 2] = ["tidbit_bot", "echo_bot"];

/// 本專案模組用 `level`，其他依賴一律 `others`
fn default_directives(level: &str, others: &str) -> String {
    let mut directives: Vec<String> = CRATES
        .iter()
        .map(|name| format!("{}={}", name, level))
        .collect();
    directives.push(others.to_string());
    directives.join(",")
}

// RUST_LOG 優先
fn filter(level: &str, others: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level, others)))
}

pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        filter("debug", "info")
    } else {
        filter("info", "warn")
    };

    let layer = fmt::layer().with_target(false).compact();
    if tracing_subscriber::registry().with(filter).with(layer).try_init().is_err() {
        tracing::debug!("Logger already initialised");
    }
}

/// 排程觸發時以 JSON 輸出，時間戳由 CloudWatch 附加
pub fn init_lambda_logger() {
    let layer = fmt::layer()
        .with_target(false)
        .without_time()
        .json();
    if tracing_subscriber::registry()
        .with(filter("info", "warn"))
        .with(layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("Logger already initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_cover_both_binaries() {
        assert_eq!(
            default_directives("info", "warn"),
            "tidbit_bot=info,echo_bot=info,warn"
        );
        assert_eq!(
            default_directives("debug", "info"),
            "tidbit_bot=debug,echo_bot=debug,info"
        );
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_cli_logger(false);
        init_cli_logger(true);
        init_lambda_logger();
    }
}
