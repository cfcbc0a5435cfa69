use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Map a config level name to a tracing level; unknown names fall back to INFO.
pub(crate) fn parse_level(name: &str) -> Level {
    name.trim().parse().unwrap_or(Level::INFO)
}

/// Install the global subscriber. Log lines go to stderr so stdout only
/// carries command output.
pub(crate) fn init_logging(level: &str, verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else {
        parse_level(level)
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_level_accepts_tracing_names() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN "), Level::WARN);
        assert_eq!(parse_level("Trace"), Level::TRACE);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn parse_level_defaults_to_info() {
        assert_eq!(parse_level("info"), Level::INFO);
        assert_eq!(parse_level("warning"), Level::INFO);
        assert_eq!(parse_level("loud"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }
}
