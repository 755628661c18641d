use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logs go to stderr so nothing mixes with piped data.
pub fn init_cli_logger(verbose: bool, debug: bool) {
    let default_filter = if debug {
        "moto2sprit=trace,info"
    } else if verbose {
        "moto2sprit=debug,info"
    } else {
        "moto2sprit=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
