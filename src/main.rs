//! benchsuite CLI entry point

fn main() {
    // Structured logging goes to stderr so benchmark stdout stays verbatim on ours
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    benchsuite::cli::run();
}
