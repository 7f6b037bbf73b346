use clap::Parser;
use repolens::cli::{run_cli, Args};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging. The TUI owns the terminal, so its logs go to
    // ~/.repolens/repolens.log; subcommands log to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if args.command.is_none() {
        match repolens::config::open_log_file() {
            Ok(file) => fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(std::sync::Mutex::new(file))
                .init(),
            Err(_) => fmt().with_env_filter(filter).with_target(false).init(),
        }
    } else {
        fmt().with_env_filter(filter).with_target(false).init();
    }

    if let Err(e) = run_cli(args).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
