use clap::Parser;
use std::process;

use pearl::cli::commands::{Cli, Commands};
use pearl::cli::{self, Context};
use pearl::config::{self, Config};
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so `--json` output on stdout stays parseable.
/// `RUST_LOG` wins; otherwise `serve` uses the configured filter and every
/// other command stays quiet below warnings.
fn init_logging(cli_args: &Cli) {
    let fallback = match cli_args.command {
        Commands::Serve { .. } => config::db_path(cli_args.db.as_deref())
            .and_then(|db| Config::load(&config::config_path(&db)))
            .map(|c| c.log_filter)
            .unwrap_or_else(|_| Config::default().log_filter),
        _ => "warn".to_string(),
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli_args = Cli::parse();
    init_logging(&cli_args);

    let ctx = Context {
        json: cli_args.json,
        db: cli_args.db,
    };

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(&ctx),
        Commands::Task(cmd) => cli::task::run(cmd, &ctx),
        Commands::Settings(cmd) => cli::settings::run(cmd, &ctx),
        Commands::Preview {
            start,
            rule,
            count,
            bounded,
        } => cli::preview::run(start, &rule, count, bounded, &ctx),
        Commands::Calendar { month, start_of_week } => {
            cli::calendar::run(month.as_deref(), start_of_week, &ctx)
        }
        Commands::Stats => cli::stats::run(&ctx),
        Commands::Serve { host, port } => cli::serve::run(host, port, &ctx),
    };

    process::exit(exit_code);
}
