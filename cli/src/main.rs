use std::io::Write;

use autofeedback_cli::{
    parse_command::{run_parse, ParseArgs},
    render_command::{run_render, RenderArgs},
};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};

#[derive(Debug, Parser)]
#[command(
    version = std::env!("CARGO_PKG_VERSION"),
    name = "autofeedback",
    about = "AutoFeedback test report and feedback tools",
    bin_name = "autofeedback",
)]
struct Cli {
    #[command(subcommand)]
    pub command: Commands,
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the outcome of every test in a set of JUnit reports
    Parse(ParseArgs),
    /// Render a Markdown feedback template to HTML
    Render(RenderArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logger(cli.verbose.log_level_filter())?;
    match run(cli) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            log::error!("Error: {:?}", e);
            std::process::exit(exitcode::SOFTWARE);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Commands::Parse(parse_args) => run_parse(parse_args),
        Commands::Render(render_args) => run_render(render_args),
    }
}

fn setup_logger(level: log::LevelFilter) -> anyhow::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, level);
    if let Ok(log) = std::env::var("AUTOFEEDBACK_LOG") {
        builder.parse_filters(&log);
    }
    builder.try_init()?;
    Ok(())
}
