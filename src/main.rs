use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use getitems::index::{build_index, stats};
use getitems::server;
use getitems::utils::{init_logging, AppConfig, ConfigOverrides, LogFormat};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "getitems")]
#[command(about = "Load a CSV file once and serve its rows by id over HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Serve options (when no subcommand is given)
    #[command(flatten)]
    serve: ServeArgs,

    /// Log level or filter directives (RUST_LOG takes precedence)
    #[arg(long, env = "LOG_LEVEL", global = true)]
    log_level: Option<String>,

    /// Log format: compact or json
    #[arg(long, env = "LOG_FORMAT", global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Args, Clone)]
struct SourceArgs {
    /// YAML config file (defaults to ./config/config.yml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV file to index
    #[arg(short, long, env = "FILE")]
    file: Option<PathBuf>,
}

#[derive(Args, Clone)]
struct ServeArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Address to listen on
    #[arg(long, env = "HTTP_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "HTTP_PORT")]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the file and serve lookups over HTTP (default)
    Serve(ServeArgs),
    /// Index the file and show statistics
    Inspect(SourceArgs),
    /// Index the file and print the response for the given ids
    Get {
        #[command(flatten)]
        source: SourceArgs,

        /// Ids to look up, in order
        ids: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve(cli.serve));

    let (source, host, port) = match &command {
        Commands::Serve(args) => (&args.source, args.host.clone(), args.port),
        Commands::Inspect(source) | Commands::Get { source, .. } => (source, None, None),
    };

    let mut config = AppConfig::load(source.config.as_deref())?;
    config.apply(ConfigOverrides {
        file: source.file.clone(),
        host,
        port,
        log_level: cli.log_level,
        log_format: cli.log_format,
    });

    init_logging(&config.log)?;

    match command {
        Commands::Serve(_) => run_serve(&config),
        Commands::Inspect(_) => stats::show_stats(config.source_file()?),
        Commands::Get { ids, .. } => run_get(&config, &ids),
    }
}

fn run_serve(config: &AppConfig) -> Result<()> {
    let file = config.source_file()?;
    let addr = config.listen_addr()?;

    // The index must be complete before the listener binds
    let index = build_index(file).with_context(|| format!("Failed to index {}", file.display()))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    runtime.block_on(server::serve(index, &addr))
}

fn run_get(config: &AppConfig, ids: &[String]) -> Result<()> {
    let file = config.source_file()?;
    let index = build_index(file).with_context(|| format!("Failed to index {}", file.display()))?;

    let response = server::lookup(&index, ids);
    if !response.is_ok() {
        eprintln!("{}", String::from_utf8_lossy(&response.body));
        std::process::exit(1);
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&response.body)?;
    writeln!(stdout)?;
    Ok(())
}
