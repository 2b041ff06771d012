mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "eval-viewer")]
#[command(about = "Browse evaluation result workbooks as highlighted diff tables")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Render one page of a result workbook as HTML")]
    Render {
        #[arg(help = "Path to the .xlsx result workbook")]
        file: PathBuf,
        #[arg(long, default_value_t = 1, help = "Page number, starting at 1")]
        page: usize,
        #[arg(long, value_name = "ROWS", help = "Rows per page (defaults to the configured page size)")]
        page_size: Option<usize>,
        #[arg(long, value_name = "PATH", help = "JSON viewer configuration")]
        config: Option<PathBuf>,
        #[arg(long, short, value_name = "PATH", help = "Write markup to this file instead of stdout")]
        output: Option<PathBuf>,
        #[arg(long, help = "Wrap the fragment in a standalone HTML document")]
        document: bool,
    },
    #[command(about = "Serve a result workbook for interactive paging")]
    Serve {
        #[arg(help = "Path to the .xlsx result workbook")]
        file: PathBuf,
        #[arg(long, default_value = "127.0.0.1:7860", help = "Address to listen on")]
        addr: String,
        #[arg(long, value_name = "PATH", help = "JSON viewer configuration")]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            file,
            page,
            page_size,
            config,
            output,
            document,
        } => commands::render::run(
            &file,
            page,
            page_size,
            config.as_deref(),
            output.as_deref(),
            document,
        ),
        Commands::Serve { file, addr, config } => {
            commands::serve::run(file, &addr, config.as_deref())
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}
