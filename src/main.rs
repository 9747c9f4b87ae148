use clap::{CommandFactory, Parser, error::ErrorKind};
use mkpdfs::config::{Config, ConfigError};
use mkpdfs::output::StdoutReporter;
use mkpdfs::walk::Walker;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "mkpdfs")]
#[command(version)]
#[command(about = "Turn every directory of images into a single PDF")]
#[command(long_about = "\
Turn every directory of images into a single PDF

Walks ROOT depth-first. Every directory that directly contains images gets
one PDF with a page per image, in file-name order. A PDF is rebuilt only
when one of its images is newer than it.

Output location:

  mkpdfs ~/Pictures              ~/Pictures/2020/trip/trip.pdf
  mkpdfs ~/Pictures ~/PDFs       ~/PDFs/2020_trip.pdf

Images: jpg jpeg png gif bmp tif tiff webp heic heif (any case).

Failures in one directory are reported and the walk continues; the exit
status is still success.")]
struct Cli {
    /// Directory to search (default: current directory)
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Collect all PDFs here instead of writing them next to the images
    out_root: Option<PathBuf>,

    /// Show diagnostics on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match Config::resolve(&cli.root, cli.out_root.as_deref()) {
        Ok(config) => config,
        Err(err @ (ConfigError::RootInaccessible { .. } | ConfigError::RootNotDirectory(_))) => {
            Cli::command()
                .error(ErrorKind::ValueValidation, err.to_string())
                .exit();
        }
        Err(err) => return Err(err.into()),
    };

    let reporter = StdoutReporter;
    let summary = Walker::new(&config, &reporter).run();
    println!("{summary}");

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
