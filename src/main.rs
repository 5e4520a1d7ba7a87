use clap::{Args, Parser, Subcommand};
use png_filmstrip::codec::Quality;
use png_filmstrip::convert::{self, ConvertOptions};
use png_filmstrip::filmstrip::{self, FilmstripOptions};
use png_filmstrip::{logging, output};
use std::path::PathBuf;
use std::process::ExitCode;

/// Shared flags for commands that encode WebP output.
#[derive(Args, Clone, Copy)]
struct EncodeArgs {
    /// WebP quality, 0-100 (100 = lossless)
    #[arg(
        short,
        long,
        default_value_t = 90,
        value_parser = clap::value_parser!(u32).range(0..=100)
    )]
    quality: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl EncodeArgs {
    fn quality(&self) -> Quality {
        Quality::new(self.quality)
    }
}

#[derive(Parser)]
#[command(name = "png-filmstrip")]
#[command(version)]
#[command(about = "Convert PNG images to WebP and arrange them into n×n grid filmstrips")]
#[command(long_about = "\
Convert PNG images to WebP and arrange them into n×n grid filmstrips

Inputs are taken from a single directory in filename order (png, jpg, jpeg,
bmp, gif, and webp are accepted). The filmstrip is an n×n grid of uniform
cells sized to the largest image, with smaller images centered in their cell
and unused cells left transparent. Grid size is the smallest n whose n×n grid
fits every image, unless overridden with -g.

Unreadable files are skipped with a warning; a run only fails when nothing
could be processed, the grid override is too small, or the output cannot be
written.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert images to WebP, then arrange the results into a filmstrip
    Process {
        /// Input directory containing images
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the filmstrip WebP
        #[arg(short, long)]
        output: PathBuf,

        /// Override automatic grid sizing (n for an n×n grid)
        #[arg(short, long)]
        grid_size: Option<u32>,

        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Convert images to WebP without building a filmstrip
    Convert {
        /// Input directory containing images
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for WebP files (default: input directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Arrange images into an n×n grid filmstrip
    Filmstrip {
        /// Input directory containing images
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the filmstrip WebP
        #[arg(short, long)]
        output: PathBuf,

        /// Override automatic grid sizing (n for an n×n grid)
        #[arg(short, long)]
        grid_size: Option<u32>,

        /// Convert images to WebP in place before arranging
        #[arg(long)]
        convert_png: bool,

        #[command(flatten)]
        encode: EncodeArgs,
    },
}

impl Command {
    fn verbose(&self) -> bool {
        match self {
            Command::Process { encode, .. }
            | Command::Convert { encode, .. }
            | Command::Filmstrip { encode, .. } => encode.verbose,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.command.verbose());

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Process {
            input,
            output: strip_path,
            grid_size,
            encode,
        } => {
            let quality = encode.quality();
            println!("Converting images in {}", input.display());
            let outcome = convert::convert_dir(
                &input,
                &input,
                &ConvertOptions {
                    quality,
                    progress: true,
                },
            )?;
            output::print_batch_summary(&outcome);

            println!("Creating filmstrip from {} converted files", outcome.converted());
            let summary = filmstrip::build(
                &outcome.outputs,
                &strip_path,
                &FilmstripOptions {
                    quality,
                    grid_override: grid_size,
                    progress: true,
                },
            )?;
            output::print_filmstrip_summary(&summary);
        }
        Command::Convert {
            input,
            output: out_dir,
            encode,
        } => {
            let out_dir = out_dir.unwrap_or_else(|| input.clone());
            let outcome = convert::convert_dir(
                &input,
                &out_dir,
                &ConvertOptions {
                    quality: encode.quality(),
                    progress: true,
                },
            )?;
            output::print_batch_summary(&outcome);
        }
        Command::Filmstrip {
            input,
            output: strip_path,
            grid_size,
            convert_png,
            encode,
        } => {
            let quality = encode.quality();
            if convert_png {
                println!("Converting images in {}", input.display());
                let outcome = convert::convert_dir(
                    &input,
                    &input,
                    &ConvertOptions {
                        quality,
                        progress: true,
                    },
                )?;
                output::print_batch_summary(&outcome);
            }
            let summary = filmstrip::build_from_dir(
                &input,
                &strip_path,
                &FilmstripOptions {
                    quality,
                    grid_override: grid_size,
                    progress: true,
                },
            )?;
            output::print_filmstrip_summary(&summary);
        }
    }
    Ok(())
}
