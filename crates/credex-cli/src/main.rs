mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "credex",
    version,
    about = "Extract credit-facility tables from credit-bureau report PDFs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect whether a report uses the table or the text layout
    Detect {
        /// Report PDF, or pre-extracted tables JSON
        input_file: PathBuf,
    },
    /// Extract intermediate field records from text-layout report PDFs
    Extract {
        /// PDF files to process; failures are reported per file
        #[arg(required = true)]
        input_files: Vec<PathBuf>,

        /// Output format: table (default), json or csv
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Directory to write one records CSV per input file
        #[arg(short = 'O', long = "out", value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Build the final facility table from an intermediate records file
    Build {
        /// Records file (.csv, .xlsx, .ods or .json)
        input_file: PathBuf,

        /// Output format: table (default), json or csv
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the facility table to a file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Segment pre-extracted tables (JSON) into keyword capture rows
    Tables {
        /// Tables JSON produced by the external PDF table reader
        input_file: PathBuf,

        /// Write the capture rows CSV to a file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Map capture rows (CSV) onto the facility columns
    Map {
        /// Capture rows CSV produced by `credex tables`
        input_file: PathBuf,

        /// Output format: table (default), json or csv
        #[arg(short, long, default_value = "table")]
        output: String,

        /// Write the mapped table to a file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Detect { input_file } => commands::detect::run(input_file),
        Commands::Extract {
            input_files,
            output,
            out,
        } => commands::extract::run(input_files, &output, out),
        Commands::Build {
            input_file,
            output,
            out,
        } => commands::build::run(input_file, &output, out),
        Commands::Tables { input_file, out } => commands::tables::run(input_file, out),
        Commands::Map {
            input_file,
            output,
            out,
        } => commands::map::run(input_file, &output, out),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
