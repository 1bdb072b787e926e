use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hydromet-qc")]
#[command(about = "Automated quality control for daily hydrometeorological series")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the quality checks and write the cleaned series and tally
    Check {
        #[arg(short, long, help = "Whitespace-delimited input file")]
        input: PathBuf,

        #[arg(
            short,
            long,
            help = "Output Parquet file path [default: output/hydromet-qc-{YYMMDD}.parquet]"
        )]
        output_file: Option<PathBuf>,

        #[arg(long, help = "Also write the cleaned series as CSV")]
        csv_output: Option<PathBuf>,

        #[arg(
            long,
            help = "Tally CSV path [default: output/hydromet-qc-tally-{YYMMDD}.csv]"
        )]
        tally_output: Option<PathBuf>,

        #[arg(long, help = "Threshold settings file (TOML, JSON or YAML)")]
        config: Option<PathBuf>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, default_value = "false", help = "Read input with memory mapping")]
        mmap: bool,

        #[arg(short, long, default_value = "false", help = "Only print the final tally")]
        quiet: bool,
    },

    /// Run the checks in memory and audit the result without writing output
    Validate {
        #[arg(short, long, help = "Whitespace-delimited input file")]
        input: PathBuf,

        #[arg(long, help = "Threshold settings file (TOML, JSON or YAML)")]
        config: Option<PathBuf>,
    },

    /// Display information about a cleaned Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}
