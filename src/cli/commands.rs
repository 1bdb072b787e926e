use std::path::{Path, PathBuf};
use tracing::info;

use crate::analyzers::SeriesAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::config::QcConfig;
use crate::error::Result;
use crate::models::{CheckKind, SeriesTable, TallyTable};
use crate::processors::{IntegrityChecker, QualityChecker};
use crate::readers::ObservationReader;
use crate::utils::filename::{generate_default_parquet_filename, generate_default_tally_filename};
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvWriter, ParquetWriter};

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Check {
            input,
            output_file,
            csv_output,
            tally_output,
            config,
            compression,
            mmap,
            quiet,
        } => {
            let qc_config = load_config(config.as_deref())?;
            let checker = QualityChecker::new(qc_config)?;
            let parquet_writer = ParquetWriter::new().with_compression(&compression)?;
            let output_file = output_file.unwrap_or_else(generate_default_parquet_filename);
            let tally_output = tally_output.unwrap_or_else(generate_default_tally_filename);

            if !quiet {
                println!("Running quality checks...");
                println!("Input file: {}", input.display());
                println!("Output file: {}", output_file.display());
            }

            let spinner = ProgressReporter::new_spinner("Reading observations...", quiet);
            let series = read_series(input, mmap).await?;
            spinner.finish_with_message(&format!("Read {} daily records", series.len()));
            let analyzer = SeriesAnalyzer::new();

            if !quiet {
                println!("\nRaw data.....\n{}", analyzer.describe(&series).detailed_summary());
            }

            let progress = ProgressReporter::new(CheckKind::COUNT as u64, "Quality checks", quiet);
            let (series, tally) =
                checker.run_with_observer(series, TallyTable::new(), |kind, series, _| {
                    progress.println(&format!(
                        "\n{}.....\n{}",
                        kind.completion_message(),
                        analyzer.describe(series).detailed_summary()
                    ));
                    progress.increment(1);
                })?;
            progress.finish_with_message("All processing finished");

            println!("\nFinal changed values counts.....\n{}", tally);

            write_outputs(
                series,
                tally,
                parquet_writer,
                output_file.clone(),
                csv_output,
                tally_output.clone(),
            )
            .await?;

            if !quiet {
                let file_info = ParquetWriter::new()
                    .with_compression(&compression)?
                    .get_file_info(&output_file)?;
                println!("\n{}", file_info.summary());
                println!("Tally written to {}", tally_output.display());
                println!("Processing complete!");
            }
        }

        Commands::Validate { input, config } => {
            println!("Validating {}...", input.display());

            let qc_config = load_config(config.as_deref())?;
            let checker = QualityChecker::new(qc_config.clone())?;
            let series = read_series(input, false).await?;

            let integrity = IntegrityChecker::with_config(qc_config);
            let raw_report = integrity.check_integrity(&series);
            println!("\nBefore checks:\n{}", integrity.generate_summary(&raw_report));

            let (series, tally) = checker.run(series, TallyTable::new())?;
            let report = integrity.check_integrity(&series);
            println!("After checks:\n{}", integrity.generate_summary(&report));
            println!("Changed values counts:\n{}", tally);

            if report.is_clean() {
                println!("✅ Checked series satisfies all quality invariants");
            } else {
                println!(
                    "⚠️  Found {} remaining violations",
                    report.violations.len()
                );
            }
        }

        Commands::Info { file, sample } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;
            let description = SeriesAnalyzer::new().analyze_parquet(&file)?;

            println!("\n{}", description.detailed_summary());
            println!("\nFile Details:");
            println!("{}", file_info.summary());

            if sample > 0 {
                let series = writer.read_series(&file)?;
                println!("\nSample Records (showing {} records):", sample.min(series.len()));
                for (i, record) in series.records().take(sample).enumerate() {
                    println!(
                        "{}. {}: precip={}, max={}, min={}, wind={}",
                        i + 1,
                        record.date,
                        fmt_value(record.precipitation),
                        fmt_value(record.max_temp),
                        fmt_value(record.min_temp),
                        fmt_value(record.wind_speed),
                    );
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<QcConfig> {
    let qc_config = match path {
        Some(path) => QcConfig::from_file(path)?,
        None => QcConfig::from_env()?,
    };
    info!("Using QC thresholds: {:?}", qc_config);
    Ok(qc_config)
}

async fn read_series(input: PathBuf, mmap: bool) -> Result<SeriesTable> {
    tokio::task::spawn_blocking(move || ObservationReader::with_mmap(mmap).read_series(&input))
        .await?
}

async fn write_outputs(
    series: SeriesTable,
    tally: TallyTable,
    parquet_writer: ParquetWriter,
    output_file: PathBuf,
    csv_output: Option<PathBuf>,
    tally_output: PathBuf,
) -> Result<()> {
    tokio::task::spawn_blocking(move || -> Result<()> {
        for path in [Some(&output_file), csv_output.as_ref(), Some(&tally_output)]
            .into_iter()
            .flatten()
        {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        parquet_writer.write_series(&series, &output_file)?;

        let csv_writer = CsvWriter::new();
        if let Some(csv_path) = &csv_output {
            csv_writer.write_series(&series, csv_path)?;
        }
        csv_writer.write_tally(&tally, &tally_output)
    })
    .await?
}

fn fmt_value(value: Option<f64>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| format!("{:.1}", v))
}
