use clap::Parser;
use dcmseries_core::cli::report::{GroupsReport, SlicesReport};
use dcmseries_core::cli::{Cli, Command, OutputFormat};
use dcmseries_core::{configuration_string, ScanConfig, SeriesReader, SortConfig, SortedSlices};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;

fn main() {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose);

    let result = match cli.command {
        Command::Groups {
            directory,
            restrictions,
        } => run_groups(&directory, &restrictions, cli.format),
        Command::Find {
            directory,
            prefix,
            restrictions,
            sort,
        } => run_find(&directory, &prefix, &restrictions, sort, cli.format),
        Command::Sort { files, epsilon } => run_sort(&files, epsilon, cli.format),
        Command::Config => {
            println!("{}", configuration_string());
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn setup_logging(verbose: bool) {
    if verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }
}

fn reader_for(restrictions: &[String]) -> dcmseries_core::Result<SeriesReader> {
    let config = ScanConfig::from_restriction_strs(restrictions)?;
    Ok(SeriesReader::new().with_scan_config(config))
}

fn verify_directory(directory: &Path) -> dcmseries_core::Result<()> {
    if !directory.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", directory.display()),
        )
        .into());
    }
    Ok(())
}

fn run_groups(
    directory: &Path,
    restrictions: &[String],
    format: OutputFormat,
) -> dcmseries_core::Result<()> {
    verify_directory(directory)?;
    info!("Processing directory: {}", directory.display());

    let reader = reader_for(restrictions)?;
    let groups = reader.try_get_series(directory)?;
    info!(
        "Found {} groups with {} files",
        groups.len(),
        groups.total_files()
    );

    match format {
        OutputFormat::Text => println!("{}", GroupsReport::new(&groups)),
        OutputFormat::Paths => {
            for (_, files) in groups.iter() {
                print_paths(files);
            }
        }
        OutputFormat::Json => print_json(&groups),
    }
    Ok(())
}

fn run_find(
    directory: &Path,
    prefix: &str,
    restrictions: &[String],
    sort: bool,
    format: OutputFormat,
) -> dcmseries_core::Result<()> {
    verify_directory(directory)?;
    let reader = reader_for(restrictions)?;

    if !sort {
        let files = reader.get_series_by_prefix(directory, prefix);
        info!("{} files match '{}'", files.len(), prefix);
        match format {
            OutputFormat::Json => print_json(&files),
            _ => print_paths(&files),
        }
        return Ok(());
    }

    // each group is a coherent volume and is sorted on its own
    let groups = reader.try_get_series(directory)?;
    let mut sorted_groups = Vec::new();
    for (key, files) in groups.iter().filter(|(key, _)| key.starts_with(prefix)) {
        info!("Sorting {} ({} files)", key, files.len());
        sorted_groups.push((key.to_string(), reader.sort_with_layout(files)?));
    }

    match format {
        OutputFormat::Text => {
            for (key, sorted) in &sorted_groups {
                println!("{}", key);
                println!("{}", SlicesReport::new(sorted));
            }
        }
        OutputFormat::Paths => {
            for (_, sorted) in &sorted_groups {
                print_paths(&sorted.files);
            }
        }
        OutputFormat::Json => print_json(&sorted_groups),
    }
    Ok(())
}

fn run_sort(
    files: &[PathBuf],
    epsilon: Option<f64>,
    format: OutputFormat,
) -> dcmseries_core::Result<()> {
    let config = match epsilon {
        Some(epsilon) => SortConfig::from_epsilon(epsilon)?,
        None => SortConfig::default(),
    };

    let reader = SeriesReader::new().with_sort_config(config);
    let sorted: SortedSlices = reader.sort_with_layout(files)?;

    match format {
        OutputFormat::Text => println!("{}", SlicesReport::new(&sorted)),
        OutputFormat::Paths => print_paths(&sorted.files),
        OutputFormat::Json => print_json(&sorted),
    }
    Ok(())
}

fn print_paths(files: &[PathBuf]) {
    for file in files {
        println!("{}", file.display());
    }
}

#[cfg(feature = "json")]
fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Failed to serialize to JSON: {}", e);
            eprintln!("Error: Failed to serialize to JSON: {}", e);
            process::exit(1);
        }
    }
}

#[cfg(not(feature = "json"))]
fn print_json<T: ?Sized>(_value: &T) {
    eprintln!("Error: JSON output requires the 'json' feature");
    eprintln!("Rebuild with: cargo build --features json");
    process::exit(1);
}
