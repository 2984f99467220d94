//! Rwsalvage CLI - Command-line tool for RenderWare game asset recovery.
//!
//! This is the main entry point for the rwsalvage command-line application.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use rwsalvage::prelude::*;

/// Rwsalvage - RenderWare game asset recovery tool
#[derive(Parser)]
#[command(name = "rwsalvage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Family {
    /// 3D models (.dff)
    Model,
    /// Animations (.ame)
    Animation,
    /// Audio (.wav / .sgt)
    Sound,
}

impl From<Family> for AssetFamily {
    fn from(family: Family) -> Self {
        match family {
            Family::Model => AssetFamily::Model,
            Family::Animation => AssetFamily::Animation,
            Family::Sound => AssetFamily::Sound,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Carve individual asset files out of an archive pair
    Carve {
        /// Metadata blob holding the original filenames
        #[arg(short, long)]
        metadata: PathBuf,

        /// Combined blob holding the raw file contents
        #[arg(short, long)]
        data: PathBuf,

        /// Output directory
        #[arg(short, long, env = "OUTPUT_FOLDER")]
        output: PathBuf,

        /// Asset family stored in this archive pair
        #[arg(short, long, value_enum)]
        family: Family,

        /// Sliding window size in bytes (forces the windowed scanner)
        #[arg(short, long)]
        window: Option<usize>,
    },

    /// List the filenames recoverable from a metadata blob
    Names {
        /// Metadata blob holding the original filenames
        #[arg(short, long)]
        metadata: PathBuf,

        /// Asset family whose filename pattern to match
        #[arg(short, long, value_enum)]
        family: Family,
    },

    /// Print the chunk tree of a RenderWare file
    Tree {
        /// Input file (.dff, .ame, ...)
        input: PathBuf,
    },

    /// Summarize model files in a directory as TSV
    Summary {
        /// Directory to scan recursively
        #[arg(short, long)]
        dir: PathBuf,

        /// File extension to match
        #[arg(short, long, default_value = "dff")]
        ext: String,

        /// Write the TSV here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Carve {
            metadata,
            data,
            output,
            family,
            window,
        } => {
            cmd_carve(&metadata, &data, &output, family.into(), window)?;
        }
        Commands::Names { metadata, family } => {
            cmd_names(&metadata, family.into())?;
        }
        Commands::Tree { input } => {
            cmd_tree(&input)?;
        }
        Commands::Summary { dir, ext, output } => {
            cmd_summary(&dir, &ext, output.as_deref())?;
        }
    }

    Ok(())
}

fn cmd_carve(
    metadata: &PathBuf,
    data: &PathBuf,
    output: &PathBuf,
    family: AssetFamily,
    window: Option<usize>,
) -> Result<()> {
    println!("Recovering filenames from: {}", metadata.display());

    let metadata_bytes = fs::read(metadata).context("Failed to read metadata blob")?;
    let recovered = recover_filenames(&metadata_bytes, family)?;
    if recovered.skipped > 0 {
        eprintln!("Skipped {} non-ASCII filename match(es)", recovered.skipped);
    }
    println!("Recovered {} filename(s)", recovered.names.len());

    let mut feed = NameFeed::for_family(recovered.names, family);
    let carver = Carver::new(family.marker());

    let data_size = fs::metadata(data)
        .context("Failed to stat combined blob")?
        .len();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!("Carving {}...", data.display()));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let start = Instant::now();
    let report = match window {
        Some(size) => carver.carve_windowed(data, &mut feed, output, size)?,
        None if data_size > DEFAULT_WINDOW_SIZE as u64 => {
            carver.carve_windowed(data, &mut feed, output, DEFAULT_WINDOW_SIZE)?
        }
        None => carver.carve_path(data, &mut feed, output)?,
    };
    pb.finish_and_clear();

    for note in &report.notes {
        eprintln!("{note}");
    }
    println!("{} in {:?}", report, start.elapsed());

    Ok(())
}

fn cmd_names(metadata: &PathBuf, family: AssetFamily) -> Result<()> {
    let metadata_bytes = fs::read(metadata).context("Failed to read metadata blob")?;
    let recovered = recover_filenames(&metadata_bytes, family)?;

    for name in &recovered.names {
        println!("{name}");
    }
    println!(
        "\nTotal: {} filename(s), {} skipped",
        recovered.names.len(),
        recovered.skipped
    );

    Ok(())
}

fn cmd_tree(input: &PathBuf) -> Result<()> {
    let tree = parse_file(input).context("Failed to parse chunk file")?;
    print!("{}", render_tree(&tree));

    Ok(())
}

fn cmd_summary(dir: &PathBuf, ext: &str, output: Option<&std::path::Path>) -> Result<()> {
    let files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .map(|e| e.eq_ignore_ascii_case(ext))
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    println!("Summarizing {} file(s)...", files.len());

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let mut rows = vec![SUMMARY_TSV_HEADER.to_string()];
    let mut errors = 0;

    let start = Instant::now();
    for path in &files {
        match parse_file(path) {
            Ok(tree) => {
                let summary = ClumpSummary::from_tree(&tree);
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                rows.push(summary.tsv_row(&name));
            }
            Err(e) => {
                eprintln!("Error parsing {}: {}", path.display(), e);
                errors += 1;
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let tsv = rows.join("\n") + "\n";
    match output {
        Some(path) => {
            fs::write(path, tsv).context("Failed to write summary file")?;
            println!("Wrote {}", path.display());
        }
        None => print!("{tsv}"),
    }

    println!(
        "Summarized {} file(s) in {:?} ({} errors)",
        files.len() - errors,
        start.elapsed(),
        errors
    );

    Ok(())
}
