use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;

use bsds500::dataset::info::print_dataset_info;
use bsds500::dataset::sample::distinct_labels;
use bsds500::{Bsds500, Dataset, DatasetConfig, DatasetError, Label};

/// Load one BSDS500 sample and print what came back
#[derive(Parser, Debug)]
#[command(name = "bsds500-inspect", version, about)]
struct Args {
    /// Dataset root, or the directory the BSR archive was unpacked in
    #[arg(long)]
    root: PathBuf,

    /// train, test or val
    #[arg(long, default_value = "test")]
    split: String,

    /// segmentation or boundary
    #[arg(long = "label-type", default_value = "segmentation")]
    label_type: String,

    /// fine, coarse or all
    #[arg(long, default_value = "coarse")]
    mode: String,

    #[arg(long, default_value_t = 0)]
    index: usize,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
    }
}

fn run(args: &Args) -> Result<(), DatasetError> {
    let config = DatasetConfig::from_strs(&args.root, &args.split, &args.label_type, &args.mode)?;
    let ds = Bsds500::new(config)?;
    print_dataset_info(&ds);

    let sample = ds.get(args.index)?;
    let (height, width, channels) = sample.image.dim();

    println!();
    println!("Sample {}:", args.index);
    println!("  Image: {} ({}x{}x{})", sample.image_name, height, width, channels);
    println!("  Ground truth: {}", sample.ground_truth_path.display());
    match &sample.label {
        Label::Single(map) => {
            println!("  Label: {:?}, {} distinct values", map.dim(), distinct_labels(map))
        }
        Label::All(maps) => {
            println!("  Labels: {} annotations", maps.len());
            for (i, map) in maps.iter().enumerate() {
                println!("    {}: {:?}, {} distinct values", i, map.dim(), distinct_labels(map));
            }
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    setup_logging(args.verbose, args.quiet);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
