use std::env;
use std::path::PathBuf;

use barcode_batch::archive;
use barcode_batch::dataset::Dataset;
use barcode_batch::encoder::PngEncoder;
use barcode_batch::pipeline::process_rows;
use barcode_batch::render::RenderConfig;
use barcode_batch::symbology::{Symbology, ALL_SYMBOLOGIES};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 5 {
        eprintln!(
            "Usage: {} <dataset.(csv|xlsx)> <product-column> <code-column> <symbology> [output-dir]",
            args[0]
        );
        eprintln!(
            "Symbologies: {}",
            ALL_SYMBOLOGIES
                .iter()
                .map(|s| s.label())
                .collect::<Vec<_>>()
                .join(", ")
        );
        std::process::exit(2);
    }

    let symbology: Symbology = args[4].parse()?;
    let output_dir = PathBuf::from(args.get(5).map(String::as_str).unwrap_or("."));

    let dataset = Dataset::from_path(&args[1])?;
    let records = dataset.records(&args[2], &args[3])?;

    let outcome = process_rows(&records, symbology, &RenderConfig::default(), &PngEncoder);

    for failure in &outcome.failures {
        eprintln!(
            "row {}: skipped '{}': {}",
            failure.row + 1,
            failure.product_name,
            failure.reason
        );
    }

    match archive::package(&outcome.artifacts)? {
        Some(archive) => {
            let path = output_dir.join(&archive.file_name);
            std::fs::write(&path, &archive.bytes)?;
            println!(
                "{} barcode(s) generated, {} row(s) skipped -> {}",
                outcome.artifacts.len(),
                outcome.failures.len(),
                path.display()
            );
        }
        None => {
            println!(
                "No barcodes were generated ({} row(s) skipped); no archive written.",
                outcome.failures.len()
            );
            std::process::exit(1);
        }
    }

    Ok(())
}
