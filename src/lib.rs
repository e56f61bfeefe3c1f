/*!
# Batch Barcode Generator

Turn a spreadsheet of product names and codes into a ZIP archive of barcode
images.

## Overview

A caller supplies a tabular dataset, the names of the product and code
columns, a barcode symbology and a set of rendering parameters. Each row is
run through a barcode encoder; rows the encoder rejects (bad length, invalid
characters for the symbology) are skipped and recorded, never fatal. The
successful images are packed into a single deflate-compressed ZIP whose file
name embeds the creation time.

## Pipeline

```text
Dataset ──records()──> Vec<RowRecord>
                          │
                  process_rows(symbology, config, encoder)
                          │
            BatchOutcome { artifacts, failures }
                          │
                  archive::package(artifacts)
                          │
            Option<Archive>  (None when nothing was generated)
```

The pipeline is a pure function of its inputs: artifacts stay in memory,
there is no shared temporary directory and no process-wide state, so
independent runs cannot interfere with each other.

## Modules

- **symbology**: supported barcode symbologies and label resolution
- **render**: rendering parameters (module width/height, quiet zone, dpi)
- **encoder**: the `BarcodeEncoder` seam and the default PNG encoder
- **dataset**: delimited-text and workbook loading, column access
- **pipeline**: the row processor (sanitizing, encoding, failure capture)
- **archive**: ZIP packaging with a timestamped archive name

## Example

```no_run
use barcode_batch::archive;
use barcode_batch::dataset::Dataset;
use barcode_batch::encoder::PngEncoder;
use barcode_batch::pipeline::process_rows;
use barcode_batch::render::RenderConfig;
use barcode_batch::symbology::Symbology;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dataset = Dataset::from_path("productos.csv")?;
    let records = dataset.records("Nombre producto", "Codigo")?;

    let outcome = process_rows(
        &records,
        Symbology::Code128,
        &RenderConfig::default(),
        &PngEncoder,
    );

    if let Some(archive) = archive::package(&outcome.artifacts)? {
        std::fs::write(&archive.file_name, &archive.bytes)?;
    }
    Ok(())
}
```
*/

pub mod archive;
pub mod dataset;
pub mod encoder;
pub mod pipeline;
pub mod render;
pub mod symbology;

/// Re-export the core types to make the common path easier to use
pub use archive::{Archive, ArchiveError};
pub use dataset::{Dataset, DatasetError};
pub use encoder::{BarcodeEncoder, EncodeError, PngEncoder};
pub use pipeline::{BatchOutcome, GeneratedArtifact, RowFailure, RowRecord};
pub use render::RenderConfig;
pub use symbology::Symbology;
