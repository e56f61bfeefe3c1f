use std::io::{Cursor, Write};

use chrono::{DateTime, Local};
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::pipeline::GeneratedArtifact;

/// Packaging failures. Writing in-memory payloads into an in-memory ZIP is
/// not expected to fail in normal operation; when it does, the error is
/// surfaced as-is and the run is aborted.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("failed to write archive: {0}")]
    Io(#[from] std::io::Error),
}

/// A finished downloadable archive: a generated file name plus the ZIP
/// payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Archive {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Archive Packager: write every artifact into one deflate-compressed ZIP,
/// entry names taken verbatim from the artifacts. Returns `None` when
/// there is nothing to package, so callers can report "no artifacts"
/// instead of shipping an empty archive.
pub fn package(artifacts: &[GeneratedArtifact]) -> Result<Option<Archive>, ArchiveError> {
    if artifacts.is_empty() {
        return Ok(None);
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::<()>::default().compression_method(CompressionMethod::Deflated);

    for artifact in artifacts {
        writer.start_file(artifact.file_name.as_str(), options)?;
        writer.write_all(&artifact.bytes)?;
    }

    let bytes = writer.finish()?.into_inner();
    Ok(Some(Archive {
        file_name: archive_name(&Local::now()),
        bytes,
    }))
}

/// Archive file name embedding the creation time to the second, e.g.
/// `codigos_barras_25-12-2024_Hora_14-30-00.zip`.
pub fn archive_name(created: &DateTime<Local>) -> String {
    format!(
        "codigos_barras_{}.zip",
        created.format("%d-%m-%Y_Hora_%H-%M-%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Read;

    fn artifact(name: &str, bytes: &[u8]) -> GeneratedArtifact {
        GeneratedArtifact {
            file_name: name.to_string(),
            bytes: bytes.to_vec(),
        }
    }

    #[test]
    fn empty_input_produces_no_archive() {
        assert!(package(&[]).unwrap().is_none());
    }

    #[test]
    fn entries_round_trip_unchanged() {
        let artifacts = [artifact("A.png", b"alpha-bytes"), artifact("B.png", b"beta")];
        let archive = package(&artifacts).unwrap().unwrap();

        let mut zip = zip::ZipArchive::new(Cursor::new(archive.bytes)).unwrap();
        assert_eq!(zip.len(), 2);

        let mut names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        names.sort();
        assert_eq!(names, ["A.png", "B.png"]);

        let mut payload = Vec::new();
        zip.by_name("A.png").unwrap().read_to_end(&mut payload).unwrap();
        assert_eq!(payload, b"alpha-bytes");

        payload.clear();
        zip.by_name("B.png").unwrap().read_to_end(&mut payload).unwrap();
        assert_eq!(payload, b"beta");
    }

    #[test]
    fn archive_name_embeds_the_creation_time() {
        let created = Local.with_ymd_and_hms(2024, 12, 25, 14, 30, 5).unwrap();
        assert_eq!(
            archive_name(&created),
            "codigos_barras_25-12-2024_Hora_14-30-05.zip"
        );
    }

    #[test]
    fn different_creation_times_give_different_names() {
        let first = Local.with_ymd_and_hms(2024, 12, 25, 14, 30, 5).unwrap();
        let second = first + chrono::Duration::seconds(1);
        assert_ne!(archive_name(&first), archive_name(&second));
    }

    #[test]
    fn generated_name_matches_the_expected_pattern() {
        let archive = package(&[artifact("X.png", b"x")]).unwrap().unwrap();
        let pattern = regex::Regex::new(
            r"^codigos_barras_\d{2}-\d{2}-\d{4}_Hora_\d{2}-\d{2}-\d{2}\.zip$",
        )
        .unwrap();
        assert!(pattern.is_match(&archive.file_name), "{}", archive.file_name);
    }
}
