use std::io::Cursor;

use barcoders::sym::codabar::Codabar;
use barcoders::sym::code128::Code128;
use barcoders::sym::code39::Code39;
use barcoders::sym::code93::Code93;
use barcoders::sym::ean13::EAN13;
use barcoders::sym::ean8::EAN8;
use image::{DynamicImage, GrayImage, ImageBuffer, ImageOutputFormat, Luma};
use thiserror::Error;

use crate::render::RenderConfig;
use crate::symbology::Symbology;

/// Errors produced while turning one code value into image bytes.
///
/// These are always recoverable at the batch level: the row is skipped and
/// the error text is recorded in the row's failure entry.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("symbology {0} is not supported by this encoder")]
    Unsupported(Symbology),

    #[error("invalid code for {symbology}: {message}")]
    InvalidCode {
        symbology: Symbology,
        message: String,
    },

    #[error("cannot derive a {symbology} payload: {reason}")]
    Normalize {
        symbology: Symbology,
        reason: String,
    },

    #[error("failed to write PNG: {0}")]
    Image(#[from] image::ImageError),
}

/// External barcode encoder service.
///
/// Given a symbology, a code string and the run's rendering parameters,
/// an implementation either returns finished image bytes or fails with an
/// encoding error. Implementations are treated as opaque, deterministic
/// and synchronous by the row processor.
pub trait BarcodeEncoder {
    fn encode(
        &self,
        symbology: Symbology,
        code: &str,
        config: &RenderConfig,
    ) -> Result<Vec<u8>, EncodeError>;
}

/// Default encoder: bar patterns from the `barcoders` crate, rasterized to
/// a grayscale PNG.
///
/// Character set, length and checksum validation is delegated to
/// `barcoders`; this adapter only derives the payload each symbology
/// expects (see the `*_payload` helpers). The human readable line is not
/// drawn, so `font_size` and `text_distance` are carried but unused here.
pub struct PngEncoder;

impl BarcodeEncoder for PngEncoder {
    fn encode(
        &self,
        symbology: Symbology,
        code: &str,
        config: &RenderConfig,
    ) -> Result<Vec<u8>, EncodeError> {
        let pattern = encode_pattern(symbology, code)?;
        rasterize(&pattern, config)
    }
}

// One module per element: 1 is a bar, 0 is a space.
fn encode_pattern(symbology: Symbology, code: &str) -> Result<Vec<u8>, EncodeError> {
    let invalid = |e: barcoders::error::Error| EncodeError::InvalidCode {
        symbology,
        message: e.to_string(),
    };

    let pattern = match symbology {
        Symbology::Ean13 => EAN13::new(ean13_payload(code)).map_err(invalid)?.encode(),
        Symbology::Isbn13 => EAN13::new(isbn13_payload(code)).map_err(invalid)?.encode(),
        Symbology::Issn => EAN13::new(issn_payload(code)?).map_err(invalid)?.encode(),
        Symbology::UpcA => EAN13::new(upca_payload(code)).map_err(invalid)?.encode(),
        Symbology::Ean8 => EAN8::new(ean8_payload(code)).map_err(invalid)?.encode(),
        Symbology::Code39 => Code39::new(code.to_string()).map_err(invalid)?.encode(),
        Symbology::Code93 => Code93::new(code.to_string()).map_err(invalid)?.encode(),
        Symbology::Pzn => Code39::new(pzn_payload(code)?).map_err(invalid)?.encode(),
        // Character set B covers mixed-case alphanumerics and punctuation.
        Symbology::Code128 => Code128::new(format!("\u{0181}{}", code))
            .map_err(invalid)?
            .encode(),
        Symbology::Codabar => Codabar::new(codabar_payload(code)).map_err(invalid)?.encode(),
    };
    Ok(pattern)
}

fn rasterize(pattern: &[u8], config: &RenderConfig) -> Result<Vec<u8>, EncodeError> {
    let module_px = config.mm_to_px(config.module_width);
    let height_px = config.mm_to_px(config.module_height);
    let quiet_px = config.mm_to_px(config.quiet_zone);
    let width_px = pattern.len() as u32 * module_px + 2 * quiet_px;

    let mut img: GrayImage = ImageBuffer::from_pixel(width_px, height_px, Luma([255u8]));
    for (i, &module) in pattern.iter().enumerate() {
        if module != 1 {
            continue;
        }
        let x0 = quiet_px + i as u32 * module_px;
        for x in x0..x0 + module_px {
            for y in 0..height_px {
                img.put_pixel(x, y, Luma([0u8]));
            }
        }
    }

    let mut buf = Vec::new();
    DynamicImage::ImageLuma8(img).write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)?;
    Ok(buf)
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

// EAN-13 wants a 12 digit payload and computes the check digit itself. A
// 13 digit code is taken to carry a check digit, which is dropped; the
// recomputed digit is authoritative.
fn ean13_payload(code: &str) -> String {
    if code.len() == 13 && all_digits(code) {
        code[..12].to_string()
    } else {
        code.to_string()
    }
}

// Same scheme over a 7 digit payload.
fn ean8_payload(code: &str) -> String {
    if code.len() == 8 && all_digits(code) {
        code[..7].to_string()
    } else {
        code.to_string()
    }
}

// UPC-A is the EAN-13 with a leading zero.
fn upca_payload(code: &str) -> String {
    if code.len() == 12 && all_digits(code) {
        format!("0{}", &code[..11])
    } else if code.len() == 11 && all_digits(code) {
        format!("0{}", code)
    } else {
        code.to_string()
    }
}

// ISBN-13 is an EAN-13 that is conventionally written with separators.
fn isbn13_payload(code: &str) -> String {
    let digits: String = code.chars().filter(|c| *c != '-' && *c != ' ').collect();
    ean13_payload(&digits)
}

// ISSN maps into the 977 EAN-13 prefix: 977 + the seven data digits of the
// ISSN + the "00" price code. The ISSN's own check digit (which may be X)
// is discarded.
fn issn_payload(code: &str) -> Result<String, EncodeError> {
    let compact: String = code.chars().filter(|c| *c != '-' && *c != ' ').collect();
    if compact.len() == 13 && all_digits(&compact) && compact.starts_with("977") {
        // Already in EAN-13 form.
        return Ok(compact[..12].to_string());
    }
    if compact.len() == 8 && all_digits(&compact[..7]) {
        return Ok(format!("977{}00", &compact[..7]));
    }
    Err(EncodeError::Normalize {
        symbology: Symbology::Issn,
        reason: format!("'{}' is not an eight character ISSN", code),
    })
}

// PZN is a Code39 of "PZN-" plus six digits and a mod 11 check digit with
// weights 2..=7. A check digit of 10 has no representation.
fn pzn_payload(code: &str) -> Result<String, EncodeError> {
    let normalize_err = |reason: String| EncodeError::Normalize {
        symbology: Symbology::Pzn,
        reason,
    };

    let digits = code
        .trim()
        .trim_start_matches("PZN-")
        .trim_start_matches("pzn-");
    if !all_digits(digits) || (digits.len() != 6 && digits.len() != 7) {
        return Err(normalize_err(format!(
            "'{}' is not a six or seven digit PZN",
            code
        )));
    }

    if digits.len() == 7 {
        return Ok(format!("PZN-{}", digits));
    }

    let sum: u32 = digits
        .chars()
        .zip(2u32..)
        .map(|(c, weight)| c.to_digit(10).unwrap_or(0) * weight)
        .sum();
    let check = sum % 11;
    if check == 10 {
        return Err(normalize_err(format!(
            "'{}' has no valid PZN check digit",
            code
        )));
    }
    Ok(format!("PZN-{}{}", digits, check))
}

// Codabar needs A-D start/stop characters; plain numeric codes (the common
// spreadsheet case) are wrapped in A...A.
fn codabar_payload(code: &str) -> String {
    let has_guard = |c: Option<char>| matches!(c, Some('A'..='D') | Some('a'..='d'));
    if code.len() >= 2 && has_guard(code.chars().next()) && has_guard(code.chars().last()) {
        code.to_string()
    } else {
        format!("A{}A", code)
    }
}
