use serde::{Deserialize, Serialize};

/// Rendering parameters for one generation run.
///
/// Dimensions are in millimeters, matching the conventions of barcode
/// writer libraries; `dpi` controls the millimeter-to-pixel conversion.
/// The struct is supplied wholesale by the caller and stays immutable for
/// the duration of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Width of the narrowest bar, in mm.
    pub module_width: f64,
    /// Height of the bars, in mm.
    pub module_height: f64,
    /// Point size of the human readable line, for writers that draw one.
    pub font_size: u32,
    /// Distance between the bars and the human readable line, in mm.
    pub text_distance: f64,
    /// Blank margin left and right of the bars, in mm.
    pub quiet_zone: f64,
    /// Raster resolution used to convert mm to pixels.
    pub dpi: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            module_width: 0.5,
            module_height: 30.0,
            font_size: 12,
            text_distance: 5.0,
            quiet_zone: 6.0,
            dpi: 300,
        }
    }
}

impl RenderConfig {
    /// Convert a millimeter dimension to whole pixels at this config's dpi,
    /// never rounding below one pixel.
    pub fn mm_to_px(&self, mm: f64) -> u32 {
        let px = (mm * self.dpi as f64 / 25.4).round();
        if px < 1.0 { 1 } else { px as u32 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_writer_options() {
        let config = RenderConfig::default();
        assert_eq!(config.module_width, 0.5);
        assert_eq!(config.module_height, 30.0);
        assert_eq!(config.font_size, 12);
        assert_eq!(config.text_distance, 5.0);
        assert_eq!(config.quiet_zone, 6.0);
    }

    #[test]
    fn mm_to_px_rounds_and_clamps() {
        let config = RenderConfig {
            dpi: 300,
            ..RenderConfig::default()
        };
        // 25.4 mm is one inch.
        assert_eq!(config.mm_to_px(25.4), 300);
        assert_eq!(config.mm_to_px(0.5), 6);
        // Tiny dimensions still produce a visible pixel.
        assert_eq!(config.mm_to_px(0.01), 1);
    }
}
