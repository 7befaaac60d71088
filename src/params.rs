//! Generation options and the enumerated values they are built from.

use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

use crate::theme::Theme;

/// Aspect ratio requested for generated images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
pub enum AspectRatio {
    /// 1:1 square.
    #[default]
    #[value(name = "1:1")]
    #[serde(rename = "1:1")]
    Square,
    /// 3:4 classic portrait.
    #[value(name = "3:4")]
    #[serde(rename = "3:4")]
    Classic,
    /// 9:16 story format.
    #[value(name = "9:16")]
    #[serde(rename = "9:16")]
    Story,
}

impl AspectRatio {
    /// The ratio as the model expects it, e.g. `"3:4"`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Classic => "3:4",
            Self::Story => "9:16",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of images in one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(try_from = "u32")]
pub enum ImageCount {
    /// Two images.
    #[default]
    #[value(name = "2")]
    Two,
    /// Four images.
    #[value(name = "4")]
    Four,
}

impl ImageCount {
    /// The count as a number.
    #[must_use]
    pub fn get(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Four => 4,
        }
    }
}

impl TryFrom<u32> for ImageCount {
    type Error = String;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            other => Err(format!("Unsupported image count {other}. Valid: 2, 4")),
        }
    }
}

/// File format used when saving results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PNG.
    #[default]
    Png,
    /// JPEG.
    Jpeg,
    /// WebP.
    Webp,
}

impl OutputFormat {
    /// File extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }

    /// MIME type for this format.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    /// Matching `image` crate format.
    #[must_use]
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}

/// Everything the user chose before pressing generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Selected festival theme.
    pub theme: Theme,
    /// Free-text details; may be empty.
    pub details: String,
    /// Ask the model to keep the subject's face recognisable.
    pub preserve_identity: bool,
    /// Put the subject on a clean studio background.
    pub isolate_background: bool,
    /// Number of images to request.
    pub count: ImageCount,
    /// Requested aspect ratio.
    pub aspect_ratio: AspectRatio,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            details: String::new(),
            preserve_identity: true,
            isolate_background: false,
            count: ImageCount::default(),
            aspect_ratio: AspectRatio::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = GenerationOptions::default();
        assert_eq!(options.theme, Theme::Tet);
        assert!(options.details.is_empty());
        assert!(options.preserve_identity);
        assert!(!options.isolate_background);
        assert_eq!(options.count.get(), 2);
        assert_eq!(options.aspect_ratio.as_str(), "1:1");
    }

    #[test]
    fn image_count_from_number() {
        assert_eq!(ImageCount::try_from(2).unwrap(), ImageCount::Two);
        assert_eq!(ImageCount::try_from(4).unwrap(), ImageCount::Four);
        assert!(ImageCount::try_from(3).is_err());
        assert!(ImageCount::try_from(0).is_err());
    }

    #[test]
    fn aspect_ratio_names_match_cli_values() {
        for ratio in AspectRatio::value_variants() {
            let value = ratio.to_possible_value().unwrap();
            assert_eq!(value.get_name(), ratio.as_str());
        }
    }

    #[test]
    fn output_format_mapping() {
        assert_eq!(OutputFormat::Jpeg.extension(), "jpg");
        assert_eq!(OutputFormat::Webp.mime_type(), "image/webp");
        assert_eq!(OutputFormat::default(), OutputFormat::Png);
    }
}
