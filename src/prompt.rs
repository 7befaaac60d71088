//! Prompt construction.
//!
//! Pure functions: the same options and variant index always produce the same
//! text.

use crate::params::GenerationOptions;

/// Used in place of empty free-text details.
pub const DEFAULT_DETAILS: &str = "Natural beauty";

/// Framing clause for even variant indices.
pub const CLOSE_UP_CLAUSE: &str = "Close-up portrait focus.";

/// Framing clause for odd variant indices.
pub const MEDIUM_SHOT_CLAUSE: &str = "Medium shot with environmental details.";

const STUDIO_CLAUSE: &str = "Studio background, isolated subject, clean environment.";
const ATMOSPHERE_CLAUSE: &str = "Authentic festival atmosphere.";
const IDENTITY_CLAUSE: &str = "Preserve facial features and identity accurately.";

/// Build the scaffolding shared by every variant in a batch.
#[must_use]
pub fn base_prompt(options: &GenerationOptions) -> String {
    let details = options.details.trim();
    let details = if details.is_empty() { DEFAULT_DETAILS } else { details };

    let mut lines = vec![
        format!("Professional high-end photography for festival: \"{}\".", options.theme.label()),
        "Artistic style: Cinematic, magazine quality, sharp focus, vibrant colors.".to_string(),
        format!("Details: {details}."),
        (if options.isolate_background { STUDIO_CLAUSE } else { ATMOSPHERE_CLAUSE }).to_string(),
    ];
    if options.preserve_identity {
        lines.push(IDENTITY_CLAUSE.to_string());
    }
    lines.push(format!("Aspect Ratio: {}. 8k resolution, photorealistic.", options.aspect_ratio));

    lines.join("\n")
}

/// Append the framing clause for `variant` to a base prompt.
///
/// Even indices ask for a close-up, odd ones for a medium shot.
#[must_use]
pub fn variant_prompt(base: &str, variant: usize) -> String {
    let framing = if variant % 2 == 0 { CLOSE_UP_CLAUSE } else { MEDIUM_SHOT_CLAUSE };
    format!("{base} {framing}")
}

/// Full prompt for one variant.
#[must_use]
pub fn build_prompt(options: &GenerationOptions, variant: usize) -> String {
    variant_prompt(&base_prompt(options), variant)
}
