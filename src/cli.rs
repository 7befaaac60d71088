//! CLI argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DefaultsConfig;
use crate::params::{AspectRatio, GenerationOptions, ImageCount, OutputFormat};
use crate::theme::Theme;

/// Festival photo studio: themed AI portraits from a single photo.
#[derive(Parser, Debug)]
#[command(name = "festival-studio", version, about)]
pub struct Cli {
    /// What to do.
    #[command(subcommand)]
    pub command: Command,

    /// Config file path override.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate themed variants of a photo.
    Generate(GenerateArgs),
    /// List available festival themes.
    Themes,
    /// Follow the credit balance pushed by a host application on stdin.
    Credit(CreditArgs),
}

/// Options for `generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Source photo: JPG, PNG or WebP, at most 15MB.
    pub image: PathBuf,

    /// Festival theme (slug or full name).
    #[arg(short, long)]
    pub theme: Option<Theme>,

    /// Extra details: outfit, props, setting.
    #[arg(short, long, default_value = "")]
    pub details: String,

    /// Ask the model to keep facial features.
    #[arg(long, conflicts_with = "no_preserve_identity")]
    pub preserve_identity: bool,

    /// Let the model reinterpret facial features.
    #[arg(long)]
    pub no_preserve_identity: bool,

    /// Place the subject on a clean studio background.
    #[arg(long, conflicts_with = "keep_background")]
    pub isolate_background: bool,

    /// Keep an authentic festival atmosphere around the subject.
    #[arg(long)]
    pub keep_background: bool,

    /// Number of images: 2 or 4.
    #[arg(short = 'n', long)]
    pub count: Option<ImageCount>,

    /// Aspect ratio: 1:1, 3:4 or 9:16.
    #[arg(short, long)]
    pub aspect_ratio: Option<AspectRatio>,

    /// Output format for saved files.
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (auto-generated if not specified).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for auto-named output files.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Print results as JSON data URIs instead of saving files.
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    /// Merge flags over config defaults.
    #[must_use]
    pub fn options(&self, defaults: &DefaultsConfig) -> GenerationOptions {
        GenerationOptions {
            theme: self.theme.unwrap_or(defaults.theme),
            details: self.details.clone(),
            preserve_identity: flag_override(
                self.preserve_identity,
                self.no_preserve_identity,
                defaults.preserve_identity,
            ),
            isolate_background: flag_override(
                self.isolate_background,
                self.keep_background,
                defaults.isolate_background,
            ),
            count: self.count.unwrap_or(defaults.count),
            aspect_ratio: self.aspect_ratio.unwrap_or(defaults.aspect_ratio),
        }
    }

    /// Output format, falling back to the config default.
    #[must_use]
    pub fn format(&self, defaults: &DefaultsConfig) -> OutputFormat {
        self.format.unwrap_or(defaults.format)
    }

    /// Output directory, falling back to the config default.
    #[must_use]
    pub fn output_dir(&self, defaults: &DefaultsConfig) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| defaults.output_dir.clone())
    }
}

fn flag_override(on: bool, off: bool, default: bool) -> bool {
    if on {
        true
    } else if off {
        false
    } else {
        default
    }
}

/// Options for `credit`.
#[derive(Args, Debug)]
pub struct CreditArgs {
    /// URL to scan for a `credit=` parameter (repeatable).
    #[arg(long = "source")]
    pub sources: Vec<String>,

    /// How often to rescan the URLs, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub interval_ms: u64,
}
