//! Festival Studio - themed AI portraits from a single photo.

mod adapters;
mod cassette;
mod cli;
mod config;
mod context;
mod credit;
mod error;
mod output;
mod params;
mod ports;
mod prompt;
mod studio;
mod theme;
mod upload;

use std::process;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, CreditArgs, GenerateArgs};
use crate::config::Config;
use crate::context::ServiceContext;
use crate::error::StudioError;
use crate::output::{resolve_output_path, save_data_uri};
use crate::studio::Studio;
use crate::theme::Theme;
use crate::upload::UploadedImage;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `-v` means debug and quiet means warnings only.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), StudioError> {
    match cli.command {
        Command::Generate(args) => {
            let config_path = config::discover_config_path(cli.config.as_deref());
            let config = Config::load(&config_path).map_err(StudioError::Config)?;
            generate(&args, &config).await
        }
        Command::Themes => {
            print_themes();
            Ok(())
        }
        Command::Credit(args) => follow_credit(args).await,
    }
}

async fn generate(args: &GenerateArgs, config: &Config) -> Result<(), StudioError> {
    // Rejected files never reach the studio.
    let upload = UploadedImage::from_path(&args.image)?;
    let options = args.options(&config.defaults);
    let format = args.format(&config.defaults);

    let (ctx, recording_session) = ServiceContext::from_env(config)?;
    let studio = Studio::new(ctx.generator);

    // Fast batches can finish between polls; intermediate states are best effort.
    let mut updates = studio.subscribe();
    let renderer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            tracing::debug!(
                loading = state.loading,
                results = state.results.as_ref().map_or(0, Vec::len),
                error = ?state.error,
                "studio state changed"
            );
        }
    });

    eprintln!("Generating {} images for \"{}\"...", options.count.get(), options.theme.label());
    let outcome = studio.generate(&upload, &options).await;
    let state = studio.state();

    // Closes the state channel and releases the recorder.
    drop(studio);
    if let Err(e) = renderer.await {
        tracing::warn!(error = %e, "state renderer stopped unexpectedly");
    }

    if let Some(session) = recording_session {
        match session.finish() {
            Ok(path) => eprintln!("Cassette saved: {}", path.display()),
            Err(e) => eprintln!("Warning: failed to save cassette: {e}"),
        }
    }

    outcome?;
    let images = state.results.unwrap_or_default();

    if args.json {
        println!("{}", serde_json::json!({ "images": images }));
        return Ok(());
    }

    let output_dir = args.output_dir(&config.defaults);
    for (i, image) in images.iter().enumerate() {
        let path = resolve_output_path(
            args.output.as_deref(),
            &output_dir,
            options.theme,
            i + 1,
            images.len(),
            format,
        );
        save_data_uri(image, format, &path)?;
        eprintln!("Saved: {}", path.display());
    }

    Ok(())
}

fn print_themes() {
    for theme in Theme::ALL {
        println!("{:<24} {}", theme.slug(), theme.label());
        println!("    {}", theme.placeholder());
        println!("    suggestions: {}", theme.suggestions().join(", "));
    }
}

async fn follow_credit(args: CreditArgs) -> Result<(), StudioError> {
    let (tx, rx) = mpsc::channel(16);
    let (mut balance, sync) = credit::spawn_credit_sync(
        rx,
        args.sources,
        Duration::from_millis(args.interval_ms.max(1)),
    );

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "stopped reading credit messages");
                    break;
                }
            }
        }
    });

    while balance.changed().await.is_ok() {
        println!("credits: {}", *balance.borrow_and_update());
    }

    for (name, task) in [("reader", reader), ("sync", sync)] {
        if let Err(e) = task.await {
            tracing::warn!(task = name, error = %e, "credit task failed");
        }
    }
    Ok(())
}
