//! `fenced <FILE>`: highlight the code embedded in a markdown file and print
//! the resulting annotations.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use fenced::cli::{CliArgs, OutputFormat, RunConfig};
use fenced::embed::{AnnotationPayload, AnnotationSink, CycleReport, EditorView, StyleAnnotation};
use fenced::{
    CachedHighlighter, Document, HighlightConfig, StylePalette, TreeSitterHighlighter,
    UpdateController,
};

/// Counts publishes; the annotations themselves are read back from the controller
#[derive(Default)]
struct PublishCounter {
    publishes: usize,
    measured: bool,
}

impl AnnotationSink for PublishCounter {
    fn publish(&mut self, _annotations: &[StyleAnnotation]) {
        self.publishes += 1;
    }

    fn request_measure(&mut self) {
        self.measured = true;
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    file: String,
    report: &'a CycleReport,
    annotations: &'a [StyleAnnotation],
}

fn main() -> Result<()> {
    let run = CliArgs::parse()
        .into_config()
        .map_err(anyhow::Error::msg)?;
    let config = load_config(&run)?;
    fenced::tracing::init(&config);
    tracing::debug!(?config, "configuration loaded");

    let palette = fenced::theme::load_theme(&config.theme).unwrap_or_else(|e| {
        tracing::warn!("{}, falling back to the default palette", e);
        StylePalette::default()
    });

    let mut doc = Document::from_file(&run.file)
        .with_context(|| format!("Failed to read {}", run.file.display()))?;
    doc.set_display_mode(run.mode);
    if let Some(offset) = run.cursor {
        doc.set_cursor(offset);
    }

    let highlighter = CachedHighlighter::new(
        TreeSitterHighlighter::new(palette),
        config.token_cache_capacity,
    );
    let controller = UpdateController::new(highlighter, PublishCounter::default(), config);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start runtime")?;
    let cycle = controller.refresh(&doc)?;
    let report = runtime.block_on(cycle);
    tracing::info!(
        ?report,
        publishes = controller.sink().publishes,
        measured = controller.sink().measured,
        "highlighted {}",
        run.file.display()
    );

    let annotations = controller.annotations();
    match run.format {
        OutputFormat::List => print_list(&doc, &annotations)?,
        OutputFormat::Json => {
            let output = JsonOutput {
                file: run.file.display().to_string(),
                report: &report,
                annotations: &annotations,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn load_config(run: &RunConfig) -> Result<HighlightConfig> {
    let mut config = match &run.config_path {
        Some(path) => HighlightConfig::load_from(path).map_err(anyhow::Error::msg)?,
        None => HighlightConfig::load(),
    };
    run.apply_overrides(&mut config);
    Ok(config)
}

fn print_list(doc: &Document, annotations: &[StyleAnnotation]) -> Result<()> {
    for annotation in annotations {
        let text = doc.slice(annotation.from, annotation.to)?;
        let label = match &annotation.payload {
            AnnotationPayload::Collapse => "collapse".to_string(),
            AnnotationPayload::Style(style) => style.classes.join(" "),
        };
        println!(
            "{:>6}..{:<6} {:<40} {:?}",
            annotation.from, annotation.to, label, text
        );
    }
    Ok(())
}
