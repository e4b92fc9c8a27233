use std::collections::BTreeSet;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use comfy_table::Table;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span};

use hcard_cli::pipeline::{BatchConfig, run_batch_with_progress};
use hcard_cli::settings::Settings;
use hcard_ingest::read_sources;
use hcard_layout::DEFAULT_LOGO_ASSET;
use hcard_model::{BatchResult, CanonicalHealthRecord, FieldId, RawRecord};
use hcard_normalization::{NormalizationIssue, field_spec, normalize_with_diagnostics};
use hcard_output::{
    JsonDocumentRenderer, Renderer, SvgRenderer, ensure_parent_dir, interchange_path,
    records_to_csv, records_to_json, write_records_csv, write_records_json,
};

use crate::cli::{NormalizeArgs, RecordFormatArg, RenderArgs, RenderFormatArg};
use crate::summary::apply_table_style;

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({per_sec}) {msg}";

/// What `hcard render` did, for the summary.
#[derive(Debug)]
pub struct RenderOutcome {
    pub output_dir: PathBuf,
    pub renderer: &'static str,
    pub result: BatchResult,
    pub interchange: Vec<PathBuf>,
    pub report: Option<PathBuf>,
    pub dry_run: bool,
}

/// What `hcard normalize` did, for the summary.
#[derive(Debug)]
pub struct NormalizeOutcome {
    pub records: usize,
    /// Issues with the 0-based index of their record.
    pub issues: Vec<(usize, NormalizationIssue)>,
    pub unmatched_keys: BTreeSet<String>,
    pub output: Option<PathBuf>,
}

pub fn run_render(args: &RenderArgs) -> Result<RenderOutcome> {
    let span = info_span!("render", output_dir = %args.output_dir.display());
    let _guard = span.enter();

    let settings = load_settings(args)?;
    let records = read_sources(&args.inputs).context("read batch sources")?;
    info!(records = records.len(), "records loaded");

    let renderer = build_renderer(args.format, &settings);
    let config = settings
        .batch_config(&args.output_dir)
        .with_dry_run(args.dry_run);

    let progress = progress_bar(records.len());
    let result = run_batch_with_progress(&records, &renderer, &config, Some(&progress))
        .context("run batch")?;
    progress.finish_and_clear();

    let interchange = if args.dry_run {
        Vec::new()
    } else {
        write_interchange(args, &config, &records)?
    };

    let report = match &args.report {
        Some(path) if !args.dry_run => {
            write_report(path, &result)?;
            Some(path.clone())
        }
        _ => None,
    };

    Ok(RenderOutcome {
        output_dir: config.output_dir,
        renderer: renderer.name(),
        result,
        interchange,
        report,
        dry_run: args.dry_run,
    })
}

pub fn run_normalize(args: &NormalizeArgs) -> Result<NormalizeOutcome> {
    let records = read_sources(&args.inputs).context("read batch sources")?;
    let mut normalized = Vec::with_capacity(records.len());
    let mut issues = Vec::new();
    let mut unmatched_keys = BTreeSet::new();
    for (index, raw) in records.iter().enumerate() {
        let outcome = normalize_with_diagnostics(raw);
        issues.extend(outcome.issues.into_iter().map(|issue| (index, issue)));
        unmatched_keys.extend(outcome.unmatched_keys);
        normalized.push(outcome.record);
    }

    match (&args.output, args.format) {
        (Some(path), RecordFormatArg::Json) => {
            write_records_json(path, &normalized).context("write JSON records")?;
        }
        (Some(path), RecordFormatArg::Csv) => {
            write_records_csv(path, &normalized).context("write CSV records")?;
        }
        (None, format) => {
            let mut stdout = io::stdout().lock();
            match format {
                RecordFormatArg::Json => records_to_json(&mut stdout, &normalized),
                RecordFormatArg::Csv => records_to_csv(&mut stdout, &normalized),
            }
            .context("write records to stdout")?;
            stdout.flush().context("flush stdout")?;
        }
    }

    Ok(NormalizeOutcome {
        records: normalized.len(),
        issues,
        unmatched_keys,
        output: args.output.clone(),
    })
}

pub fn run_fields() -> Result<()> {
    let mut table = Table::new();
    table.set_header(vec!["Field", "Label", "Kind", "Accepted headers"]);
    apply_table_style(&mut table);
    for field in FieldId::ALL {
        let spec = field_spec(field);
        table.add_row(vec![
            field.as_str().to_string(),
            field.label().to_string(),
            format!("{:?}", field.kind()).to_lowercase(),
            spec.aliases.join(", "),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Settings file first, then command-line overrides.
fn load_settings(args: &RenderArgs) -> Result<Settings> {
    let mut settings = Settings::load_optional(args.config.as_deref()).context("load settings")?;
    if let Some(title) = &args.title {
        settings.layout.title.clone_from(title);
    }
    if let Some(policy) = args.on_collision {
        settings.batch.collision = policy.into();
    }
    if let Some(workers) = args.workers {
        settings.batch.workers = workers;
    }
    if let Some(secs) = args.render_timeout_secs {
        settings.batch.render_timeout_secs = Some(secs);
    }
    if let Some(logo) = &args.logo {
        settings.assets.logo = Some(logo.clone());
    }
    Ok(settings)
}

fn build_renderer(format: RenderFormatArg, settings: &Settings) -> Arc<dyn Renderer> {
    match format {
        RenderFormatArg::Svg => {
            let mut renderer = SvgRenderer::new();
            if let Some(logo) = &settings.assets.logo {
                let key = settings
                    .layout
                    .logo_asset
                    .as_deref()
                    .unwrap_or(DEFAULT_LOGO_ASSET);
                renderer = renderer.with_asset(key, logo.display().to_string());
            }
            Arc::new(renderer)
        }
        RenderFormatArg::Json => Arc::new(JsonDocumentRenderer),
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
        bar.set_style(style.progress_chars("#>-"));
    }
    bar.set_message("cards");
    bar
}

fn write_interchange(
    args: &RenderArgs,
    config: &BatchConfig,
    records: &[RawRecord],
) -> Result<Vec<PathBuf>> {
    if !args.interchange.json() && !args.interchange.csv() {
        return Ok(Vec::new());
    }
    let normalized: Vec<CanonicalHealthRecord> = records
        .iter()
        .map(|raw| normalize_with_diagnostics(raw).record)
        .collect();
    let mut written = Vec::new();
    if args.interchange.json() {
        let path = interchange_path(&config.output_dir, "json");
        write_records_json(&path, &normalized).context("write JSON records")?;
        written.push(path);
    }
    if args.interchange.csv() {
        let path = interchange_path(&config.output_dir, "csv");
        write_records_csv(&path, &normalized).context("write CSV records")?;
        written.push(path);
    }
    Ok(written)
}

fn write_report(path: &Path, result: &BatchResult) -> Result<()> {
    ensure_parent_dir(path).with_context(|| format!("create {}", path.display()))?;
    let mut json = serde_json::to_vec_pretty(result).context("serialize batch result")?;
    json.push(b'\n');
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "batch report written");
    Ok(())
}
