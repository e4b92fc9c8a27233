//! Batch orchestration: raw rows in, one artifact per record out.
//!
//! Each record runs through these stages:
//! 1. **Normalize**: raw row to canonical record, issues kept as diagnostics
//! 2. **Identify**: the name field must be present
//! 3. **Layout**: canonical record to a single-page document, bounds checked
//! 4. **Render**: document to bytes, optionally under a deadline
//! 5. **Write**: artifact named after the sanitized name, collisions resolved
//!
//! A failure in any stage is recorded against that record and the batch
//! moves on. Only output-directory setup can fail the run as a whole.
//!
//! With more than one worker, layout and rendering fan out over a rayon
//! pool. Normalization, naming and writing stay on the calling thread in
//! input order, so collision handling does not depend on scheduling.

use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, info_span, warn};

use hcard_layout::{LayoutEngine, LayoutOptions, check_bounds};
use hcard_model::{
    BatchResult, Canvas, CanonicalHealthRecord, CollisionResolution, Document, FailureReason,
    NameCollision, RawRecord, RecordDiagnostic, RecordFailure,
};
use hcard_normalization::normalize_with_diagnostics;
use hcard_output::{Renderer, artifact_path, ensure_output_dir, sanitize_file_stem, write_artifact};

use crate::logging::redact_value;

/// Successful records between two progress lines.
pub const DEFAULT_PROGRESS_EVERY: usize = 100;

/// Records handed to the pool at once, per worker.
const JOBS_PER_WORKER: usize = 4;

/// What to do when two records sanitize to the same artifact name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// The later record replaces the earlier artifact.
    #[default]
    Overwrite,
    /// The later record is written as `<name>_2`, `<name>_3`, ...
    Suffix,
}

impl CollisionPolicy {
    fn resolution(self) -> CollisionResolution {
        match self {
            CollisionPolicy::Overwrite => CollisionResolution::Overwritten,
            CollisionPolicy::Suffix => CollisionResolution::Suffixed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub output_dir: PathBuf,
    pub collision: CollisionPolicy,
    /// Log a progress line every this many successes; 0 disables.
    pub progress_every: usize,
    /// Layout/render workers; 1 keeps everything on the calling thread.
    pub workers: usize,
    /// Per-record deadline for the renderer.
    pub render_timeout: Option<Duration>,
    pub canvas: Canvas,
    pub layout: LayoutOptions,
    /// Run every stage but leave the filesystem untouched.
    pub dry_run: bool,
}

impl BatchConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            collision: CollisionPolicy::default(),
            progress_every: DEFAULT_PROGRESS_EVERY,
            workers: 1,
            render_timeout: None,
            canvas: Canvas::default(),
            layout: LayoutOptions::default(),
            dry_run: false,
        }
    }

    #[must_use]
    pub fn with_collision(mut self, collision: CollisionPolicy) -> Self {
        self.collision = collision;
        self
    }

    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    #[must_use]
    pub fn with_render_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.render_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = canvas;
        self
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// A batch that could not start.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to start {workers} render workers: {message}")]
    WorkerPool { workers: usize, message: String },
}

/// Runs every record through the pipeline.
///
/// # Errors
///
/// Returns [`BatchError`] only when the run cannot start. Per-record
/// problems land in [`BatchResult::failures`].
pub fn run_batch(
    records: &[RawRecord],
    renderer: &Arc<dyn Renderer>,
    config: &BatchConfig,
) -> Result<BatchResult, BatchError> {
    run_batch_with_progress(records, renderer, config, None)
}

/// [`run_batch`] that also advances `progress` once per record.
pub fn run_batch_with_progress(
    records: &[RawRecord],
    renderer: &Arc<dyn Renderer>,
    config: &BatchConfig,
    progress: Option<&ProgressBar>,
) -> Result<BatchResult, BatchError> {
    let workers = config.workers.max(1);
    let span = info_span!(
        "batch",
        records = records.len(),
        renderer = renderer.name(),
        workers
    );
    let _guard = span.enter();

    let pool = if workers > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|index| format!("hcard-render-{index}"))
            .build()
            .map_err(|error| BatchError::WorkerPool {
                workers,
                message: error.to_string(),
            })?;
        Some(pool)
    } else {
        None
    };

    let created = if config.dry_run {
        false
    } else {
        ensure_output_dir(&config.output_dir).map_err(|source| BatchError::OutputDir {
            path: config.output_dir.clone(),
            source,
        })?
    };

    let engine = LayoutEngine::new(config.layout.clone());
    let mut batch = Batch::new(config, renderer.extension());

    match pool {
        None => {
            for (index, raw) in records.iter().enumerate() {
                let job = batch.prepare(index, raw);
                advance_if_failed(progress, job.as_ref());
                if let Some(job) = job {
                    let rendered = render_job(&engine, renderer, &job, config);
                    advance(progress);
                    batch.finish(job, rendered);
                }
            }
        }
        Some(pool) => {
            // Rendered bytes are held only until their chunk is written.
            let chunk_len = chunk_len(workers);
            for (chunk_index, chunk) in records.chunks(chunk_len).enumerate() {
                let mut jobs = Vec::with_capacity(chunk.len());
                for (offset, raw) in chunk.iter().enumerate() {
                    let job = batch.prepare(chunk_index * chunk_len + offset, raw);
                    advance_if_failed(progress, job.as_ref());
                    jobs.extend(job);
                }
                let rendered: Vec<Rendered> = pool.install(|| {
                    jobs.par_iter()
                        .map(|job| {
                            let rendered = render_job(&engine, renderer, job, config);
                            advance(progress);
                            rendered
                        })
                        .collect()
                });
                for (job, rendered) in jobs.into_iter().zip(rendered) {
                    batch.finish(job, rendered);
                }
            }
        }
    }

    let (result, unmatched) = batch.into_parts();
    if !unmatched.is_empty() {
        warn!(headers = ?unmatched, "source headers matched no canonical field");
    }
    info!(
        attempted = result.attempted,
        succeeded = result.succeeded,
        failed = result.failed,
        collisions = result.collisions.len(),
        "batch complete"
    );

    if created
        && result.artifacts.is_empty()
        && let Err(error) = fs::remove_dir(&config.output_dir)
    {
        warn!(
            path = %config.output_dir.display(),
            %error,
            "failed to remove empty output directory"
        );
    }

    Ok(result)
}

/// A record that passed normalization and the identity check.
#[derive(Debug)]
struct Job {
    index: usize,
    record_id: String,
    /// Sanitized artifact name before collision handling.
    stem: String,
    record: CanonicalHealthRecord,
}

#[derive(Debug, Clone, PartialEq)]
struct StageFailure {
    reason: FailureReason,
    detail: String,
}

impl StageFailure {
    fn new(reason: FailureReason, detail: impl Into<String>) -> Self {
        Self {
            reason,
            detail: detail.into(),
        }
    }
}

type Rendered = Result<Vec<u8>, StageFailure>;

/// Single-writer aggregation state.
struct Batch<'a> {
    config: &'a BatchConfig,
    extension: &'static str,
    result: BatchResult,
    names: ArtifactNames,
    unmatched: BTreeSet<String>,
}

impl<'a> Batch<'a> {
    fn new(config: &'a BatchConfig, extension: &'static str) -> Self {
        Self {
            config,
            extension,
            result: BatchResult::new(),
            names: ArtifactNames::default(),
            unmatched: BTreeSet::new(),
        }
    }

    fn prepare(&mut self, index: usize, raw: &RawRecord) -> Option<Job> {
        let outcome = isolate(FailureReason::Normalize, || {
            Ok(normalize_with_diagnostics(raw))
        });
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(failure) => {
                self.fail(index, raw.location(), failure);
                return None;
            }
        };

        let record_id = outcome
            .record
            .name()
            .map_or_else(|| raw.location(), str::to_string);
        for issue in &outcome.issues {
            debug!(
                index,
                field = issue.field.as_str(),
                source_key = %issue.source_key,
                value = redact_value(&issue.raw_value),
                error = %issue.error,
                "value set aside"
            );
            self.result.diagnostics.push(RecordDiagnostic {
                index,
                record_id: record_id.clone(),
                field: Some(issue.field),
                source_key: issue.source_key.clone(),
                message: issue.error.to_string(),
            });
        }
        self.unmatched.extend(outcome.unmatched_keys);

        let Some(name) = outcome.record.name() else {
            self.fail(
                index,
                record_id,
                StageFailure::new(FailureReason::MissingIdentity, "name field is missing"),
            );
            return None;
        };
        let stem = sanitize_file_stem(name);
        Some(Job {
            index,
            record_id,
            stem,
            record: outcome.record,
        })
    }

    fn finish(&mut self, job: Job, rendered: Rendered) {
        match rendered {
            Ok(bytes) => self.write(job, &bytes),
            Err(failure) => self.fail(job.index, job.record_id, failure),
        }
    }

    fn write(&mut self, job: Job, bytes: &[u8]) {
        let policy = self.config.collision;
        let (stem, first_index) = self.names.claim(&job.stem, policy);
        let path = artifact_path(&self.config.output_dir, &stem, self.extension);

        if !self.config.dry_run
            && let Err(error) = write_artifact(&path, bytes)
        {
            self.fail(
                job.index,
                job.record_id,
                StageFailure::new(FailureReason::Write, format!("write failed: {error}")),
            );
            return;
        }

        if let Some(first_index) = first_index {
            let resolution = policy.resolution();
            warn!(
                artifact = redact_value(&job.stem),
                first_index,
                index = job.index,
                ?resolution,
                "artifact name collision"
            );
            self.result.collisions.push(NameCollision {
                artifact: job.stem,
                first_index,
                index: job.index,
                resolution,
                written_to: path.clone(),
            });
        }
        self.names.commit(stem, job.index);
        debug!(index = job.index, bytes = bytes.len(), "artifact written");
        self.result.record_success(path);

        let every = self.config.progress_every;
        if every > 0 && self.result.succeeded % every == 0 {
            info!(
                succeeded = self.result.succeeded,
                failed = self.result.failed,
                "batch progress"
            );
        }
    }

    fn fail(&mut self, index: usize, record_id: String, failure: StageFailure) {
        warn!(
            index,
            record = redact_value(&record_id),
            reason = %failure.reason,
            detail = %failure.detail,
            "record failed"
        );
        self.result.record_failure(RecordFailure {
            index,
            record_id,
            reason: failure.reason,
            detail: failure.detail,
        });
    }

    fn into_parts(self) -> (BatchResult, BTreeSet<String>) {
        (self.result, self.unmatched)
    }
}

/// Artifact names already written in this run.
#[derive(Debug, Default)]
struct ArtifactNames {
    /// Stem to the index of the record that first wrote it.
    owners: HashMap<String, usize>,
}

impl ArtifactNames {
    /// Final stem for `base` under `policy`, plus the earlier owner of
    /// `base` if there is one. Nothing is reserved until [`commit`].
    ///
    /// [`commit`]: ArtifactNames::commit
    fn claim(&self, base: &str, policy: CollisionPolicy) -> (String, Option<usize>) {
        let Some(&first_index) = self.owners.get(base) else {
            return (base.to_string(), None);
        };
        let stem = match policy {
            CollisionPolicy::Overwrite => base.to_string(),
            CollisionPolicy::Suffix => (2usize..)
                .map(|n| format!("{base}_{n}"))
                .find(|candidate| !self.owners.contains_key(candidate))
                .unwrap_or_else(|| base.to_string()),
        };
        (stem, Some(first_index))
    }

    fn commit(&mut self, stem: String, index: usize) {
        self.owners.entry(stem).or_insert(index);
    }
}

fn render_job(
    engine: &LayoutEngine,
    renderer: &Arc<dyn Renderer>,
    job: &Job,
    config: &BatchConfig,
) -> Rendered {
    let document = isolate(FailureReason::Layout, || {
        let document = engine.layout(&job.record, &config.canvas);
        check_bounds(&document)
            .map_err(|error| StageFailure::new(FailureReason::Layout, error.to_string()))?;
        Ok(document)
    })?;
    render_document(renderer, document, config.render_timeout)
}

/// Renders on the current thread, or on a helper thread that is abandoned
/// once `timeout` passes.
fn render_document(
    renderer: &Arc<dyn Renderer>,
    document: Document,
    timeout: Option<Duration>,
) -> Rendered {
    let Some(limit) = timeout else {
        return render_isolated(renderer.as_ref(), &document);
    };

    let (sender, receiver) = mpsc::channel();
    let worker = Arc::clone(renderer);
    thread::Builder::new()
        .name("hcard-render-deadline".to_string())
        .spawn(move || {
            // The receiver is gone once the deadline passed.
            let _ = sender.send(render_isolated(worker.as_ref(), &document));
        })
        .map_err(|error| {
            StageFailure::new(
                FailureReason::Render,
                format!("failed to start render thread: {error}"),
            )
        })?;

    match receiver.recv_timeout(limit) {
        Ok(rendered) => rendered,
        Err(RecvTimeoutError::Timeout) => Err(StageFailure::new(
            FailureReason::Timeout,
            format!("renderer did not finish within {}ms", limit.as_millis()),
        )),
        Err(RecvTimeoutError::Disconnected) => Err(StageFailure::new(
            FailureReason::Render,
            "render thread exited without a result",
        )),
    }
}

fn render_isolated(renderer: &dyn Renderer, document: &Document) -> Rendered {
    isolate(FailureReason::Render, || {
        renderer
            .render(document)
            .map_err(|error| StageFailure::new(FailureReason::Render, error.to_string()))
    })
}

/// Turns a panic inside one record's stage into a failure for that record.
fn isolate<T>(
    reason: FailureReason,
    stage: impl FnOnce() -> Result<T, StageFailure>,
) -> Result<T, StageFailure> {
    panic::catch_unwind(AssertUnwindSafe(stage)).unwrap_or_else(|payload| {
        Err(StageFailure::new(
            reason,
            format!("panicked: {}", panic_message(payload.as_ref())),
        ))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        *message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}

fn chunk_len(workers: usize) -> usize {
    workers.max(1) * JOBS_PER_WORKER
}

fn advance(progress: Option<&ProgressBar>) {
    if let Some(bar) = progress {
        bar.inc(1);
    }
}

fn advance_if_failed(progress: Option<&ProgressBar>, job: Option<&Job>) {
    if job.is_none() {
        advance(progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_scale_with_workers() {
        assert_eq!(chunk_len(0), JOBS_PER_WORKER);
        assert_eq!(chunk_len(2), 2 * JOBS_PER_WORKER);
    }

    #[test]
    fn overwrite_keeps_the_base_name() {
        let mut names = ArtifactNames::default();
        assert_eq!(names.claim("A_B_", CollisionPolicy::Overwrite), ("A_B_".to_string(), None));
        names.commit("A_B_".to_string(), 0);
        assert_eq!(
            names.claim("A_B_", CollisionPolicy::Overwrite),
            ("A_B_".to_string(), Some(0))
        );
    }

    #[test]
    fn suffix_skips_names_already_taken() {
        let mut names = ArtifactNames::default();
        names.commit("A_B_".to_string(), 0);
        names.commit("A_B__2".to_string(), 1);
        assert_eq!(
            names.claim("A_B_", CollisionPolicy::Suffix),
            ("A_B__3".to_string(), Some(0))
        );
    }

    #[test]
    fn unclaimed_names_are_not_reserved() {
        let mut names = ArtifactNames::default();
        names.commit("A_B_".to_string(), 0);
        let (first, _) = names.claim("A_B_", CollisionPolicy::Suffix);
        let (second, _) = names.claim("A_B_", CollisionPolicy::Suffix);
        assert_eq!(first, second);
    }

    #[test]
    fn panics_become_stage_failures() {
        let outcome: Result<(), StageFailure> =
            isolate(FailureReason::Render, || panic!("renderer blew up"));
        assert_eq!(
            outcome,
            Err(StageFailure::new(FailureReason::Render, "panicked: renderer blew up"))
        );
    }

    #[test]
    fn collision_policy_reads_lowercase() {
        let policy: CollisionPolicy = serde_json::from_str("\"suffix\"").unwrap();
        assert_eq!(policy, CollisionPolicy::Suffix);
    }
}
