//! Batch orchestration end to end: raw rows in, files on disk out.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use hcard_cli::pipeline::{BatchConfig, CollisionPolicy, run_batch};
use hcard_model::{
    BatchResult, Canvas, CollisionResolution, Document, FailureReason, FieldId, RawRecord,
};
use hcard_output::{JsonDocumentRenderer, RenderError, Renderer, SvgRenderer};

fn student(row: usize, name: &str) -> RawRecord {
    RawRecord::new(row)
        .with_source("students.csv")
        .with_field("Student's Name", name)
        .with_field("DATE OF ASSESSMENT", 45000i64)
        .with_field("HEIGHT (cm)", 150i64)
        .with_field("BMI", "NA")
}

fn svg() -> Arc<dyn Renderer> {
    Arc::new(SvgRenderer::new())
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn name_on_page(document: &Document) -> Option<&str> {
    document.value_for_label(FieldId::Name.label())
}

/// Fails for one named student, renders everyone else as JSON.
struct RejectingRenderer {
    reject: &'static str,
}

impl Renderer for RejectingRenderer {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, document: &Document) -> Result<Vec<u8>, RenderError> {
        if name_on_page(document) == Some(self.reject) {
            return Err(RenderError::Backend {
                renderer: "rejecting".to_string(),
                message: "paint failed".to_string(),
            });
        }
        JsonDocumentRenderer.render(document)
    }
}

/// Hangs on one named student.
struct StallingRenderer {
    stall_on: &'static str,
}

impl Renderer for StallingRenderer {
    fn name(&self) -> &'static str {
        "stalling"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, document: &Document) -> Result<Vec<u8>, RenderError> {
        if name_on_page(document) == Some(self.stall_on) {
            thread::sleep(Duration::from_secs(5));
        }
        JsonDocumentRenderer.render(document)
    }
}

struct PanickingRenderer;

impl Renderer for PanickingRenderer {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, document: &Document) -> Result<Vec<u8>, RenderError> {
        if name_on_page(document) == Some("Bob") {
            panic!("font table missing");
        }
        JsonDocumentRenderer.render(document)
    }
}

#[test]
fn one_malformed_record_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("cards");
    let records = vec![
        student(1, "Asha Rao"),
        student(2, "Bob"),
        RawRecord::new(3)
            .with_source("students.csv")
            .with_field("HEIGHT (cm)", 140i64),
        student(4, "Chen Li"),
        student(5, "Dana"),
    ];

    let result = run_batch(&records, &svg(), &BatchConfig::new(&out)).unwrap();

    assert_eq!(result.attempted, 5);
    assert_eq!(result.succeeded, 4);
    assert_eq!(result.failed, 1);
    insta::assert_json_snapshot!(result.failures, @r#"
    [
      {
        "index": 2,
        "record_id": "students.csv:3",
        "reason": "missing_identity",
        "detail": "name field is missing"
      }
    ]
    "#);
    assert_eq!(
        files_in(&out),
        vec!["Asha_Rao.svg", "Bob.svg", "Chen_Li.svg", "Dana.svg"]
    );
}

#[test]
fn scenario_record_renders_placeholder_for_bmi() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![student(1, "Jane Doe")];
    let renderer: Arc<dyn Renderer> = Arc::new(JsonDocumentRenderer);

    let result = run_batch(&records, &renderer, &BatchConfig::new(dir.path())).unwrap();

    assert_eq!(file_names(&result.artifacts), vec!["Jane_Doe.json"]);
    let bytes = std::fs::read(&result.artifacts[0]).unwrap();
    let document: Document = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(document.value_for_label(FieldId::Bmi.label()), Some("NA"));
    assert_eq!(document.value_for_label(FieldId::Height.label()), Some("150"));
    assert_eq!(
        document.value_for_label(FieldId::AssessmentDate.label()),
        Some("15-03-2023")
    );
}

#[test]
fn duplicate_names_overwrite_and_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![student(1, "A.B."), student(2, "A.B.")];

    let result = run_batch(&records, &svg(), &BatchConfig::new(dir.path())).unwrap();

    assert_eq!(result.succeeded, 2);
    assert_eq!(result.unique_artifact_count(), 1);
    assert_eq!(result.overwrite_count(), 1);
    let collision = &result.collisions[0];
    assert_eq!(collision.artifact, "A_B_");
    assert_eq!((collision.first_index, collision.index), (0, 1));
    assert_eq!(collision.resolution, CollisionResolution::Overwritten);
    assert_eq!(collision.written_to, dir.path().join("A_B_.svg"));
    assert_eq!(files_in(dir.path()), vec!["A_B_.svg"]);
}

#[test]
fn suffix_policy_keeps_every_card() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![
        student(1, "A.B."),
        student(2, "A.B."),
        student(3, "A B "),
    ];
    let config = BatchConfig::new(dir.path()).with_collision(CollisionPolicy::Suffix);

    let result = run_batch(&records, &svg(), &config).unwrap();

    assert_eq!(
        file_names(&result.artifacts),
        vec!["A_B_.svg", "A_B__2.svg", "A_B__3.svg"]
    );
    assert_eq!(result.collisions.len(), 2);
    assert!(
        result
            .collisions
            .iter()
            .all(|c| c.resolution == CollisionResolution::Suffixed && c.first_index == 0)
    );
    assert_eq!(result.overwrite_count(), 0);
}

#[test]
fn renderer_errors_are_recorded_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![student(1, "Asha"), student(2, "Bob"), student(3, "Chen")];
    let renderer: Arc<dyn Renderer> = Arc::new(RejectingRenderer { reject: "Bob" });

    let result = run_batch(&records, &renderer, &BatchConfig::new(dir.path())).unwrap();

    assert_eq!(result.succeeded, 2);
    assert_eq!(result.failures.len(), 1);
    let failure = &result.failures[0];
    assert_eq!(failure.index, 1);
    assert_eq!(failure.record_id, "Bob");
    assert_eq!(failure.reason, FailureReason::Render);
    assert!(failure.detail.contains("paint failed"));
}

#[test]
fn renderer_panics_stay_inside_the_record() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![student(1, "Asha"), student(2, "Bob"), student(3, "Chen")];
    let renderer: Arc<dyn Renderer> = Arc::new(PanickingRenderer);

    let result = run_batch(&records, &renderer, &BatchConfig::new(dir.path())).unwrap();

    assert_eq!(result.succeeded, 2);
    assert_eq!(result.failures_with(FailureReason::Render), 1);
    assert!(result.failures[0].detail.contains("font table missing"));
}

#[test]
fn hung_renderer_times_out_without_blocking_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![student(1, "Asha"), student(2, "Bob"), student(3, "Chen")];
    let renderer: Arc<dyn Renderer> = Arc::new(StallingRenderer { stall_on: "Bob" });
    let config =
        BatchConfig::new(dir.path()).with_render_timeout(Some(Duration::from_millis(200)));

    let result = run_batch(&records, &renderer, &config).unwrap();

    assert_eq!(result.succeeded, 2);
    assert_eq!(result.failures_with(FailureReason::Timeout), 1);
    assert_eq!(result.failures[0].record_id, "Bob");
    assert_eq!(file_names(&result.artifacts), vec!["Asha.json", "Chen.json"]);
}

#[test]
fn pages_that_do_not_fit_fail_layout() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![student(1, "Asha")];
    let config =
        BatchConfig::new(dir.path().join("cards")).with_canvas(Canvas::new(595.0, 300.0, 36.0));

    let result = run_batch(&records, &svg(), &config).unwrap();

    assert_eq!(result.failures_with(FailureReason::Layout), 1);
    assert!(!dir.path().join("cards").exists());
}

#[test]
fn parallel_workers_match_sequential_output() {
    let names = ["A.B.", "Chen", "A.B.", "Dana", "", "Chen", "Eve", "A.B."];
    let records: Vec<RawRecord> = names
        .iter()
        .enumerate()
        .map(|(index, name)| student(index + 1, name))
        .collect();

    let sequential_dir = tempfile::tempdir().unwrap();
    let parallel_dir = tempfile::tempdir().unwrap();
    let sequential = run_batch(
        &records,
        &svg(),
        &BatchConfig::new(sequential_dir.path()).with_collision(CollisionPolicy::Suffix),
    )
    .unwrap();
    let parallel = run_batch(
        &records,
        &svg(),
        &BatchConfig::new(parallel_dir.path())
            .with_collision(CollisionPolicy::Suffix)
            .with_workers(4),
    )
    .unwrap();

    assert_eq!(parallel.succeeded, 7);
    assert_eq!(parallel.failures, sequential.failures);
    assert_eq!(
        file_names(&parallel.artifacts),
        file_names(&sequential.artifacts)
    );
    let pairs = |result: &BatchResult| -> Vec<(usize, usize)> {
        result
            .collisions
            .iter()
            .map(|c| (c.first_index, c.index))
            .collect()
    };
    assert_eq!(pairs(&parallel), vec![(0, 2), (1, 5), (0, 7)]);
    assert_eq!(pairs(&parallel), pairs(&sequential));
    assert_eq!(files_in(parallel_dir.path()), files_in(sequential_dir.path()));
}

#[test]
fn collisions_across_worker_chunks_resolve_in_input_order() {
    let names = ["Asha", "Bob", "Chen"];
    let records: Vec<RawRecord> = (0..21)
        .map(|index| student(index + 1, names[index % names.len()]))
        .collect();
    let config = |dir: &Path| BatchConfig::new(dir).with_collision(CollisionPolicy::Suffix);

    let sequential_dir = tempfile::tempdir().unwrap();
    let parallel_dir = tempfile::tempdir().unwrap();
    let sequential = run_batch(&records, &svg(), &config(sequential_dir.path())).unwrap();
    let parallel =
        run_batch(&records, &svg(), &config(parallel_dir.path()).with_workers(2)).unwrap();

    assert_eq!(parallel.succeeded, 21);
    assert_eq!(parallel.collisions.len(), 18);
    assert_eq!(
        file_names(&parallel.artifacts),
        file_names(&sequential.artifacts)
    );
    assert_eq!(file_names(&parallel.artifacts)[20], "Chen_7.svg");
    let claims = |result: &BatchResult| -> Vec<(String, usize, usize)> {
        result
            .collisions
            .iter()
            .map(|c| (c.artifact.clone(), c.first_index, c.index))
            .collect()
    };
    assert_eq!(claims(&parallel), claims(&sequential));
    assert_eq!(files_in(parallel_dir.path()), files_in(sequential_dir.path()));
}

#[test]
fn dry_run_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("cards");
    let records = vec![student(1, "Asha"), student(2, "Bob")];
    let config = BatchConfig::new(&out).with_dry_run(true);

    let result = run_batch(&records, &svg(), &config).unwrap();

    assert_eq!(result.succeeded, 2);
    assert_eq!(file_names(&result.artifacts), vec!["Asha.svg", "Bob.svg"]);
    assert!(!out.exists());
}

#[test]
fn unusable_values_become_diagnostics_not_failures() {
    let dir = tempfile::tempdir().unwrap();
    let records = vec![student(1, "Asha").with_field("Weight", "heavy")];

    let result = run_batch(&records, &svg(), &BatchConfig::new(dir.path())).unwrap();

    assert_eq!(result.succeeded, 1);
    assert_eq!(result.diagnostics.len(), 1);
    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.field, Some(FieldId::Weight));
    assert_eq!(diagnostic.source_key, "Weight");
    assert_eq!(diagnostic.record_id, "Asha");
}

#[test]
fn json_column_order_decides_which_name_wins() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("students.json");
    std::fs::write(
        &source,
        r#"[{"Student Name": "Zed First", "Name": "Amy Later", "BMI": "NA"}]"#,
    )
    .unwrap();
    let records = hcard_ingest::read_sources(&[source]).unwrap();
    let config = BatchConfig::new(dir.path().join("cards"));

    let result = run_batch(&records, &svg(), &config).unwrap();

    assert_eq!(file_names(&result.artifacts), vec!["Zed_First.svg"]);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].source_key, "Name");
}

#[test]
fn output_dir_that_is_a_file_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("cards");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let error = run_batch(&[student(1, "Asha")], &svg(), &BatchConfig::new(&blocker));

    assert!(error.is_err());
}
