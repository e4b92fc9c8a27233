use chrono::NaiveDate;
use quick_xml::Reader;
use quick_xml::events::Event;

use hcard_layout::{LayoutEngine, LayoutOptions, layout};
use hcard_model::{Canvas, CanonicalHealthRecord, FieldId, FieldValue};
use hcard_output::{
    JsonDocumentRenderer, Renderer, SvgRenderer, artifact_path, sanitize_file_stem,
    write_artifact, write_records_csv,
};

fn record() -> CanonicalHealthRecord {
    CanonicalHealthRecord::new()
        .with(FieldId::Name, FieldValue::Text("A.B.".to_string()))
        .with(
            FieldId::AssessmentDate,
            FieldValue::Date(NaiveDate::from_ymd_opt(2023, 3, 15).expect("valid date")),
        )
        .with(FieldId::Height, FieldValue::Int(150))
}

fn text_nodes(svg: &[u8]) -> Vec<String> {
    let mut reader = Reader::from_reader(svg);
    let mut buf = Vec::new();
    let mut texts = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).expect("well-formed svg") {
            Event::Text(text) => {
                let value = String::from_utf8_lossy(&text).trim().to_string();
                if !value.is_empty() {
                    texts.push(value);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    texts
}

#[test]
fn svg_page_is_well_formed_and_shows_placeholders() {
    let document = layout(&record(), &Canvas::A4);
    let svg = SvgRenderer::new()
        .with_asset("logo", "logo.png")
        .render(&document)
        .expect("render");
    let texts = text_nodes(&svg);

    assert!(texts.contains(&"Student Health Assessment Report".to_string()));
    assert!(texts.contains(&"A.B.".to_string()));
    assert!(texts.contains(&"15-03-2023".to_string()));
    assert!(texts.contains(&"150".to_string()));
    assert!(texts.iter().filter(|text| text.as_str() == "NA").count() >= 10);
    assert!(!texts.iter().any(|text| text == "Comments"));
}

#[test]
fn renderers_write_named_artifacts() {
    let temp = tempfile::TempDir::new().expect("temp dir");
    let engine = LayoutEngine::new(LayoutOptions::default().with_title("Camp Screening"));
    let document = engine.layout(&record(), &Canvas::A4);
    let stem = sanitize_file_stem("A.B.");

    let renderers: Vec<Box<dyn Renderer>> =
        vec![Box::new(SvgRenderer::new()), Box::new(JsonDocumentRenderer)];
    for renderer in renderers {
        let path = artifact_path(temp.path(), &stem, renderer.extension());
        let bytes = renderer.render(&document).expect("render");
        write_artifact(&path, &bytes).expect("write");
        assert!(path.exists());
    }
    assert!(temp.path().join("A_B_.svg").exists());
    assert!(temp.path().join("A_B_.json").exists());
}

#[test]
fn csv_interchange_round_trips_through_the_csv_reader() {
    let temp = tempfile::TempDir::new().expect("temp dir");
    let path = temp.path().join("export").join("records.csv");
    write_records_csv(&path, &[record(), CanonicalHealthRecord::new()]).expect("write csv");

    let mut reader = csv::Reader::from_path(&path).expect("open csv");
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(headers.len(), FieldId::COUNT);
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.expect("row")).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][FieldId::Name.index()], "A.B.");
    assert_eq!(&rows[0][FieldId::AssessmentDate.index()], "2023-03-15");
    assert!(rows[1].iter().all(str::is_empty));
}
