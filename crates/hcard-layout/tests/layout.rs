use chrono::NaiveDate;
use proptest::prelude::*;

use hcard_layout::{
    LayoutEngine, LayoutError, LayoutOptions, MeasuredRowHeight, check_bounds, check_overlaps,
    layout,
    metrics::{FOOTER_GAP, ROW_HEIGHT, SECTION_GAP},
};
use hcard_model::{
    BlockKind, Canvas, CanonicalHealthRecord, FieldId, FieldValue, RawRecord, Section,
};
use hcard_normalization::normalize;

fn full_record() -> CanonicalHealthRecord {
    CanonicalHealthRecord::new()
        .with(FieldId::Name, FieldValue::Text("Jane Doe".to_string()))
        .with(FieldId::GradeClass, FieldValue::Text("5".to_string()))
        .with(FieldId::Gender, FieldValue::Text("F".to_string()))
        .with(FieldId::School, FieldValue::Text("Hillside Public".to_string()))
        .with(FieldId::Section, FieldValue::Text("B".to_string()))
        .with(FieldId::AssistId, FieldValue::Text("AS-0042".to_string()))
        .with(FieldId::ParentName, FieldValue::Text("John Doe".to_string()))
        .with(
            FieldId::AssessmentDate,
            FieldValue::Date(NaiveDate::from_ymd_opt(2023, 3, 15).expect("valid date")),
        )
        .with(FieldId::Height, FieldValue::Int(150))
        .with(FieldId::Weight, FieldValue::Float(42.5))
        .with(FieldId::Temperature, FieldValue::Float(98.6))
        .with(FieldId::PulseRate, FieldValue::Int(82))
        .with(FieldId::Spo2, FieldValue::Int(98))
        .with(FieldId::LeftEye, FieldValue::Text("6/6".to_string()))
        .with(FieldId::RightEye, FieldValue::Text("6/9".to_string()))
        .with(
            FieldId::Comment,
            FieldValue::Text("Refer for eye examination".to_string()),
        )
}

fn section_bottom(document: &hcard_model::Document, section: Section) -> f64 {
    document
        .section_blocks(section)
        .iter()
        .flat_map(|block| block.walk())
        .map(|block| block.rect.bottom())
        .fold(0.0, f64::max)
}

#[test]
fn same_record_yields_identical_documents() {
    let record = full_record();
    let first = serde_json::to_vec(&layout(&record, &Canvas::A4)).expect("serialize");
    let second = serde_json::to_vec(&layout(&record, &Canvas::A4)).expect("serialize");
    assert_eq!(first, second);
}

#[test]
fn scenario_row_renders_missing_bmi_as_placeholder() {
    let raw = RawRecord::new(1)
        .with_field("Student's Name", "Jane Doe")
        .with_field("DATE OF ASSESSMENT", 45000i64)
        .with_field("HEIGHT (cm)", 150i64)
        .with_field("BMI", "NA");
    let document = layout(&normalize(&raw), &Canvas::A4);

    assert_eq!(document.value_for_label("BMI"), Some("NA"));
    assert_eq!(document.value_for_label("Height (cm)"), Some("150"));
    assert_eq!(document.value_for_label("Name"), Some("Jane Doe"));
    assert_eq!(
        document.value_for_label("Date of Assessment"),
        Some("15-03-2023")
    );
}

#[test]
fn missing_fields_never_render_blank() {
    let document = layout(&CanonicalHealthRecord::new(), &Canvas::A4);
    let values: Vec<&str> = document
        .flatten()
        .into_iter()
        .filter(|block| block.kind == BlockKind::Value)
        .filter_map(|block| block.text.as_deref())
        .collect();
    assert_eq!(values.len(), 16);
    assert!(values.iter().all(|text| *text == "NA"));
}

#[test]
fn comments_only_change_vertical_extent() {
    let with_comment = layout(&full_record(), &Canvas::A4);
    let without_comment = layout(
        &full_record().with(FieldId::Comment, FieldValue::Missing),
        &Canvas::A4,
    );

    let mut expected_sections = with_comment.sections();
    expected_sections.retain(|section| *section != Section::Comments);
    assert_eq!(without_comment.sections(), expected_sections);
    assert!(without_comment.section_blocks(Section::Comments).is_empty());

    let shift = with_comment.content_bottom() - without_comment.content_bottom();
    assert_eq!(shift, 60.0 + SECTION_GAP);
}

#[test]
fn footer_is_pinned_below_last_section() {
    let document = layout(&full_record(), &Canvas::A4);
    let signatures_bottom = section_bottom(&document, Section::Signatures);
    let footer = document.section_blocks(Section::Footer);
    assert_eq!(footer[0].kind, BlockKind::Rule);
    assert_eq!(footer[0].rect.y, signatures_bottom + FOOTER_GAP);
    assert!(footer[0].rect.y < document.canvas.content_rect().bottom() - 100.0);
}

#[test]
fn default_page_stays_in_bounds_without_overlap() {
    let options = LayoutOptions::default()
        .with_contact_lines(vec![
            "School Health Programme".to_string(),
            "clinic@example.org | +91 80 5550 0100".to_string(),
        ])
        .with_parent_contact(true);
    let document = LayoutEngine::new(options).layout(&full_record(), &Canvas::A4);
    assert_eq!(check_bounds(&document), Ok(()));
    assert_eq!(check_overlaps(&document), Ok(()));
}

#[test]
fn short_canvas_reports_overflow() {
    let canvas = Canvas::new(595.0, 400.0, 36.0);
    let document = layout(&full_record(), &canvas);
    let err = check_bounds(&document).expect_err("content runs past the page");
    assert!(matches!(err, LayoutError::OutOfBounds { .. }));
}

#[test]
fn measured_rows_grow_and_shift_without_reordering() {
    let long_school = "Government Higher Primary School, North Extension Campus";
    let record = full_record().with(FieldId::School, FieldValue::Text(long_school.to_string()));

    let fixed = layout(&record, &Canvas::A4);
    let measured = LayoutEngine::new(LayoutOptions::default())
        .with_policy(MeasuredRowHeight::default())
        .layout(&record, &Canvas::A4);

    let kinds = |doc: &hcard_model::Document| -> Vec<(Section, BlockKind)> {
        doc.flatten()
            .iter()
            .map(|block| (block.section, block.kind))
            .collect()
    };
    assert_eq!(kinds(&fixed), kinds(&measured));

    let school_row = |doc: &hcard_model::Document| {
        doc.flatten()
            .into_iter()
            .find(|block| {
                block.kind == BlockKind::LabelValue
                    && block.children[0].text.as_deref() == Some("School")
            })
            .map(|block| block.rect.height)
            .expect("school row")
    };
    assert_eq!(school_row(&fixed), ROW_HEIGHT);
    assert!(school_row(&measured) > ROW_HEIGHT);
    assert!(measured.content_bottom() > fixed.content_bottom());
    assert_eq!(check_overlaps(&measured), Ok(()));
}

proptest! {
    #[test]
    fn layout_is_deterministic_for_any_text(
        name in "[A-Za-z .'-]{0,40}",
        comment in proptest::option::of("[A-Za-z0-9 ,.]{1,80}"),
        height in proptest::option::of(50i64..200),
    ) {
        let mut record = full_record()
            .with(FieldId::Name, FieldValue::Text(name))
            .with(FieldId::Comment, comment.map_or(FieldValue::Missing, FieldValue::Text));
        if let Some(height) = height {
            record.set(FieldId::Height, FieldValue::Int(height));
        }
        let first = layout(&record, &Canvas::A4);
        let second = layout(&record, &Canvas::A4);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(check_bounds(&first), Ok(()));
        prop_assert_eq!(check_overlaps(&first), Ok(()));
    }
}
