use chrono::NaiveDate;
use hcard_model::{
    BlockKind, Canvas, CanonicalHealthRecord, Document, FieldId, FieldValue, LayoutBlock, Rect,
    Section,
};

fn sample_record() -> CanonicalHealthRecord {
    CanonicalHealthRecord::new()
        .with(FieldId::Name, FieldValue::Text("Jane Doe".to_string()))
        .with(FieldId::Gender, FieldValue::Text("F".to_string()))
        .with(
            FieldId::AssessmentDate,
            FieldValue::Date(NaiveDate::from_ymd_opt(2023, 3, 15).expect("valid date")),
        )
        .with(FieldId::Height, FieldValue::Int(150))
        .with(FieldId::Temperature, FieldValue::Float(98.6))
        .with(FieldId::LeftEye, FieldValue::Text("6/6".to_string()))
}

#[test]
fn canonical_record_serializes_every_field_in_order() {
    insta::assert_json_snapshot!(sample_record(), @r#"
    {
      "name": "Jane Doe",
      "grade_class": null,
      "gender": "F",
      "school": null,
      "section": null,
      "assist_id": null,
      "parent_name": null,
      "parent_contact": null,
      "assessment_date": "2023-03-15",
      "height": 150,
      "weight": null,
      "bmi": null,
      "temperature": 98.6,
      "pulse_rate": null,
      "spo2": null,
      "left_eye": "6/6",
      "right_eye": null,
      "comment": null
    }
    "#);
}

#[test]
fn canonical_record_json_round_trip_keeps_values() {
    let record = sample_record();
    let json = serde_json::to_string(&record).expect("serialize");
    let back: CanonicalHealthRecord = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, record);
    assert_eq!(
        back.assessment_date(),
        NaiveDate::from_ymd_opt(2023, 3, 15)
    );
}

#[test]
fn document_reports_blocks_outside_content_area() {
    let canvas = Canvas::A4;
    let mut document = Document::new(canvas);
    document.push(LayoutBlock::new(
        BlockKind::Heading,
        Section::Identity,
        Rect::new(36.0, 100.0, 200.0, 22.0),
    ));
    assert!(document.first_out_of_bounds().is_none());

    document.push(LayoutBlock::new(
        BlockKind::Text,
        Section::Footer,
        Rect::new(36.0, 800.0, 200.0, 14.0),
    ));
    let offender = document.first_out_of_bounds().expect("footer overflows");
    assert_eq!(offender.section, Section::Footer);
    assert_eq!(document.sections(), vec![Section::Identity, Section::Footer]);
}
