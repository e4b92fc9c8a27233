use chrono::{Days, NaiveDate};
use proptest::prelude::*;

use hcard_model::{FieldId, FieldValue, RawRecord, RawValue};
use hcard_normalization::{
    FIELD_SPECS, MAX_SERIAL, decode_spreadsheet_date, decode_value, encode_spreadsheet_date,
    lookup_field, normalize, normalize_with_diagnostics,
};

fn all_aliases() -> Vec<(FieldId, &'static str)> {
    FIELD_SPECS
        .iter()
        .flat_map(|spec| spec.aliases.iter().map(move |alias| (spec.id, *alias)))
        .collect()
}

proptest! {
    #[test]
    fn header_spelling_variants_match_one_field(
        (id, alias) in proptest::sample::select(all_aliases()),
        upper in proptest::collection::vec(any::<bool>(), 1..32),
        separator in "[ \t/_]{1,3}",
        padding in "[ \t]{0,2}",
    ) {
        let mut variant = padding.clone();
        for (idx, ch) in alias.chars().enumerate() {
            if ch == ' ' {
                variant.push_str(&separator);
            } else if upper[idx % upper.len()] {
                variant.extend(ch.to_uppercase());
            } else {
                variant.extend(ch.to_lowercase());
            }
        }
        variant.push_str(&padding);
        prop_assert_eq!(lookup_field(&variant), Some(id));
    }

    #[test]
    fn whole_day_serials_round_trip(serial in 0i64..=MAX_SERIAL) {
        let date = decode_spreadsheet_date(serial as f64).expect("in range");
        prop_assert_eq!(encode_spreadsheet_date(date), serial);
    }

    #[test]
    fn time_of_day_never_changes_the_date(serial in 0i64..MAX_SERIAL, fraction in 0.0f64..0.999) {
        let whole = decode_spreadsheet_date(serial as f64).expect("in range");
        let with_time = decode_spreadsheet_date(serial as f64 + fraction).expect("in range");
        prop_assert_eq!(whole, with_time);
    }

    #[test]
    fn non_numeric_text_decodes_to_missing(text in "[a-zA-Z ]{1,12}") {
        prop_assert_eq!(decode_value(&RawValue::text(text)), FieldValue::Missing);
    }
}

#[test]
fn surname_na_is_a_name_not_a_sentinel() {
    let record = normalize(&RawRecord::new(1).with_field("Name", "Na"));
    assert_eq!(record.name(), Some("Na"));
    let record = normalize(&RawRecord::new(1).with_field("Name", "NA"));
    assert_eq!(record.name(), None);
}

#[test]
fn grade_class_spellings_are_equivalent() {
    let a = normalize(&RawRecord::new(1).with_field("GRADE  / CLASS", "5B"));
    let b = normalize(&RawRecord::new(1).with_field("grade_class", "5B"));
    assert_eq!(a, b);
    assert_eq!(a.get(FieldId::GradeClass), &FieldValue::Text("5B".to_string()));
}

#[test]
fn assessment_scenario_row() {
    let raw = RawRecord::new(1)
        .with_field("Student's Name", "Jane Doe")
        .with_field("DATE OF ASSESSMENT", 45000i64)
        .with_field("HEIGHT (cm)", 150i64)
        .with_field("BMI", "NA");

    let outcome = normalize_with_diagnostics(&raw);
    let record = &outcome.record;

    let expected_date = NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.checked_add_days(Days::new(45000)))
        .expect("valid date");
    assert_eq!(record.name(), Some("Jane Doe"));
    assert_eq!(record.assessment_date(), Some(expected_date));
    assert_eq!(record.get(FieldId::Height), &FieldValue::Int(150));
    assert_eq!(record.get(FieldId::Bmi), &FieldValue::Missing);
    assert!(outcome.is_clean());
    assert!(outcome.unmatched_keys.is_empty());
}

#[test]
fn every_field_is_present_after_normalization() {
    let record = normalize(&RawRecord::new(1).with_field("Name", "Solo"));
    assert_eq!(record.iter().count(), FieldId::COUNT);
    assert_eq!(record.present_count(), 1);
}

#[test]
fn phone_numbers_from_spreadsheets_lose_exponent() {
    let record = normalize(
        &RawRecord::new(1)
            .with_field("Parent Contact Number", 9.876543210e9)
            .with_field("Remarks", "  Needs follow-up  "),
    );
    assert_eq!(
        record.get(FieldId::ParentContact),
        &FieldValue::Text("9876543210".to_string())
    );
    assert_eq!(
        record.get(FieldId::Comment),
        &FieldValue::Text("Needs follow-up".to_string())
    );
}
