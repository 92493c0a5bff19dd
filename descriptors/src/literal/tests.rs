use googletest::prelude::*;
use test_casing::{TestCases, cases, test_casing};

use super::*;

const COERCE_OK_CASES: TestCases<(LiteralValue, DataType, LiteralValue)> = cases! {
    [
        (LiteralValue::String("42".into()), DataType::Integer, LiteralValue::Integer(42)),
        (LiteralValue::String(" -7 ".into()), DataType::Integer, LiteralValue::Integer(-7)),
        (LiteralValue::Float(3.9), DataType::Integer, LiteralValue::Integer(3)),
        (LiteralValue::Boolean(true), DataType::Integer, LiteralValue::Integer(1)),
        (LiteralValue::String("2.5".into()), DataType::Float, LiteralValue::Float(2.5)),
        (LiteralValue::Integer(2), DataType::Float, LiteralValue::Float(2.0)),
        (LiteralValue::Integer(2), DataType::String, LiteralValue::String("2".into())),
        (LiteralValue::Float(2.0), DataType::String, LiteralValue::String("2.0".into())),
        (LiteralValue::Boolean(false), DataType::String, LiteralValue::String("false".into())),
        (LiteralValue::String("True".into()), DataType::Boolean, LiteralValue::Boolean(true)),
        (LiteralValue::String("no".into()), DataType::Boolean, LiteralValue::Boolean(false)),
        (LiteralValue::Integer(0), DataType::Boolean, LiteralValue::Boolean(false)),
    ]
};

#[test]
fn test_coerce_ok_cases_len() {
    assert_eq!(12, COERCE_OK_CASES.into_iter().count());
}

#[test_casing(12, COERCE_OK_CASES)]
#[gtest]
fn test_coerce_ok(raw: LiteralValue, data_type: DataType, expected: LiteralValue) {
    expect_that!(data_type.coerce(&raw), ok(eq(&expected)));
}

const COERCE_ERR_CASES: TestCases<(LiteralValue, DataType)> = cases! {
    [
        (LiteralValue::String("forty-two".into()), DataType::Integer),
        (LiteralValue::String("4.2".into()), DataType::Integer),
        (LiteralValue::Float(f64::NAN), DataType::Integer),
        (LiteralValue::Float(1e300), DataType::Integer),
        (LiteralValue::String("".into()), DataType::Float),
        (LiteralValue::String("maybe".into()), DataType::Boolean),
        (LiteralValue::Integer(2), DataType::Boolean),
        (LiteralValue::Float(1.0), DataType::Boolean),
    ]
};

#[test]
fn test_coerce_err_cases_len() {
    assert_eq!(8, COERCE_ERR_CASES.into_iter().count());
}

#[test_casing(8, COERCE_ERR_CASES)]
#[gtest]
fn test_coerce_err(raw: LiteralValue, data_type: DataType) {
    expect_that!(
        data_type.coerce(&raw).map_err(|err| err.data_type),
        err(eq(&data_type))
    );
}

#[gtest]
fn test_validate_coercion_failure_carries_raw_value() {
    let got = validate(
        &LiteralValue::String("abc".into()),
        DataType::Integer,
        &AllowedValues::Any,
        None,
    )
    .unwrap_err();

    expect_that!(got.value, eq("abc"));
    expect_true!(matches!(got.cause, InvalidValueCause::Coercion(_)));
}

#[gtest]
fn test_validate_wildcard_accepts_any_coercible_value() {
    for raw in ["0", "-12", "999999", " 5"] {
        expect_that!(
            validate(&raw.into(), DataType::Integer, &AllowedValues::Any, None),
            ok(anything())
        );
    }
}

#[gtest]
fn test_validate_round_trips_integer_from_text() {
    expect_that!(
        validate(&"42".into(), DataType::Integer, &AllowedValues::Any, None),
        ok(eq(&LiteralValue::Integer(42)))
    );
}

const SPACED_RANGE_CASES: TestCases<(i64, bool)> = cases! {
    [
        (0, true),
        (2, true),
        (4, true),
        (6, true),
        (8, true),
        (10, true),
        (1, false),
        (3, false),
        (5, false),
        (11, false),
        (-2, false),
    ]
};

#[test]
fn test_spaced_range_cases_len() {
    assert_eq!(11, SPACED_RANGE_CASES.into_iter().count());
}

#[test_casing(11, SPACED_RANGE_CASES)]
#[gtest]
fn test_validate_spaced_range(value: i64, accepted: bool) {
    let allowed = AllowedValues::Entries(vec![AllowedValue::range(0.0, 10.0)]);

    let got = validate(&value.into(), DataType::Integer, &allowed, Some(2.0));

    if accepted {
        expect_that!(got, ok(eq(&LiteralValue::Integer(value))));
    } else {
        expect_that!(
            got.map_err(|err| err.cause),
            err(eq(&InvalidValueCause::NoMatchingDomainEntry))
        );
    }
}

#[gtest]
fn test_validate_float_spacing_tolerates_rounding() {
    let allowed = AllowedValues::Entries(vec![AllowedValue::range(0.0, 1.0)]);

    expect_that!(
        validate(&"0.3".into(), DataType::Float, &allowed, Some(0.1)),
        ok(eq(&LiteralValue::Float(0.3)))
    );
    expect_that!(
        validate(&"0.35".into(), DataType::Float, &allowed, Some(0.1)),
        err(anything())
    );
}

const FAR_SPACED_FLOAT_CASES: TestCases<(&'static str, bool)> = cases! {
    [
        ("0.3", true),
        ("123456.7", true),
        ("1234567.3", true),
        ("9999999.9", true),
        ("10000000", true),
        ("0.35", false),
        ("9999999.85", false),
    ]
};

#[test]
fn test_far_spaced_float_cases_len() {
    assert_eq!(7, FAR_SPACED_FLOAT_CASES.into_iter().count());
}

#[test_casing(7, FAR_SPACED_FLOAT_CASES)]
#[gtest]
fn test_validate_float_spacing_far_from_low_bound(value: &str, accepted: bool) {
    let allowed = AllowedValues::Entries(vec![AllowedValue::range(0.0, 1e7)]);

    let got = validate(&value.into(), DataType::Float, &allowed, Some(0.1));

    if accepted {
        expect_that!(got, ok(anything()));
    } else {
        expect_that!(
            got.map_err(|err| err.cause),
            err(eq(&InvalidValueCause::NoMatchingDomainEntry))
        );
    }
}

#[gtest]
fn test_validate_discrete_values() {
    let allowed = AllowedValues::entries(["A", "B"]);

    expect_that!(
        validate(&"A".into(), DataType::String, &allowed, None),
        ok(eq(&LiteralValue::String("A".into())))
    );
    expect_that!(
        validate(&"C".into(), DataType::String, &allowed, None),
        err(eq(&InvalidParameterValue {
            value: "C".into(),
            cause: InvalidValueCause::NoMatchingDomainEntry,
        }))
    );
}

#[gtest]
fn test_validate_discrete_values_compare_by_text() {
    let allowed = AllowedValues::entries([1.0_f64]);

    // GIVEN: an integer 1, whose text "1" differs from the allowed "1.0".
    expect_that!(
        validate(&LiteralValue::Integer(1), DataType::Integer, &allowed, None),
        err(anything())
    );
    // GIVEN: a float 1.0, whose text matches.
    expect_that!(
        validate(&"1".into(), DataType::Float, &allowed, None),
        ok(eq(&LiteralValue::Float(1.0)))
    );
    // GIVEN: a string against a numeric allowed value with the same text.
    expect_that!(
        validate(&"1.0".into(), DataType::String, &allowed, None),
        ok(anything())
    );
}

#[gtest]
fn test_validate_boolean_domain() {
    let allowed = AllowedValues::entries([true, false]);

    expect_that!(
        validate(&"false".into(), DataType::Boolean, &allowed, None),
        ok(eq(&LiteralValue::Boolean(false)))
    );
}

#[gtest]
fn test_validate_reversed_range_never_matches() {
    let allowed = AllowedValues::Entries(vec![AllowedValue::range(10.0, 0.0)]);

    for value in [0_i64, 5, 10] {
        expect_that!(
            validate(&value.into(), DataType::Integer, &allowed, None),
            err(anything())
        );
    }
}

#[gtest]
fn test_validate_checks_later_entries_after_range_rejects() {
    let allowed = AllowedValues::Entries(vec![
        AllowedValue::range(0.0, 10.0),
        AllowedValue::from(15_i64),
    ]);

    // Outside the range, so the spacing is never consulted.
    expect_that!(
        validate(&LiteralValue::Integer(15), DataType::Integer, &allowed, Some(2.0)),
        ok(eq(&LiteralValue::Integer(15)))
    );
    // Inside the range but off the spacing, and no later entry matches.
    expect_that!(
        validate(&LiteralValue::Integer(3), DataType::Integer, &allowed, Some(2.0)),
        err(anything())
    );
}

#[gtest]
fn test_validate_range_ignores_non_numeric_values() {
    let allowed = AllowedValues::Entries(vec![AllowedValue::range(0.0, 10.0)]);

    expect_that!(
        validate(&"5".into(), DataType::String, &allowed, None),
        err(anything())
    );
}

#[gtest]
fn test_literal_value_display() {
    expect_that!(LiteralValue::Float(1.0).to_string(), eq("1.0"));
    expect_that!(LiteralValue::Float(0.25).to_string(), eq("0.25"));
    expect_that!(LiteralValue::Float(-3.0).to_string(), eq("-3.0"));
    expect_that!(LiteralValue::Integer(-3).to_string(), eq("-3"));
    expect_that!(LiteralValue::Boolean(true).to_string(), eq("true"));
    expect_that!(LiteralValue::String("x y".into()).to_string(), eq("x y"));
}

#[gtest]
fn test_literal_spec_coerces_default() -> Result<()> {
    let spec = LiteralSpec::try_from(LiteralSpecConfig {
        data_type: DataType::Integer,
        default: Some("5".into()),
        ..Default::default()
    })?;

    expect_that!(spec.default_value(), some(eq(&LiteralValue::Integer(5))));
    Ok(())
}

#[gtest]
fn test_literal_spec_rejects_invalid_default() {
    let got = LiteralSpec::try_from(LiteralSpecConfig {
        data_type: DataType::Integer,
        allowed_values: AllowedValues::Entries(vec![AllowedValue::range(0.0, 10.0)]),
        default: Some(LiteralValue::Integer(20)),
        ..Default::default()
    });

    expect_true!(matches!(got, Err(ConfigurationError::InvalidDefault(_))));
}

const INVALID_SPACING_CASES: TestCases<f64> = cases! {
    [0.0, -1.0, f64::NAN, f64::INFINITY]
};

#[test_casing(4, INVALID_SPACING_CASES)]
#[gtest]
fn test_literal_spec_rejects_invalid_spacing(spacing: f64) {
    let got = LiteralSpec::try_from(LiteralSpecConfig {
        data_type: DataType::Float,
        spacing: Some(spacing),
        ..Default::default()
    });

    expect_true!(matches!(got, Err(ConfigurationError::InvalidSpacing(_))));
}

#[gtest]
#[test_log::test]
fn test_literal_spec_accepts_reversed_range() {
    let got = LiteralSpec::try_from(LiteralSpecConfig {
        data_type: DataType::Integer,
        allowed_values: AllowedValues::Entries(vec![AllowedValue::range(10.0, 0.0)]),
        ..Default::default()
    });

    expect_that!(got, ok(anything()));
}

#[gtest]
fn test_literal_spec_selected_uom_is_first() -> Result<()> {
    let spec = LiteralSpec::try_from(LiteralSpecConfig {
        data_type: DataType::Float,
        uoms: vec!["metre".into(), "feet".into()],
        ..Default::default()
    })?;

    expect_that!(spec.selected_uom(), some(eq("metre")));
    expect_that!(LiteralSpec::new(DataType::Float).selected_uom(), none());
    Ok(())
}

#[gtest]
fn test_deserialize_literal_spec() -> Result<()> {
    let spec: LiteralSpec = serde_yaml_ng::from_str(
        r#"
data_type: integer
allowed_values:
    - [0, 10]
    - 15
spacing: 2
default: 4
"#,
    )?;

    expect_that!(spec.data_type(), eq(DataType::Integer));
    expect_that!(
        spec.allowed_values(),
        eq(&AllowedValues::Entries(vec![
            AllowedValue::range(0.0, 10.0),
            AllowedValue::from(15_i64),
        ]))
    );
    expect_that!(spec.spacing(), some(eq(2.0)));
    expect_that!(spec.default_value(), some(eq(&LiteralValue::Integer(4))));
    Ok(())
}

#[gtest]
fn test_deserialize_defaults_to_string_wildcard() -> Result<()> {
    let spec: LiteralSpec = serde_yaml_ng::from_str("{}")?;

    expect_that!(spec, eq(&LiteralSpec::new(DataType::String)));
    Ok(())
}

const WILDCARD_CASES: TestCases<&'static str> = cases! {
    [
        "allowed_values: '*'",
        "allowed_values: [a, '*']",
    ]
};

#[test_casing(2, WILDCARD_CASES)]
#[gtest]
fn test_deserialize_wildcard(input: &'static str) -> Result<()> {
    let spec: LiteralSpec = serde_yaml_ng::from_str(input)?;

    expect_that!(spec.allowed_values(), eq(&AllowedValues::Any));
    Ok(())
}

#[gtest]
fn test_deserialize_single_discrete_value() -> Result<()> {
    let spec: LiteralSpec = serde_yaml_ng::from_str("allowed_values: only")?;

    expect_that!(spec.allowed_values(), eq(&AllowedValues::entries(["only"])));
    Ok(())
}

#[gtest]
fn test_deserialize_rejects_non_numeric_range() {
    expect_that!(
        serde_yaml_ng::from_str::<LiteralSpec>("allowed_values: [[a, z]]"),
        err(anything())
    );
}

#[gtest]
fn test_allowed_values_serialize_round_trip() -> Result<()> {
    let allowed = AllowedValues::Entries(vec![
        AllowedValue::range(0.0, 10.0),
        AllowedValue::from("x"),
    ]);

    let json = serde_json::to_string(&allowed)?;
    expect_that!(json, eq(r#"[[0.0,10.0],"x"]"#));
    expect_that!(
        serde_json::from_str::<AllowedValues>(&json)?,
        eq(&allowed)
    );
    expect_that!(serde_json::to_string(&AllowedValues::Any)?, eq(r#""*""#));
    Ok(())
}
