use waterfall_chart::ChartError;
use waterfall_chart::api::{FormatKind, NumberFormat, NumberFormatter};

fn format(specifier: &str, value: f64) -> String {
    NumberFormat::parse(specifier)
        .expect("valid specifier")
        .format(value)
}

#[test]
fn smart_number_is_default_and_compact() {
    assert_eq!(NumberFormat::parse("").expect("empty"), NumberFormat::Smart);
    assert_eq!(NumberFormat::parse("SMART_NUMBER").expect("smart"), NumberFormat::Smart);

    let smart = NumberFormat::Smart;
    assert_eq!(smart.format(0.0), "0");
    assert_eq!(smart.format(42.0), "42");
    assert_eq!(smart.format(-42.0), "-42");
    assert_eq!(smart.format(3.14159), "3.14");
    assert_eq!(smart.format(0.012345), "0.0123");
    assert_eq!(smart.format(1_234.0), "1.23k");
    assert_eq!(smart.format(-2_500.0), "-2.5k");
    assert_eq!(smart.format(1_000_000.0), "1M");
    assert_eq!(smart.format(f64::NAN), "NaN");
}

#[test]
fn smart_number_switches_to_exponent_past_si_prefixes() {
    let smart = NumberFormat::Smart;
    assert_eq!(smart.format(1.5e308), "1.5e+308");
    assert_eq!(smart.format(-f64::MAX), "-1.8e+308");
    assert_eq!(smart.format(1e-30), "1e-30");
    assert_eq!(smart.format(2.5e-29), "2.5e-29");
    assert_eq!(smart.format(0.000_012), "0.000012");
}

#[test]
fn rounded_and_precision_patterns() {
    assert_eq!(format(".2r", 1_234.0), "1200");
    assert_eq!(format(",.2r", 1_234_567.0), "1,200,000");
    assert_eq!(format(".4r", 3.14159), "3.142");
    assert_eq!(format(".2r", 9.99), "10");
    assert_eq!(format(".3r", -0.0123456), "-0.0123");
    assert_eq!(format(".2g", 1_234.0), "1.2e+3");
    assert_eq!(format(".4g", 3.14159), "3.142");
    assert_eq!(format(".3g", 0.000_000_012_34), "1.23e-8");
    assert_eq!(format(".3g", 0.5), "0.500");
    assert_eq!(format(".3~g", 0.5), "0.5");
    assert_eq!(format("$,.4r", 98_766.0), "$98,770");

    let NumberFormat::Pattern(pattern) = NumberFormat::parse(".4r").expect("pattern") else {
        panic!("expected a pattern");
    };
    assert_eq!(pattern.kind, FormatKind::Rounded);
    assert_eq!(pattern.precision, Some(4));
}

#[test]
fn fixed_and_integer_patterns() {
    assert_eq!(format(",d", 1_234_567.4), "1,234,567");
    assert_eq!(format(",.2f", 1_234.5), "1,234.50");
    assert_eq!(format(".0f", 7.0), "7");
    assert_eq!(format("~f", 2.5), "2.5");
    assert_eq!(format(".2f", -0.001), "0.00");
}

#[test]
fn sign_and_currency_prefixes() {
    assert_eq!(format("$,.2f", -1_234.5), "-$1,234.50");
    assert_eq!(format("$,.2f", 99.0), "$99.00");
    assert_eq!(format("+,d", 1_500.0), "+1,500");
    assert_eq!(format("+,d", -1_500.0), "-1,500");
}

#[test]
fn percent_si_and_exponent_patterns() {
    assert_eq!(format(".1%", 0.256), "25.6%");
    assert_eq!(format(".0%", -0.5), "-50%");
    assert_eq!(format(".3s", 1_234.0), "1.23k");
    assert_eq!(format(".3~s", 1_500.0), "1.5k");
    assert_eq!(format(".2s", 0.0012), "1.2m");
    assert_eq!(format(".1e", 15_000.0), "1.5e+4");
    assert_eq!(format(".1e", 0.00015), "1.5e-4");
}

#[test]
fn general_pattern_keeps_shortest_representation() {
    assert_eq!(format(",", 1_234.5), "1,234.5");
    assert_eq!(format("", 1_234.5), "1.23k");
}

#[test]
fn parsed_pattern_exposes_fields() {
    let NumberFormat::Pattern(pattern) = NumberFormat::parse("$+,.3~s").expect("pattern") else {
        panic!("expected a pattern");
    };
    assert!(pattern.currency);
    assert!(pattern.explicit_plus);
    assert!(pattern.grouping);
    assert!(pattern.trim);
    assert_eq!(pattern.precision, Some(3));
    assert_eq!(pattern.kind, FormatKind::Si);
}

#[test]
fn invalid_specifiers_are_rejected() {
    for specifier in ["abc", "..2f", ".2fx", ".25f", ",.f", "q"] {
        let err = NumberFormat::parse(specifier).expect_err("invalid specifier");
        assert!(
            matches!(err, ChartError::InvalidNumberFormat { .. }),
            "unexpected error for {specifier}: {err}"
        );
    }
}

#[test]
fn closures_are_formatters() {
    let formatter = |value: f64| format!("{value:.1} units");
    assert_eq!(formatter.format(2.0), "2.0 units");
}
