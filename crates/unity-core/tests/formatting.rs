//! Integration tests for Typst rendering of quantities.

use ndarray::{array, Array3};
use unity_core::format::{render_unit, render_value};
use unity_core::{NumberFormat, Quantity, UnitError, Value};

// ---------------------------------------------------------------------------
// Magnitude tiers
// ---------------------------------------------------------------------------

#[test]
fn format_magnitude() {
    let cases = [
        (0.0, r"$ 0 \u{22C5} m $"),
        (0.05, r"$ 5.00E-02 \u{22C5} m $"),
        (0.1, r"$ 0.100 \u{22C5} m $"),
        (5.0, r"$ 5.000 \u{22C5} m $"),
        (9.999, r"$ 9.999 \u{22C5} m $"),
        (10.0, r"$ 10.00 \u{22C5} m $"),
        (99.99, r"$ 99.99 \u{22C5} m $"),
        (100.0, r"$ 100.0 \u{22C5} m $"),
        (999.9, r"$ 999.9 \u{22C5} m $"),
        (1000.0, r"$ 1000 \u{22C5} m $"),
        (9999.9, r"$ 10000 \u{22C5} m $"),
        (10000.0, r"$ 1.00E+04 \u{22C5} m $"),
        (-0.05, r"$ -5.00E-02 \u{22C5} m $"),
        (-5.0, r"$ -5.000 \u{22C5} m $"),
    ];

    for (val, expected) in cases {
        let result = Quantity::new(val, "m").format();
        assert_eq!(result, expected, "Failed for {}", val);
    }
}

#[test]
fn tier_boundaries() {
    assert_eq!(NumberFormat::for_magnitude(0.0), NumberFormat::Integer);
    assert_eq!(NumberFormat::for_magnitude(-0.0), NumberFormat::Integer);
    assert_eq!(NumberFormat::for_magnitude(0.0999), NumberFormat::Scientific { precision: 2, uppercase: true });
    assert_eq!(NumberFormat::for_magnitude(0.1), NumberFormat::Fixed(3));
    assert_eq!(NumberFormat::for_magnitude(10.0), NumberFormat::Fixed(2));
    assert_eq!(NumberFormat::for_magnitude(-100.0), NumberFormat::Fixed(1));
    assert_eq!(NumberFormat::for_magnitude(1000.0), NumberFormat::Fixed(0));
    assert_eq!(NumberFormat::for_magnitude(9999.9), NumberFormat::Fixed(0));
    assert_eq!(NumberFormat::for_magnitude(9999.91), NumberFormat::Scientific { precision: 2, uppercase: true });
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

#[test]
fn format_units() {
    let cases = [
        ("kg", r"$ 5.000 \u{22C5} kg $"),
        ("m2", r"$ 5.000 \u{22C5} m#super[2] $"),
        ("m-1", r"$ 5.000 \u{22C5} m#super[-1] $"),
        ("kg m s-2", r"$ 5.000 \u{22C5} kg \u{22C5} m \u{22C5} s#super[-2] $"),
        ("kg mm-2", r"$ 5.000 \u{22C5} kg \u{22C5} mm#super[-2] $"),
    ];

    for (unit, expected) in cases {
        let result = Quantity::new(5.0, unit).format();
        assert_eq!(result, expected, "Failed for 5.0 {}", unit);
    }
}

#[test]
fn derived_units_are_rendered_as_written() {
    // "N" and "kg m s-2" are the same dimension but render differently.
    assert_ne!(
        Quantity::new(5.0, "N").format(),
        Quantity::new(5.0, "kg m s-2").format()
    );
}

#[test]
fn render_unit_edge_cases() {
    assert_eq!(render_unit("m1"), "m#super[1]");
    assert_eq!(render_unit("  kg   m "), r"kg \u{22C5} m");
    assert_eq!(render_unit("°C"), "°C");
    assert_eq!(render_unit(""), "");
}

#[test]
fn dimensionless_has_no_unit_suffix() {
    assert_eq!(Quantity::new(5.0, "").format(), "$ 5.000 $");
    assert_eq!(Quantity::new(5.0, "   ").format(), "$ 5.000 $");
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

#[test]
fn format_array_1d() {
    let q = Quantity::new(vec![1.5, 25.0, 1234.0], "m");
    assert_eq!(q.format(), r"$ [1.500, 25.00, 1234] \u{22C5} m $");
}

#[test]
fn format_array_scientific() {
    let q = Quantity::new(vec![0.001, 0.05, 10000.0], "m");
    assert_eq!(q.format(), r"$ [1.00E-03, 5.00E-02, 1.00E+04] \u{22C5} m $");
}

#[test]
fn format_array_2d_nests_rows() {
    let q = Quantity::new(array![[1.0, 20.0], [300.0, 0.0]], "kg");
    assert_eq!(q.format(), r"$ [[1.000, 20.00], [300.0, 0]] \u{22C5} kg $");
}

#[test]
fn format_higher_rank_recurses_by_shape() {
    let cube = Array3::from_shape_vec((2, 1, 2), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    assert_eq!(
        render_value(&Value::from(cube), None),
        "[[[1.000, 2.000]], [[3.000, 4.000]]]"
    );
}

#[test]
fn format_empty_array() {
    assert_eq!(render_value(&Value::from(Vec::<f64>::new()), None), "[]");
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

#[test]
fn override_applies_to_every_element() {
    let fmt: NumberFormat = ".1f".parse().unwrap();
    let q = Quantity::new(vec![0.05, 12345.0], "m");
    assert_eq!(q.format_with(Some(fmt)), r"$ [0.1, 12345.0] \u{22C5} m $");

    let fmt: NumberFormat = ".3e".parse().unwrap();
    assert_eq!(Quantity::new(5.0, "s").format_with(Some(fmt)), r"$ 5.000e+00 \u{22C5} s $");

    let fmt: NumberFormat = ".0f".parse().unwrap();
    assert_eq!(Quantity::new(0.4, "").format_with(Some(fmt)), "$ 0 $");
}

#[test]
fn invalid_override_is_rejected() {
    assert!("%d".parse::<NumberFormat>().is_err());
}

#[test]
fn oversized_precision_is_rejected() {
    assert_eq!(
        ".70000f".parse::<NumberFormat>(),
        Err(UnitError::InvalidFormat(".70000f".to_string()))
    );
    assert!(".99999999999999999999999E".parse::<NumberFormat>().is_err());

    let fmt: NumberFormat = ".20f".parse().unwrap();
    assert_eq!(
        Quantity::new(1.0, "m").format_with(Some(fmt)),
        r"$ 1.00000000000000000000 \u{22C5} m $"
    );
}

// ---------------------------------------------------------------------------
// Non-finite values
// ---------------------------------------------------------------------------

#[test]
fn non_finite_values() {
    assert_eq!(
        Quantity::new(f64::INFINITY, "m").format(),
        r"$ INF \u{22C5} m $"
    );
    assert_eq!(
        Quantity::new(f64::NEG_INFINITY, "m").format(),
        r"$ -INF \u{22C5} m $"
    );
    assert_eq!(Quantity::new(f64::NAN, "").format(), "$ nan $");

    let fmt: NumberFormat = ".2e".parse().unwrap();
    assert_eq!(fmt.apply(f64::INFINITY), "inf");
    assert_eq!(NumberFormat::Scientific { precision: 2, uppercase: true }.apply(f64::NAN), "NAN");
    assert_eq!(NumberFormat::Fixed(3).apply(f64::NEG_INFINITY), "-inf");
}
