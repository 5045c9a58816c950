//! Number rendering for the detail block.
//!
//! The detail block prints numbers the way the probe server wrote them. The
//! server writes whole values without a decimal point (`"avg_ms":150`), so
//! the shortest form is the default; a whole value that arrived as `150.0`
//! keeps its point.

/// Render a float the way a float literal prints: `150.0`, `12.345`.
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// Render a number in its shortest form: `60`, `62.5`, `0`.
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

/// Round a millisecond value to a whole number for labels, halves to even.
pub fn format_whole_ms(value: f64) -> String {
    format!("{:.0}", value)
}
