use valinor_encoded_values::DecimalValue;

pub const KMH_PER_MPH: f64 = 1.609_344;
pub const KMH_PER_KNOT: f64 = 1.852;
/// The speed `walk` stands for.
pub const WALKING_SPEED_KMH: f64 = 6.0;

/// Parses a speed tag value into km/h.
///
/// Understands bare numbers (km/h), the `mph`, `knots`, `km/h`, `kmh` and `kph` units,
/// and the special values `none` (no limit) and `walk`, in any case.
/// Returns `None` for anything else, including lists and zone references like `DE:urban`.
pub fn parse_speed(value: &str) -> Option<DecimalValue> {
    let value = value.trim().to_ascii_lowercase();
    let value = value.as_str();
    match value {
        "none" => return Some(DecimalValue::Unlimited),
        "walk" => return Some(DecimalValue::Finite(WALKING_SPEED_KMH)),
        _ => {}
    }

    let (number, factor) = if let Some(number) = value.strip_suffix("mph") {
        (number, KMH_PER_MPH)
    } else if let Some(number) = value.strip_suffix("knots") {
        (number, KMH_PER_KNOT)
    } else if let Some(number) = ["km/h", "kmh", "kph"]
        .iter()
        .find_map(|unit| value.strip_suffix(unit))
    {
        (number, 1.0)
    } else {
        (value, 1.0)
    };

    let speed: f64 = number.trim_end().parse().ok()?;
    (speed.is_finite() && speed > 0.0).then(|| DecimalValue::Finite(speed * factor))
}
