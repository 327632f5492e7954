use crate::record::EdgeRecord;
use crate::registry::AttributeSlot;
#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

/// A value read from or written to a [`DecimalAttribute`].
///
/// The two sentinels are distinct from each other and from every finite value.
/// Compare against them before treating a value as a finite quantity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DecimalValue {
    /// No concrete value was ever assigned.
    Unset,
    /// The quantity is explicitly unbounded (e.g. a motorway without a legal speed limit).
    Unlimited,
    /// A finite value, quantized to the attribute's step.
    Finite(f64),
}

impl DecimalValue {
    #[inline]
    pub const fn is_unset(self) -> bool {
        matches!(self, DecimalValue::Unset)
    }

    /// The finite value, if there is one.
    #[inline]
    pub const fn finite(self) -> Option<f64> {
        match self {
            DecimalValue::Finite(value) => Some(value),
            DecimalValue::Unset | DecimalValue::Unlimited => None,
        }
    }
}

impl From<f64> for DecimalValue {
    fn from(value: f64) -> Self {
        DecimalValue::Finite(value)
    }
}

/// Unset serializes as null, unlimited as the OSM vocabulary `"none"`.
#[cfg(feature = "serde")]
impl Serialize for DecimalValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DecimalValue::Unset => serializer.serialize_none(),
            DecimalValue::Unlimited => serializer.serialize_str("none"),
            DecimalValue::Finite(value) => serializer.serialize_f64(*value),
        }
    }
}

/// The encoding parameters of a bounded decimal attribute.
///
/// # Encoding
///
/// * Code 0 is reserved for [`DecimalValue::Unset`], so an empty record reads as unset.
/// * If the attribute allows [`DecimalValue::Unlimited`], the all-ones code is reserved for it.
/// * Every other code `c` stands for `min + (c - 1) * step`.
///
/// Finite values are clamped to `[min, max]` and rounded to the nearest step, with ties rounding up.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DecimalSpec {
    bits: u32,
    min: f64,
    step: f64,
    max: f64,
    unlimited: bool,
}

impl DecimalSpec {
    /// The widest decimal field supported.
    pub const MAX_BITS: u32 = 32;

    pub const fn new(bits: u32, min: f64, step: f64, max: f64) -> Self {
        Self {
            bits,
            min,
            step,
            max,
            unlimited: false,
        }
    }

    /// Reserves a code for [`DecimalValue::Unlimited`].
    #[must_use]
    pub const fn with_unlimited(self) -> Self {
        Self {
            unlimited: true,
            ..self
        }
    }

    #[inline]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    #[inline]
    pub const fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub const fn step(&self) -> f64 {
        self.step
    }

    #[inline]
    pub const fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub const fn allows_unlimited(&self) -> bool {
        self.unlimited
    }

    /// The all-ones code of the field.
    const fn top_code(&self) -> u64 {
        bit_twiddling_helpers::word::mask(self.bits)
    }

    /// The number of codes available for finite values.
    fn finite_code_count(&self) -> u64 {
        // Code 0 is unset
        self.top_code() - u64::from(self.unlimited)
    }

    /// Checks that every value in `[min, max]` has its own code.
    pub(crate) fn validate(&self) -> Result<(), String> {
        if self.bits == 0 || self.bits > Self::MAX_BITS {
            return Err(format!(
                "decimal width must be between 1 and {} bits, got {}",
                Self::MAX_BITS,
                self.bits
            ));
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(format!("step must be positive, got {}", self.step));
        }
        if !(self.min.is_finite() && self.max.is_finite() && self.min <= self.max) {
            return Err(format!("invalid bounds [{}, {}]", self.min, self.max));
        }

        let steps = (self.max - self.min) / self.step;
        if (steps - steps.round()).abs() > 1e-9 {
            return Err(format!(
                "range [{}, {}] is not a whole number of {} steps",
                self.min, self.max, self.step
            ));
        }

        let available = f64::from(u32::try_from(self.finite_code_count()).unwrap_or(u32::MAX));
        if steps.round() + 1.0 > available {
            return Err(format!(
                "{} bits cannot hold {} values between {} and {}",
                self.bits,
                steps.round() + 1.0,
                self.min,
                self.max
            ));
        }

        Ok(())
    }

    pub(crate) fn encode(&self, value: DecimalValue) -> u64 {
        match value {
            DecimalValue::Unset => 0,
            DecimalValue::Unlimited if self.unlimited => self.top_code(),
            // Fields without an unlimited code store the largest value they can.
            DecimalValue::Unlimited => self.encode_finite(self.max),
            DecimalValue::Finite(value) if value.is_nan() => 0,
            DecimalValue::Finite(value) => self.encode_finite(value),
        }
    }

    fn encode_finite(&self, value: f64) -> u64 {
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step + 0.5).floor();
        // The value is clamped to the validated range, so the step count is a small non-negative integer.
        #[expect(clippy::cast_possible_truncation)]
        #[expect(clippy::cast_sign_loss)]
        let steps = steps as u64;
        steps + 1
    }

    pub(crate) fn decode(&self, code: u64) -> DecimalValue {
        if code == 0 {
            DecimalValue::Unset
        } else if self.unlimited && code == self.top_code() {
            DecimalValue::Unlimited
        } else {
            // Decimal fields are at most 32 bits wide.
            let steps = f64::from(u32::try_from(code - 1).unwrap_or(u32::MAX));
            DecimalValue::Finite((self.min + steps * self.step).min(self.max))
        }
    }
}

/// A bounded, quantized decimal attribute (e.g. a speed).
#[derive(Clone, Debug, PartialEq)]
pub struct DecimalAttribute {
    slot: AttributeSlot,
    spec: DecimalSpec,
}

impl DecimalAttribute {
    pub(crate) fn new(slot: AttributeSlot, spec: DecimalSpec) -> Self {
        Self { slot, spec }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.slot.name()
    }

    #[inline]
    pub fn spec(&self) -> &DecimalSpec {
        &self.spec
    }

    #[inline]
    pub fn is_directional(&self) -> bool {
        self.slot.is_directional()
    }

    /// Reads the value for one direction.
    ///
    /// `reverse` is ignored if the attribute is not direction-aware.
    #[inline]
    pub fn get(&self, reverse: bool, record: EdgeRecord) -> DecimalValue {
        self.spec.decode(record.read(self.slot.range(reverse)))
    }

    /// Writes the value for one direction, returning the updated record.
    #[inline]
    #[must_use]
    pub fn set(&self, reverse: bool, record: EdgeRecord, value: DecimalValue) -> EdgeRecord {
        record.write(self.slot.range(reverse), self.spec.encode(value))
    }

    /// Writes both directions at once.
    #[inline]
    #[must_use]
    pub fn set_both(
        &self,
        record: EdgeRecord,
        forward: DecimalValue,
        backward: DecimalValue,
    ) -> EdgeRecord {
        self.set(true, self.set(false, record, forward), backward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AttributeRegistryBuilder;
    use proptest::{prop_assert_eq, proptest};

    const SPEED: DecimalSpec = DecimalSpec::new(7, 0.0, 2.0, 250.0).with_unlimited();

    fn speed_attribute(directional: bool) -> DecimalAttribute {
        let mut builder = AttributeRegistryBuilder::new(32).unwrap();
        builder.add_decimal("speed", SPEED, directional).unwrap()
    }

    #[test]
    fn test_empty_record_is_unset() {
        let attribute = speed_attribute(true);
        assert_eq!(attribute.get(false, EdgeRecord::EMPTY), DecimalValue::Unset);
        assert_eq!(attribute.get(true, EdgeRecord::EMPTY), DecimalValue::Unset);
    }

    #[test]
    fn test_ties_round_up() {
        let attribute = speed_attribute(false);
        let record = attribute.set(false, EdgeRecord::EMPTY, 33.0.into());
        assert_eq!(attribute.get(false, record), DecimalValue::Finite(34.0));

        let record = attribute.set(false, EdgeRecord::EMPTY, 32.9.into());
        assert_eq!(attribute.get(false, record), DecimalValue::Finite(32.0));
    }

    #[test]
    fn test_sentinels_round_trip() {
        let attribute = speed_attribute(false);
        let record = attribute.set(false, EdgeRecord::EMPTY, DecimalValue::Unlimited);
        assert_eq!(attribute.get(false, record), DecimalValue::Unlimited);

        let record = attribute.set(false, record, DecimalValue::Unset);
        assert_eq!(attribute.get(false, record), DecimalValue::Unset);
        assert_eq!(record, EdgeRecord::EMPTY);
    }

    #[test]
    fn test_zero_is_not_unset() {
        let attribute = speed_attribute(false);
        let record = attribute.set(false, EdgeRecord::EMPTY, 0.0.into());
        assert_eq!(attribute.get(false, record), DecimalValue::Finite(0.0));
    }

    #[test]
    fn test_values_are_clamped() {
        let attribute = speed_attribute(false);
        let record = attribute.set(false, EdgeRecord::EMPTY, 400.0.into());
        assert_eq!(attribute.get(false, record), DecimalValue::Finite(250.0));

        let record = attribute.set(false, EdgeRecord::EMPTY, (-4.0).into());
        assert_eq!(attribute.get(false, record), DecimalValue::Finite(0.0));
    }

    #[test]
    fn test_nan_is_unset() {
        let attribute = speed_attribute(false);
        let record = attribute.set(false, EdgeRecord::EMPTY, f64::NAN.into());
        assert_eq!(attribute.get(false, record), DecimalValue::Unset);
    }

    #[test]
    fn test_unlimited_without_reserved_code_saturates() {
        let mut builder = AttributeRegistryBuilder::new(32).unwrap();
        let lanes = builder
            .add_decimal("lanes", DecimalSpec::new(3, 1.0, 1.0, 6.0), false)
            .unwrap();
        let record = lanes.set(false, EdgeRecord::EMPTY, DecimalValue::Unlimited);
        assert_eq!(lanes.get(false, record), DecimalValue::Finite(6.0));
    }

    #[test]
    fn test_directions_are_independent() {
        let attribute = speed_attribute(true);
        let record = attribute.set_both(EdgeRecord::EMPTY, 50.0.into(), 70.0.into());
        assert_eq!(attribute.get(false, record), DecimalValue::Finite(50.0));
        assert_eq!(attribute.get(true, record), DecimalValue::Finite(70.0));

        let record = attribute.set(true, record, DecimalValue::Unset);
        assert_eq!(attribute.get(false, record), DecimalValue::Finite(50.0));
        assert_eq!(attribute.get(true, record), DecimalValue::Unset);
    }

    #[test]
    fn test_reverse_is_ignored_without_direction() {
        let attribute = speed_attribute(false);
        let record = attribute.set(true, EdgeRecord::EMPTY, 90.0.into());
        assert_eq!(attribute.get(false, record), DecimalValue::Finite(90.0));
    }

    #[test]
    fn test_validate_rejects_bad_specs() {
        assert!(DecimalSpec::new(0, 0.0, 1.0, 1.0).validate().is_err());
        assert!(DecimalSpec::new(33, 0.0, 1.0, 1.0).validate().is_err());
        assert!(DecimalSpec::new(7, 0.0, 0.0, 10.0).validate().is_err());
        assert!(DecimalSpec::new(7, 10.0, 1.0, 0.0).validate().is_err());
        // Not a whole number of steps
        assert!(DecimalSpec::new(7, 0.0, 2.0, 251.0).validate().is_err());
        // 127 finite codes hold 0..=252, but not 0..=254
        assert!(DecimalSpec::new(7, 0.0, 2.0, 252.0).validate().is_ok());
        assert!(DecimalSpec::new(7, 0.0, 2.0, 254.0).validate().is_err());
        // The unlimited code eats one more
        assert!(SPEED.validate().is_ok());
        assert!(
            DecimalSpec::new(7, 0.0, 2.0, 252.0)
                .with_unlimited()
                .validate()
                .is_err()
        );
    }

    proptest! {
        #[test]
        fn prop_finite_values_round_to_nearest_step(value in 0.0f64..250.0) {
            let attribute = speed_attribute(true);
            let record = attribute.set(false, EdgeRecord::EMPTY, value.into());
            let expected = ((value / 2.0) + 0.5).floor() * 2.0;
            prop_assert_eq!(attribute.get(false, record), DecimalValue::Finite(expected));
            prop_assert_eq!(attribute.get(true, record), DecimalValue::Unset);
        }

        #[test]
        fn prop_representable_values_are_exact(steps in 0u32..=125) {
            let attribute = speed_attribute(false);
            let value = f64::from(steps) * 2.0;
            let record = attribute.set(false, EdgeRecord::EMPTY, value.into());
            prop_assert_eq!(attribute.get(false, record), DecimalValue::Finite(value));
        }
    }
}
