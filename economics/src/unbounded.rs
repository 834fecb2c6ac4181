//! Serde helper for `f64` fields that may be infinite
//!
//! JSON has no infinity and serde_json writes it as `null`, which then fails
//! to read back. Infinite values are written as the strings `"inf"` and
//! `"-inf"` instead; finite values stay plain numbers.
//!
//! ```ignore
//! #[serde(with = "crate::unbounded")]
//! pub years_to_cap: f64,
//! ```

use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};

const POS_INF: &str = "inf";
const NEG_INF: &str = "-inf";

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_infinite() {
        serializer.serialize_str(if *value > 0.0 { POS_INF } else { NEG_INF })
    } else {
        serializer.serialize_f64(*value)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(f64),
    Text(String),
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Repr::deserialize(deserializer)? {
        Repr::Number(n) => Ok(n),
        Repr::Text(text) => match text.as_str() {
            POS_INF => Ok(f64::INFINITY),
            NEG_INF => Ok(f64::NEG_INFINITY),
            other => Err(D::Error::custom(format!(
                "expected a number, \"inf\" or \"-inf\", got {:?}",
                other
            ))),
        },
    }
}
