// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Encoding for `f64` attribute fields.
//!
//! JSON has no literal for non-finite numbers and `serde_json` writes them
//! as `null`, which no `f64` field decodes. Finite values stay numbers;
//! infinities and NaN are written as the strings `"Infinity"`,
//! `"-Infinity"` and `"NaN"`.

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serializer};

const POS_INF: &str = "Infinity";
const NEG_INF: &str = "-Infinity";
const NAN: &str = "NaN";

#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str(NAN)
    } else if value.is_sign_positive() {
        serializer.serialize_str(POS_INF)
    } else {
        serializer.serialize_str(NEG_INF)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Encoded {
    Number(f64),
    Text(String),
}

pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Encoded::deserialize(deserializer)? {
        Encoded::Number(value) => Ok(value),
        Encoded::Text(text) => match text.as_str() {
            POS_INF => Ok(f64::INFINITY),
            NEG_INF => Ok(f64::NEG_INFINITY),
            NAN => Ok(f64::NAN),
            other => Err(de::Error::invalid_value(
                Unexpected::Str(other),
                &"a number, \"Infinity\", \"-Infinity\" or \"NaN\"",
            )),
        },
    }
}
