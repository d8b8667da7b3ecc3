//! Serde helpers for `f64` fields that may legitimately be infinite.
//!
//! JSON has no infinity literal and `serde_json` would write `null`, which
//! does not read back as `f64`. Non-finite values are written as the strings
//! `"inf"`, `"-inf"` and `"nan"`; finite values stay plain numbers.

use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("nan")
    } else if *value > 0.0 {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(v) => Ok(v),
        NumberOrText::Text(s) => match s.to_ascii_lowercase().as_str() {
            "inf" | "+inf" | "infinity" | "∞" => Ok(f64::INFINITY),
            "-inf" | "-infinity" => Ok(f64::NEG_INFINITY),
            "nan" => Ok(f64::NAN),
            other => Err(serde::de::Error::custom(format!(
                "expected a number or inf/-inf/nan, got '{other}'"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super")]
        v: f64,
    }

    #[test]
    fn finite_stays_numeric() {
        let json = serde_json::to_string(&Wrapper { v: 1.5 }).unwrap();
        assert_eq!(json, r#"{"v":1.5}"#);
    }

    #[test]
    fn infinities_round_trip() {
        for v in [f64::INFINITY, f64::NEG_INFINITY] {
            let json = serde_json::to_string(&Wrapper { v }).unwrap();
            let back: Wrapper = serde_json::from_str(&json).unwrap();
            assert_eq!(back.v, v);
        }
    }

    #[test]
    fn rejects_other_text() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"v":"lots"}"#).is_err());
    }
}
