//! Lenient segment decoding
//!
//! Profile documents are written by hand and by the editor, so segment
//! fields arrive as loosely typed scalars. Decoding coerces them to numbers,
//! applies the per-variant defaults and turns anything unusable into a
//! [`Rejected`] entry instead of failing the whole document.
//!
//! Coercion rules:
//! - numbers pass through
//! - strings are parsed as `f64` after trimming whitespace
//! - booleans become `1.0` / `0.0`
//! - `null` counts as absent
//! - arrays, objects and non-finite results reject the segment
//!
//! Every entry needs a `type` of `"ramp"`, `"hold"` or `"step"`. An entry
//! without one is rejected rather than read as a hold.
//!
//! Fields outside the segment model are kept in `extra` and written back
//! as they were read, nested arrays and objects included.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use super::types::{
    Hold, Ramp, Rejected, Segment, Step, DEFAULT_HOLD_DURATION_S, DEFAULT_RAMP_SLOPE_C_PER_S,
};

/// Document fields outside the profile model, by name
pub type ExtraFields = BTreeMap<String, Scalar>;

/// Loosely typed field value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Bool(bool),
    /// Explicit `null` nested in an array or object
    Null,
    /// Array; never numeric
    List(Vec<Scalar>),
    /// Object; never numeric
    Map(ExtraFields),
}

impl Scalar {
    fn describe(&self) -> String {
        match self {
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Null => String::from("null"),
            Scalar::List(_) | Scalar::Map(_) => String::from("<structured value>"),
        }
    }

    fn to_number(&self, field: &'static str) -> Result<f64, SegmentDecodeError> {
        let value = match self {
            Scalar::Number(n) => *n,
            Scalar::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                SegmentDecodeError::NotNumeric {
                    field,
                    value: s.clone(),
                }
            })?,
            Scalar::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Scalar::Null | Scalar::List(_) | Scalar::Map(_) => {
                return Err(SegmentDecodeError::NotNumeric {
                    field,
                    value: self.describe(),
                })
            }
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(SegmentDecodeError::NonFinite { field })
        }
    }
}

/// Why a document entry could not become a segment
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentDecodeError {
    /// Entry has no `type` field
    MissingType,
    /// `type` names no known segment kind
    UnknownType(String),
    /// Field could not be read as a number
    NotNumeric { field: &'static str, value: String },
    /// Field parsed to NaN or infinity
    NonFinite { field: &'static str },
}

impl fmt::Display for SegmentDecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentDecodeError::MissingType => write!(f, "missing segment type"),
            SegmentDecodeError::UnknownType(kind) => write!(f, "unknown segment type '{}'", kind),
            SegmentDecodeError::NotNumeric { field, value } => {
                write!(f, "field '{}' is not a number: '{}'", field, value)
            }
            SegmentDecodeError::NonFinite { field } => {
                write!(f, "field '{}' is not a finite number", field)
            }
        }
    }
}

/// Segment entry as found in a document, before decoding
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawSegment {
    pub kind: Option<Scalar>,
    pub end_temp: Option<Scalar>,
    pub slope: Option<Scalar>,
    pub duration_s: Option<Scalar>,
    pub temp: Option<Scalar>,
    pub note: Option<Scalar>,
    /// Fields no segment kind uses
    pub extra: ExtraFields,
}

impl RawSegment {
    /// Create an entry with only a `type` tag
    pub fn tagged(kind: &str) -> Self {
        Self {
            kind: Some(Scalar::Text(String::from(kind))),
            ..Default::default()
        }
    }

    /// Note as text, empty when absent or not a string
    pub fn note_text(&self) -> &str {
        match &self.note {
            Some(Scalar::Text(s)) => s,
            _ => "",
        }
    }

    fn note_string(&self) -> String {
        match &self.note {
            Some(value @ (Scalar::Number(_) | Scalar::Text(_) | Scalar::Bool(_))) => {
                value.describe()
            }
            _ => String::new(),
        }
    }
}

fn optional_number(
    field: &'static str,
    value: &Option<Scalar>,
) -> Result<Option<f64>, SegmentDecodeError> {
    match value {
        None | Some(Scalar::Null) => Ok(None),
        Some(v) => v.to_number(field).map(Some),
    }
}

fn number_or(
    field: &'static str,
    value: &Option<Scalar>,
    default: f64,
) -> Result<f64, SegmentDecodeError> {
    Ok(optional_number(field, value)?.unwrap_or(default))
}

fn decode(raw: &RawSegment) -> Result<Segment, SegmentDecodeError> {
    let kind = match &raw.kind {
        None | Some(Scalar::Null) => return Err(SegmentDecodeError::MissingType),
        Some(Scalar::Text(kind)) => kind.as_str(),
        Some(other) => return Err(SegmentDecodeError::UnknownType(other.describe())),
    };
    let note = raw.note_string();

    match kind {
        "ramp" => Ok(Segment::Ramp(Ramp {
            end_temp_c: optional_number("end_temp", &raw.end_temp)?,
            slope_c_per_s: number_or("slope", &raw.slope, DEFAULT_RAMP_SLOPE_C_PER_S)?,
            note,
            extra: raw.extra.clone(),
        })),
        "hold" => Ok(Segment::Hold(Hold {
            duration_s: number_or("duration_s", &raw.duration_s, DEFAULT_HOLD_DURATION_S)?,
            temp_c: optional_number("temp", &raw.temp)?,
            note,
            extra: raw.extra.clone(),
        })),
        "step" => Ok(Segment::Step(Step {
            temp_c: optional_number("temp", &raw.temp)?,
            note,
            extra: raw.extra.clone(),
        })),
        other => Err(SegmentDecodeError::UnknownType(String::from(other))),
    }
}

impl Segment {
    /// Decode a document entry
    ///
    /// Never fails: entries that cannot be decoded become
    /// [`Segment::Rejected`] and are reported when the profile is simulated.
    pub fn from_raw(raw: RawSegment) -> Self {
        match decode(&raw) {
            Ok(segment) => segment,
            Err(cause) => Segment::Rejected(Rejected { raw, cause }),
        }
    }

    /// Convert back to a document entry
    ///
    /// Empty notes are left out.
    pub fn to_raw(&self) -> RawSegment {
        let text = |s: &str| Some(Scalar::Text(String::from(s)));
        let number = |n: Option<f64>| n.map(Scalar::Number);
        let note = |s: &str| if s.is_empty() { None } else { text(s) };

        match self {
            Segment::Ramp(r) => RawSegment {
                kind: text("ramp"),
                end_temp: number(r.end_temp_c),
                slope: number(Some(r.slope_c_per_s)),
                note: note(&r.note),
                extra: r.extra.clone(),
                ..Default::default()
            },
            Segment::Hold(h) => RawSegment {
                kind: text("hold"),
                duration_s: number(Some(h.duration_s)),
                temp: number(h.temp_c),
                note: note(&h.note),
                extra: h.extra.clone(),
                ..Default::default()
            },
            Segment::Step(s) => RawSegment {
                kind: text("step"),
                temp: number(s.temp_c),
                note: note(&s.note),
                extra: s.extra.clone(),
                ..Default::default()
            },
            Segment::Rejected(r) => r.raw.clone(),
        }
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use alloc::string::String;
    use alloc::vec::Vec;
    use core::fmt;

    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{ExtraFields, RawSegment, Scalar, Segment};

    impl Serialize for Scalar {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Scalar::Number(n) => serializer.serialize_f64(*n),
                Scalar::Text(s) => serializer.serialize_str(s),
                Scalar::Bool(b) => serializer.serialize_bool(*b),
                Scalar::Null => serializer.serialize_unit(),
                Scalar::List(items) => serializer.collect_seq(items),
                Scalar::Map(fields) => serializer.collect_map(fields),
            }
        }
    }

    struct ScalarVisitor;

    impl<'de> Visitor<'de> for ScalarVisitor {
        type Value = Scalar;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("any JSON value")
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
            Ok(Scalar::Bool(v))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
            Ok(Scalar::Number(v as f64))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
            Ok(Scalar::Number(v as f64))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
            Ok(Scalar::Number(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
            Ok(Scalar::Text(String::from(v)))
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
            Ok(Scalar::Text(v))
        }

        fn visit_unit<E: de::Error>(self) -> Result<Scalar, E> {
            Ok(Scalar::Null)
        }

        fn visit_none<E: de::Error>(self) -> Result<Scalar, E> {
            Ok(Scalar::Null)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Scalar, A::Error> {
            let mut items = Vec::new();
            while let Some(item) = seq.next_element()? {
                items.push(item);
            }
            Ok(Scalar::List(items))
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Scalar, A::Error> {
            let mut fields = ExtraFields::new();
            while let Some((key, value)) = map.next_entry::<String, Scalar>()? {
                fields.insert(key, value);
            }
            Ok(Scalar::Map(fields))
        }
    }

    impl<'de> Deserialize<'de> for Scalar {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(ScalarVisitor)
        }
    }

    /// Field layout shared by every segment kind
    #[derive(Serialize, Deserialize)]
    struct RawRepr {
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<Scalar>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_temp: Option<Scalar>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        slope: Option<Scalar>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        duration_s: Option<Scalar>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        temp: Option<Scalar>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        note: Option<Scalar>,
        #[serde(flatten)]
        extra: ExtraFields,
    }

    impl Serialize for RawSegment {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            RawRepr {
                kind: self.kind.clone(),
                end_temp: self.end_temp.clone(),
                slope: self.slope.clone(),
                duration_s: self.duration_s.clone(),
                temp: self.temp.clone(),
                note: self.note.clone(),
                extra: self.extra.clone(),
            }
            .serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for RawSegment {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let repr = RawRepr::deserialize(deserializer)?;
            Ok(RawSegment {
                kind: repr.kind,
                end_temp: repr.end_temp,
                slope: repr.slope,
                duration_s: repr.duration_s,
                temp: repr.temp,
                note: repr.note,
                extra: repr.extra,
            })
        }
    }

    impl Serialize for Segment {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.to_raw().serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Segment {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            RawSegment::deserialize(deserializer).map(Segment::from_raw)
        }
    }
}
