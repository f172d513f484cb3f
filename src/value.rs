use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, de};

/// Represents a number that preserves the distinction between I64, U64, and
/// F64 for round-tripping. Integer-valued fields in Suzerain saves must not
/// come back as floats.
#[derive(Debug, Clone, PartialEq)]
pub enum SzNumber {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl SzNumber {
    fn write_compact(&self, out: &mut String) {
        match self {
            SzNumber::I64(v) => out.push_str(&v.to_string()),
            SzNumber::U64(v) => out.push_str(&v.to_string()),
            SzNumber::F64(v) => {
                if v.is_nan() {
                    out.push_str("NaN");
                } else if v.is_infinite() {
                    if v.is_sign_negative() {
                        out.push_str("-Infinity");
                    } else {
                        out.push_str("Infinity");
                    }
                } else {
                    let mut buf = ryu::Buffer::new();
                    out.push_str(buf.format(*v));
                }
            }
        }
    }
}

/// Represents a value in a Suzerain save document. The game writes strict
/// JSON, but its Python-lineage tooling can emit `Infinity`/`NaN` for
/// non-finite floats, so parsing goes through JSON5.
#[derive(Debug, Clone, PartialEq)]
pub enum SzValue {
    Null,
    Bool(bool),
    Number(SzNumber),
    String(String),
    Array(Vec<SzValue>),
    Object(IndexMap<String, SzValue>),
}

impl SzValue {
    pub fn as_object(&self) -> Option<&IndexMap<String, SzValue>> {
        match self {
            SzValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, SzValue>> {
        match self {
            SzValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SzValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&SzValue> {
        self.as_object().and_then(|m| m.get(key))
    }

    pub fn parse(text: &str) -> anyhow::Result<SzValue> {
        Ok(json5::from_str::<SzValue>(text)?)
    }

    /// Serialize in the save writer's style: compact separators (no space
    /// after `:` or `,`), keys always quoted, non-ASCII escaped as lowercase
    /// `\uXXXX`, no trailing newline.
    pub fn to_save_compact(&self) -> String {
        let mut out = String::new();
        self.write_compact(&mut out);
        out
    }

    fn write_compact(&self, out: &mut String) {
        match self {
            SzValue::Null => out.push_str("null"),
            SzValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            SzValue::Number(n) => n.write_compact(out),
            SzValue::String(s) => write_escaped_string_ascii(out, s),
            SzValue::Array(values) => {
                out.push('[');
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    v.write_compact(out);
                }
                out.push(']');
            }
            SzValue::Object(map) => {
                out.push('{');
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_escaped_string_ascii(out, k);
                    out.push(':');
                    v.write_compact(out);
                }
                out.push('}');
            }
        }
    }
}

fn write_escaped_string_ascii(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write as _;
                write!(out, "\\u{:04x}", c as u32).ok();
            }
            c if (c as u32) > 0x7F => {
                let cp = c as u32;
                if cp <= 0xFFFF {
                    use std::fmt::Write as _;
                    write!(out, "\\u{:04x}", cp).ok();
                } else {
                    // Encode as UTF-16 surrogate pair.
                    let u = cp - 0x1_0000;
                    let high = 0xD800 + ((u >> 10) & 0x3FF);
                    let low = 0xDC00 + (u & 0x3FF);
                    use std::fmt::Write as _;
                    write!(out, "\\u{:04x}\\u{:04x}", high, low).ok();
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl<'de> Deserialize<'de> for SzNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumberVisitor;

        impl<'de> de::Visitor<'de> for NumberVisitor {
            type Value = SzNumber;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON5 number")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(SzNumber::I64(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(SzNumber::U64(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(SzNumber::F64(v))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

impl<'de> Deserialize<'de> for SzValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = SzValue;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON5 value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(SzValue::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(SzValue::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(SzValue::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(SzValue::Number(SzNumber::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(SzValue::Number(SzNumber::U64(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(SzValue::Number(SzNumber::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(SzValue::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(SzValue::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<SzValue>()? {
                    values.push(value);
                }
                Ok(SzValue::Array(values))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, SzValue>()? {
                    values.insert(key, value);
                }
                Ok(SzValue::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}
