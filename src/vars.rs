//! Codec for the `Variable={...};` table embedded in the save's `variables`
//! field. The body is a comma-separated list of `["key"]=value` items where a
//! value is a boolean, a decimal integer, or a double-quoted string with no
//! escape mechanism. Decoding produces an ordered table; encoding reproduces
//! the canonical `", "`-separated form.

use crate::statics;
use thiserror::Error;

/// Errors produced while decoding a variables string.
///
/// Decoding is strict: a payload we cannot fully represent would be silently
/// truncated on the next encode, so both a missing wrapper and a malformed
/// item fail the whole decode instead of dropping data.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VarsError {
    #[error("no Variable={{...}}; block found in variables string")]
    MissingBlock,
    #[error("malformed variables item: {item:?}")]
    MalformedItem { item: String },
}

/// One typed value in the variables table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

impl VarValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            VarValue::Bool(_) => "bool",
            VarValue::Int(_) => "integer",
            VarValue::Text(_) => "string",
        }
    }

    /// The literal form used inside an encoded block: lowercase `true`/`false`,
    /// plain decimal, or the text wrapped in double quotes. Text values must not
    /// contain a double quote (the format cannot escape one); keeping them out
    /// is the editing caller's obligation.
    pub fn write_literal(&self, out: &mut String) {
        match self {
            VarValue::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            VarValue::Int(v) => out.push_str(&v.to_string()),
            VarValue::Text(s) => {
                out.push('"');
                out.push_str(s);
                out.push('"');
            }
        }
    }
}

/// The ordered variables table. Entry order is encoding order and survives a
/// load/save cycle unchanged. Duplicate keys are kept as-is; `get`/`set`
/// address the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VarTable {
    entries: Vec<(String, VarValue)>,
}

impl VarTable {
    /// Decode a variables string into a table.
    ///
    /// An empty or whitespace-only string is a save without variables and
    /// yields an empty table. Any other string must contain the
    /// `Variable={...};` wrapper, and every non-empty item in it must match
    /// `["key"]=value`.
    pub fn decode(source: &str) -> Result<VarTable, VarsError> {
        if source.trim().is_empty() {
            return Ok(VarTable::default());
        }

        let body = locate_block(source).ok_or(VarsError::MissingBlock)?;

        let mut entries = Vec::new();
        for item in split_items(body) {
            entries.push(parse_item(item)?);
        }
        Ok(VarTable { entries })
    }

    /// Encode the table back into the wrapper syntax. Total: any table
    /// produced by `decode` (or edited through `set`) encodes successfully,
    /// and re-decoding the result yields an identical table.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        out.push_str(statics::SZ_VARS_PREFIX);
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str("[\"");
            out.push_str(key);
            out.push_str("\"]=");
            value.write_literal(&mut out);
        }
        out.push_str(statics::SZ_VARS_SUFFIX);
        out
    }

    /// Value of the first entry matching `key`.
    pub fn get(&self, key: &str) -> Option<&VarValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Replace the value of the first entry matching `key`, keeping its
    /// position. Returns false (and changes nothing) when the key is absent;
    /// the editor never adds or removes entries.
    pub fn set(&mut self, key: &str, value: VarValue) -> bool {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => {
                *v = value;
                true
            }
            None => false,
        }
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VarValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Slice out the body between `Variable={` and the last `};`.
fn locate_block(source: &str) -> Option<&str> {
    let start = source.find(statics::SZ_VARS_PREFIX)? + statics::SZ_VARS_PREFIX.len();
    let end = source.rfind(statics::SZ_VARS_SUFFIX)?;
    if end < start {
        return None;
    }
    Some(&source[start..end])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Normal,
    InQuotes,
}

/// Split a block body at top-level commas only: a comma separates items when
/// it is outside double quotes and at bracket-nesting depth zero. Commas
/// inside quoted text or bracketed sub-expressions stay with their item.
/// Items are trimmed; empty segments (stray or trailing commas) are dropped.
fn split_items(body: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut state = ScanState::Normal;
    let mut depth: i64 = 0;
    let mut start = 0usize;

    for (i, ch) in body.char_indices() {
        match state {
            ScanState::InQuotes => {
                if ch == '"' {
                    state = ScanState::Normal;
                }
            }
            ScanState::Normal => match ch {
                '"' => state = ScanState::InQuotes,
                '[' => depth += 1,
                ']' => depth -= 1,
                ',' if depth == 0 => {
                    let item = body[start..i].trim();
                    if !item.is_empty() {
                        items.push(item);
                    }
                    start = i + 1;
                }
                _ => {}
            },
        }
    }

    let tail = body[start..].trim();
    if !tail.is_empty() {
        items.push(tail);
    }
    items
}

/// Parse one `["key"]=value` item. Whitespace around the `=` is tolerated.
fn parse_item(item: &str) -> Result<(String, VarValue), VarsError> {
    let malformed = || VarsError::MalformedItem {
        item: item.to_string(),
    };

    let rest = item.strip_prefix("[\"").ok_or_else(malformed)?;
    let (key, rest) = rest.split_once("\"]").ok_or_else(malformed)?;
    if key.is_empty() || key.contains('"') {
        return Err(malformed());
    }

    let rest = rest.trim_start().strip_prefix('=').ok_or_else(malformed)?;
    let literal = rest.trim();
    let value = classify_literal(literal).ok_or_else(malformed)?;
    Ok((key.to_string(), value))
}

/// Classify a value literal: a double-quoted run becomes Text (no unescaping),
/// `true`/`false` (any case) become Bool, a parseable decimal becomes Int, and
/// any other bare token falls back to Text holding the raw token. Returns None
/// for shapes the format does not allow.
fn classify_literal(literal: &str) -> Option<VarValue> {
    if let Some(inner) = literal.strip_prefix('"') {
        let inner = inner.strip_suffix('"')?;
        if inner.contains('"') {
            return None;
        }
        return Some(VarValue::Text(inner.to_string()));
    }

    if !is_bare_token(literal) {
        return None;
    }
    if literal.eq_ignore_ascii_case("true") {
        return Some(VarValue::Bool(true));
    }
    if literal.eq_ignore_ascii_case("false") {
        return Some(VarValue::Bool(false));
    }
    if let Ok(n) = literal.parse::<i64>() {
        return Some(VarValue::Int(n));
    }
    Some(VarValue::Text(literal.to_string()))
}

/// Bare tokens are word characters with an optional leading minus.
fn is_bare_token(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::{VarTable, VarValue, VarsError, locate_block, split_items};

    #[test]
    fn split_items_only_at_top_level_commas() {
        let body = r#"["x"]=1, ["y"]="a,b", ["z"]=[1,2]"#;
        assert_eq!(
            split_items(body),
            vec![r#"["x"]=1"#, r#"["y"]="a,b""#, r#"["z"]=[1,2]"#]
        );
    }

    #[test]
    fn split_items_keeps_brackets_and_commas_inside_quotes() {
        let body = r#"["a"]="hi, [there]", ["b"]=true"#;
        assert_eq!(
            split_items(body),
            vec![r#"["a"]="hi, [there]""#, r#"["b"]=true"#]
        );
    }

    #[test]
    fn split_items_tracks_bracket_depth_across_nesting() {
        let body = r#"["a"]=[[1,2],[3,4]], ["b"]=0"#;
        assert_eq!(split_items(body), vec![r#"["a"]=[[1,2],[3,4]]"#, r#"["b"]=0"#]);
    }

    #[test]
    fn split_items_drops_empty_segments() {
        assert_eq!(split_items(""), Vec::<&str>::new());
        assert_eq!(split_items("   "), Vec::<&str>::new());
        assert_eq!(
            split_items(r#"["a"]=1, , ["b"]=2,"#),
            vec![r#"["a"]=1"#, r#"["b"]=2"#]
        );
    }

    #[test]
    fn locate_block_uses_last_terminator() {
        // A quoted value may itself contain the terminator sequence.
        let source = r#"Variable={["a"]="x};y", ["b"]=1};"#;
        assert_eq!(locate_block(source), Some(r#"["a"]="x};y", ["b"]=1"#));
        assert_eq!(locate_block("no wrapper here"), None);
        assert_eq!(locate_block("};Variable={"), None);
    }

    #[test]
    fn decode_classifies_value_types() {
        let table =
            VarTable::decode(r#"Variable={["a"]=true, ["b"]=-42, ["c"]="hi, [there]"};"#).unwrap();
        assert_eq!(table.get("a"), Some(&VarValue::Bool(true)));
        assert_eq!(table.get("b"), Some(&VarValue::Int(-42)));
        assert_eq!(table.get("c"), Some(&VarValue::Text("hi, [there]".to_string())));
    }

    #[test]
    fn decode_booleans_case_insensitively() {
        let table = VarTable::decode(r#"Variable={["a"]=True, ["b"]=FALSE};"#).unwrap();
        assert_eq!(table.get("a"), Some(&VarValue::Bool(true)));
        assert_eq!(table.get("b"), Some(&VarValue::Bool(false)));
        // Re-encoding normalizes to the lowercase source convention.
        assert_eq!(table.encode(), r#"Variable={["a"]=true, ["b"]=false};"#);
    }

    #[test]
    fn decode_falls_back_to_text_for_unparseable_bare_tokens() {
        let table =
            VarTable::decode(r#"Variable={["w"]=hello, ["n"]=99999999999999999999};"#).unwrap();
        assert_eq!(table.get("w"), Some(&VarValue::Text("hello".to_string())));
        // Exceeds i64, kept as raw text rather than failing.
        assert_eq!(
            table.get("n"),
            Some(&VarValue::Text("99999999999999999999".to_string()))
        );
    }

    #[test]
    fn decode_empty_input_and_empty_body() {
        assert!(VarTable::decode("").unwrap().is_empty());
        assert!(VarTable::decode("   \n").unwrap().is_empty());
        assert!(VarTable::decode("Variable={};").unwrap().is_empty());
        assert!(VarTable::decode("Variable={   };").unwrap().is_empty());
    }

    #[test]
    fn decode_missing_wrapper_is_an_error() {
        assert_eq!(
            VarTable::decode("not a variables string"),
            Err(VarsError::MissingBlock)
        );
    }

    #[test]
    fn decode_malformed_item_fails_whole_decode() {
        let err = VarTable::decode(r#"Variable={["a"]=1, garbage};"#).unwrap_err();
        assert_eq!(
            err,
            VarsError::MalformedItem {
                item: "garbage".to_string()
            }
        );

        // An unterminated quoted value is also malformed.
        assert!(matches!(
            VarTable::decode(r#"Variable={["a"]="unclosed};"#),
            Err(VarsError::MalformedItem { .. })
        ));
    }

    #[test]
    fn decode_tolerates_whitespace_around_items_and_equals() {
        let table = VarTable::decode("Variable={  [\"a\"] = 1 ,\n [\"b\"]=true };").unwrap();
        assert_eq!(table.get("a"), Some(&VarValue::Int(1)));
        assert_eq!(table.get("b"), Some(&VarValue::Bool(true)));
        assert_eq!(table.encode(), r#"Variable={["a"]=1, ["b"]=true};"#);
    }

    #[test]
    fn duplicate_keys_are_kept_and_first_match_wins() {
        let mut table =
            VarTable::decode(r#"Variable={["a"]=1, ["b"]=2, ["a"]=3};"#).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("a"), Some(&VarValue::Int(1)));

        assert!(table.set("a", VarValue::Int(7)));
        assert_eq!(
            table.encode(),
            r#"Variable={["a"]=7, ["b"]=2, ["a"]=3};"#
        );
    }

    #[test]
    fn set_preserves_position_and_neighbors() {
        let mut table =
            VarTable::decode(r#"Variable={["x"]=1, ["y"]=2, ["z"]=3};"#).unwrap();
        assert!(table.set("y", VarValue::Int(7)));

        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["x", "y", "z"]);
        assert_eq!(table.get("x"), Some(&VarValue::Int(1)));
        assert_eq!(table.get("y"), Some(&VarValue::Int(7)));
        assert_eq!(table.get("z"), Some(&VarValue::Int(3)));
    }

    #[test]
    fn set_on_absent_key_is_a_noop() {
        let mut table = VarTable::decode(r#"Variable={["a"]=1};"#).unwrap();
        assert!(!table.set("missing", VarValue::Bool(true)));
        assert_eq!(table.encode(), r#"Variable={["a"]=1};"#);
    }

    #[test]
    fn encode_empty_table() {
        assert_eq!(VarTable::default().encode(), "Variable={};");
    }

    #[test]
    fn roundtrip_is_idempotent_and_order_preserving() {
        let source = r#"Variable={["flag"]=true, ["count"]=-5, ["note"]="a, [b], c", ["zero"]=0};"#;
        let table = VarTable::decode(source).unwrap();
        let encoded = table.encode();
        assert_eq!(encoded, source);
        assert_eq!(VarTable::decode(&encoded).unwrap(), table);
    }
}
