/// Shared required-field validation
///
/// Both entry points historically grew their own presence checks; this is the
/// single contract they now share: a required-field set in, the structured
/// list of missing names out.

use serde_json::Value;

/// Return the subset of `required` that is absent from `body`
///
/// A field counts as missing when the key is absent, the value is null, or
/// the value is an empty/whitespace-only string. Any non-string value counts
/// as present: `0` and `false` are real inputs, while a blank string is how
/// a web form says "not filled in". This is stricter than plain key-presence
/// checking on whitespace strings and looser on falsy non-strings, on
/// purpose.
pub fn missing_fields(body: &Value, required: &[&'static str]) -> Vec<&'static str> {
    required
        .iter()
        .filter(|name| !is_present(body.get(**name)))
        .copied()
        .collect()
}

fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}
