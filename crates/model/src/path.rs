//! Dotted-path access into backend records
//!
//! Paths are `.`-separated keys. A segment suffixed with `[]` maps the rest
//! of the path over an array, so `reglas[].id` collects every rule id.

use condo_core::Record;
use serde_json::Value;

/// Resolve `path` against a record. Missing keys and JSON nulls yield `None`.
pub fn lookup(record: &Record, path: &str) -> Option<Value> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };

    if let Some(key) = head.strip_suffix("[]") {
        let items = record.get(key)?.as_array()?;
        let collected: Vec<Value> = items
            .iter()
            .filter_map(|item| match rest {
                Some(rest) => item.as_object().and_then(|obj| lookup(obj, rest)),
                None => Some(item.clone()).filter(|v| !v.is_null()),
            })
            .collect();
        return Some(Value::Array(collected));
    }

    let value = record.get(head)?;
    match rest {
        Some(rest) => lookup(value.as_object()?, rest),
        None if value.is_null() => None,
        None => Some(value.clone()),
    }
}

/// Plain text of a JSON scalar; arrays and objects yield `None`
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Substitute `{path}` placeholders with record values.
///
/// Missing values render as empty text and the result is trimmed, so
/// `"{nombre} {apellido}"` over a record without a surname yields the name.
pub fn render_template(template: &str, record: &Record) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let path = &after[..end];
                if let Some(text) = lookup(record, path).as_ref().and_then(scalar_text) {
                    out.push_str(&text);
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_lookup_nested_and_arrays() {
        let r = record(json!({
            "rol": {"id": 2, "nombre": "ADMIN"},
            "reglas": [{"id": 1}, {"id": 4}],
            "fecha_salida": null
        }));
        assert_eq!(lookup(&r, "rol.id"), Some(json!(2)));
        assert_eq!(lookup(&r, "reglas[].id"), Some(json!([1, 4])));
        assert_eq!(lookup(&r, "fecha_salida"), None);
        assert_eq!(lookup(&r, "rol.missing"), None);
        assert_eq!(lookup(&r, "nope[].id"), None);
    }

    #[test]
    fn test_render_template() {
        let r = record(json!({"nombre": "Ana", "apellidos": "Rojas", "residencia": 12}));
        assert_eq!(
            render_template("{nombre} {apellidos} - Res. {residencia}", &r),
            "Ana Rojas - Res. 12"
        );
        assert_eq!(render_template("{nombre} {segundo}", &r), "Ana");
        assert_eq!(render_template("sin cierre {nombre", &r), "sin cierre {nombre");
    }
}
