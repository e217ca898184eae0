//! Functions and filters injected into every render environment.
//!
//! | Name | Kind | Usage |
//! |------|------|-------|
//! | `json` | filter, function | `{{ data \| json }}` compact JSON |
//! | `jsonp` | filter, function | `{{ data \| jsonp }}` indented JSON |
//! | `sort` | function | `sort(data, "name")` stable ascending sort by attribute path |
//! | `rows` | function | `rows(data)` elements of a list, values of a map |
//! | `volume_status` | filter, function | `{{ row \| volume_status }}` status from the client |
//!
//! `sort` compares values case-sensitively; elements missing the attribute
//! sort first. Both `sort` and `rows` iterate the values of a map payload in
//! key order, so keyed records render like lists.

use std::sync::Arc;

use minijinja::value::ValueKind;
use minijinja::{Environment, Error, ErrorKind, Value};

use crate::client::VolumeClient;
use crate::context::volume_status;

/// Registers the rendering functions on `env`.
///
/// `client` is captured by `volume_status`, so an environment is only valid
/// for the client it was built with.
pub fn register_functions(env: &mut Environment<'_>, client: Arc<dyn VolumeClient>) {
    env.add_filter("json", to_json);
    env.add_function("json", to_json);
    env.add_filter("jsonp", to_json_pretty);
    env.add_function("jsonp", to_json_pretty);

    env.add_function("sort", sort_by_field);
    env.add_function("rows", |value: Value| Value::from(rows(&value)));

    let status_client = Arc::clone(&client);
    env.add_filter("volume_status", move |value: Value| {
        volume_status(status_client.as_ref(), &value)
    });
    env.add_function("volume_status", move |value: Value| {
        volume_status(client.as_ref(), &value)
    });
}

fn to_json(value: Value) -> Result<Value, Error> {
    serde_json::to_string(&value)
        .map(Value::from_safe_string)
        .map_err(encode_error)
}

fn to_json_pretty(value: Value) -> Result<Value, Error> {
    serde_json::to_string_pretty(&value)
        .map(Value::from_safe_string)
        .map_err(encode_error)
}

fn encode_error(err: serde_json::Error) -> Error {
    Error::new(ErrorKind::BadSerialization, "cannot encode value as JSON").with_source(err)
}

/// Elements of a sequence, values of a map, nothing for none/undefined, and
/// the value itself otherwise.
pub(crate) fn rows(value: &Value) -> Vec<Value> {
    match value.kind() {
        ValueKind::Undefined | ValueKind::None => Vec::new(),
        ValueKind::Map => match value.try_iter() {
            Ok(keys) => keys
                .filter_map(|key| value.get_item(&key).ok())
                .collect(),
            Err(_) => vec![value.clone()],
        },
        ValueKind::Seq | ValueKind::Iterable => match value.try_iter() {
            Ok(items) => items.collect(),
            Err(_) => vec![value.clone()],
        },
        _ => vec![value.clone()],
    }
}

fn sort_by_field(value: Value, field: String) -> Result<Value, Error> {
    if field.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidOperation,
            "sort() requires a non-empty field name",
        ));
    }
    let mut items = rows(&value);
    let mut keyed: Vec<(Value, Value)> = items
        .drain(..)
        .map(|item| (lookup_path(&item, &field), item))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(Value::from(
        keyed.into_iter().map(|(_, item)| item).collect::<Vec<_>>(),
    ))
}

/// Resolves a dotted attribute path, yielding undefined when any step is missing.
fn lookup_path(value: &Value, path: &str) -> Value {
    let mut current = value.clone();
    for segment in path.split('.') {
        current = match current.get_attr(segment) {
            Ok(next) => next,
            Err(_) => return Value::UNDEFINED,
        };
        if current.is_undefined() {
            break;
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StaticClient;
    use serde_json::json;

    fn env() -> Environment<'static> {
        let mut env = Environment::new();
        register_functions(&mut env, Arc::new(StaticClient::default()));
        env
    }

    fn render(template: &str, data: serde_json::Value) -> String {
        env()
            .render_str(template, minijinja::context! { data => data })
            .unwrap()
    }

    #[test]
    fn json_filter_is_compact() {
        let out = render("{{ data | json }}", json!({"name": "a", "size": 1}));
        assert_eq!(out, r#"{"name":"a","size":1}"#);
    }

    #[test]
    fn jsonp_filter_is_indented() {
        let out = render("{{ jsonp(data) }}", json!({"name": "a"}));
        assert_eq!(out, "{\n  \"name\": \"a\"\n}");
    }

    #[test]
    fn json_is_not_escaped() {
        let out = render("{{ data | json }}", json!(["<a & b>"]));
        assert_eq!(out, r#"["<a & b>"]"#);
    }

    #[test]
    fn sort_is_case_sensitive_and_stable() {
        let data = json!([
            {"name": "b", "id": 1},
            {"name": "B", "id": 2},
            {"name": "a", "id": 3},
            {"name": "b", "id": 4},
        ]);
        let out = render(
            "{% for r in sort(data, 'name') %}{{ r.id }}{% endfor %}",
            data,
        );
        assert_eq!(out, "2314");
    }

    #[test]
    fn sort_numbers_numerically() {
        let data = json!([{"size": 10}, {"size": 9}, {"size": 100}]);
        let out = render(
            "{% for r in sort(data, 'size') %}{{ r.size }} {% endfor %}",
            data,
        );
        assert_eq!(out, "9 10 100 ");
    }

    #[test]
    fn sort_iterates_map_values() {
        let data = json!({
            "zeta": {"name": "alpha"},
            "alpha": {"name": "zeta"},
        });
        let out = render(
            "{% for r in sort(data, 'name') %}{{ r.name }} {% endfor %}",
            data,
        );
        assert_eq!(out, "alpha zeta ");
    }

    #[test]
    fn sort_by_nested_path() {
        let data = json!([
            {"driver": {"name": "y"}, "n": 1},
            {"driver": {"name": "x"}, "n": 2},
        ]);
        let out = render(
            "{% for r in sort(data, 'driver.name') %}{{ r.n }}{% endfor %}",
            data,
        );
        assert_eq!(out, "21");
    }

    #[test]
    fn sort_rejects_empty_field() {
        let result = env().render_str(
            "{{ sort(data, '') }}",
            minijinja::context! { data => vec![1, 2] },
        );
        assert!(result.is_err());
    }

    #[test]
    fn rows_of_each_kind() {
        assert_eq!(rows(&Value::from(vec![1, 2])).len(), 2);
        assert_eq!(rows(&Value::from_serialize(json!({"a": 1, "b": 2}))).len(), 2);
        assert_eq!(rows(&Value::from(5)), vec![Value::from(5)]);
        assert!(rows(&Value::from(())).is_empty());
        assert!(rows(&Value::UNDEFINED).is_empty());
    }

    #[test]
    fn volume_status_filter_uses_client() {
        let out = render(
            "{{ data | volume_status }}/{{ volume_status(data) }}",
            json!({"id": "v1", "name": "a", "attachments": [{"deviceName": "/dev/xvdf"}]}),
        );
        assert_eq!(out, "attached/attached");
    }
}
