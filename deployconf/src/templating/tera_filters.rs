use std::collections::HashMap;

use tera::{Error, Value};

/// Renders a value as a double-quoted yaml scalar, so that values such as `true` or `8080` keep their string type.
pub(crate) fn yaml_str(value: &Value, _: &HashMap<String, Value>) -> Result<Value, Error> {
	let text = match value {
		Value::String(s) => s.clone(),
		Value::Null => String::new(),
		other => other.to_string(),
	};

	serde_json::to_string(&text)
		.map(Value::String)
		.map_err(|e| Error::call_filter("yaml_str", e.to_string()))
}
