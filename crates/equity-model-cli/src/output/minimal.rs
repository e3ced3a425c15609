use serde_json::{Map, Value};

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known scalar result fields in order of priority,
/// first at the top of the result and then one level down (a snapshot nests
/// its valuation, revenue and timeline), then fall back to the first field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "valuation",
        "total_monthly_revenue",
        "first_salary_affordable_month",
        "total_compensation",
        "total_percentage",
        "base_case_value",
        "annual_revenue",
    ];

    if let Value::Object(map) = result_obj {
        let nested: Vec<&Map<String, Value>> = map.values().filter_map(|v| v.as_object()).collect();
        for key in &priority_keys {
            let hit = std::iter::once(map)
                .chain(nested.iter().copied())
                .filter_map(|m| m.get(*key))
                .find(|v| !v.is_null() && !v.is_object() && !v.is_array());
            if let Some(val) = hit {
                println!("{}", format_minimal(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
