use serde_json::Value;
use tabled::{builder::Builder, Table};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else if let Some(Value::Array(results)) = map.get("results") {
                print_array_table(results);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    match result {
        // One-way sensitivity: one line per step
        Value::Object(res_map) if res_map.contains_key("rows") => {
            if let Some(Value::String(label)) = res_map.get("label") {
                println!("{}", label);
            }
            if let Some(Value::Array(rows)) = res_map.get("rows") {
                print_array_table(rows);
            }
        }
        // Two-way matrix: price steps down, rent steps across
        Value::Object(res_map) if res_map.contains_key("cells") => {
            print_matrix(res_map);
        }
        Value::Object(res_map) => {
            let mut builder = Builder::default();
            builder.push_record(["Field", "Value"]);
            for (key, val) in res_map {
                if key == "projection" {
                    continue;
                }
                builder.push_record([key.as_str(), &format_value(val)]);
            }
            println!("{}", Table::from(builder));

            if let Some(Value::Array(years)) = res_map.get("projection") {
                println!("\nProjection:");
                print_array_table(years);
            }
        }
        _ => print_flat_object(&Value::Object(envelope.clone())),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_matrix(res_map: &serde_json::Map<String, Value>) {
    let steps = |key: &str| -> Vec<String> {
        match res_map.get(key) {
            Some(Value::Array(vals)) => vals.iter().map(format_value).collect(),
            _ => Vec::new(),
        }
    };
    let price_steps = steps("price_steps");
    let rent_steps = steps("rent_steps");

    let mut builder = Builder::default();
    let mut header = vec!["Price \\ Rent".to_string()];
    header.extend(rent_steps.iter().map(|s| format!("Rent {}%", s)));
    builder.push_record(header);

    if let Some(Value::Array(rows)) = res_map.get("cells") {
        for (i, row) in rows.iter().enumerate() {
            let mut record = vec![format!(
                "Price {}%",
                price_steps.get(i).cloned().unwrap_or_default()
            )];
            if let Value::Array(cells) = row {
                record.extend(cells.iter().map(format_value));
            }
            builder.push_record(record);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
