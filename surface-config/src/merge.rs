use serde_json::Value;

/// Merge `overlay` into `base`, with `overlay` taking precedence.
///
/// Objects merge key by key. Every other value, arrays included, replaces the
/// base value outright; arrays are never concatenated or merged by index.
pub fn merge_overwriting_arrays(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_overwriting_arrays(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_arrays_are_replaced() {
        let mut base = json!({ "bundledPackages": ["a", "b", "c"] });
        merge_overwriting_arrays(&mut base, json!({ "bundledPackages": ["x"] }));
        assert_eq!(base, json!({ "bundledPackages": ["x"] }));
    }

    #[test]
    fn test_empty_array_replaces() {
        let mut base = json!({ "apiReport": { "reportVariants": ["public", "beta"] } });
        merge_overwriting_arrays(&mut base, json!({ "apiReport": { "reportVariants": [] } }));
        assert_eq!(base["apiReport"]["reportVariants"], json!([]));
    }

    #[test]
    fn test_objects_merge_structurally() {
        let mut base = json!({
            "compiler": { "tsconfigFilePath": "/base/tsconfig.json", "skipLibCheck": false },
            "testMode": false
        });
        merge_overwriting_arrays(
            &mut base,
            json!({ "compiler": { "skipLibCheck": true }, "newlineKind": "lf" }),
        );
        assert_eq!(
            base,
            json!({
                "compiler": { "tsconfigFilePath": "/base/tsconfig.json", "skipLibCheck": true },
                "testMode": false,
                "newlineKind": "lf"
            })
        );
    }

    #[test]
    fn test_scalar_replaces_object() {
        let mut base = json!({ "compiler": { "skipLibCheck": true } });
        merge_overwriting_arrays(&mut base, json!({ "compiler": null }));
        assert_eq!(base, json!({ "compiler": null }));
    }
}
