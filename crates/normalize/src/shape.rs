use serde_json::Value;

/// The closed set of response shapes the PPL/JDBC surface produces. Detected
/// once at the boundary; everything downstream dispatches on the variant
/// instead of sniffing raw objects.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseShape<'a> {
    /// Row-oriented: `schema` names the columns, `datarows` is an array of
    /// row arrays. Unnamed schema entries keep their position but cannot be
    /// looked up.
    Datarows {
        schema: Vec<&'a str>,
        datarows: &'a [Value],
    },
    /// Columnar: each field is `{name, values[]}`, `size` is the row count.
    Fields {
        fields: Vec<(&'a str, &'a [Value])>,
        size: usize,
    },
    /// Already hit-shaped: `{hits: {hits: [...]}}` passthrough.
    Hits { hits: &'a [Value] },
}

/// Detect the response shape, unwrapping a `{type: "data_frame", body}` or
/// transport `{body}` envelope first. Returns `None` on total structural
/// mismatch; the caller decides whether that warrants a warning.
pub fn detect(response: &Value) -> Option<ResponseShape<'_>> {
    let body = unwrap_envelope(response);

    if let (Some(datarows), Some(schema)) = (
        body.get("datarows").and_then(Value::as_array),
        body.get("schema").and_then(Value::as_array),
    ) {
        let schema = schema
            .iter()
            .map(|entry| entry.get("name").and_then(Value::as_str).unwrap_or(""))
            .collect();
        return Some(ResponseShape::Datarows {
            schema,
            datarows: datarows.as_slice(),
        });
    }

    if let Some(fields) = body.get("fields").and_then(Value::as_array) {
        let size = body.get("size").and_then(Value::as_u64).unwrap_or(0) as usize;
        let fields = fields
            .iter()
            .filter_map(|field| {
                let name = field.get("name")?.as_str()?;
                let values = field.get("values")?.as_array()?;
                Some((name, values.as_slice()))
            })
            .collect();
        return Some(ResponseShape::Fields { fields, size });
    }

    if let Some(hits) = body
        .get("hits")
        .and_then(|h| h.get("hits"))
        .and_then(Value::as_array)
    {
        return Some(ResponseShape::Hits {
            hits: hits.as_slice(),
        });
    }

    None
}

fn unwrap_envelope(response: &Value) -> &Value {
    if response.get("type").and_then(Value::as_str) == Some("data_frame") {
        if let Some(body) = response.get("body") {
            return body;
        }
    }
    if let Some(body) = response.get("body") {
        let carries_data = body.get("fields").is_some()
            || body.get("datarows").is_some()
            || body.get("hits").is_some();
        if carries_data {
            return body;
        }
    }
    response
}
