use std::collections::{BTreeMap, BTreeSet};

use ppltrace_core::model::trace::TraceHit;

/// Fixed qualitative palette; services are assigned round-robin in
/// lexicographic order, so the mapping is stable across renders.
pub const SERVICE_PALETTE: [&str; 10] = [
    "#54B399", "#6092C0", "#D36086", "#9170B8", "#CA8EAE", "#D6BF57", "#B9A888", "#DA8B45",
    "#AA6556", "#E7664C",
];

/// Deterministic service-name → color mapping over a batch of hits. Hits
/// without a service name are ignored. Pure function of the distinct names.
pub fn generate_color_map(hits: &[TraceHit]) -> BTreeMap<String, String> {
    let services: BTreeSet<&str> = hits
        .iter()
        .filter(|hit| !hit.service_name.is_empty())
        .map(|hit| hit.service_name.as_str())
        .collect();

    services
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            (
                name.to_string(),
                SERVICE_PALETTE[index % SERVICE_PALETTE.len()].to_string(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use ppltrace_core::model::trace::SpanStatus;
    use serde_json::Value;

    use super::*;

    fn hit(service: &str) -> TraceHit {
        TraceHit {
            trace_id: "t".into(),
            span_id: "s".into(),
            parent_span_id: String::new(),
            service_name: service.into(),
            name: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            timestamp: String::new(),
            time: String::new(),
            duration_in_nanos: 0,
            status: SpanStatus::default(),
            attributes: Value::Null,
            resource: Value::Null,
            instrumentation_scope: Value::Null,
            sort: [0],
        }
    }

    #[test]
    fn assigns_colors_in_lexicographic_order() {
        let hits = vec![hit("b"), hit("a"), hit("b")];
        let map = generate_color_map(&hits);
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], SERVICE_PALETTE[0]);
        assert_eq!(map["b"], SERVICE_PALETTE[1]);
    }

    #[test]
    fn input_order_does_not_matter() {
        let forward = generate_color_map(&[hit("x"), hit("y"), hit("z")]);
        let reverse = generate_color_map(&[hit("z"), hit("y"), hit("x")]);
        assert_eq!(forward, reverse);
    }

    #[test]
    fn nameless_hits_are_ignored() {
        let map = generate_color_map(&[hit(""), hit("api")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map["api"], SERVICE_PALETTE[0]);
    }

    #[test]
    fn palette_wraps_after_ten_services() {
        let hits: Vec<TraceHit> = (0..12).map(|i| hit(&format!("svc-{i:02}"))).collect();
        let map = generate_color_map(&hits);
        assert_eq!(map["svc-00"], SERVICE_PALETTE[0]);
        assert_eq!(map["svc-10"], SERVICE_PALETTE[0]);
        assert_eq!(map["svc-11"], SERVICE_PALETTE[1]);
    }

    #[test]
    fn empty_input_is_empty_map() {
        assert!(generate_color_map(&[]).is_empty());
    }
}
