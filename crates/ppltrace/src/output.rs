use std::collections::BTreeMap;

use ppltrace_core::model::log::LogHit;
use ppltrace_core::model::trace::TraceHit;
use ppltrace_normalize::WaterfallRow;

pub fn print_spans_human(hits: &[TraceHit]) {
    for hit in hits {
        let parent = if hit.parent_span_id.is_empty() {
            "-"
        } else {
            &hit.parent_span_id
        };
        println!(
            "{} {} {} span={} parent={} duration={}ms status={}",
            display_time(&hit.start_time),
            hit.service_name,
            hit.name,
            hit.span_id,
            parent,
            hit.duration_ms(),
            hit.status.code
        );
    }
    println!("-- {} spans --", hits.len());
}

pub fn print_logs_human(hits: &[LogHit]) {
    for hit in hits {
        println!(
            "{} {} trace={} span={} | {}",
            hit.timestamp().unwrap_or("-"),
            hit.severity_text().unwrap_or("-"),
            hit.trace_id().unwrap_or("-"),
            hit.span_id().unwrap_or("-"),
            hit.body().unwrap_or("")
        );
    }
    println!("-- {} log records --", hits.len());
}

pub fn print_tree_human(rows: &[WaterfallRow]) {
    use owo_colors::OwoColorize;

    let errors = rows.iter().filter(|r| r.is_error).count();
    println!("spans={} errors={}", rows.len(), errors);
    for row in rows {
        let indent = "  ".repeat(row.depth);
        let window = format!(
            "+{}ms {}ms",
            row.offset_nanos / 1_000_000,
            row.duration_nanos / 1_000_000
        );
        if row.is_error {
            println!(
                "{indent}{} {} ({window}) {}",
                row.service_name,
                row.name,
                "ERROR".red()
            );
        } else {
            println!("{indent}{} {} ({window})", row.service_name, row.name);
        }
    }
}

pub fn print_services_human(map: &BTreeMap<String, String>) {
    for (service, color) in map {
        println!("{service} {color}");
    }
    println!("-- {} services --", map.len());
}

fn display_time(time: &str) -> &str {
    if time.is_empty() { "-" } else { time }
}
