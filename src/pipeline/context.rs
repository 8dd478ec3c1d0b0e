use crate::models::{parse_status_map, ErrorHit};

/// Fixed label preceding the match blocks in the model context.
pub const CONTEXT_LABEL: &str = "\n\n관련 에러 정보:\n";

/// Assemble the retrieval context handed to the model.
///
/// One fixed-order block per match; an empty match list yields an empty
/// string so the model answers from its persona alone.
pub fn build_context(hits: &[ErrorHit]) -> String {
    if hits.is_empty() {
        return String::new();
    }

    let mut context = String::from(CONTEXT_LABEL);
    for hit in hits {
        context.push_str(&format_hit(hit));
    }
    context
}

fn format_hit(hit: &ErrorHit) -> String {
    let system_status = hit
        .system_status
        .as_deref()
        .and_then(parse_status_map)
        .map(|pairs| {
            let flattened = pairs
                .iter()
                .map(|(system, status)| format!("{}({})", system, status))
                .collect::<Vec<_>>()
                .join(", ");
            format!("\n시스템 상태: {}", flattened)
        })
        // A malformed blob is silently omitted, not a hard failure.
        .unwrap_or_default();

    format!(
        "\n에러 코드: {}\n에러명: {}\n설명: {}\n증상: {}\n해결 방법: {}\n카테고리: {}\n심각도: {}\n관련 시스템: {}{}\n---\n",
        hit.error_code,
        hit.error_name,
        hit.description,
        hit.symptoms,
        hit.solution,
        hit.category,
        hit.severity,
        hit.related_systems,
        system_status
    )
}
