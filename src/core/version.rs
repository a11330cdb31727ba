use std::cmp::Ordering;

/// Splits a dotted version into its numeric components, leading zeros
/// stripped. Components that are not all digits count as 0 (`""`).
pub fn numeric_components(version: &str) -> Vec<&str> {
    version.split('.').map(numeric_component).collect()
}

fn numeric_component(part: &str) -> &str {
    let part = part.trim();
    if part.is_empty() || !part.bytes().all(|byte| byte.is_ascii_digit()) {
        return "";
    }
    part.trim_start_matches('0')
}

// Digit strings without leading zeros order by length, then lexically.
fn compare_component(lhs: &str, rhs: &str) -> Ordering {
    lhs.len().cmp(&rhs.len()).then_with(|| lhs.cmp(rhs))
}

pub fn compare_dotted(a: &str, b: &str) -> Ordering {
    let left = numeric_components(a);
    let right = numeric_components(b);
    let len = left.len().max(right.len());
    for idx in 0..len {
        let lhs = left.get(idx).copied().unwrap_or("");
        let rhs = right.get(idx).copied().unwrap_or("");
        match compare_component(lhs, rhs) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

/// Stable ascending sort, so versions comparing equal keep insertion order.
pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_dotted(a, b));
}
