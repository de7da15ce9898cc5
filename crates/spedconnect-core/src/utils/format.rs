/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None or empty
pub fn format_optional(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Render an average rating as stars, e.g. `★★★☆☆ 3.2 (12)`
pub fn format_rating(average: f64, count: u64) -> String {
    let filled = average.round().clamp(0.0, 5.0) as usize;
    format!(
        "{}{} {:.1} ({})",
        "★".repeat(filled),
        "☆".repeat(5 - filled),
        average,
        count
    )
}

/// Number of pages needed to show `total` items
pub fn page_count(total: u64, per_page: u32) -> u64 {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(u64::from(per_page))
}
