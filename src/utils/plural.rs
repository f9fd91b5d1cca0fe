//! Count formatting for log lines.

/// `"1 product"`, `"3 products"`, `"0 products"`.
pub fn plural_count(count: usize, noun: &str) -> String {
    let suffix = if count == 1 { "" } else { "s" };
    format!("{count} {noun}{suffix}")
}
