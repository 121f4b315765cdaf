//! Time formatting helpers.

const UNITS: [(u64, &str); 4] = [(86_400, "d"), (3_600, "h"), (60, "m"), (1, "s")];

/// Render a span of seconds as its two most significant non-zero units,
/// e.g. `1d 2h`, `5m`, `1h 1s`. Zero renders as `0s`.
pub fn format_duration(secs: u64) -> String {
    let mut rest = secs;
    let parts: Vec<String> = UNITS
        .iter()
        .filter_map(|&(size, suffix)| {
            let count = rest / size;
            rest %= size;
            (count > 0).then(|| format!("{count}{suffix}"))
        })
        .take(2)
        .collect();
    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}
