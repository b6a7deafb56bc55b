const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable byte count, base 1024, rounded to at most 2 decimals.
///
/// `0` is `"0 B"`; whole values keep one decimal (`"1.0 GB"`), others drop
/// trailing zeros (`"1.5 KB"`, `"1.33 MB"`). Anything past TB stays in TB.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    // floor(log_1024(bytes)) without float error at exact powers
    let mut exp = 0usize;
    let mut threshold = 1024u64;
    while exp < UNITS.len() - 1 && bytes >= threshold {
        exp += 1;
        threshold *= 1024;
    }

    let scaled = bytes as f64 / 1024f64.powi(exp as i32);
    let rounded = (scaled * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{rounded:.1} {}", UNITS[exp])
    } else {
        format!("{rounded} {}", UNITS[exp])
    }
}

/// Device capacity in bytes for a size given in (binary) gigabytes.
pub fn gigabytes_to_bytes(gb: u64) -> u64 {
    gb.saturating_mul(1024 * 1024 * 1024)
}
