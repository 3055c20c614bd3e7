/// Format seconds as `M:SS` for log lines and CLI output.
pub fn format_time(secs: f64) -> String {
    if !secs.is_finite() || secs < 0.0 {
        return "0:00".to_string();
    }
    let whole = secs.floor() as u64;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Parse an `M:SS` or `H:MM:SS` transcript timestamp into seconds.
/// Whitespace inside the string is ignored.
pub fn parse_timestamp(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return None;
    }

    let parts = cleaned
        .split(':')
        .map(|p| p.parse::<f64>().ok())
        .collect::<Option<Vec<f64>>>()?;

    match parts.as_slice() {
        [m, s] => Some(m * 60.0 + s),
        [h, m, s] => Some(h * 3600.0 + m * 60.0 + s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0.0), "0:00");
        assert_eq!(format_time(75.9), "1:15");
        assert_eq!(format_time(3600.0), "60:00");
        assert_eq!(format_time(-4.0), "0:00");
        assert_eq!(format_time(f64::NAN), "0:00");
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("1:23"), Some(83.0));
        assert_eq!(parse_timestamp(" 1:02:03 "), Some(3723.0));
        assert_eq!(parse_timestamp("12"), None);
        assert_eq!(parse_timestamp("a:10"), None);
        assert_eq!(parse_timestamp(""), None);
    }
}
