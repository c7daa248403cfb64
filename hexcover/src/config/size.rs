//! Human-readable size parsing (e.g., "100MB", "2GB").

use thiserror::Error;

const KB: usize = 1024;
const MB: usize = 1024 * KB;
const GB: usize = 1024 * MB;

/// Suffixes in match order; longer forms first so "MB" is not read as "B".
const SUFFIXES: [(&str, usize); 7] = [
    ("GB", GB),
    ("MB", MB),
    ("KB", KB),
    ("G", GB),
    ("M", MB),
    ("K", KB),
    ("B", 1),
];

/// Error parsing a size string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid size '{input}' - expected format like '100MB', '2GB', or '512KB'")]
pub struct SizeParseError {
    input: String,
}

/// Parse a human-readable size string into bytes.
///
/// Bare numbers are bytes; `B`, `K`/`KB`, `M`/`MB` and `G`/`GB` suffixes
/// are binary multiples. Case-insensitive, whitespace tolerant.
///
/// ```
/// use hexcover::config::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("100MB").unwrap(), 100 * 1024 * 1024);
/// assert_eq!(parse_size("2 gb").unwrap(), 2 * 1024 * 1024 * 1024);
/// ```
pub fn parse_size(s: &str) -> Result<usize, SizeParseError> {
    let err = || SizeParseError {
        input: s.to_string(),
    };

    let trimmed = s.trim();
    let upper = trimmed.to_ascii_uppercase();

    let (number, multiplier) = SUFFIXES
        .iter()
        .find_map(|&(suffix, mult)| upper.strip_suffix(suffix).map(|rest| (rest, mult)))
        .unwrap_or((upper.as_str(), 1));

    let number = number.trim();
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err());
    }

    number
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(err)
}

/// Format a byte count using the largest unit that divides it evenly.
///
/// ```
/// use hexcover::config::format_size;
///
/// assert_eq!(format_size(100 * 1024 * 1024), "100MB");
/// assert_eq!(format_size(1000), "1000");
/// ```
pub fn format_size(bytes: usize) -> String {
    for (suffix, unit) in [("GB", GB), ("MB", MB), ("KB", KB)] {
        if bytes >= unit && bytes % unit == 0 {
            return format!("{}{}", bytes / unit, suffix);
        }
    }
    bytes.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_number() {
        assert_eq!(parse_size("0").unwrap(), 0);
        assert_eq!(parse_size("4096").unwrap(), 4096);
        assert_eq!(parse_size("4096B").unwrap(), 4096);
    }

    #[test]
    fn test_parse_suffixes() {
        assert_eq!(parse_size("1K").unwrap(), KB);
        assert_eq!(parse_size("512kb").unwrap(), 512 * KB);
        assert_eq!(parse_size("100MB").unwrap(), 100 * MB);
        assert_eq!(parse_size("100m").unwrap(), 100 * MB);
        assert_eq!(parse_size("2G").unwrap(), 2 * GB);
    }

    #[test]
    fn test_parse_whitespace() {
        assert_eq!(parse_size("  100MB  ").unwrap(), 100 * MB);
        assert_eq!(parse_size("100 MB").unwrap(), 100 * MB);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_size("").is_err());
        assert!(parse_size("MB").is_err());
        assert!(parse_size("abc").is_err());
        assert!(parse_size("2TB").is_err());
        assert!(parse_size("-1MB").is_err());
        assert!(parse_size("1.5GB").is_err());
    }

    #[test]
    fn test_parse_overflow() {
        let huge = format!("{}GB", usize::MAX);
        assert!(parse_size(&huge).is_err());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(KB), "1KB");
        assert_eq!(format_size(100 * MB), "100MB");
        assert_eq!(format_size(2 * GB), "2GB");
        assert_eq!(format_size(1536 * KB), "1536KB");
        assert_eq!(format_size(1000), "1000");
    }

    #[test]
    fn test_format_then_parse() {
        for bytes in [KB, 100 * MB, 2 * GB, 777] {
            assert_eq!(parse_size(&format_size(bytes)).unwrap(), bytes);
        }
    }
}
