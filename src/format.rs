//! Small display-formatting helpers: human-readable sizes, timestamps, and
//! thousands-separated counts.

use std::time::SystemTime;

use chrono::{DateTime, Local};

/// Human-readable file size: `512 B`, `2 KB`, `3 MB`, ...
pub fn human_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB", "TB"] {
        if size < 1024.0 {
            return format!("{:.0} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.0} PB", size)
}

/// Modification timestamp as `YYYY-MM-DD HH:MM` in local time.
pub fn format_mtime(mtime: SystemTime) -> String {
    let datetime: DateTime<Local> = mtime.into();
    datetime.format("%Y-%m-%d %H:%M").to_string()
}

/// Insert commas into the integer's decimal representation:
/// `3555677` -> `"3,555,677"`.
pub fn number_commas(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn sizes_pick_the_right_unit() {
        assert_eq!(human_size(0), "0 B");
        assert_eq!(human_size(512), "512 B");
        assert_eq!(human_size(2048), "2 KB");
        assert_eq!(human_size(5 * 1024 * 1024), "5 MB");
        assert_eq!(human_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn mtime_formats_as_date_and_minutes() {
        let t = SystemTime::UNIX_EPOCH + Duration::from_secs(86_400);
        let s = format_mtime(t);
        // local offset shifts the day, but the shape is fixed
        assert_eq!(s.len(), 16);
        assert_eq!(&s[4..5], "-");
        assert_eq!(&s[13..14], ":");
    }

    #[test]
    fn commas_group_by_threes() {
        assert_eq!(number_commas(0), "0");
        assert_eq!(number_commas(999), "999");
        assert_eq!(number_commas(1000), "1,000");
        assert_eq!(number_commas(3_555_677), "3,555,677");
    }
}
