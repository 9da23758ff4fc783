//! Text helpers for fixed-width cells

use std::time::Duration;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncate to `max_width` display columns, ending with `…` when cut
pub fn truncate_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if text.width() <= max_width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width - 1 {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push('…');
    out
}

/// Compact "time since" label: `4s`, `3m`, `2h`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    match secs {
        0..=59 => format!("{secs}s"),
        60..=3599 => format!("{}m", secs / 60),
        _ => format!("{}h", secs / 3600),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ellipsis() {
        assert_eq!(truncate_ellipsis("short", 10), "short");
        assert_eq!(truncate_ellipsis("a longer line", 6), "a lon…");
        assert_eq!(truncate_ellipsis("abc", 0), "");
    }

    #[test]
    fn test_truncate_counts_wide_chars() {
        let cut = truncate_ellipsis("日本語テキスト", 5);
        assert!(cut.width() <= 5);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(4)), "4s");
        assert_eq!(format_elapsed(Duration::from_secs(185)), "3m");
        assert_eq!(format_elapsed(Duration::from_secs(7300)), "2h");
    }
}
