//! Filesystem-safe names derived from video titles.

/// Byte cap for a sanitized title, leaving room for ".mp3" under NAME_MAX.
pub const MAX_TITLE_BYTES: usize = 200;

/// Strips every character that is not alphanumeric, whitespace, `-` or `_`,
/// collapses whitespace runs into a single space and trims the ends.
///
/// Idempotent: `sanitize_title(&sanitize_title(s)) == sanitize_title(s)`.
/// May return an empty string (e.g. a title made only of emoji).
pub fn sanitize_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut pending_space = false;

    for c in title.chars() {
        if c.is_whitespace() {
            pending_space = true;
        } else if c.is_alphanumeric() || c == '-' || c == '_' {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
    }

    if out.len() > MAX_TITLE_BYTES {
        let mut take = MAX_TITLE_BYTES;
        while !out.is_char_boundary(take) {
            take -= 1;
        }
        out.truncate(take);
        out.truncate(out.trim_end().len());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation() {
        assert_eq!(
            sanitize_title(r#"Artist: "Song" / Live? (2020)"#),
            "Artist Song Live 2020"
        );
    }

    #[test]
    fn keeps_hyphen_and_underscore() {
        assert_eq!(sanitize_title("lo-fi_beats - mix"), "lo-fi_beats - mix");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(sanitize_title("a   b\t\tc\n d"), "a b c d");
    }

    #[test]
    fn trims_ends() {
        assert_eq!(sanitize_title("  ** hello **  "), "hello");
    }

    #[test]
    fn removed_punctuation_between_spaces_leaves_one_space() {
        assert_eq!(sanitize_title("Part 1 | Part 2"), "Part 1 Part 2");
    }

    #[test]
    fn keeps_non_ascii_letters() {
        assert_eq!(sanitize_title("Café – Ñandú"), "Café Ñandú");
    }

    #[test]
    fn only_symbols_becomes_empty() {
        assert_eq!(sanitize_title("!!! ??? ..."), "");
    }

    #[test]
    fn idempotent() {
        for title in [
            r#"Never Gonna Give You Up (Official Video) [4K Remaster]"#,
            "  spaced   out  ",
            "tab\tand\nnewline",
            "日本語のタイトル: テスト",
            "emoji 🎵🎶 title",
            "",
        ] {
            let once = sanitize_title(title);
            assert_eq!(sanitize_title(&once), once, "not idempotent for {:?}", title);
        }
    }

    #[test]
    fn caps_length_on_char_boundary() {
        let long = "é".repeat(300);
        let cleaned = sanitize_title(&long);
        assert!(cleaned.len() <= MAX_TITLE_BYTES);
        assert_eq!(sanitize_title(&cleaned), cleaned);
    }

    #[test]
    fn cap_does_not_leave_trailing_space() {
        let mut title = "a".repeat(MAX_TITLE_BYTES - 1);
        title.push_str(" bcd");
        let cleaned = sanitize_title(&title);
        assert!(!cleaned.ends_with(' '));
        assert_eq!(sanitize_title(&cleaned), cleaned);
    }
}
