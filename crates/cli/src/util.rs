use unicode_width::UnicodeWidthStr;

/// Display width of a string, accounting for CJK double-width, emoji, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `width` display columns, adding ".." if truncated.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if width < 3 {
        for ch in s.chars() {
            let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
            if cw <= width {
                return ch.to_string();
            }
        }
        return String::new();
    }

    if display_width(s) <= width {
        return s.to_string();
    }

    // Leave room for ".."
    let budget = width - 2;
    let mut used = 0;
    let mut end_byte = 0;
    for (i, ch) in s.char_indices() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + cw > budget {
            end_byte = i;
            break;
        }
        used += cw;
        end_byte = i + ch.len_utf8();
    }

    format!("{}..", &s[..end_byte])
}

/// Pad or truncate a string to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let sw = display_width(s);
    if sw > width {
        truncate_display(s, width)
    } else {
        format!("{}{}", s, " ".repeat(width - sw))
    }
}

/// Render rows as a fixed-width text table, header first, columns capped at `max_col`.
pub(crate) fn render_table(header: &[&str], rows: &[Vec<String>], max_col: usize) -> String {
    let mut widths: Vec<usize> = header.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(display_width(cell));
            }
        }
    }
    for w in &mut widths {
        *w = (*w).min(max_col);
    }

    let line = |cells: Vec<&str>| -> String {
        let parts: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| pad_right(c, w))
            .collect();
        parts.join("  ").trim_end().to_string()
    };

    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();

    let mut out = String::new();
    out.push_str(&line(header.to_vec()));
    out.push('\n');
    out.push_str(&line(rule.iter().map(String::as_str).collect()));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_width_cjk() {
        assert_eq!(display_width("\u{4e16}\u{754c}"), 4); // "世界"
        assert_eq!(display_width("Adaeze"), 6);
    }

    #[test]
    fn truncate_cuts() {
        assert_eq!(truncate_display("abcdef", 5), "abc..");
        assert_eq!(truncate_display("abc", 5), "abc");
        assert_eq!(truncate_display("abc", 2), "a");
    }

    #[test]
    fn pad_right_short_and_long() {
        assert_eq!(pad_right("ab", 5), "ab   ");
        assert_eq!(pad_right("abcdef", 5), "abc..");
    }

    #[test]
    fn table_layout() {
        let rows = vec![
            vec!["PHY/01".to_string(), "18".to_string()],
            vec!["PHY/99".to_string(), "".to_string()],
        ];
        let t = render_table(&["MatNo", "CA"], &rows, 20);
        let lines: Vec<&str> = t.lines().collect();
        assert_eq!(lines[0], "MatNo   CA");
        assert_eq!(lines[1], "------  --");
        assert_eq!(lines[2], "PHY/01  18");
        assert_eq!(lines[3], "PHY/99");
    }

    #[test]
    fn table_caps_wide_columns() {
        let rows = vec![vec!["Chukwuemeka Oluwaseun".to_string()]];
        let t = render_table(&["Name"], &rows, 10);
        assert_eq!(t.lines().nth(2), Some("Chukwuem.."));
    }
}
