use unicode_width::UnicodeWidthStr;

/// Display width of a string, accounting for CJK double-width, emoji, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `width` display columns, adding ".." if truncated.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        let mut used = 0;
        return s
            .chars()
            .take_while(|ch| {
                used += unicode_width::UnicodeWidthChar::width(*ch).unwrap_or(0);
                used <= width
            })
            .collect();
    }

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

/// Column-aligned plain-text table. Columns wider than `max_width` are cut.
pub(crate) fn render_table(headers: &[&str], rows: &[Vec<String>], max_width: usize) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(display_width(cell)).min(max_width);
        }
    }

    let line = |cells: Vec<&str>| -> String {
        let padded: Vec<String> =
            cells.iter().zip(&widths).map(|(c, w)| pad_right(c, *w)).collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&line(headers.to_vec()));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row.iter().map(String::as_str).collect()));
        out.push('\n');
    }
    out
}
