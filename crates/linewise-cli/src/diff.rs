//! Unified diffs for `check`.

use crossterm::style::{Color, Stylize};
use similar::{ChangeTag, TextDiff};

const CONTEXT_LINES: usize = 3;

/// A unified diff between `old` and `new`, coloured when `colored` is set.
/// Empty when nothing changed.
pub fn unified(path: &str, old: &str, new: &str, colored: bool) -> String {
    let diff = TextDiff::from_lines(old, new);
    let mut out = String::new();

    let mut unified = diff.unified_diff();
    unified.context_radius(CONTEXT_LINES);

    for (i, hunk) in unified.iter_hunks().enumerate() {
        if i == 0 {
            push_line(&mut out, &format!("--- {path}"), None, colored);
            push_line(&mut out, &format!("+++ {path}"), None, colored);
        }
        push_line(&mut out, &hunk.header().to_string(), Some(Color::Cyan), colored);

        for change in hunk.iter_changes() {
            let (sign, color) = match change.tag() {
                ChangeTag::Delete => ('-', Some(Color::Red)),
                ChangeTag::Insert => ('+', Some(Color::Green)),
                ChangeTag::Equal => (' ', None),
            };
            let value = change.value().trim_end_matches('\n');
            push_line(&mut out, &format!("{sign}{value}"), color, colored);
            if change.missing_newline() {
                push_line(&mut out, "\\ No newline at end of file", None, colored);
            }
        }
    }
    out
}

fn push_line(out: &mut String, line: &str, color: Option<Color>, colored: bool) {
    match color {
        Some(color) if colored => out.push_str(&line.with(color).to_string()),
        _ => out.push_str(line),
    }
    out.push('\n');
}
