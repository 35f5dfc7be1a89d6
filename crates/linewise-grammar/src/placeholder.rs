//! Placeholder markers for content the grammar must treat as one opaque word.
//!
//! A caller that wants an unbreakable span (a link, a code span) to take part in
//! a run wraps its rendered text in [`START`]/[`END`]. The lexer turns the whole
//! wrapped span into a single `PLACEHOLDER` token, which the grammar accepts as a
//! `Word`. The markers are Unicode interlinear annotation characters, which do
//! not occur in ordinary prose.
//!
//! Marker balance is the caller's responsibility: a [`START`] without a
//! matching [`END`] makes the run fail to match. Text that already contains a
//! marker should not be mixed with placeholders at all, see
//! [`contains_marker`].

/// Opens a placeholder (U+FFF9 INTERLINEAR ANNOTATION ANCHOR).
pub const START: char = '\u{FFF9}';
/// Closes a placeholder (U+FFFB INTERLINEAR ANNOTATION TERMINATOR).
pub const END: char = '\u{FFFB}';

/// Wrap `content` in placeholder markers.
pub fn wrap(content: &str) -> String {
    let mut wrapped = String::with_capacity(content.len() + START.len_utf8() + END.len_utf8());
    wrapped.push(START);
    wrapped.push_str(content);
    wrapped.push(END);
    wrapped
}

/// Remove every placeholder marker, keeping the wrapped content.
pub fn strip(text: &str) -> String {
    text.chars().filter(|c| *c != START && *c != END).collect()
}

/// A placeholder `width` characters wide standing in for content the caller
/// keeps elsewhere. The filler is U+FFFC OBJECT REPLACEMENT CHARACTER.
pub fn opaque(width: usize) -> String {
    wrap(&FILLER.to_string().repeat(width))
}

const FILLER: char = '\u{FFFC}';

/// True when `text` contains either marker, so it cannot be wrapped safely.
pub fn contains_marker(text: &str) -> bool {
    text.contains([START, END])
}
