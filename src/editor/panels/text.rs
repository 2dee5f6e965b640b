//! Rich-text editing over fragment lists.
//!
//! Offsets are in characters, not bytes. Edits address fragments by index;
//! after a formatting change adjacent fragments with identical formatting
//! are merged so the list stays minimal.

use super::style::check_color;
use super::{Control, Section};
use crate::editor::types::{Fragment, Link, Text};
use crate::error::EditorError;

/// Boolean formatting marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Bold,
    Italic,
    Underline,
    Strike,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextEdit {
    /// Replace the whole text with one unformatted fragment.
    SetPlain(String),
    SetFragmentText { index: usize, text: String },
    Insert { index: usize, fragment: Fragment },
    Remove { index: usize },
    /// Split one fragment in two at a character offset.
    Split { index: usize, at: usize },
    ToggleMark { index: usize, mark: Mark },
    Color { index: usize, color: Option<String> },
    Highlight { index: usize, color: Option<String> },
    Font { index: usize, family: Option<String> },
    Link { index: usize, link: Option<Link> },
    /// Apply a mark to a character range, splitting fragments as needed.
    MarkRange { start: usize, end: usize, mark: Mark, on: bool },
}

pub fn text_section(text: &Text) -> Section {
    // Inline marks are edited in place on the canvas; the panel only shows
    // the flattened text.
    Section::new(
        "Content",
        vec![Control::text_area("text", "Text", text.plain_text())],
    )
}

fn fragment_mut(text: &mut Text, index: usize) -> Result<&mut Fragment, EditorError> {
    let len = text.fragments.len();
    text.fragments.get_mut(index).ok_or_else(|| {
        EditorError::InvalidEdit(format!("fragment {} out of range ({} fragments)", index, len))
    })
}

fn set_mark(fragment: &mut Fragment, mark: Mark, on: bool) {
    match mark {
        Mark::Bold => fragment.bold = on,
        Mark::Italic => fragment.italic = on,
        Mark::Underline => fragment.underline = on,
        Mark::Strike => fragment.strike = on,
    }
}

fn has_mark(fragment: &Fragment, mark: Mark) -> bool {
    match mark {
        Mark::Bold => fragment.bold,
        Mark::Italic => fragment.italic,
        Mark::Underline => fragment.underline,
        Mark::Strike => fragment.strike,
    }
}

/// Byte index of character offset `at`, clamped to the end.
fn byte_offset(s: &str, at: usize) -> usize {
    s.char_indices().nth(at).map(|(i, _)| i).unwrap_or(s.len())
}

/// Split fragment `index` at character `at`. No-op at either end.
fn split_at(text: &mut Text, index: usize, at: usize) -> Result<(), EditorError> {
    let fragment = fragment_mut(text, index)?;
    let chars = fragment.text.chars().count();
    if at == 0 || at >= chars {
        return Ok(());
    }
    let cut = byte_offset(&fragment.text, at);
    let tail_text = fragment.text.split_off(cut);
    let tail = Fragment {
        text: tail_text,
        ..fragment.clone()
    };
    text.fragments.insert(index + 1, tail);
    Ok(())
}

/// Merge neighbours with identical formatting and drop empty fragments.
///
/// A text always keeps at least one fragment; an all-empty text keeps the
/// first empty fragment so its formatting survives.
pub fn normalize(text: &mut Text) {
    let mut merged: Vec<Fragment> = Vec::with_capacity(text.fragments.len());
    let mut blank = None;
    for fragment in text.fragments.drain(..) {
        if fragment.text.is_empty() {
            blank.get_or_insert(fragment);
            continue;
        }
        match merged.last_mut() {
            Some(prev) if prev.same_format(&fragment) => prev.text.push_str(&fragment.text),
            _ => merged.push(fragment),
        }
    }
    if merged.is_empty() {
        merged.push(blank.unwrap_or_else(|| Fragment::new(String::new())));
    }
    text.fragments = merged;
}

pub fn apply(text: &mut Text, edit: TextEdit) -> Result<(), EditorError> {
    match edit {
        TextEdit::SetPlain(s) => {
            text.fragments = vec![Fragment::new(s)];
        }
        TextEdit::SetFragmentText { index, text: s } => fragment_mut(text, index)?.text = s,
        TextEdit::Insert { index, fragment } => {
            let index = index.min(text.fragments.len());
            if let Some(link) = &fragment.link {
                check_link(link)?;
            }
            text.fragments.insert(index, fragment);
        }
        TextEdit::Remove { index } => {
            fragment_mut(text, index)?;
            text.fragments.remove(index);
        }
        TextEdit::Split { index, at } => {
            split_at(text, index, at)?;
            // Splitting is a prelude to formatting one half; keep both.
            return Ok(());
        }
        TextEdit::ToggleMark { index, mark } => {
            let fragment = fragment_mut(text, index)?;
            let on = !has_mark(fragment, mark);
            set_mark(fragment, mark, on);
        }
        TextEdit::Color { index, color } => {
            if let Some(c) = &color {
                check_color(c)?;
            }
            fragment_mut(text, index)?.color = color;
        }
        TextEdit::Highlight { index, color } => {
            if let Some(c) = &color {
                check_color(c)?;
            }
            fragment_mut(text, index)?.highlight = color;
        }
        TextEdit::Font { index, family } => fragment_mut(text, index)?.font_family = family,
        TextEdit::Link { index, link } => {
            if let Some(l) = &link {
                check_link(l)?;
            }
            fragment_mut(text, index)?.link = link;
        }
        TextEdit::MarkRange {
            start,
            end,
            mark,
            on,
        } => mark_range(text, start, end, mark, on)?,
    }
    normalize(text);
    Ok(())
}

fn check_link(link: &Link) -> Result<(), EditorError> {
    if Link::is_valid_url(&link.url) {
        Ok(())
    } else {
        Err(EditorError::InvalidEdit(format!("invalid link: {}", link.url)))
    }
}

fn mark_range(
    text: &mut Text,
    start: usize,
    end: usize,
    mark: Mark,
    on: bool,
) -> Result<(), EditorError> {
    if start >= end {
        return Err(EditorError::InvalidEdit("empty selection".into()));
    }
    // Split so that `start` and `end` fall on fragment boundaries.
    for boundary in [end, start] {
        let mut offset = 0;
        for index in 0..text.fragments.len() {
            let len = text.fragments[index].text.chars().count();
            if boundary > offset && boundary < offset + len {
                split_at(text, index, boundary - offset)?;
                break;
            }
            offset += len;
        }
    }
    let mut offset = 0;
    for fragment in &mut text.fragments {
        let len = fragment.text.chars().count();
        if offset >= start && offset + len <= end {
            set_mark(fragment, mark, on);
        }
        offset += len;
    }
    Ok(())
}
