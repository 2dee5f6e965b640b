//! Property panels: one editor per block variant.
//!
//! A panel is a plain description of the controls to show for the current
//! selection ([`panel_for`]). The UI renders it however it likes and sends
//! back an [`Edit`], which [`apply`] routes through the store.
//!
//! Both directions match exhaustively on the block variants, so a new
//! primitive does not compile until it has a panel.

pub mod container;
pub mod content;
pub mod style;
pub mod text;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use container::{ColumnEdit, ItemEdit, WrapperEdit};
pub use content::{
    ButtonEdit, CountdownEdit, EmojiEdit, HeadingEdit, ImageEdit, RatingEdit, SeparatorEdit,
    VideoEdit,
};
pub use style::StyleEdit;
pub use text::{Mark, TextEdit};

use super::canvas::Canvas;
use super::selection::{Resolved, Selection};
use super::store::CanvasStore;
use super::types::{LayerContent, LayerItem};
use super::{Primitive, PrimitiveContent};
use crate::error::EditorError;

// ============================================================================
// CONTROL SURFACE
// ============================================================================

/// Controls for the current selection, grouped into sections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: &'static str,
    pub target: Selection,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub controls: Vec<Control>,
}

impl Section {
    pub fn new(title: &'static str, controls: Vec<Control>) -> Self {
        Self { title, controls }
    }
}

/// One input, keyed by the field it edits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Control {
    pub key: &'static str,
    pub label: &'static str,
    pub input: ControlValue,
}

/// Input kind plus its current value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlValue {
    Text { value: String },
    TextArea { value: String },
    Number { value: f64, min: f64, max: f64, step: f64 },
    Toggle { value: bool },
    Color { value: Option<String> },
    Select { value: String, options: Vec<&'static str> },
    Url { value: Option<String> },
    DateTime { value: DateTime<Utc> },
}

impl Control {
    pub fn text(key: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            label,
            input: ControlValue::Text {
                value: value.into(),
            },
        }
    }

    pub fn text_area(key: &'static str, label: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            label,
            input: ControlValue::TextArea {
                value: value.into(),
            },
        }
    }

    pub fn number(
        key: &'static str,
        label: &'static str,
        value: f64,
        (min, max, step): (f64, f64, f64),
    ) -> Self {
        Self {
            key,
            label,
            input: ControlValue::Number {
                value,
                min,
                max,
                step,
            },
        }
    }

    pub fn toggle(key: &'static str, label: &'static str, value: bool) -> Self {
        Self {
            key,
            label,
            input: ControlValue::Toggle { value },
        }
    }

    pub fn color(key: &'static str, label: &'static str, value: Option<&str>) -> Self {
        Self {
            key,
            label,
            input: ControlValue::Color {
                value: value.map(str::to_string),
            },
        }
    }

    pub fn select(
        key: &'static str,
        label: &'static str,
        value: &str,
        options: Vec<&'static str>,
    ) -> Self {
        Self {
            key,
            label,
            input: ControlValue::Select {
                value: value.to_string(),
                options,
            },
        }
    }

    pub fn url(key: &'static str, label: &'static str, value: Option<&str>) -> Self {
        Self {
            key,
            label,
            input: ControlValue::Url {
                value: value.map(str::to_string),
            },
        }
    }

    pub fn date_time(key: &'static str, label: &'static str, value: DateTime<Utc>) -> Self {
        Self {
            key,
            label,
            input: ControlValue::DateTime { value },
        }
    }
}

// ============================================================================
// EDITS
// ============================================================================

/// A change requested from a panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    /// Shared styles of the selected primitive or layer item.
    Style(StyleEdit),
    Heading(HeadingEdit),
    Text(TextEdit),
    Image(ImageEdit),
    Button(ButtonEdit),
    Separator(SeparatorEdit),
    Video(VideoEdit),
    Countdown(CountdownEdit),
    Emoji(EmojiEdit),
    Rating(RatingEdit),
    Column(ColumnEdit),
    Wrapper(WrapperEdit),
    Item(ItemEdit),
}

/// Build the panel for whatever is selected. `None` when nothing is.
pub fn panel_for(store: &CanvasStore) -> Option<Panel> {
    let target = store.selection().clone();
    let panel = match store.selected()? {
        Resolved::Column { group, column } => Panel {
            title: "Column",
            target,
            sections: container::column_sections(group, column),
        },
        Resolved::ColumnPrimitive { primitive, .. } => Panel {
            title: primitive.content.label(),
            target,
            sections: primitive_sections(primitive),
        },
        Resolved::Wrapper(wrapper) => Panel {
            title: "Layers",
            target,
            sections: container::wrapper_sections(wrapper),
        },
        Resolved::WrapperItem { item, .. } => Panel {
            title: item.content.label(),
            target,
            sections: item_sections(item),
        },
    };
    Some(panel)
}

fn primitive_sections(primitive: &Primitive) -> Vec<Section> {
    let mut sections = vec![match &primitive.content {
        PrimitiveContent::Heading(h) => content::heading_section(h),
        PrimitiveContent::Text(t) => text::text_section(t),
        PrimitiveContent::Image(i) => content::image_section(i),
        PrimitiveContent::Button(b) => content::button_section(b),
        PrimitiveContent::Separator(s) => content::separator_section(s),
        PrimitiveContent::Video(v) => content::video_section(v),
        PrimitiveContent::Countdown(c) => content::countdown_section(c),
        PrimitiveContent::Emoji(e) => content::emoji_section(e),
        PrimitiveContent::Rating(r) => content::rating_section(r),
    }];
    sections.extend(style::style_sections(primitive.content.styles()));
    sections
}

fn item_sections(item: &LayerItem) -> Vec<Section> {
    let mut sections = vec![container::item_section(item)];
    let styles = match &item.content {
        LayerContent::Emoji(e) => {
            sections.push(content::emoji_section(e));
            &e.styles
        }
        LayerContent::Heading(h) => {
            sections.push(content::heading_section(h));
            &h.styles
        }
    };
    sections.extend(style::style_sections(styles));
    sections
}

/// Apply a panel edit to the selected entity through the store.
///
/// A failed edit (wrong target, invalid value, stale selection) leaves the
/// canvas and history untouched.
pub fn apply(store: &mut CanvasStore, edit: Edit, record_history: bool) -> Result<(), EditorError> {
    let selection = store.selection().clone();
    if selection.is_none() {
        return Err(EditorError::NoSelection);
    }
    store.try_edit(|canvas| apply_to(canvas, &selection, edit), record_history)
}

fn stale(selection: &Selection) -> EditorError {
    EditorError::NotFound(
        selection
            .target_id()
            .map(ToString::to_string)
            .unwrap_or_default(),
    )
}

fn mismatch(edit: &Edit, selection: &Selection) -> EditorError {
    EditorError::InvalidEdit(format!(
        "{} edit does not apply to the current selection ({})",
        edit_name(edit),
        match selection {
            Selection::None => "nothing",
            Selection::Column { .. } => "column",
            Selection::ColumnPrimitive { .. } => "block",
            Selection::Wrapper { .. } => "layer wrapper",
            Selection::WrapperItem { .. } => "layer item",
        }
    ))
}

fn edit_name(edit: &Edit) -> &'static str {
    match edit {
        Edit::Style(_) => "style",
        Edit::Heading(_) => "heading",
        Edit::Text(_) => "text",
        Edit::Image(_) => "image",
        Edit::Button(_) => "button",
        Edit::Separator(_) => "separator",
        Edit::Video(_) => "video",
        Edit::Countdown(_) => "countdown",
        Edit::Emoji(_) => "emoji",
        Edit::Rating(_) => "rating",
        Edit::Column(_) => "column",
        Edit::Wrapper(_) => "wrapper",
        Edit::Item(_) => "layer item",
    }
}

fn apply_to(canvas: &mut Canvas, selection: &Selection, edit: Edit) -> Result<(), EditorError> {
    match selection {
        Selection::None => Err(EditorError::NoSelection),

        Selection::Column { group, column } => match edit {
            Edit::Column(e) => {
                let group = canvas.group_mut(group).ok_or_else(|| stale(selection))?;
                container::apply_column(group, column, e)
            }
            other => Err(mismatch(&other, selection)),
        },

        Selection::ColumnPrimitive {
            group,
            column,
            primitive,
        } => {
            let target = canvas
                .primitive_mut(group, column, primitive)
                .ok_or_else(|| stale(selection))?;
            apply_primitive(&mut target.content, edit, selection)
        }

        Selection::Wrapper { wrapper } => match edit {
            Edit::Wrapper(e) => {
                let wrapper = canvas.wrapper_mut(wrapper).ok_or_else(|| stale(selection))?;
                container::apply_wrapper(wrapper, e)
            }
            other => Err(mismatch(&other, selection)),
        },

        Selection::WrapperItem { wrapper, item } => {
            let wrapper = canvas.wrapper_mut(wrapper).ok_or_else(|| stale(selection))?;
            match edit {
                Edit::Item(e) => container::apply_item(wrapper, item, e),
                other => {
                    let target = wrapper.item_mut(item).ok_or_else(|| stale(selection))?;
                    apply_layer_content(&mut target.content, other, selection)
                }
            }
        }
    }
}

fn apply_primitive(
    content: &mut PrimitiveContent,
    edit: Edit,
    selection: &Selection,
) -> Result<(), EditorError> {
    match (content, edit) {
        (c, Edit::Style(e)) => style::apply(c.styles_mut(), e),
        (PrimitiveContent::Heading(h), Edit::Heading(e)) => content::apply_heading(h, e),
        (PrimitiveContent::Text(t), Edit::Text(e)) => text::apply(t, e),
        (PrimitiveContent::Image(i), Edit::Image(e)) => content::apply_image(i, e),
        (PrimitiveContent::Button(b), Edit::Button(e)) => content::apply_button(b, e),
        (PrimitiveContent::Separator(s), Edit::Separator(e)) => content::apply_separator(s, e),
        (PrimitiveContent::Video(v), Edit::Video(e)) => content::apply_video(v, e),
        (PrimitiveContent::Countdown(c), Edit::Countdown(e)) => content::apply_countdown(c, e),
        (PrimitiveContent::Emoji(em), Edit::Emoji(e)) => content::apply_emoji(em, e),
        (PrimitiveContent::Rating(r), Edit::Rating(e)) => content::apply_rating(r, e),
        (_, other) => Err(mismatch(&other, selection)),
    }
}

fn apply_layer_content(
    content: &mut LayerContent,
    edit: Edit,
    selection: &Selection,
) -> Result<(), EditorError> {
    match (content, edit) {
        (c, Edit::Style(e)) => style::apply(c.styles_mut(), e),
        (LayerContent::Heading(h), Edit::Heading(e)) => content::apply_heading(h, e),
        (LayerContent::Emoji(em), Edit::Emoji(e)) => content::apply_emoji(em, e),
        (_, other) => Err(mismatch(&other, selection)),
    }
}
