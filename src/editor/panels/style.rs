//! Shared style controls (typography, spacing, border, background).

use super::{Control, Section};
use crate::editor::types::{Align, Background, GradientDirection, LineStyle, Styles};
use crate::error::EditorError;

pub const FONT_FAMILIES: [&str; 6] = [
    "Arial, sans-serif",
    "Helvetica, sans-serif",
    "Georgia, serif",
    "Times New Roman, serif",
    "Verdana, sans-serif",
    "Courier New, monospace",
];

#[derive(Debug, Clone, PartialEq)]
pub enum StyleEdit {
    Color(String),
    FontFamily(String),
    FontSize(u32),
    FontWeight(u32),
    Align(Align),
    Padding(u32),
    BorderWidth(u32),
    BorderStyle(LineStyle),
    BorderColor(String),
    BorderRadius(u32),
    Background(Option<Background>),
}

/// `#rgb`, `#rrggbb` or `#rrggbbaa`.
pub fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

pub(crate) fn check_color(value: &str) -> Result<(), EditorError> {
    if is_hex_color(value) {
        Ok(())
    } else {
        Err(EditorError::InvalidEdit(format!("not a color: {}", value)))
    }
}

pub(crate) fn check_range(name: &str, value: u32, min: u32, max: u32) -> Result<u32, EditorError> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(EditorError::InvalidEdit(format!(
            "{} must be between {} and {}",
            name, min, max
        )))
    }
}

pub(crate) fn check_background(bg: &Option<Background>) -> Result<(), EditorError> {
    match bg {
        None => Ok(()),
        Some(Background::Solid { color }) => check_color(color),
        Some(Background::Gradient { from, to, .. }) => {
            check_color(from)?;
            check_color(to)
        }
    }
}

pub fn apply(styles: &mut Styles, edit: StyleEdit) -> Result<(), EditorError> {
    match edit {
        StyleEdit::Color(c) => {
            check_color(&c)?;
            styles.color = c;
        }
        StyleEdit::FontFamily(f) => {
            if f.trim().is_empty() {
                return Err(EditorError::InvalidEdit("font family cannot be empty".into()));
            }
            styles.font_family = f;
        }
        StyleEdit::FontSize(s) => styles.font_size = check_range("font size", s, 8, 96)?,
        StyleEdit::FontWeight(w) => {
            if w % 100 != 0 {
                return Err(EditorError::InvalidEdit(
                    "font weight must be a multiple of 100".into(),
                ));
            }
            styles.font_weight = check_range("font weight", w, 100, 900)?;
        }
        StyleEdit::Align(a) => styles.align = a,
        StyleEdit::Padding(p) => styles.padding = check_range("padding", p, 0, 120)?,
        StyleEdit::BorderWidth(w) => styles.border.width = check_range("border width", w, 0, 20)?,
        StyleEdit::BorderStyle(s) => styles.border.style = s,
        StyleEdit::BorderColor(c) => {
            check_color(&c)?;
            styles.border.color = c;
        }
        StyleEdit::BorderRadius(r) => {
            styles.border.radius = check_range("border radius", r, 0, 100)?
        }
        StyleEdit::Background(bg) => {
            check_background(&bg)?;
            styles.background = bg;
        }
    }
    Ok(())
}

pub fn style_sections(styles: &Styles) -> Vec<Section> {
    vec![
        Section::new(
            "Style",
            vec![
                Control::color("color", "Text color", Some(&styles.color)),
                Control::select(
                    "font_family",
                    "Font",
                    &styles.font_family,
                    FONT_FAMILIES.to_vec(),
                ),
                Control::number(
                    "font_size",
                    "Font size",
                    styles.font_size as f64,
                    (8.0, 96.0, 1.0),
                ),
                Control::number(
                    "font_weight",
                    "Weight",
                    styles.font_weight as f64,
                    (100.0, 900.0, 100.0),
                ),
                Control::select(
                    "align",
                    "Alignment",
                    styles.align.name(),
                    Align::ALL.iter().map(|a| a.name()).collect(),
                ),
                Control::number(
                    "padding",
                    "Padding",
                    styles.padding as f64,
                    (0.0, 120.0, 1.0),
                ),
            ],
        ),
        border_section(&styles.border),
        background_section(styles.background.as_ref()),
    ]
}

pub(crate) fn border_section(border: &crate::editor::types::Border) -> Section {
    Section::new(
        "Border",
        vec![
            Control::number(
                "border_width",
                "Width",
                border.width as f64,
                (0.0, 20.0, 1.0),
            ),
            Control::select(
                "border_style",
                "Line",
                border.style.name(),
                LineStyle::ALL.iter().map(|s| s.name()).collect(),
            ),
            Control::color("border_color", "Color", Some(&border.color)),
            Control::number(
                "border_radius",
                "Radius",
                border.radius as f64,
                (0.0, 100.0, 1.0),
            ),
        ],
    )
}

pub(crate) fn background_section(background: Option<&Background>) -> Section {
    let controls = match background {
        None => vec![
            Control::select("background_kind", "Fill", "none", vec!["none", "solid", "gradient"]),
        ],
        Some(Background::Solid { color }) => vec![
            Control::select("background_kind", "Fill", "solid", vec!["none", "solid", "gradient"]),
            Control::color("background_color", "Color", Some(color)),
        ],
        Some(Background::Gradient {
            from,
            to,
            direction,
        }) => vec![
            Control::select(
                "background_kind",
                "Fill",
                "gradient",
                vec!["none", "solid", "gradient"],
            ),
            Control::color("gradient_from", "From", Some(from)),
            Control::color("gradient_to", "To", Some(to)),
            Control::select(
                "gradient_direction",
                "Direction",
                direction.css(),
                GradientDirection::ALL.iter().map(|d| d.css()).collect(),
            ),
        ],
    };
    Section::new("Background", controls)
}
