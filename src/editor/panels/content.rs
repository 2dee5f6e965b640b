//! Content controls for every primitive except text.

use chrono::{DateTime, Utc};

use super::style::{check_color, check_range};
use super::{Control, Section};
use crate::editor::types::{
    Button, Countdown, Emoji, Heading, Image, LineStyle, Link, Rating, Separator, Video,
};
use crate::error::EditorError;

fn check_url(url: &str) -> Result<(), EditorError> {
    if Link::is_valid_url(url) {
        Ok(())
    } else {
        Err(EditorError::InvalidEdit(format!("invalid link: {}", url)))
    }
}

fn check_link(link: &Option<Link>) -> Result<(), EditorError> {
    match link {
        Some(l) => check_url(&l.url),
        None => Ok(()),
    }
}

// ============================================================================
// HEADING
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum HeadingEdit {
    Content(String),
    Level(u8),
}

pub fn heading_section(heading: &Heading) -> Section {
    Section::new(
        "Content",
        vec![
            Control::text("content", "Text", heading.content.as_str()),
            Control::select(
                "level",
                "Level",
                match heading.level {
                    2 => "h2",
                    3 => "h3",
                    _ => "h1",
                },
                vec!["h1", "h2", "h3"],
            ),
        ],
    )
}

pub fn apply_heading(heading: &mut Heading, edit: HeadingEdit) -> Result<(), EditorError> {
    match edit {
        HeadingEdit::Content(text) => heading.content = text,
        HeadingEdit::Level(level) => {
            if !(1..=3).contains(&level) {
                return Err(EditorError::InvalidEdit(
                    "heading level must be 1, 2 or 3".into(),
                ));
            }
            heading.level = level;
        }
    }
    Ok(())
}

// ============================================================================
// IMAGE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ImageEdit {
    /// Usually a public URL picked from the asset gallery.
    Src(String),
    Alt(String),
    WidthPercent(u32),
    Link(Option<Link>),
}

pub fn image_section(image: &Image) -> Section {
    Section::new(
        "Content",
        vec![
            Control::url("src", "Image URL", Some(&image.src)),
            Control::text("alt", "Alt text", image.alt.as_str()),
            Control::number(
                "width_percent",
                "Width (%)",
                image.width_percent as f64,
                (1.0, 100.0, 1.0),
            ),
            Control::url("link", "Link", image.link.as_ref().map(|l| l.url.as_str())),
        ],
    )
}

pub fn apply_image(image: &mut Image, edit: ImageEdit) -> Result<(), EditorError> {
    match edit {
        ImageEdit::Src(src) => {
            check_url(&src)?;
            image.src = src;
        }
        ImageEdit::Alt(alt) => image.alt = alt,
        ImageEdit::WidthPercent(w) => image.width_percent = check_range("width", w, 1, 100)?,
        ImageEdit::Link(link) => {
            check_link(&link)?;
            image.link = link;
        }
    }
    Ok(())
}

// ============================================================================
// BUTTON
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ButtonEdit {
    Label(String),
    Url(String),
    NewTab(bool),
    FullWidth(bool),
}

pub fn button_section(button: &Button) -> Section {
    Section::new(
        "Content",
        vec![
            Control::text("label", "Label", button.label.as_str()),
            Control::url("url", "Link", Some(&button.url)),
            Control::toggle("new_tab", "Open in new tab", button.new_tab),
            Control::toggle("full_width", "Full width", button.full_width),
        ],
    )
}

pub fn apply_button(button: &mut Button, edit: ButtonEdit) -> Result<(), EditorError> {
    match edit {
        ButtonEdit::Label(label) => {
            if label.trim().is_empty() {
                return Err(EditorError::InvalidEdit("button label cannot be empty".into()));
            }
            button.label = label;
        }
        ButtonEdit::Url(url) => {
            check_url(&url)?;
            button.url = url;
        }
        ButtonEdit::NewTab(v) => button.new_tab = v,
        ButtonEdit::FullWidth(v) => button.full_width = v,
    }
    Ok(())
}

// ============================================================================
// SEPARATOR
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SeparatorEdit {
    Thickness(u32),
    Line(LineStyle),
    Color(String),
    WidthPercent(u32),
}

pub fn separator_section(separator: &Separator) -> Section {
    Section::new(
        "Line",
        vec![
            Control::number(
                "thickness",
                "Thickness",
                separator.thickness as f64,
                (1.0, 20.0, 1.0),
            ),
            Control::select(
                "line",
                "Style",
                separator.line.name(),
                LineStyle::ALL.iter().map(|s| s.name()).collect(),
            ),
            Control::color("color", "Color", Some(&separator.color)),
            Control::number(
                "width_percent",
                "Width (%)",
                separator.width_percent as f64,
                (1.0, 100.0, 1.0),
            ),
        ],
    )
}

pub fn apply_separator(separator: &mut Separator, edit: SeparatorEdit) -> Result<(), EditorError> {
    match edit {
        SeparatorEdit::Thickness(t) => separator.thickness = check_range("thickness", t, 1, 20)?,
        SeparatorEdit::Line(line) => separator.line = line,
        SeparatorEdit::Color(c) => {
            check_color(&c)?;
            separator.color = c;
        }
        SeparatorEdit::WidthPercent(w) => {
            separator.width_percent = check_range("width", w, 1, 100)?
        }
    }
    Ok(())
}

// ============================================================================
// VIDEO
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum VideoEdit {
    Url(String),
    Thumbnail(Option<String>),
}

pub fn video_section(video: &Video) -> Section {
    let thumbnail = video.thumbnail_url();
    Section::new(
        "Video",
        vec![
            Control::url("url", "Video URL", Some(&video.url)),
            Control::url("thumbnail", "Thumbnail", thumbnail.as_deref()),
        ],
    )
}

pub fn apply_video(video: &mut Video, edit: VideoEdit) -> Result<(), EditorError> {
    match edit {
        VideoEdit::Url(url) => {
            check_url(&url)?;
            video.url = url;
        }
        VideoEdit::Thumbnail(thumb) => {
            if let Some(t) = &thumb {
                check_url(t)?;
            }
            video.thumbnail = thumb;
        }
    }
    Ok(())
}

// ============================================================================
// COUNTDOWN
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum CountdownEdit {
    Target(DateTime<Utc>),
    Label(String),
    ShowSeconds(bool),
}

pub fn countdown_section(countdown: &Countdown) -> Section {
    Section::new(
        "Timer",
        vec![
            Control::date_time("target", "Ends at", countdown.target),
            Control::text("label", "Label", countdown.label.as_str()),
            Control::toggle("show_seconds", "Show seconds", countdown.show_seconds),
        ],
    )
}

pub fn apply_countdown(countdown: &mut Countdown, edit: CountdownEdit) -> Result<(), EditorError> {
    match edit {
        CountdownEdit::Target(t) => countdown.target = t,
        CountdownEdit::Label(l) => countdown.label = l,
        CountdownEdit::ShowSeconds(v) => countdown.show_seconds = v,
    }
    Ok(())
}

// ============================================================================
// EMOJI
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum EmojiEdit {
    Symbol(String),
    Size(u32),
}

pub fn emoji_section(emoji: &Emoji) -> Section {
    Section::new(
        "Emoji",
        vec![
            Control::text("symbol", "Emoji", emoji.symbol.as_str()),
            Control::number("size", "Size", emoji.size as f64, (8.0, 256.0, 1.0)),
        ],
    )
}

pub fn apply_emoji(emoji: &mut Emoji, edit: EmojiEdit) -> Result<(), EditorError> {
    match edit {
        EmojiEdit::Symbol(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Err(EditorError::InvalidEdit("emoji cannot be empty".into()));
            }
            emoji.symbol = s.to_string();
        }
        EmojiEdit::Size(size) => emoji.size = check_range("size", size, 8, 256)?,
    }
    Ok(())
}

// ============================================================================
// RATING
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RatingEdit {
    Value(f32),
    Max(u8),
    FilledColor(String),
    EmptyColor(String),
}

pub fn rating_section(rating: &Rating) -> Section {
    Section::new(
        "Rating",
        vec![
            Control::number(
                "value",
                "Rating",
                rating.value as f64,
                (0.0, rating.max as f64, 0.5),
            ),
            Control::number("max", "Stars", rating.max as f64, (1.0, 10.0, 1.0)),
            Control::color("filled_color", "Filled", Some(&rating.filled_color)),
            Control::color("empty_color", "Empty", Some(&rating.empty_color)),
        ],
    )
}

pub fn apply_rating(rating: &mut Rating, edit: RatingEdit) -> Result<(), EditorError> {
    match edit {
        RatingEdit::Value(v) => {
            if !v.is_finite() || v < 0.0 || v > rating.max as f32 {
                return Err(EditorError::InvalidEdit(format!(
                    "rating must be between 0 and {}",
                    rating.max
                )));
            }
            rating.value = v;
        }
        RatingEdit::Max(max) => {
            if !(1..=10).contains(&max) {
                return Err(EditorError::InvalidEdit("stars must be between 1 and 10".into()));
            }
            rating.max = max;
            rating.value = rating.value.min(max as f32);
        }
        RatingEdit::FilledColor(c) => {
            check_color(&c)?;
            rating.filled_color = c;
        }
        RatingEdit::EmptyColor(c) => {
            check_color(&c)?;
            rating.empty_color = c;
        }
    }
    Ok(())
}
