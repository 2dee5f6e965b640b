//! Block payload types for the template canvas.
//!
//! All types derive `Serialize + Deserialize` so the same types back both
//! the in-memory editor state and the saved template JSON.
//!
//! Each primitive payload implements [`BlockMeta`] to declare its display
//! label and editor default. The defaults feed the "add block" actions and
//! the block palette served to the web editor.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::Primitive;
use super::ids::BlockId;

/// Metadata that every primitive payload must provide.
///
/// Adding a new primitive type is self-contained: implement this trait next
/// to the struct, add one line to `define_primitives!`, and the compiler
/// points at every exhaustive match that still needs a case (panels first).
pub trait BlockMeta: Sized {
    /// Human-readable display label (e.g. "Heading", "Countdown").
    fn label() -> &'static str;

    /// Starter value used when the block is dropped onto the canvas.
    ///
    /// Distinct from `Default`: editor defaults carry example content so a
    /// freshly added block is visible, not empty.
    fn editor_default() -> Self;
}

// ============================================================================
// SHARED STYLES
// ============================================================================

/// Horizontal alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl Align {
    pub const ALL: [Align; 3] = [Align::Left, Align::Center, Align::Right];

    pub fn name(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

/// Direction of a two-stop gradient.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientDirection {
    #[default]
    ToRight,
    ToLeft,
    ToBottom,
    ToTop,
    ToBottomRight,
    ToTopRight,
}

impl GradientDirection {
    pub const ALL: [GradientDirection; 6] = [
        GradientDirection::ToRight,
        GradientDirection::ToLeft,
        GradientDirection::ToBottom,
        GradientDirection::ToTop,
        GradientDirection::ToBottomRight,
        GradientDirection::ToTopRight,
    ];

    /// CSS keyword form, e.g. `to bottom right`.
    pub fn css(self) -> &'static str {
        match self {
            GradientDirection::ToRight => "to right",
            GradientDirection::ToLeft => "to left",
            GradientDirection::ToBottom => "to bottom",
            GradientDirection::ToTop => "to top",
            GradientDirection::ToBottomRight => "to bottom right",
            GradientDirection::ToTopRight => "to top right",
        }
    }
}

/// Block background: a solid color or a two-stop linear gradient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Background {
    Solid {
        color: String,
    },
    Gradient {
        from: String,
        to: String,
        #[serde(default)]
        direction: GradientDirection,
    },
}

impl Background {
    pub fn solid(color: impl Into<String>) -> Self {
        Background::Solid {
            color: color.into(),
        }
    }

    /// CSS `background` value.
    pub fn css(&self) -> String {
        match self {
            Background::Solid { color } => color.clone(),
            Background::Gradient {
                from,
                to,
                direction,
            } => format!("linear-gradient({}, {}, {})", direction.css(), from, to),
        }
    }
}

/// Border line style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    None,
    #[default]
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    pub const ALL: [LineStyle; 4] = [
        LineStyle::None,
        LineStyle::Solid,
        LineStyle::Dashed,
        LineStyle::Dotted,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LineStyle::None => "none",
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
            LineStyle::Dotted => "dotted",
        }
    }
}

/// Border around a block or container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub style: LineStyle,
    #[serde(default = "default_border_color")]
    pub color: String,
    #[serde(default)]
    pub radius: u32,
}

fn default_border_color() -> String {
    "#000000".to_string()
}

impl Default for Border {
    fn default() -> Self {
        Self {
            width: 0,
            style: LineStyle::Solid,
            color: default_border_color(),
            radius: 0,
        }
    }
}

/// Styles shared by every primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Styles {
    #[serde(default = "default_text_color")]
    pub color: String,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default = "default_font_weight")]
    pub font_weight: u32,
    #[serde(default)]
    pub align: Align,
    #[serde(default = "default_padding")]
    pub padding: u32,
    #[serde(default)]
    pub border: Border,
    #[serde(default)]
    pub background: Option<Background>,
}

fn default_text_color() -> String {
    "#111827".to_string()
}

fn default_font_family() -> String {
    "Arial, sans-serif".to_string()
}

fn default_font_size() -> u32 {
    16
}

fn default_font_weight() -> u32 {
    400
}

fn default_padding() -> u32 {
    8
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            color: default_text_color(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            font_weight: default_font_weight(),
            align: Align::Left,
            padding: default_padding(),
            border: Border::default(),
            background: None,
        }
    }
}

/// Hyperlink attached to a fragment, image or button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    #[serde(default)]
    pub new_tab: bool,
}

impl Link {
    /// Accepts `http(s)://`, `mailto:` and `tel:` targets.
    pub fn is_valid_url(url: &str) -> bool {
        let url = url.trim();
        ["https://", "http://", "mailto:", "tel:"]
            .iter()
            .any(|scheme| url.len() > scheme.len() && url.starts_with(scheme))
    }
}

// ============================================================================
// TEXT PRIMITIVES
// ============================================================================

/// Heading block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub content: String,
    /// 1 to 3, maps to h1..h3.
    #[serde(default = "default_heading_level")]
    pub level: u8,
    #[serde(default)]
    pub styles: Styles,
}

fn default_heading_level() -> u8 {
    1
}

impl BlockMeta for Heading {
    fn label() -> &'static str {
        "Heading"
    }
    fn editor_default() -> Self {
        Self {
            content: "Your headline here".into(),
            level: 1,
            styles: Styles {
                font_size: 28,
                font_weight: 700,
                ..Default::default()
            },
        }
    }
}

/// An independently styled run of text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    #[serde(default)]
    pub link: Option<Link>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub strike: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub highlight: Option<String>,
    #[serde(default)]
    pub font_family: Option<String>,
}

impl Fragment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// True when both fragments would render with identical formatting.
    pub fn same_format(&self, other: &Fragment) -> bool {
        self.link == other.link
            && self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
            && self.strike == other.strike
            && self.color == other.color
            && self.highlight == other.highlight
            && self.font_family == other.font_family
    }
}

/// Rich text block: an ordered list of fragments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    #[serde(default)]
    pub fragments: Vec<Fragment>,
    #[serde(default)]
    pub styles: Styles,
}

impl BlockMeta for Text {
    fn label() -> &'static str {
        "Text"
    }
    fn editor_default() -> Self {
        Self {
            fragments: vec![Fragment::new(
                "Start writing your message. Select a word to style it or add a link.",
            )],
            styles: Styles::default(),
        }
    }
}

impl Text {
    /// Concatenated text of all fragments.
    pub fn plain_text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

// ============================================================================
// MEDIA AND ACTION PRIMITIVES
// ============================================================================

/// Image block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    #[serde(default)]
    pub alt: String,
    /// Rendered width as a percentage of the column (1-100).
    #[serde(default = "default_full_width")]
    pub width_percent: u32,
    #[serde(default)]
    pub link: Option<Link>,
    #[serde(default)]
    pub styles: Styles,
}

fn default_full_width() -> u32 {
    100
}

impl BlockMeta for Image {
    fn label() -> &'static str {
        "Image"
    }
    fn editor_default() -> Self {
        Self {
            src: "https://placehold.co/600x300".into(),
            alt: "Placeholder image".into(),
            width_percent: 100,
            link: None,
            styles: Styles {
                align: Align::Center,
                ..Default::default()
            },
        }
    }
}

/// Call-to-action button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub new_tab: bool,
    #[serde(default)]
    pub full_width: bool,
    #[serde(default)]
    pub styles: Styles,
}

impl BlockMeta for Button {
    fn label() -> &'static str {
        "Button"
    }
    fn editor_default() -> Self {
        Self {
            label: "Shop now".into(),
            url: "https://example.com".into(),
            new_tab: true,
            full_width: false,
            styles: Styles {
                color: "#ffffff".into(),
                font_weight: 600,
                align: Align::Center,
                padding: 12,
                border: Border {
                    radius: 6,
                    ..Default::default()
                },
                background: Some(Background::solid("#4f46e5")),
                ..Default::default()
            },
        }
    }
}

/// Horizontal separator line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Separator {
    #[serde(default = "default_thickness")]
    pub thickness: u32,
    #[serde(default)]
    pub line: LineStyle,
    #[serde(default = "default_separator_color")]
    pub color: String,
    #[serde(default = "default_full_width")]
    pub width_percent: u32,
    #[serde(default)]
    pub styles: Styles,
}

fn default_thickness() -> u32 {
    1
}

fn default_separator_color() -> String {
    "#e5e7eb".to_string()
}

impl BlockMeta for Separator {
    fn label() -> &'static str {
        "Separator"
    }
    fn editor_default() -> Self {
        Self {
            thickness: default_thickness(),
            line: LineStyle::Solid,
            color: default_separator_color(),
            width_percent: 100,
            styles: Styles::default(),
        }
    }
}

/// Video embed. Email clients cannot play video, so the block renders as a
/// linked thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub url: String,
    /// Explicit thumbnail; derived from the URL for YouTube links when absent.
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub styles: Styles,
}

impl BlockMeta for Video {
    fn label() -> &'static str {
        "Video"
    }
    fn editor_default() -> Self {
        Self {
            url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".into(),
            thumbnail: None,
            styles: Styles {
                align: Align::Center,
                ..Default::default()
            },
        }
    }
}

impl Video {
    /// YouTube video id for `watch?v=`, `youtu.be/` and `embed/` links.
    pub fn youtube_id(&self) -> Option<&str> {
        let url = self.url.trim();
        let rest = if let Some(idx) = url.find("youtu.be/") {
            &url[idx + "youtu.be/".len()..]
        } else if let Some(idx) = url.find("youtube.com/embed/") {
            &url[idx + "youtube.com/embed/".len()..]
        } else if url.contains("youtube.com/") {
            let idx = url.find("v=")?;
            &url[idx + 2..]
        } else {
            return None;
        };
        let id = rest.split(['&', '?', '/', '#']).next().unwrap_or("");
        if id.is_empty() { None } else { Some(id) }
    }

    /// Thumbnail shown in place of the player.
    pub fn thumbnail_url(&self) -> Option<String> {
        if let Some(thumb) = &self.thumbnail {
            return Some(thumb.clone());
        }
        self.youtube_id()
            .map(|id| format!("https://img.youtube.com/vi/{}/hqdefault.jpg", id))
    }
}

/// Countdown timer towards a fixed instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    pub target: DateTime<Utc>,
    #[serde(default)]
    pub label: String,
    #[serde(default = "default_true")]
    pub show_seconds: bool,
    #[serde(default)]
    pub styles: Styles,
}

fn default_true() -> bool {
    true
}

/// Remaining time split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl BlockMeta for Countdown {
    fn label() -> &'static str {
        "Countdown"
    }
    fn editor_default() -> Self {
        Self {
            target: Utc::now() + Duration::days(7),
            label: "Offer ends in".into(),
            show_seconds: true,
            styles: Styles {
                align: Align::Center,
                font_size: 24,
                font_weight: 700,
                ..Default::default()
            },
        }
    }
}

impl Countdown {
    /// Time left until the target, saturating at zero once it has passed.
    pub fn remaining(&self, now: DateTime<Utc>) -> Remaining {
        let total = (self.target - now).num_seconds().max(0);
        Remaining {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }
}

/// Static emoji.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emoji {
    pub symbol: String,
    #[serde(default = "default_emoji_size")]
    pub size: u32,
    #[serde(default)]
    pub styles: Styles,
}

fn default_emoji_size() -> u32 {
    48
}

impl BlockMeta for Emoji {
    fn label() -> &'static str {
        "Emoji"
    }
    fn editor_default() -> Self {
        Self {
            symbol: "🎉".into(),
            size: default_emoji_size(),
            styles: Styles {
                align: Align::Center,
                ..Default::default()
            },
        }
    }
}

/// Star rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub value: f32,
    #[serde(default = "default_rating_max")]
    pub max: u8,
    #[serde(default = "default_filled_color")]
    pub filled_color: String,
    #[serde(default = "default_empty_color")]
    pub empty_color: String,
    #[serde(default)]
    pub styles: Styles,
}

fn default_rating_max() -> u8 {
    5
}

fn default_filled_color() -> String {
    "#f59e0b".to_string()
}

fn default_empty_color() -> String {
    "#d1d5db".to_string()
}

impl BlockMeta for Rating {
    fn label() -> &'static str {
        "Rating"
    }
    fn editor_default() -> Self {
        Self {
            value: 4.5,
            max: default_rating_max(),
            filled_color: default_filled_color(),
            empty_color: default_empty_color(),
            styles: Styles {
                align: Align::Center,
                ..Default::default()
            },
        }
    }
}

impl Rating {
    /// (full, half, empty) star counts, value rounded to the nearest half.
    pub fn stars(&self) -> (u8, u8, u8) {
        let max = self.max as f32;
        let halves = (self.value.clamp(0.0, max) * 2.0).round() as u8;
        let full = halves / 2;
        let half = halves % 2;
        (full, half, self.max - full - half)
    }
}

// ============================================================================
// CONTAINERS
// ============================================================================

/// Default lower bound for a column width, in percent.
pub const DEFAULT_COLUMN_MIN: f64 = 10.0;
/// Default upper bound for a column width, in percent.
pub const DEFAULT_COLUMN_MAX: f64 = 90.0;

fn default_column_min() -> f64 {
    DEFAULT_COLUMN_MIN
}

fn default_column_max() -> f64 {
    DEFAULT_COLUMN_MAX
}

/// One column of a column group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: BlockId,
    /// Width in percent of the group; siblings sum to 100.
    pub width: f64,
    #[serde(default = "default_column_min")]
    pub min_width: f64,
    #[serde(default = "default_column_max")]
    pub max_width: f64,
    #[serde(default)]
    pub background: Option<Background>,
    #[serde(default)]
    pub border: Border,
    #[serde(default)]
    pub padding: u32,
    #[serde(default)]
    pub blocks: Vec<Primitive>,
}

impl Column {
    pub fn new(width: f64) -> Self {
        Self {
            id: BlockId::generate("column"),
            width,
            min_width: DEFAULT_COLUMN_MIN,
            max_width: DEFAULT_COLUMN_MAX,
            background: None,
            border: Border::default(),
            padding: 0,
            blocks: Vec::new(),
        }
    }

    pub fn block(&self, id: &BlockId) -> Option<&Primitive> {
        self.blocks.iter().find(|b| &b.id == id)
    }

    pub fn block_mut(&mut self, id: &BlockId) -> Option<&mut Primitive> {
        self.blocks.iter_mut().find(|b| &b.id == id)
    }
}

/// Side-by-side columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnGroup {
    pub id: BlockId,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub gap: u32,
}

impl ColumnGroup {
    /// A group of `count` columns with an even width split.
    pub fn with_columns(count: usize) -> Self {
        let columns = super::columns::even_widths(count)
            .into_iter()
            .map(Column::new)
            .collect();
        Self {
            id: BlockId::generate("group"),
            columns,
            gap: 0,
        }
    }

    pub fn column(&self, id: &BlockId) -> Option<&Column> {
        self.columns.iter().find(|c| &c.id == id)
    }

    pub fn column_mut(&mut self, id: &BlockId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| &c.id == id)
    }

    pub fn column_index(&self, id: &BlockId) -> Option<usize> {
        self.columns.iter().position(|c| &c.id == id)
    }
}

/// Content a layer item can carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerContent {
    Emoji(Emoji),
    Heading(Heading),
}

impl LayerContent {
    pub fn label(&self) -> &'static str {
        match self {
            LayerContent::Emoji(_) => Emoji::label(),
            LayerContent::Heading(_) => Heading::label(),
        }
    }

    pub fn styles_mut(&mut self) -> &mut Styles {
        match self {
            LayerContent::Emoji(e) => &mut e.styles,
            LayerContent::Heading(h) => &mut h.styles,
        }
    }
}

/// A freely positioned item inside a layer wrapper.
///
/// `x` and `y` are percentages of the wrapper's rendered box captured at
/// placement time. Resizing the wrapper never rewrites them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerItem {
    pub id: BlockId,
    /// User-facing label, unique within the wrapper.
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Degrees in `[0, 360)`.
    #[serde(default)]
    pub rotation: f64,
    pub content: LayerContent,
}

fn default_scale() -> f64 {
    1.0
}

/// Fixed-height region with free-positioned items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerWrapper {
    pub id: BlockId,
    /// Height in pixels.
    pub height: u32,
    #[serde(default)]
    pub background: Option<Background>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub border: Border,
    #[serde(default)]
    pub items: Vec<LayerItem>,
}

impl LayerWrapper {
    pub fn editor_default() -> Self {
        Self {
            id: BlockId::generate("wrapper"),
            height: 240,
            background: Some(Background::solid("#f3f4f6")),
            background_image: None,
            border: Border::default(),
            items: Vec::new(),
        }
    }

    pub fn item(&self, id: &BlockId) -> Option<&LayerItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    pub fn item_mut(&mut self, id: &BlockId) -> Option<&mut LayerItem> {
        self.items.iter_mut().find(|i| &i.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_css() {
        let bg = Background::Gradient {
            from: "#fff".into(),
            to: "#000".into(),
            direction: GradientDirection::ToBottomRight,
        };
        assert_eq!(bg.css(), "linear-gradient(to bottom right, #fff, #000)");
    }

    #[test]
    fn test_background_json_tag() {
        let json = r##"{"kind": "solid", "color": "#abc"}"##;
        let bg: Background = serde_json::from_str(json).unwrap();
        assert_eq!(bg, Background::solid("#abc"));
    }

    #[test]
    fn test_link_validation() {
        assert!(Link::is_valid_url("https://example.com"));
        assert!(Link::is_valid_url("mailto:hi@example.com"));
        assert!(!Link::is_valid_url("javascript:alert(1)"));
        assert!(!Link::is_valid_url("https://"));
    }

    #[test]
    fn test_youtube_ids() {
        let mut video = Video::editor_default();
        assert_eq!(video.youtube_id(), Some("dQw4w9WgXcQ"));
        video.url = "https://youtu.be/abc123?t=10".into();
        assert_eq!(video.youtube_id(), Some("abc123"));
        video.url = "https://www.youtube.com/embed/xyz".into();
        assert_eq!(
            video.thumbnail_url().as_deref(),
            Some("https://img.youtube.com/vi/xyz/hqdefault.jpg")
        );
        video.url = "https://vimeo.com/1234".into();
        assert_eq!(video.thumbnail_url(), None);
    }

    #[test]
    fn test_countdown_remaining_saturates() {
        let now = Utc::now();
        let countdown = Countdown {
            target: now + Duration::seconds(90_061),
            ..Countdown::editor_default()
        };
        let left = countdown.remaining(now);
        assert_eq!((left.days, left.hours, left.minutes, left.seconds), (1, 1, 1, 1));

        let past = Countdown {
            target: now - Duration::hours(1),
            ..Countdown::editor_default()
        };
        assert_eq!(past.remaining(now).seconds, 0);
        assert_eq!(past.remaining(now).days, 0);
    }

    #[test]
    fn test_rating_stars() {
        let mut rating = Rating::editor_default();
        assert_eq!(rating.stars(), (4, 1, 0));
        rating.value = 2.2;
        assert_eq!(rating.stars(), (2, 0, 3));
        rating.value = 9.0;
        assert_eq!(rating.stars(), (5, 0, 0));
    }

    #[test]
    fn test_styles_defaults_fill_missing_fields() {
        let styles: Styles = serde_json::from_str(r#"{"font_size": 20}"#).unwrap();
        assert_eq!(styles.font_size, 20);
        assert_eq!(styles.padding, 8);
        assert_eq!(styles.align, Align::Left);
    }
}
