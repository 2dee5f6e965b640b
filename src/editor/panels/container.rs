//! Column, layer-wrapper and layer-item controls.

use super::style::{background_section, border_section, check_background, check_color, check_range};
use super::{Control, Section};
use crate::editor::columns::{self, MAX_COLUMNS, TWO_COLUMN_MAX, TWO_COLUMN_MIN};
use crate::editor::ids::BlockId;
use crate::editor::types::{
    Background, Border, Column, ColumnGroup, LayerContent, LayerItem, LayerWrapper,
};
use crate::error::EditorError;

pub const MIN_WRAPPER_HEIGHT: u32 = 40;
pub const MAX_WRAPPER_HEIGHT: u32 = 1200;

fn check_border(border: &Border) -> Result<(), EditorError> {
    check_range("border width", border.width, 0, 20)?;
    check_range("border radius", border.radius, 0, 100)?;
    check_color(&border.color)
}

// ============================================================================
// COLUMN
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnEdit {
    /// Width of the selected column, in percent.
    Width(f64),
    /// Number of columns in the selected column's group.
    Count(usize),
    Background(Option<Background>),
    Border(Border),
    Padding(u32),
    Gap(u32),
}

pub fn column_sections(group: &ColumnGroup, column: &Column) -> Vec<Section> {
    let (min, max) = if group.columns.len() == 2 {
        (TWO_COLUMN_MIN, TWO_COLUMN_MAX)
    } else {
        (column.min_width, column.max_width)
    };
    vec![
        Section::new(
            "Layout",
            vec![
                Control::number(
                    "columns",
                    "Columns",
                    group.columns.len() as f64,
                    (1.0, MAX_COLUMNS as f64, 1.0),
                ),
                Control::number("width", "Width (%)", column.width, (min, max, 0.01)),
                Control::number("padding", "Padding", column.padding as f64, (0.0, 120.0, 1.0)),
                Control::number("gap", "Gap", group.gap as f64, (0.0, 64.0, 1.0)),
            ],
        ),
        border_section(&column.border),
        background_section(column.background.as_ref()),
    ]
}

pub fn apply_column(
    group: &mut ColumnGroup,
    column: &BlockId,
    edit: ColumnEdit,
) -> Result<(), EditorError> {
    let index = group
        .column_index(column)
        .ok_or_else(|| EditorError::NotFound(column.to_string()))?;
    match edit {
        ColumnEdit::Width(w) => columns::set_width(&mut group.columns, index, w)?,
        ColumnEdit::Count(n) => columns::set_column_count(group, n)?,
        ColumnEdit::Background(bg) => {
            check_background(&bg)?;
            group.columns[index].background = bg;
        }
        ColumnEdit::Border(border) => {
            check_border(&border)?;
            group.columns[index].border = border;
        }
        ColumnEdit::Padding(p) => group.columns[index].padding = check_range("padding", p, 0, 120)?,
        ColumnEdit::Gap(g) => group.gap = check_range("gap", g, 0, 64)?,
    }
    Ok(())
}

// ============================================================================
// LAYER WRAPPER
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum WrapperEdit {
    Height(u32),
    Background(Option<Background>),
    BackgroundImage(Option<String>),
    Border(Border),
    /// Drop new content at a position in percent.
    Place { content: LayerContent, x: f64, y: f64 },
}

pub fn wrapper_sections(wrapper: &LayerWrapper) -> Vec<Section> {
    vec![
        Section::new(
            "Layout",
            vec![
                Control::number(
                    "height",
                    "Height (px)",
                    wrapper.height as f64,
                    (MIN_WRAPPER_HEIGHT as f64, MAX_WRAPPER_HEIGHT as f64, 1.0),
                ),
                Control::url(
                    "background_image",
                    "Background image",
                    wrapper.background_image.as_deref(),
                ),
            ],
        ),
        border_section(&wrapper.border),
        background_section(wrapper.background.as_ref()),
    ]
}

pub fn apply_wrapper(wrapper: &mut LayerWrapper, edit: WrapperEdit) -> Result<(), EditorError> {
    match edit {
        WrapperEdit::Height(h) => {
            wrapper.height = check_range("height", h, MIN_WRAPPER_HEIGHT, MAX_WRAPPER_HEIGHT)?
        }
        WrapperEdit::Background(bg) => {
            check_background(&bg)?;
            wrapper.background = bg;
        }
        WrapperEdit::BackgroundImage(url) => {
            if let Some(u) = &url {
                if !crate::editor::types::Link::is_valid_url(u) {
                    return Err(EditorError::InvalidEdit(format!("invalid image URL: {}", u)));
                }
            }
            wrapper.background_image = url;
        }
        WrapperEdit::Border(border) => {
            check_border(&border)?;
            wrapper.border = border;
        }
        WrapperEdit::Place { content, x, y } => {
            wrapper.place(content, x, y);
        }
    }
    Ok(())
}

// ============================================================================
// LAYER ITEM
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ItemEdit {
    Rename(String),
    Position { x: f64, y: f64 },
    MoveBy { dx: f64, dy: f64 },
    Scale(f64),
    Rotate(f64),
    BringForward,
    SendBackward,
    Remove,
}

pub fn item_section(item: &LayerItem) -> Section {
    Section::new(
        "Layer",
        vec![
            Control::text("name", "Name", item.name.as_str()),
            Control::number("x", "X (%)", item.x, (0.0, 100.0, 0.1)),
            Control::number("y", "Y (%)", item.y, (0.0, 100.0, 0.1)),
            Control::number(
                "scale",
                "Scale",
                item.scale,
                (
                    crate::editor::layers::MIN_SCALE,
                    crate::editor::layers::MAX_SCALE,
                    0.1,
                ),
            ),
            Control::number("rotation", "Rotation", item.rotation, (0.0, 359.0, 1.0)),
        ],
    )
}

pub fn apply_item(
    wrapper: &mut LayerWrapper,
    item: &BlockId,
    edit: ItemEdit,
) -> Result<(), EditorError> {
    match edit {
        ItemEdit::Rename(name) => wrapper.rename_item(item, &name),
        ItemEdit::Position { x, y } => wrapper.set_item_position(item, x, y),
        ItemEdit::MoveBy { dx, dy } => wrapper.move_item_by(item, dx, dy),
        ItemEdit::Scale(s) => wrapper.scale_item(item, s),
        ItemEdit::Rotate(deg) => wrapper.rotate_item(item, deg),
        ItemEdit::BringForward => wrapper.bring_forward(item),
        ItemEdit::SendBackward => wrapper.send_backward(item),
        ItemEdit::Remove => wrapper.remove_item(item).map(|_| ()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::panels::{Edit, apply, panel_for};
    use crate::editor::{Block, CanvasStore, Selection};

    fn store_with_group(n: usize) -> (CanvasStore, BlockId, Vec<BlockId>) {
        let mut store = CanvasStore::new();
        let group = ColumnGroup::with_columns(n);
        let gid = group.id.clone();
        let cids = group.columns.iter().map(|c| c.id.clone()).collect();
        store.edit(|c| c.push_block(Block::ColumnGroup(group)), true);
        (store, gid, cids)
    }

    fn widths(store: &CanvasStore, gid: &BlockId) -> Vec<f64> {
        store.canvas().group(gid).unwrap().columns.iter().map(|c| c.width).collect()
    }

    #[test]
    fn test_width_through_panel() {
        let (mut store, gid, cids) = store_with_group(3);
        store.select(Selection::Column {
            group: gid.clone(),
            column: cids[0].clone(),
        });
        apply(&mut store, Edit::Column(ColumnEdit::Width(50.0)), true).unwrap();
        assert_eq!(widths(&store, &gid), vec![50.0, 25.0, 25.0]);
    }

    #[test]
    fn test_two_column_panel_uses_slider_range() {
        let (mut store, gid, cids) = store_with_group(2);
        store.select(Selection::Column {
            group: gid,
            column: cids[0].clone(),
        });
        let panel = panel_for(&store).unwrap();
        let width = panel.sections[0]
            .controls
            .iter()
            .find(|c| c.key == "width")
            .unwrap();
        assert!(matches!(
            width.input,
            super::super::ControlValue::Number { min, max, .. } if min == 10.0 && max == 90.0
        ));
    }

    #[test]
    fn test_removing_selected_column_clears_selection() {
        let (mut store, gid, cids) = store_with_group(3);
        store.select(Selection::Column {
            group: gid.clone(),
            column: cids[2].clone(),
        });
        apply(&mut store, Edit::Column(ColumnEdit::Count(2)), true).unwrap();
        assert!(store.selection().is_none());
        assert_eq!(widths(&store, &gid), vec![50.0, 50.0]);
    }

    #[test]
    fn test_wrapper_height_bounds() {
        let mut wrapper = LayerWrapper::editor_default();
        apply_wrapper(&mut wrapper, WrapperEdit::Height(400)).unwrap();
        assert!(apply_wrapper(&mut wrapper, WrapperEdit::Height(5)).is_err());
        assert_eq!(wrapper.height, 400);
    }

    #[test]
    fn test_rename_collision_through_panel() {
        let mut store = CanvasStore::new();
        let mut wrapper = LayerWrapper::editor_default();
        let wid = wrapper.id.clone();
        let content = LayerContent::Emoji(crate::editor::Emoji {
            symbol: "⭐".into(),
            size: 40,
            styles: Default::default(),
        });
        let a = wrapper.place(content.clone(), 10.0, 10.0);
        let b = wrapper.place(content, 20.0, 20.0);
        store.edit(|c| c.push_block(Block::LayerWrapper(wrapper)), true);
        store.select(Selection::WrapperItem {
            wrapper: wid.clone(),
            item: b.clone(),
        });

        let before = store.canvas().clone();
        let rename = Edit::Item(ItemEdit::Rename("Emoji".into()));
        let err = apply(&mut store, rename, true).unwrap_err();
        assert_eq!(err, EditorError::NameTaken("Emoji".into()));
        assert_eq!(store.canvas(), &before);

        let names: Vec<&str> = store
            .canvas()
            .wrapper(&wid)
            .unwrap()
            .items
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["Emoji", "Emoji 2"]);
        assert!(store.canvas().wrapper(&wid).unwrap().item(&a).is_some());
    }
}
