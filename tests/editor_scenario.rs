//! End-to-end editor sessions driven through the store and the panels.

use pretty_assertions::assert_eq;

use mailflow::editor::panels::{self, ColumnEdit, Edit, ItemEdit, WrapperEdit};
use mailflow::editor::{
    Block, BlockMeta, Canvas, CanvasStore, ColumnGroup, Emoji, LayerContent, LayerWrapper,
    Selection, default_primitive,
};
use mailflow::error::EditorError;

fn widths(store: &CanvasStore, group: &mailflow::editor::BlockId) -> Vec<f64> {
    store
        .canvas()
        .group(group)
        .map(|g| g.columns.iter().map(|c| c.width).collect())
        .unwrap_or_default()
}

#[test]
fn test_column_width_session_with_undo() {
    let mut store = CanvasStore::new();
    assert_eq!(store.history_len(), 1);
    assert_eq!(store.cursor(), 0);

    let group = ColumnGroup::with_columns(2);
    let group_id = group.id.clone();
    let first = group.columns[0].id.clone();
    store.edit(|c| c.push_block(Block::ColumnGroup(group)), true);
    assert_eq!(store.history_len(), 2);
    assert_eq!(store.cursor(), 1);

    assert!(store.select(Selection::Column {
        group: group_id.clone(),
        column: first,
    }));
    panels::apply(&mut store, Edit::Column(ColumnEdit::Width(30.0)), true).unwrap();
    assert_eq!(widths(&store, &group_id), vec![30.0, 70.0]);

    assert!(store.undo());
    assert_eq!(widths(&store, &group_id), vec![50.0, 50.0]);
    assert!(store.undo());
    assert_eq!(store.canvas(), &Canvas::new());
    assert!(!store.can_undo());

    assert!(store.redo());
    assert!(store.redo());
    assert_eq!(widths(&store, &group_id), vec![30.0, 70.0]);
}

#[test]
fn test_drag_batches_into_one_entry() {
    let mut store = CanvasStore::new();
    let mut wrapper = LayerWrapper::editor_default();
    let item = wrapper.place(LayerContent::Emoji(Emoji::editor_default()), 10.0, 10.0);
    let wrapper_id = wrapper.id.clone();
    store.edit(|c| c.push_block(Block::LayerWrapper(wrapper)), true);
    let before = store.history_len();

    assert!(store.select(Selection::WrapperItem {
        wrapper: wrapper_id.clone(),
        item: item.clone(),
    }));
    for step in 1..=5 {
        let edit = Edit::Item(ItemEdit::Position {
            x: 10.0 + step as f64,
            y: 10.0,
        });
        panels::apply(&mut store, edit, step == 5).unwrap();
    }
    assert_eq!(store.history_len(), before + 1);
    let placed = store.canvas().wrapper(&wrapper_id).and_then(|w| w.item(&item));
    assert_eq!(placed.map(|i| i.x), Some(15.0));
}

#[test]
fn test_layer_rename_conflict_leaves_names() {
    let mut store = CanvasStore::new();
    let wrapper = LayerWrapper::editor_default();
    let wrapper_id = wrapper.id.clone();
    store.edit(|c| c.push_block(Block::LayerWrapper(wrapper)), true);

    assert!(store.select(Selection::Wrapper {
        wrapper: wrapper_id.clone(),
    }));
    for _ in 0..2 {
        let place = WrapperEdit::Place {
            content: LayerContent::Emoji(Emoji::editor_default()),
            x: 50.0,
            y: 50.0,
        };
        panels::apply(&mut store, Edit::Wrapper(place), true).unwrap();
    }
    let names: Vec<String> = store
        .canvas()
        .wrapper(&wrapper_id)
        .map(|w| w.items.iter().map(|i| i.name.clone()).collect())
        .unwrap_or_default();
    assert_eq!(names, vec!["Emoji".to_string(), "Emoji 2".to_string()]);

    let second = store.canvas().wrapper(&wrapper_id).map(|w| w.items[1].id.clone());
    let second = second.unwrap();
    assert!(store.select(Selection::WrapperItem {
        wrapper: wrapper_id.clone(),
        item: second,
    }));
    let len = store.history_len();
    let err = panels::apply(&mut store, Edit::Item(ItemEdit::Rename("Emoji".into())), true)
        .unwrap_err();
    assert_eq!(err, EditorError::NameTaken("Emoji".into()));
    assert_eq!(store.history_len(), len);
}

#[test]
fn test_deleting_selected_primitive_clears_selection() {
    let mut store = CanvasStore::new();
    let group = ColumnGroup::with_columns(1);
    let (group_id, column_id) = (group.id.clone(), group.columns[0].id.clone());
    store.edit(|c| c.push_block(Block::ColumnGroup(group)), true);

    let heading = default_primitive("heading").unwrap();
    let heading_id = store
        .try_edit(|c| c.add_primitive(&group_id, &column_id, None, heading), true)
        .unwrap();
    assert!(store.select(Selection::ColumnPrimitive {
        group: group_id.clone(),
        column: column_id.clone(),
        primitive: heading_id.clone(),
    }));
    assert!(panels::panel_for(&store).is_some());

    store
        .try_edit(|c| c.remove_primitive(&group_id, &column_id, &heading_id), true)
        .unwrap();
    assert!(store.selection().is_none());
    assert!(panels::panel_for(&store).is_none());
}

#[test]
fn test_canvas_survives_json_round_trip() {
    let mut store = CanvasStore::new();
    let group = ColumnGroup::with_columns(3);
    let (group_id, column_id) = (group.id.clone(), group.columns[1].id.clone());
    store.edit(|c| c.push_block(Block::ColumnGroup(group)), true);
    for name in ["heading", "button", "rating"] {
        let primitive = default_primitive(name).unwrap();
        store
            .try_edit(|c| c.add_primitive(&group_id, &column_id, None, primitive), true)
            .unwrap();
    }

    let json = serde_json::to_string(store.canvas()).unwrap();
    let restored = CanvasStore::load(serde_json::from_str(&json).unwrap());
    assert_eq!(restored.canvas(), store.canvas());
    assert_eq!(restored.history_len(), 1);
}
