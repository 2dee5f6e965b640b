//! The editor's single source of truth.
//!
//! `CanvasStore` owns the live canvas, the undo history and the selection.
//! Every canvas change funnels through [`CanvasStore::replace_canvas`]; the
//! convenience methods below are thin wrappers around it.

use tracing::debug;

use super::canvas::Canvas;
use super::history::History;
use super::selection::{Resolved, Selection};
use crate::error::EditorError;

#[derive(Debug, Clone, Default)]
pub struct CanvasStore {
    canvas: Canvas,
    history: History,
    selection: Selection,
}

impl CanvasStore {
    /// Empty canvas, one history entry, nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a saved canvas. History restarts with it as the only entry.
    pub fn load(canvas: Canvas) -> Self {
        Self {
            history: History::new(canvas.clone()),
            canvas,
            selection: Selection::None,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The selected entity, looked up in the live canvas.
    pub fn selected(&self) -> Option<Resolved<'_>> {
        self.selection.resolve(&self.canvas)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn cursor(&self) -> usize {
        self.history.cursor()
    }

    /// Swap in the canvas produced by `update` from the current one.
    ///
    /// With `record_history`, the result becomes a new checkpoint (any redo
    /// branch is dropped). Without it, only the live canvas changes; live
    /// drags use this and record once on release. The selection is cleared
    /// if it no longer resolves.
    pub fn replace_canvas<F>(&mut self, update: F, record_history: bool)
    where
        F: FnOnce(&Canvas) -> Canvas,
    {
        let next = update(&self.canvas);
        if record_history {
            self.history.record(next.clone());
            debug!(
                entries = self.history.len(),
                cursor = self.history.cursor(),
                "recorded canvas checkpoint"
            );
        }
        self.canvas = next;
        self.revalidate_selection();
    }

    /// Replace the canvas with a prepared value.
    pub fn set_canvas(&mut self, canvas: Canvas, record_history: bool) {
        self.replace_canvas(move |_| canvas, record_history);
    }

    /// Apply `edit` to a private copy of the canvas and install the result.
    pub fn edit<R>(&mut self, edit: impl FnOnce(&mut Canvas) -> R, record_history: bool) -> R {
        let mut next = self.canvas.clone();
        let value = edit(&mut next);
        self.set_canvas(next, record_history);
        value
    }

    /// Like [`edit`](Self::edit), but a failed edit leaves canvas and history untouched.
    pub fn try_edit<R>(
        &mut self,
        edit: impl FnOnce(&mut Canvas) -> Result<R, EditorError>,
        record_history: bool,
    ) -> Result<R, EditorError> {
        let mut next = self.canvas.clone();
        let value = edit(&mut next)?;
        self.set_canvas(next, record_history);
        Ok(value)
    }

    /// Restore the previous checkpoint. Returns false at the start of history.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.canvas = snapshot.clone();
        self.selection = Selection::None;
        true
    }

    /// Re-apply the next checkpoint. Returns false at the end of history.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.canvas = snapshot.clone();
        self.selection = Selection::None;
        true
    }

    /// Point the panels at something. Returns false (and clears the
    /// selection) if it does not resolve in the live canvas.
    pub fn select(&mut self, selection: Selection) -> bool {
        self.selection = selection;
        self.revalidate_selection();
        !self.selection.is_none()
    }

    pub fn deselect(&mut self) {
        self.selection = Selection::None;
    }

    fn revalidate_selection(&mut self) {
        if !self.selection.is_none() && self.selection.resolve(&self.canvas).is_none() {
            debug!(?self.selection, "selection no longer resolves, clearing");
            self.selection = Selection::None;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::editor::columns::set_width;
    use crate::editor::{Block, BlockId, ColumnGroup, default_primitive};

    fn two_column_store() -> (CanvasStore, BlockId) {
        let mut store = CanvasStore::new();
        let group = ColumnGroup::with_columns(2);
        let gid = group.id.clone();
        store.edit(|c| c.push_block(Block::ColumnGroup(group)), true);
        (store, gid)
    }

    fn widths(store: &CanvasStore, gid: &BlockId) -> Vec<f64> {
        store
            .canvas()
            .group(gid)
            .unwrap()
            .columns
            .iter()
            .map(|c| c.width)
            .collect()
    }

    #[test]
    fn test_new_store_state() {
        let store = CanvasStore::new();
        assert!(store.canvas().is_empty());
        assert_eq!(store.history().len(), 1);
        assert_eq!(store.history().cursor(), 0);
        assert!(store.selection().is_none());
    }

    #[test]
    fn test_width_edit_undo_chain() {
        let (mut store, gid) = two_column_store();
        assert_eq!(store.history().len(), 2);
        assert_eq!(store.history().cursor(), 1);

        store
            .try_edit(
                |c| set_width(&mut c.group_mut(&gid).unwrap().columns, 0, 30.0),
                true,
            )
            .unwrap();
        assert_eq!(widths(&store, &gid), vec![30.0, 70.0]);

        assert!(store.undo());
        assert_eq!(widths(&store, &gid), vec![50.0, 50.0]);
        assert!(store.undo());
        assert!(store.canvas().is_empty());
        assert!(!store.undo());
    }

    #[test]
    fn test_unrecorded_drag_records_once() {
        let (mut store, gid) = two_column_store();
        let before = store.history().len();
        for w in [40.0, 35.0, 32.0, 31.0] {
            store
                .try_edit(
                    |c| set_width(&mut c.group_mut(&gid).unwrap().columns, 0, w),
                    false,
                )
                .unwrap();
        }
        assert_eq!(store.history().len(), before);
        store
            .try_edit(
                |c| set_width(&mut c.group_mut(&gid).unwrap().columns, 0, 30.0),
                true,
            )
            .unwrap();
        assert_eq!(store.history().len(), before + 1);

        // Undo skips every intermediate drag position.
        store.undo();
        assert_eq!(widths(&store, &gid), vec![50.0, 50.0]);
    }

    #[test]
    fn test_deleting_selected_block_clears_selection() {
        let (mut store, gid) = two_column_store();
        let cid = store.canvas().group(&gid).unwrap().columns[0].id.clone();
        let pid = store
            .try_edit(
                |c| c.add_primitive(&gid, &cid, None, default_primitive("heading").unwrap()),
                true,
            )
            .unwrap();
        assert!(store.select(Selection::ColumnPrimitive {
            group: gid.clone(),
            column: cid.clone(),
            primitive: pid.clone(),
        }));

        store
            .try_edit(|c| c.remove_primitive(&gid, &cid, &pid), true)
            .unwrap();
        assert!(store.selection().is_none());
        assert!(store.selected().is_none());
    }

    #[test]
    fn test_unrelated_edit_keeps_selection() {
        let (mut store, gid) = two_column_store();
        let cid = store.canvas().group(&gid).unwrap().columns[1].id.clone();
        store.select(Selection::Column {
            group: gid.clone(),
            column: cid,
        });
        store.edit(
            |c| c.push_block(Block::ColumnGroup(ColumnGroup::with_columns(3))),
            true,
        );
        assert!(!store.selection().is_none());
    }

    #[test]
    fn test_select_stale_pointer_is_rejected() {
        let mut store = CanvasStore::new();
        assert!(!store.select(Selection::Wrapper {
            wrapper: BlockId::from("missing"),
        }));
        assert!(store.selection().is_none());
    }

    #[test]
    fn test_undo_redo_restores_deep_equal_canvas() {
        let (mut store, gid) = two_column_store();
        let cid = store.canvas().group(&gid).unwrap().columns[0].id.clone();
        store
            .try_edit(
                |c| c.add_primitive(&gid, &cid, None, default_primitive("countdown").unwrap()),
                true,
            )
            .unwrap();
        let after = store.canvas().clone();

        store.undo();
        store.redo();
        assert_eq!(store.canvas(), &after);
        assert!(!store.redo());
    }

    #[test]
    fn test_failed_edit_changes_nothing() {
        let (mut store, _gid) = two_column_store();
        let before = store.canvas().clone();
        let result = store.try_edit(|c| c.remove_block(&BlockId::from("nope")), true);
        assert!(result.is_err());
        assert_eq!(store.canvas(), &before);
        assert_eq!(store.history().len(), 2);
    }

    #[test]
    fn test_edit_after_undo_drops_redo_branch() {
        let (mut store, _gid) = two_column_store();
        store.undo();
        assert!(store.can_redo());
        store.edit(
            |c| c.push_block(Block::LayerWrapper(crate::editor::LayerWrapper::editor_default())),
            true,
        );
        assert!(!store.can_redo());
        assert_eq!(store.history().len(), 2);
    }

    #[test]
    fn test_load_resets_history() {
        let (store, _gid) = two_column_store();
        let loaded = CanvasStore::load(store.canvas().clone());
        assert_eq!(loaded.history().len(), 1);
        assert_eq!(loaded.canvas().len(), 1);
        assert!(!loaded.can_undo());
    }
}
