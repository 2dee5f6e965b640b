//! The canvas tree and its structural operations.
//!
//! `Canvas` is plain data. Mutating methods take `&mut self` and are meant
//! to run on a private copy handed out by [`CanvasStore::edit`], never on
//! the store's live tree.
//!
//! [`CanvasStore::edit`]: super::CanvasStore::edit

use serde::{Deserialize, Serialize};

use super::ids::BlockId;
use super::types::{Column, ColumnGroup, LayerItem, LayerWrapper};
use super::{Block, Primitive};
use crate::error::EditorError;

/// Ordered sequence of top-level blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn block(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id() == id)
    }

    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|b| b.id() == id)
    }

    pub fn group(&self, id: &BlockId) -> Option<&ColumnGroup> {
        self.blocks.iter().find_map(|b| match b {
            Block::ColumnGroup(g) if &g.id == id => Some(g),
            _ => None,
        })
    }

    pub fn group_mut(&mut self, id: &BlockId) -> Option<&mut ColumnGroup> {
        self.blocks.iter_mut().find_map(|b| match b {
            Block::ColumnGroup(g) if &g.id == id => Some(g),
            _ => None,
        })
    }

    pub fn wrapper(&self, id: &BlockId) -> Option<&LayerWrapper> {
        self.blocks.iter().find_map(|b| match b {
            Block::LayerWrapper(w) if &w.id == id => Some(w),
            _ => None,
        })
    }

    pub fn wrapper_mut(&mut self, id: &BlockId) -> Option<&mut LayerWrapper> {
        self.blocks.iter_mut().find_map(|b| match b {
            Block::LayerWrapper(w) if &w.id == id => Some(w),
            _ => None,
        })
    }

    pub fn column_mut(&mut self, group: &BlockId, column: &BlockId) -> Option<&mut Column> {
        self.group_mut(group)?.column_mut(column)
    }

    pub fn primitive_mut(
        &mut self,
        group: &BlockId,
        column: &BlockId,
        primitive: &BlockId,
    ) -> Option<&mut Primitive> {
        self.column_mut(group, column)?.block_mut(primitive)
    }

    pub fn item_mut(&mut self, wrapper: &BlockId, item: &BlockId) -> Option<&mut LayerItem> {
        self.wrapper_mut(wrapper)?.item_mut(item)
    }

    /// True if any block, column, primitive or layer item carries this id.
    pub fn contains_id(&self, id: &BlockId) -> bool {
        self.blocks.iter().any(|b| match b {
            Block::ColumnGroup(g) => {
                &g.id == id
                    || g.columns
                        .iter()
                        .any(|c| &c.id == id || c.blocks.iter().any(|p| &p.id == id))
            }
            Block::LayerWrapper(w) => &w.id == id || w.items.iter().any(|i| &i.id == id),
        })
    }

    // ========================================================================
    // TOP-LEVEL BLOCKS
    // ========================================================================

    pub fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Insert at `index`, clamped to the end.
    pub fn insert_block(&mut self, index: usize, block: Block) {
        let index = index.min(self.blocks.len());
        self.blocks.insert(index, block);
    }

    pub fn remove_block(&mut self, id: &BlockId) -> Result<Block, EditorError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?;
        Ok(self.blocks.remove(index))
    }

    /// Move a top-level block to `to` (clamped to the last position).
    pub fn move_block(&mut self, id: &BlockId, to: usize) -> Result<(), EditorError> {
        let block = self.remove_block(id)?;
        let to = to.min(self.blocks.len());
        self.blocks.insert(to, block);
        Ok(())
    }

    /// Copy a top-level block (with fresh ids all the way down) right after
    /// the original. Returns the id of the copy.
    pub fn duplicate_block(&mut self, id: &BlockId) -> Result<BlockId, EditorError> {
        let index = self
            .index_of(id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?;
        let copy = with_fresh_ids(self.blocks[index].clone());
        let new_id = copy.id().clone();
        self.blocks.insert(index + 1, copy);
        Ok(new_id)
    }

    // ========================================================================
    // PRIMITIVES INSIDE COLUMNS
    // ========================================================================

    /// Insert a primitive into a column; `index` of `None` appends.
    pub fn add_primitive(
        &mut self,
        group: &BlockId,
        column: &BlockId,
        index: Option<usize>,
        primitive: Primitive,
    ) -> Result<BlockId, EditorError> {
        let col = self
            .column_mut(group, column)
            .ok_or_else(|| EditorError::NotFound(column.to_string()))?;
        let id = primitive.id.clone();
        let index = index.unwrap_or(col.blocks.len()).min(col.blocks.len());
        col.blocks.insert(index, primitive);
        Ok(id)
    }

    pub fn remove_primitive(
        &mut self,
        group: &BlockId,
        column: &BlockId,
        primitive: &BlockId,
    ) -> Result<Primitive, EditorError> {
        let col = self
            .column_mut(group, column)
            .ok_or_else(|| EditorError::NotFound(column.to_string()))?;
        let index = col
            .blocks
            .iter()
            .position(|p| &p.id == primitive)
            .ok_or_else(|| EditorError::NotFound(primitive.to_string()))?;
        Ok(col.blocks.remove(index))
    }

    /// Drag a primitive to another position, possibly in another column or group.
    pub fn move_primitive(
        &mut self,
        from: (&BlockId, &BlockId),
        primitive: &BlockId,
        to: (&BlockId, &BlockId),
        index: usize,
    ) -> Result<(), EditorError> {
        if self.group(to.0).and_then(|g| g.column(to.1)).is_none() {
            return Err(EditorError::NotFound(to.1.to_string()));
        }
        let moved = self.remove_primitive(from.0, from.1, primitive)?;
        self.add_primitive(to.0, to.1, Some(index), moved)?;
        Ok(())
    }

    /// Copy a primitive right after the original. Returns the copy's id.
    pub fn duplicate_primitive(
        &mut self,
        group: &BlockId,
        column: &BlockId,
        primitive: &BlockId,
    ) -> Result<BlockId, EditorError> {
        let col = self
            .column_mut(group, column)
            .ok_or_else(|| EditorError::NotFound(column.to_string()))?;
        let index = col
            .blocks
            .iter()
            .position(|p| &p.id == primitive)
            .ok_or_else(|| EditorError::NotFound(primitive.to_string()))?;
        let copy = Primitive::new(col.blocks[index].content.clone());
        let id = copy.id.clone();
        col.blocks.insert(index + 1, copy);
        Ok(id)
    }
}

/// Regenerate every id inside a block.
fn with_fresh_ids(block: Block) -> Block {
    match block {
        Block::ColumnGroup(mut g) => {
            g.id = BlockId::generate("group");
            for col in &mut g.columns {
                col.id = BlockId::generate("column");
                for p in &mut col.blocks {
                    p.id = BlockId::generate(p.content.type_name());
                }
            }
            Block::ColumnGroup(g)
        }
        Block::LayerWrapper(mut w) => {
            w.id = BlockId::generate("wrapper");
            for item in &mut w.items {
                item.id = BlockId::generate("item");
            }
            Block::LayerWrapper(w)
        }
    }
}
