//! Selection pointer into the canvas tree.
//!
//! A selection holds ids only. [`Selection::resolve`] walks the tree by
//! those ids and returns `None` as soon as one of them is gone, which the
//! caller treats as "deselect".

use serde::{Deserialize, Serialize};

use super::Primitive;
use super::canvas::Canvas;
use super::ids::BlockId;
use super::types::{Column, ColumnGroup, LayerItem, LayerWrapper};

/// What the property panels are currently editing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selection {
    #[default]
    None,
    Column {
        group: BlockId,
        column: BlockId,
    },
    ColumnPrimitive {
        group: BlockId,
        column: BlockId,
        primitive: BlockId,
    },
    Wrapper {
        wrapper: BlockId,
    },
    WrapperItem {
        wrapper: BlockId,
        item: BlockId,
    },
}

/// Borrowed view of the selected entity.
#[derive(Debug, Clone, Copy)]
pub enum Resolved<'a> {
    Column {
        group: &'a ColumnGroup,
        column: &'a Column,
    },
    ColumnPrimitive {
        column: &'a Column,
        primitive: &'a Primitive,
    },
    Wrapper(&'a LayerWrapper),
    WrapperItem {
        wrapper: &'a LayerWrapper,
        item: &'a LayerItem,
    },
}

impl Selection {
    pub fn is_none(&self) -> bool {
        matches!(self, Selection::None)
    }

    /// Look the pointer up in `canvas`.
    pub fn resolve<'a>(&self, canvas: &'a Canvas) -> Option<Resolved<'a>> {
        match self {
            Selection::None => None,
            Selection::Column { group, column } => {
                let group = canvas.group(group)?;
                let column = group.column(column)?;
                Some(Resolved::Column { group, column })
            }
            Selection::ColumnPrimitive {
                group,
                column,
                primitive,
            } => {
                let column = canvas.group(group)?.column(column)?;
                let primitive = column.block(primitive)?;
                Some(Resolved::ColumnPrimitive { column, primitive })
            }
            Selection::Wrapper { wrapper } => canvas.wrapper(wrapper).map(Resolved::Wrapper),
            Selection::WrapperItem { wrapper, item } => {
                let wrapper = canvas.wrapper(wrapper)?;
                let item = wrapper.item(item)?;
                Some(Resolved::WrapperItem { wrapper, item })
            }
        }
    }

    /// Id of the innermost selected entity.
    pub fn target_id(&self) -> Option<&BlockId> {
        match self {
            Selection::None => None,
            Selection::Column { column, .. } => Some(column),
            Selection::ColumnPrimitive { primitive, .. } => Some(primitive),
            Selection::Wrapper { wrapper } => Some(wrapper),
            Selection::WrapperItem { item, .. } => Some(item),
        }
    }
}
