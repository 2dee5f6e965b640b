//! # Template Canvas State Model
//!
//! The state behind the drag-and-drop email editor: a tree of blocks edited
//! through a single mutation path with linear undo/redo.
//!
//! ```
//! use mailflow::editor::{Block, CanvasStore, ColumnGroup, Selection};
//!
//! let mut store = CanvasStore::new();
//! let group = ColumnGroup::with_columns(2);
//! let group_id = group.id.clone();
//! let column_id = group.columns[0].id.clone();
//!
//! // Every edit goes through the store; `true` records a history checkpoint.
//! store.edit(|canvas| canvas.push_block(Block::ColumnGroup(group)), true);
//! assert_eq!(store.history().len(), 2);
//!
//! store.select(Selection::Column { group: group_id, column: column_id });
//! assert!(store.selected().is_some());
//!
//! store.undo();
//! assert!(store.canvas().is_empty());
//! assert!(store.selection().is_none());
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`types`] | Block payloads, styles and containers |
//! | [`canvas`] | Canvas tree and structural operations |
//! | [`history`] | Snapshot log with cursor |
//! | [`store`] | Live canvas + history + selection |
//! | [`selection`] | Id-based selection pointer |
//! | [`columns`] | Column width redistribution |
//! | [`layers`] | Free placement inside layer wrappers |
//! | [`panels`] | Property editors, one per block variant |

pub mod canvas;
pub mod columns;
pub mod history;
pub mod ids;
pub mod layers;
pub mod panels;
pub mod selection;
pub mod store;
pub mod types;

pub use canvas::Canvas;
pub use history::History;
pub use ids::BlockId;
pub use selection::{Resolved, Selection};
pub use store::CanvasStore;
pub use types::*;

use serde::{Deserialize, Serialize};

/// A primitive block: id plus variant payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub id: BlockId,
    pub content: PrimitiveContent,
}

impl Primitive {
    /// Wrap a payload with a freshly generated id.
    pub fn new(content: PrimitiveContent) -> Self {
        let id = BlockId::generate(content.type_name());
        Self { id, content }
    }
}

/// Define the primitive enum and all dispatch methods from a single list.
///
/// Adding a new primitive: add one line here, then define the struct in
/// `types.rs` with `impl BlockMeta`. That's it.
macro_rules! define_primitives {
    ($($variant:ident($inner:ty) => $tag:literal),+ $(,)?) => {
        /// Payload of a primitive block.
        ///
        /// `#[serde(tag = "type")]` gives JSON like `{"type": "heading", "content": "Hi"}`.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type", rename_all = "snake_case")]
        pub enum PrimitiveContent {
            $($variant($inner),)+
        }

        impl PrimitiveContent {
            /// Serde type tag (e.g. `"countdown"`).
            pub fn type_name(&self) -> &'static str {
                match self { $(PrimitiveContent::$variant(_) => $tag,)+ }
            }

            /// Human-readable display label (from [`BlockMeta::label`]).
            pub fn label(&self) -> &'static str {
                match self { $(PrimitiveContent::$variant(_) => <$inner>::label(),)+ }
            }

            pub fn styles(&self) -> &Styles {
                match self { $(PrimitiveContent::$variant(c) => &c.styles,)+ }
            }

            pub fn styles_mut(&mut self) -> &mut Styles {
                match self { $(PrimitiveContent::$variant(c) => &mut c.styles,)+ }
            }

            /// Editor defaults for every primitive type.
            ///
            /// Single source of truth: [`block_types`] and [`default_primitive`]
            /// both derive from this.
            pub fn all_editor_defaults() -> Vec<Self> {
                vec![$(PrimitiveContent::$variant(<$inner>::editor_default()),)+]
            }
        }
    };
}

define_primitives! {
    Heading(Heading) => "heading",
    Text(Text) => "text",
    Image(Image) => "image",
    Button(Button) => "button",
    Separator(Separator) => "separator",
    Video(Video) => "video",
    Countdown(Countdown) => "countdown",
    Emoji(Emoji) => "emoji",
    Rating(Rating) => "rating",
}

/// A top-level canvas block. Primitives can only live inside containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    ColumnGroup(ColumnGroup),
    LayerWrapper(LayerWrapper),
}

impl Block {
    pub fn id(&self) -> &BlockId {
        match self {
            Block::ColumnGroup(g) => &g.id,
            Block::LayerWrapper(w) => &w.id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Block::ColumnGroup(_) => "Columns",
            Block::LayerWrapper(_) => "Layers",
        }
    }
}

/// Block type metadata for the editor palette.
#[derive(Debug, Clone, Serialize)]
pub struct BlockTypeMeta {
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub label: &'static str,
    /// True for containers that go at the top level of the canvas.
    pub container: bool,
}

/// Palette entries: both containers followed by every primitive.
pub fn block_types() -> Vec<BlockTypeMeta> {
    let mut types = vec![
        BlockTypeMeta {
            type_name: "column_group",
            label: "Columns",
            container: true,
        },
        BlockTypeMeta {
            type_name: "layer_wrapper",
            label: "Layers",
            container: true,
        },
    ];
    types.extend(
        PrimitiveContent::all_editor_defaults()
            .iter()
            .map(|c| BlockTypeMeta {
                type_name: c.type_name(),
                label: c.label(),
                container: false,
            }),
    );
    types
}

/// Create a primitive with editor defaults by type name.
///
/// Returns `None` for unknown type names.
pub fn default_primitive(type_name: &str) -> Option<Primitive> {
    PrimitiveContent::all_editor_defaults()
        .into_iter()
        .find(|c| c.type_name() == type_name)
        .map(Primitive::new)
}
