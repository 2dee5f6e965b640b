//! # Mailflow - Email Marketing Dashboard Core
//!
//! Mailflow is the backend and editor-state core of an email-marketing
//! dashboard. It provides:
//!
//! - **Template editor state**: the canvas tree of the drag-and-drop email
//!   editor, with selection, snapshot undo/redo and property panels
//! - **Asset gallery**: per-user image storage with public URLs
//! - **Template persistence**: saved templates scoped to their owner
//! - **AI flows**: sender-domain DNS verification and a chat test
//! - **HTTP API**: the dashboard's server actions over axum
//!
//! ## Quick Start
//!
//! ```
//! use mailflow::editor::{Block, CanvasStore, ColumnGroup, Selection};
//!
//! let mut store = CanvasStore::new();
//! let group = ColumnGroup::with_columns(2);
//! let (group_id, column_id) = (group.id.clone(), group.columns[0].id.clone());
//! store.edit(|canvas| canvas.push_block(Block::ColumnGroup(group)), true);
//!
//! assert!(store.select(Selection::Column { group: group_id, column: column_id }));
//! assert!(store.undo());
//! assert!(store.selection().is_none());
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`editor`] | Canvas tree, history, selection, panels |
//! | [`assets`] | Asset gallery over object storage |
//! | [`templates`] | Template persistence |
//! | [`ai`] | AI settings, DNS verification, chat test |
//! | [`auth`] | Caller identity |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod ai;
pub mod assets;
pub mod auth;
pub mod editor;
pub mod error;
pub mod server;
pub mod templates;

// Re-exports for convenience
pub use editor::{Canvas, CanvasStore};
pub use error::MailflowError;
