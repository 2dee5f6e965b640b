//! Free placement inside layer wrappers.
//!
//! Positions are percentages of the wrapper's rendered box at the moment of
//! the drop. Nothing here rescales stored positions when the box changes
//! size; re-rendering at a different size simply maps the same percentages
//! onto the new box.

use serde::{Deserialize, Serialize};

use super::ids::BlockId;
use super::types::{LayerContent, LayerItem, LayerWrapper};
use crate::error::EditorError;

pub const MIN_SCALE: f64 = 0.1;
pub const MAX_SCALE: f64 = 5.0;

/// On-screen box of a wrapper, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Pointer position, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Convert a pointer position to percentages of `rect`, clamped to `[0, 100]`.
///
/// Returns `None` for a box with no area.
pub fn position_from_pointer(rect: Rect, point: Point) -> Option<(f64, f64)> {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return None;
    }
    let x = ((point.x - rect.left) / rect.width * 100.0).clamp(0.0, 100.0);
    let y = ((point.y - rect.top) / rect.height * 100.0).clamp(0.0, 100.0);
    Some((x, y))
}

fn clamp_percent(v: f64) -> f64 {
    if v.is_finite() { v.clamp(0.0, 100.0) } else { 0.0 }
}

fn normalize_degrees(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let d = deg.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs.
    if d >= 360.0 { 0.0 } else { d }
}

impl LayerWrapper {
    pub fn is_name_taken(&self, name: &str, except: Option<&BlockId>) -> bool {
        self.items
            .iter()
            .any(|i| i.name == name && Some(&i.id) != except)
    }

    /// `base`, or `base 2`, `base 3`... whichever is free first.
    pub fn unique_name(&self, base: &str) -> String {
        if !self.is_name_taken(base, None) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{} {}", base, n))
            .find(|candidate| !self.is_name_taken(candidate, None))
            .unwrap_or_else(|| base.to_string())
    }

    /// Drop new content at `(x, y)` percent. Returns the new item's id.
    pub fn place(&mut self, content: LayerContent, x: f64, y: f64) -> BlockId {
        let id = BlockId::generate("item");
        let name = self.unique_name(content.label());
        self.items.push(LayerItem {
            id: id.clone(),
            name,
            x: clamp_percent(x),
            y: clamp_percent(y),
            scale: 1.0,
            rotation: 0.0,
            content,
        });
        id
    }

    fn require_item(&mut self, id: &BlockId) -> Result<&mut LayerItem, EditorError> {
        self.item_mut(id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))
    }

    /// Rename an item. Names are trimmed and must be unique within the wrapper.
    pub fn rename_item(&mut self, id: &BlockId, name: &str) -> Result<(), EditorError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EditorError::InvalidEdit("layer name cannot be empty".into()));
        }
        if self.is_name_taken(name, Some(id)) {
            return Err(EditorError::NameTaken(name.to_string()));
        }
        self.require_item(id)?.name = name.to_string();
        Ok(())
    }

    pub fn set_item_position(&mut self, id: &BlockId, x: f64, y: f64) -> Result<(), EditorError> {
        let item = self.require_item(id)?;
        item.x = clamp_percent(x);
        item.y = clamp_percent(y);
        Ok(())
    }

    /// Nudge by a delta in percentage points.
    pub fn move_item_by(&mut self, id: &BlockId, dx: f64, dy: f64) -> Result<(), EditorError> {
        let item = self.require_item(id)?;
        item.x = clamp_percent(item.x + dx);
        item.y = clamp_percent(item.y + dy);
        Ok(())
    }

    pub fn scale_item(&mut self, id: &BlockId, scale: f64) -> Result<(), EditorError> {
        if !scale.is_finite() {
            return Err(EditorError::InvalidEdit("scale must be a number".into()));
        }
        self.require_item(id)?.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        Ok(())
    }

    pub fn rotate_item(&mut self, id: &BlockId, degrees: f64) -> Result<(), EditorError> {
        self.require_item(id)?.rotation = normalize_degrees(degrees);
        Ok(())
    }

    pub fn remove_item(&mut self, id: &BlockId) -> Result<LayerItem, EditorError> {
        let index = self
            .items
            .iter()
            .position(|i| &i.id == id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?;
        Ok(self.items.remove(index))
    }

    /// Items render in order; later items sit on top.
    pub fn bring_forward(&mut self, id: &BlockId) -> Result<(), EditorError> {
        let index = self
            .items
            .iter()
            .position(|i| &i.id == id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?;
        if index + 1 < self.items.len() {
            self.items.swap(index, index + 1);
        }
        Ok(())
    }

    pub fn send_backward(&mut self, id: &BlockId) -> Result<(), EditorError> {
        let index = self
            .items
            .iter()
            .position(|i| &i.id == id)
            .ok_or_else(|| EditorError::NotFound(id.to_string()))?;
        if index > 0 {
            self.items.swap(index, index - 1);
        }
        Ok(())
    }
}
