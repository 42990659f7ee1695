//! Declarative graphics items, serialized in the host's `tag`-discriminated shape.

use serde::{Deserialize, Serialize};

use super::coord::Point;
use super::style::{FillStyle, LineStyle, TextAlignment, TextStyle};

/// A geometric primitive inside a shapes item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag")]
pub enum ShapePrimitive {
    Polygon { points: Vec<Point> },
}

/// One keyed graphics item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tag")]
pub enum GraphicsItem {
    Container {
        key: String,
        children: Vec<GraphicsItem>,
    },
    Text {
        key: String,
        point: Point,
        text: String,
        style: TextStyle,
        #[serde(rename = "textAlignment")]
        text_alignment: TextAlignment,
    },
    /// Filled interiors.
    Shapes {
        key: String,
        primitives: Vec<ShapePrimitive>,
        #[serde(rename = "fillStyle")]
        fill_style: FillStyle,
    },
    /// Outlines only.
    ContourShapes {
        key: String,
        primitives: Vec<ShapePrimitive>,
        #[serde(rename = "lineStyle")]
        line_style: LineStyle,
    },
}

impl GraphicsItem {
    pub fn key(&self) -> &str {
        match self {
            GraphicsItem::Container { key, .. }
            | GraphicsItem::Text { key, .. }
            | GraphicsItem::Shapes { key, .. }
            | GraphicsItem::ContourShapes { key, .. } => key,
        }
    }

    /// This item's key followed by all descendant keys, depth first.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = vec![self.key()];
        if let GraphicsItem::Container { children, .. } = self {
            keys.extend(children.iter().flat_map(GraphicsItem::keys));
        }
        keys
    }
}

/// The full item list a study returns for one bar.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Graphics {
    pub items: Vec<GraphicsItem>,
}

impl Graphics {
    pub fn new(items: Vec<GraphicsItem>) -> Self {
        Self { items }
    }

    /// Every key in the item tree.
    pub fn keys(&self) -> Vec<&str> {
        self.items.iter().flat_map(GraphicsItem::keys).collect()
    }

    /// Find an item anywhere in the tree by key.
    pub fn find(&self, key: &str) -> Option<&GraphicsItem> {
        fn walk<'a>(items: &'a [GraphicsItem], key: &str) -> Option<&'a GraphicsItem> {
            for item in items {
                if item.key() == key {
                    return Some(item);
                }
                if let GraphicsItem::Container { children, .. } = item {
                    if let Some(found) = walk(children, key) {
                        return Some(found);
                    }
                }
            }
            None
        }
        walk(&self.items, key)
    }
}
