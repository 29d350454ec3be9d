// ABOUTME: Canvas selection data handed to the engine by the host shell
// ABOUTME: Layer fills, opacities, and the key colors parsed out of them

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::token::Mode;

/// The first fill of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Fill {
    Solid {
        color: Rgb,
        #[serde(default = "default_opacity")]
        opacity: f32,
    },
    /// Gradients, images, or no fill at all.
    #[default]
    #[serde(other)]
    Other,
}

impl Fill {
    pub fn solid(color: Rgb) -> Self {
        Fill::Solid {
            color,
            opacity: 1.0,
        }
    }

    pub fn solid_color(&self) -> Option<Rgb> {
        match self {
            Fill::Solid { color, .. } => Some(*color),
            Fill::Other => None,
        }
    }
}

fn default_opacity() -> f32 {
    1.0
}

/// One selected layer as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedLayer {
    pub layer_name: String,
    /// Name of the immediate parent container; groups key colors into ramps.
    #[serde(default)]
    pub parent_name: String,
    #[serde(default)]
    pub fill: Fill,
    #[serde(default = "default_opacity")]
    pub layer_opacity: f32,
    /// Fill of the parent frame, used as the compositing background.
    #[serde(default)]
    pub parent_fill: Fill,
    /// Token already bound to this layer's fill, if any.
    #[serde(default)]
    pub bound_token: Option<String>,
}

impl SelectedLayer {
    /// A fully opaque solid layer with no parent fill.
    pub fn solid(layer_name: impl Into<String>, parent_name: impl Into<String>, color: Rgb) -> Self {
        Self {
            layer_name: layer_name.into(),
            parent_name: parent_name.into(),
            fill: Fill::solid(color),
            layer_opacity: 1.0,
            parent_fill: Fill::Other,
            bound_token: None,
        }
    }
}

/// An author-placed color at a scale position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyColor {
    pub position: i32,
    pub mode: Mode,
    pub color: Rgb,
    pub group_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_deserializes_from_host_shapes() {
        let solid: Fill =
            serde_json::from_str(r#"{"type":"solid","color":{"r":1.0,"g":0.0,"b":0.0}}"#).unwrap();
        assert_eq!(
            solid,
            Fill::Solid {
                color: Rgb::new(1.0, 0.0, 0.0),
                opacity: 1.0
            }
        );

        let gradient: Fill = serde_json::from_str(r#"{"type":"gradient_linear"}"#).unwrap();
        assert_eq!(gradient, Fill::Other);
        assert_eq!(gradient.solid_color(), None);
    }

    #[test]
    fn test_selected_layer_defaults() {
        let layer: SelectedLayer = serde_json::from_str(r#"{"layer_name":"Brand 300"}"#).unwrap();
        assert_eq!(layer.layer_opacity, 1.0);
        assert_eq!(layer.fill, Fill::Other);
        assert!(layer.parent_name.is_empty());
        assert!(layer.bound_token.is_none());
    }
}
