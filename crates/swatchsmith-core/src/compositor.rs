// ABOUTME: Straight-alpha "over" compositing used to resolve a layer's rendered color
// ABOUTME: Flattens fill alpha and layer opacity against the parent frame's fill

use swatchsmith_types::{Fill, Rgb, SelectedLayer};

/// `fg * alpha + bg * (1 - alpha)` per channel. The result is opaque.
pub fn flatten(fg: Rgb, fg_alpha: f32, bg: Rgb) -> Rgb {
    let over = |f: f32, b: f32| f * fg_alpha + b * (1.0 - fg_alpha);
    Rgb::new(over(fg.r, bg.r), over(fg.g, bg.g), over(fg.b, bg.b))
}

/// The color a parent frame paints behind its children.
///
/// A translucent parent fill is itself flattened over `default_background`;
/// anything but a solid fill falls back to `default_background`.
pub fn background_of(parent_fill: &Fill, default_background: Rgb) -> Rgb {
    match *parent_fill {
        Fill::Solid { color, opacity } => flatten(color, opacity, default_background),
        Fill::Other => default_background,
    }
}

/// The opaque color a layer renders as, or `None` if its fill is not solid.
pub fn rendered_color(layer: &SelectedLayer, default_background: Rgb) -> Option<Rgb> {
    match layer.fill {
        Fill::Solid { color, opacity } => {
            let alpha = opacity * layer.layer_opacity;
            let background = background_of(&layer.parent_fill, default_background);
            Some(flatten(color, alpha, background))
        }
        Fill::Other => None,
    }
}
