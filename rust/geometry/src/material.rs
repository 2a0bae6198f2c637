// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Material factory
//!
//! Builds paintable surface descriptors from a style record or the
//! theme default for a surface kind. Texture loads go through an
//! explicit cache owned by the factory, injected at construction and
//! disposed at teardown; repeated materials referencing the same
//! texture share one decoded resource.
//!
//! Fallback chain: style texture -> style solid color -> theme default.

use crate::error::{Error, Result};
use floorgen_core::Style;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// What kind of surface a material paints; selects the theme default
/// and the PBR constants when the style leaves them unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceKind {
    Wall,
    Floor,
    Ceiling,
    Door,
    Glass,
    StairTread,
    Handrail,
    LiftShaft,
}

impl SurfaceKind {
    /// Theme default color (RGBA) for this surface kind
    fn default_color(self) -> [f32; 4] {
        match self {
            SurfaceKind::Wall => [0.85, 0.83, 0.80, 1.0],
            SurfaceKind::Floor => [0.62, 0.56, 0.50, 1.0],
            SurfaceKind::Ceiling => [0.92, 0.92, 0.92, 1.0],
            SurfaceKind::Door => [0.48, 0.35, 0.26, 1.0],
            SurfaceKind::Glass => [0.60, 0.75, 0.85, 0.35],
            SurfaceKind::StairTread => [0.55, 0.48, 0.42, 1.0],
            SurfaceKind::Handrail => [0.30, 0.30, 0.32, 1.0],
            SurfaceKind::LiftShaft => [0.70, 0.70, 0.72, 1.0],
        }
    }

    /// Kind-specific PBR constants: (roughness, metalness)
    fn default_pbr(self) -> (f32, f32) {
        match self {
            SurfaceKind::Wall | SurfaceKind::Ceiling => (0.9, 0.0),
            SurfaceKind::Floor | SurfaceKind::StairTread => (0.8, 0.0),
            SurfaceKind::Door => (0.7, 0.0),
            SurfaceKind::Glass => (0.1, 0.0),
            SurfaceKind::Handrail => (0.4, 0.8),
            SurfaceKind::LiftShaft => (0.5, 0.6),
        }
    }
}

/// A decoded texture shared across materials
#[derive(Debug)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    /// RGBA8 pixel data
    pub rgba: Vec<u8>,
}

/// Process-wide texture cache keyed by URL/path.
///
/// Interior mutability so independent per-floor generation passes can
/// share one cache (the sole cross-floor mutable state besides
/// read-only config).
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: Mutex<FxHashMap<String, Arc<Texture>>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and decode a texture, or return the cached copy
    pub fn load(&self, url: &str) -> Result<Arc<Texture>> {
        {
            let entries = self.entries.lock().expect("texture cache poisoned");
            if let Some(texture) = entries.get(url) {
                return Ok(texture.clone());
            }
        }

        let decoded = image::open(url)
            .map_err(|e| Error::Texture(format!("{}: {}", url, e)))?
            .to_rgba8();

        let texture = Arc::new(Texture {
            width: decoded.width(),
            height: decoded.height(),
            rgba: decoded.into_raw(),
        });

        let mut entries = self.entries.lock().expect("texture cache poisoned");
        Ok(entries.entry(url.to_string()).or_insert(texture).clone())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("texture cache poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached textures. Must be called at teardown; handles
    /// still held by materials keep their texture alive until dropped.
    pub fn dispose(&self) {
        self.entries.lock().expect("texture cache poisoned").clear();
    }
}

/// A paintable surface descriptor
#[derive(Debug, Clone)]
pub struct SurfaceMaterial {
    pub color: [f32; 4],
    pub roughness: f32,
    pub metalness: f32,
    pub texture: Option<Arc<Texture>>,
}

/// Builds surface materials from styles with the documented fallback
/// chain. Owns the texture cache.
pub struct MaterialFactory {
    cache: Arc<TextureCache>,
    styles: FxHashMap<String, Style>,
    default_style: Option<String>,
}

impl MaterialFactory {
    pub fn new(
        cache: Arc<TextureCache>,
        styles: FxHashMap<String, Style>,
        default_style: Option<String>,
    ) -> Self {
        Self {
            cache,
            styles,
            default_style,
        }
    }

    /// Build a material for a surface kind from an explicit style record
    pub fn create(&self, kind: SurfaceKind, style: Option<&Style>) -> SurfaceMaterial {
        let (default_roughness, default_metalness) = kind.default_pbr();

        let mut material = SurfaceMaterial {
            color: kind.default_color(),
            roughness: default_roughness,
            metalness: default_metalness,
            texture: None,
        };

        let Some(style) = style else {
            return material;
        };

        if let Some(roughness) = style.roughness {
            material.roughness = roughness;
        }
        if let Some(metalness) = style.metalness {
            material.metalness = metalness;
        }
        if let Some(color) = style.color {
            material.color = color;
        }

        if let Some(url) = &style.texture {
            match self.cache.load(url) {
                Ok(texture) => material.texture = Some(texture),
                Err(e) => {
                    // Non-fatal: fall back to the color resolved above
                    warn!(texture = %url, error = %e, "texture load failed, using solid color");
                }
            }
        }

        material
    }

    /// Build a material from a style name, falling back to the
    /// configured default style, then the theme default for the kind.
    pub fn resolve(&self, kind: SurfaceKind, style_name: Option<&str>) -> SurfaceMaterial {
        let style = style_name
            .and_then(|name| self.styles.get(name))
            .or_else(|| {
                self.default_style
                    .as_deref()
                    .and_then(|name| self.styles.get(name))
            });
        self.create(kind, style)
    }

    pub fn cache(&self) -> &Arc<TextureCache> {
        &self.cache
    }

    /// Dispose the texture cache at teardown
    pub fn dispose(&self) {
        self.cache.dispose();
    }
}
