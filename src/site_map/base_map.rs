use std::{io::BufReader, path::Path};

use anyhow::{Context, Error};
use serde::Serialize;
use serde_json::Value;

/// Layouts the site-map editor has stored its base image under over time.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BaseMapShape {
    /// `{ "baseImageUrl": "<url>" }`
    BaseImageUrl,
    /// `{ "baseMap": "<url>" }`
    BaseMapString,
    /// `{ "baseMap": { "url": "<url>" } }`
    BaseMapUrl,
    /// `{ "baseMap": { "imageUrl": "<url>" } }`
    BaseMapImageUrl,
    /// `{ "background": { "url": "<url>" } }`
    BackgroundUrl,
}

impl BaseMapShape {
    /// Lookup order. Earlier shapes win when a config matches several.
    pub const PRIORITY: [BaseMapShape; 5] = [
        BaseMapShape::BaseImageUrl,
        BaseMapShape::BaseMapString,
        BaseMapShape::BaseMapUrl,
        BaseMapShape::BaseMapImageUrl,
        BaseMapShape::BackgroundUrl,
    ];

    fn extract(self, layout: &Value) -> Option<&str> {
        let value = match self {
            BaseMapShape::BaseImageUrl => layout.get("baseImageUrl"),
            BaseMapShape::BaseMapString => layout.get("baseMap"),
            BaseMapShape::BaseMapUrl => layout.get("baseMap")?.get("url"),
            BaseMapShape::BaseMapImageUrl => layout.get("baseMap")?.get("imageUrl"),
            BaseMapShape::BackgroundUrl => layout.get("background")?.get("url"),
        }?;

        value.as_str().map(str::trim).filter(|url| !url.is_empty())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BaseMapImage {
    pub url: String,
    pub shape: BaseMapShape,
}

pub fn base_map_url(layout: &Value) -> Option<BaseMapImage> {
    BaseMapShape::PRIORITY.iter().find_map(|&shape| {
        shape.extract(layout).map(|url| BaseMapImage {
            url: url.to_string(),
            shape,
        })
    })
}

pub fn read_layout(path: &Path) -> Result<Value, Error> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open file: {}", path.to_string_lossy()))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .with_context(|| format!("Failed to decode site map layout from {}", path.to_string_lossy()))
}
