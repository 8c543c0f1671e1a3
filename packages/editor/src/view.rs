use serde::{Deserialize, Serialize};

/// Simulated device width for the canvas preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl Viewport {
    /// Preview width in CSS pixels
    pub fn width(&self) -> u32 {
        match self {
            Viewport::Mobile => 375,
            Viewport::Tablet => 768,
            Viewport::Desktop => 1280,
        }
    }
}

/// Presentation state around the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorViewState {
    pub viewport: Viewport,
    pub is_marketplace_open: bool,
    pub is_properties_panel_open: bool,

    /// Document differs from the last loaded or saved snapshot
    pub is_dirty: bool,

    /// A save is in flight (owned by the caller)
    pub is_saving: bool,
}
