//! WASM-compatible type definitions

use crate::Track;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// WASM-compatible playlist entry
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
#[wasm_bindgen]
pub struct WasmTrack {
    source_uri: String,
    cover_uri: String,
    display_name: String,
}

#[wasm_bindgen]
impl WasmTrack {
    #[wasm_bindgen(getter, js_name = sourceUri)]
    pub fn source_uri(&self) -> String {
        self.source_uri.clone()
    }

    #[wasm_bindgen(getter, js_name = coverUri)]
    pub fn cover_uri(&self) -> String {
        self.cover_uri.clone()
    }

    #[wasm_bindgen(getter, js_name = displayName)]
    pub fn display_name(&self) -> String {
        self.display_name.clone()
    }
}

impl From<&Track> for WasmTrack {
    fn from(track: &Track) -> Self {
        Self {
            source_uri: track.source_uri.clone(),
            cover_uri: track.cover_uri.clone(),
            display_name: track.display_name().to_string(),
        }
    }
}
