pub mod ast;
pub mod config;
pub mod graph;
pub mod interaction;
pub mod layout;
pub mod lexer;
pub mod measure;
pub mod parser;
pub mod placement;
pub mod scene;
pub mod session;

use serde::Serialize;
use wasm_bindgen::prelude::*;

pub use config::{DiagramConfig, load_config};
pub use parser::{parse, parse_with_diagnostics};
pub use placement::{GRID_SIZE, snap_to_grid};
pub use scene::Scene;
pub use session::{Diagram, SessionError};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn to_json<T: Serialize>(value: &T) -> Result<String, js_sys::Error> {
    serde_json::to_string(value).map_err(|e| js_sys::Error::new(&e.to_string()))
}

/// Parse schema text and return the model as JSON
#[wasm_bindgen(js_name = "parseSchema")]
pub fn parse_schema(text: &str) -> Result<String, js_sys::Error> {
    to_json(&parse(text))
}

/// A diagram session driven from JavaScript. Every query returns JSON.
#[wasm_bindgen]
pub struct DiagramHandle {
    inner: Diagram,
}

#[wasm_bindgen]
impl DiagramHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(text: &str, config_json: Option<String>) -> Result<DiagramHandle, js_sys::Error> {
        let config = match config_json.as_deref() {
            Some(json) => {
                DiagramConfig::from_json(json).map_err(|e| js_sys::Error::new(&e.to_string()))?
            }
            None => DiagramConfig::default(),
        };
        Ok(Self {
            inner: Diagram::from_text(text, config),
        })
    }

    #[wasm_bindgen(js_name = "setText")]
    pub fn set_text(&mut self, text: &str) {
        self.inner.set_text(text);
    }

    /// Enter hover on a table, or leave with `undefined`. Returns the highlight state.
    pub fn hover(&mut self, table: Option<String>) -> Result<String, js_sys::Error> {
        to_json(self.inner.hover(table.as_deref()))
    }

    pub fn drag(&mut self, id: &str, x: f64, y: f64) -> Result<(), js_sys::Error> {
        self.inner
            .drag(id, x, y)
            .map_err(|e| js_sys::Error::new(&e.to_string()))
    }

    /// Snap and store a dropped table. Returns `[x, y]`.
    #[wasm_bindgen(js_name = "dropNode")]
    pub fn drop_node(&mut self, id: &str, x: f64, y: f64) -> Result<Vec<f64>, js_sys::Error> {
        let (x, y) = self
            .inner
            .drop_node(id, x, y)
            .map_err(|e| js_sys::Error::new(&e.to_string()))?;
        Ok(vec![x, y])
    }

    pub fn scene(&self) -> Result<String, js_sys::Error> {
        to_json(&self.inner.scene())
    }
}
