use serde::Serialize;
use serde_json::Value;

/// Decorative animation payloads, loaded once at start-up. The JSON is never
/// interpreted here; the page hands it to the browser player untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnimationSet {
    pub coding: Option<Value>,
    pub intro: Option<Value>,
    pub spinner: Option<Value>,
    pub background: Option<Value>,
}

impl AnimationSet {
    pub fn has_spinner(&self) -> bool {
        self.spinner.is_some()
    }

    pub fn loaded_names(&self) -> Vec<&'static str> {
        [
            ("coding", self.coding.is_some()),
            ("intro", self.intro.is_some()),
            ("spinner", self.spinner.is_some()),
            ("background", self.background.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, loaded)| loaded.then_some(name))
        .collect()
    }
}
