use sphereview_core::SceneDescription;
use web_sys::{UrlSearchParams, Window};

/// Reads the scene description out of the embed's query string.
pub struct SceneLoader;

impl SceneLoader {
    pub fn load_from_window(window: &Window) -> Result<SceneDescription, String> {
        let search = window
            .location()
            .search()
            .map_err(|_| "failed to read page location".to_string())?;
        Self::load_from_query(&search)
    }

    /// Parse a query string (with or without the leading `?`) into a
    /// scene description. URLSearchParams does the percent decoding.
    pub fn load_from_query(search: &str) -> Result<SceneDescription, String> {
        let params = UrlSearchParams::new_with_str(search)
            .map_err(|_| "malformed query string".to_string())?;

        let mut pairs: Vec<(String, String)> = Vec::new();
        let entries = js_sys::try_iter(params.as_ref())
            .map_err(|_| "query parameters are not iterable".to_string())?
            .ok_or_else(|| "query parameters are not iterable".to_string())?;
        for entry in entries {
            let entry = entry.map_err(|_| "query iteration failed".to_string())?;
            let pair = js_sys::Array::from(&entry);
            if let (Some(key), Some(value)) = (pair.get(0).as_string(), pair.get(1).as_string()) {
                pairs.push((key, value));
            }
        }

        SceneDescription::from_pairs(pairs).map_err(|e| e.to_string())
    }
}

/// Truthy query flag, absent and empty both count as off.
pub fn query_flag(window: &Window, name: &str) -> bool {
    let Ok(search) = window.location().search() else {
        return false;
    };
    let Ok(params) = UrlSearchParams::new_with_str(&search) else {
        return false;
    };
    matches!(
        params.get(name).as_deref(),
        Some(v) if !v.is_empty() && v != "false" && v != "0"
    )
}
