use family_tree_renderer::{RenderOptions, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    fast_text: Option<bool>,
}

fn build_render_options(options: TreeRenderOptions) -> RenderOptions {
    let mut render_options = if options.theme.as_deref() == Some("modern") {
        RenderOptions::modern()
    } else {
        RenderOptions::classic()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    // No system fonts inside the browser sandbox.
    render_options.layout.fast_text_metrics = options.fast_text.unwrap_or(true);

    render_options
}

#[wasm_bindgen]
pub fn render_family_tree_svg(json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<TreeRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        TreeRenderOptions::default()
    };

    let render_options = build_render_options(options);
    render_with_options(json, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[cfg(test)]
mod tests {
    use family_tree_renderer::render_with_options;

    use crate::{TreeRenderOptions, build_render_options};

    #[test]
    fn renders_three_generations() {
        let json = r#"{
            "root": 1,
            "nodes": [
                {"id": 1, "name": "Stevan", "born": "1890", "died": "1950", "gender": "male", "pids": [2]},
                {"id": 2, "name": "Milica", "gender": "female", "pids": [1]},
                {"id": 3, "name": "Jovan", "fid": 1, "mid": 2, "pids": [4]},
                {"id": 4, "name": "Vera", "pids": [3]},
                {"id": 5, "name": "Nada", "fid": 3, "mid": 4}
            ]
        }"#;

        let svg = render_with_options(json, build_render_options(TreeRenderOptions::default()))
            .expect("three generations should render");

        assert!(svg.contains("<svg"));
        assert!(svg.contains("Stevan"));
        assert!(svg.contains("Nada"));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn theme_and_font_overrides_apply() {
        let options: TreeRenderOptions =
            serde_json::from_str(r#"{"theme": "modern", "fontFamily": "Inter", "fontSize": 12}"#)
                .unwrap();
        let render_options = build_render_options(options);
        assert_eq!(render_options.theme.font_family, "Inter");
        assert_eq!(render_options.theme.font_size, 12.0);
        assert!(render_options.layout.fast_text_metrics);
    }
}
