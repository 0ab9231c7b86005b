use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub line_color: String,
    pub hover_color: String,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "Arial, sans-serif".to_string(),
            font_size: 16.0,
            text_color: "black".to_string(),
            line_color: "black".to_string(),
            hover_color: "#007bff".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 15.0,
            text_color: "#1C2430".to_string(),
            line_color: "#7A8AA6".to_string(),
            hover_color: "#2563EB".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    /// Stylesheet embedded in every rendered surface.
    pub fn stylesheet(&self, line_thickness: f32) -> String {
        let hover_thickness = line_thickness * 1.5;
        format!(
            ".person-text {{ font-size: {size}px; font-family: {family}; text-anchor: start; fill: {text}; }}\n\
             .person-name {{ font-weight: bold; dominant-baseline: hanging; }}\n\
             .person-years {{ font-weight: normal; dominant-baseline: hanging; }}\n\
             .connection-line {{ stroke: {line}; stroke-width: {line_thickness}; fill: none; }}\n\
             .shape-outline {{ fill: none; stroke: {line}; stroke-width: 1; }}\n\
             .person-text:hover {{ fill: {hover}; cursor: pointer; }}\n\
             .connection-line:hover {{ stroke: {hover}; stroke-width: {hover_thickness}; }}\n",
            size = self.font_size,
            family = self.font_family,
            text = self.text_color,
            line = self.line_color,
            hover = self.hover_color,
        )
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stylesheet_carries_line_thickness_and_font() {
        let css = Theme::classic().stylesheet(0.8);
        assert!(css.contains("stroke-width: 0.8;"));
        assert!(css.contains("font-family: Arial, sans-serif;"));
        assert!(css.contains(".person-name { font-weight: bold;"));
    }
}
