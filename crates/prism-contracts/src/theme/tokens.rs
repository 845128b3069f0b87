use std::fmt::Write as _;

use serde::Serialize;

use super::palette::{generate_dark_palette, generate_palette, ColorPalette};

/// Light and dark ramps for one named theme color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeTokens {
    pub name: String,
    pub base: String,
    pub light: ColorPalette,
    pub dark: ColorPalette,
}

impl ThemeTokens {
    pub fn new(name: impl Into<String>, base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            name: sanitize_token_name(&name.into()),
            light: generate_palette(&base),
            dark: generate_dark_palette(&base),
            base,
        }
    }

    pub fn css_variables(&self, palette: &ColorPalette) -> Vec<(String, String)> {
        palette
            .iter()
            .map(|(step, shade)| {
                (
                    format!("--color-{}-{}", self.name, step),
                    shade.to_string(),
                )
            })
            .collect()
    }

    /// `:root` block for the light ramp and a `[data-theme="dark"]` override.
    pub fn render_css(&self) -> String {
        let mut css = String::new();
        write_block(&mut css, ":root", &self.css_variables(&self.light));
        css.push('\n');
        write_block(
            &mut css,
            "[data-theme=\"dark\"]",
            &self.css_variables(&self.dark),
        );
        css
    }
}

fn write_block(out: &mut String, selector: &str, variables: &[(String, String)]) {
    let _ = writeln!(out, "{selector} {{");
    for (name, value) in variables {
        let _ = writeln!(out, "  {name}: {value};");
    }
    out.push_str("}\n");
}

fn sanitize_token_name(name: &str) -> String {
    let mut cleaned = String::new();
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
        } else if !cleaned.ends_with('-') {
            cleaned.push('-');
        }
    }
    let cleaned = cleaned.trim_matches('-');
    if cleaned.is_empty() {
        "primary".to_string()
    } else {
        cleaned.to_string()
    }
}
