mod palette;
mod tokens;

pub use palette::{
    blend, generate_dark_palette, generate_palette, parse_hex, to_hex, ColorPalette,
    PALETTE_STEPS,
};
pub use tokens::ThemeTokens;
