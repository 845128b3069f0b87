use std::path::Path;

use anyhow::{bail, Context, Result};
use image::{Rgb, RgbImage};
use prism_contracts::theme::{parse_hex, ColorPalette, PALETTE_STEPS};

const FALLBACK_SHADE: [u8; 3] = [128, 128, 128];

/// Largest accepted cell edge in pixels.
pub const MAX_SWATCH_CELL: u32 = 512;

/// Renders the light ramp on the top row and the dark ramp below it,
/// one `cell`-sized square per step.
pub fn render_swatch(light: &ColorPalette, dark: &ColorPalette, cell: u32) -> Result<RgbImage> {
    if cell == 0 || cell > MAX_SWATCH_CELL {
        bail!("swatch cell size must be between 1 and {MAX_SWATCH_CELL}, got {cell}");
    }
    let columns = PALETTE_STEPS.len() as u32;
    let (Some(width), Some(height)) = (columns.checked_mul(cell), cell.checked_mul(2)) else {
        bail!("swatch of {cell}px cells is too large");
    };
    let mut image = RgbImage::new(width, height);
    for (row, palette) in [light, dark].into_iter().enumerate() {
        for (column, (_, shade)) in palette.iter().enumerate() {
            let color = Rgb(parse_hex(shade).unwrap_or(FALLBACK_SHADE));
            let x0 = column as u32 * cell;
            let y0 = row as u32 * cell;
            for y in y0..y0 + cell {
                for x in x0..x0 + cell {
                    image.put_pixel(x, y, color);
                }
            }
        }
    }
    Ok(image)
}

pub fn write_swatch(path: &Path, light: &ColorPalette, dark: &ColorPalette, cell: u32) -> Result<()> {
    let image = render_swatch(light, dark, cell)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    image
        .save(path)
        .with_context(|| format!("failed to save {}", path.display()))?;
    tracing::debug!(path = %path.display(), cell, "palette swatch written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use image::Rgb;
    use prism_contracts::theme::{generate_dark_palette, generate_palette};

    use super::{render_swatch, write_swatch, MAX_SWATCH_CELL};

    #[test]
    fn swatch_lays_out_light_over_dark() -> anyhow::Result<()> {
        let light = generate_palette("#808080");
        let dark = generate_dark_palette("#808080");
        let image = render_swatch(&light, &dark, 4)?;
        assert_eq!(image.dimensions(), (40, 8));
        assert_eq!(*image.get_pixel(0, 0), Rgb([0xf9, 0xf9, 0xf9]));
        assert_eq!(*image.get_pixel(39, 3), Rgb([0x33, 0x33, 0x33]));
        assert_eq!(*image.get_pixel(0, 4), Rgb([0x33, 0x33, 0x33]));
        assert_eq!(*image.get_pixel(39, 7), Rgb([0xf9, 0xf9, 0xf9]));
        Ok(())
    }

    #[test]
    fn unparseable_shades_render_gray() -> anyhow::Result<()> {
        let broken = generate_palette("nope");
        let image = render_swatch(&broken, &broken, 1)?;
        assert_eq!(*image.get_pixel(5, 1), Rgb([128, 128, 128]));
        Ok(())
    }

    #[test]
    fn oversized_cells_are_rejected_before_allocating() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let light = generate_palette("#808080");
        let dark = generate_dark_palette("#808080");
        for cell in [MAX_SWATCH_CELL + 1, 100_000, 500_000_000, u32::MAX] {
            assert!(render_swatch(&light, &dark, cell).is_err());
            let path = temp.path().join(format!("swatch-{cell}.png"));
            assert!(write_swatch(&path, &light, &dark, cell).is_err());
            assert!(!path.exists());
        }
        assert_eq!(
            render_swatch(&light, &dark, MAX_SWATCH_CELL)?.dimensions(),
            (10 * MAX_SWATCH_CELL, 2 * MAX_SWATCH_CELL)
        );
        Ok(())
    }

    #[test]
    fn write_swatch_saves_png() -> anyhow::Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("out").join("swatch.png");
        let light = generate_palette("#3b82f6");
        let dark = generate_dark_palette("#3b82f6");
        write_swatch(&path, &light, &dark, 8)?;
        let decoded = image::open(&path)?.to_rgb8();
        assert_eq!(decoded.dimensions(), (80, 16));
        assert!(write_swatch(&path, &light, &dark, 0).is_err());
        Ok(())
    }
}
