//! Writing rendered images to disk.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use lumen_renderer::ImageBuffer;

/// Write packed RGB bytes as a binary PPM (P6).
pub fn write_ppm<W: Write>(out: &mut W, width: u32, height: u32, rgb: &[u8]) -> std::io::Result<()> {
    write!(out, "P6\n{} {}\n255\n", width, height)?;
    out.write_all(rgb)
}

/// Save `image`, picking the format from the file extension.
///
/// `.ppm` (or no extension) is written directly, anything else goes through
/// the image crate.
pub fn save(image: &ImageBuffer, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }

    let rgb = image.to_rgb8();
    let is_ppm = path
        .extension()
        .map_or(true, |ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut out = BufWriter::new(file);
        write_ppm(&mut out, image.width, image.height, &rgb)?;
        out.flush()?;
    } else {
        image::save_buffer(path, &rgb, image.width, image.height, image::ColorType::Rgb8)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    log::info!("Wrote {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Vec3;

    #[test]
    fn test_ppm_header_and_payload() {
        let rgb = [255u8, 0, 0, 0, 255, 0];
        let mut out = Vec::new();
        write_ppm(&mut out, 2, 1, &rgb).unwrap();

        let header = b"P6\n2 1\n255\n";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(&out[header.len()..], &rgb);
    }

    #[test]
    fn test_save_ppm_file() {
        let dir = std::env::temp_dir().join(format!("lumen_output_{}", std::process::id()));
        let path = dir.join("nested").join("out.ppm");

        let mut image = ImageBuffer::new(3, 2);
        image.set(1, 0, Vec3::new(2.0, 1.0, 0.0));
        save(&image, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let header = b"P6\n3 2\n255\n";
        assert_eq!(&bytes[..header.len()], header);
        assert_eq!(bytes.len(), header.len() + 3 * 2 * 3);
        assert_eq!(&bytes[header.len() + 3..header.len() + 6], &[255, 127, 0]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
