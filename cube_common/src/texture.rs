use std::path::{Path, PathBuf};

use crate::result::{CubeCommonError, Result};
//////////////////////// Traits ///////////////////////
/// Anything that can hand a backend tightly packed RGBA8 pixels.
pub trait TextureSource {
    fn get_pixels(&self) -> &[u8];
    fn get_width(&self) -> u32;
    fn get_height(&self) -> u32;
    fn get_image_size(&self) -> u64 {
        u64::from(self.get_width()) * u64::from(self.get_height()) * 4
    }
    fn mip_levels(&self) -> u32 {
        mip_levels(self.get_width(), self.get_height())
    }
}
//////////////////////// Structs ///////////////////////
pub struct FilesystemTextureSource {
    pub path: PathBuf,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}
//////////////////////// Impls ///////////////////////
impl FilesystemTextureSource {
    pub fn new(path: &Path) -> Result<Self> {
        let rgba_image = image::open(path)?.into_rgba8();
        let (width, height) = rgba_image.dimensions();
        if width == 0 || height == 0 {
            return Err(CubeCommonError::EmptyTexture(path.as_os_str().to_owned()));
        }
        log::debug!("Loaded texture {} ({}x{})", path.display(), width, height);

        Ok(Self {
            path: path.to_owned(),
            width,
            height,
            pixels: rgba_image.into_raw(),
        })
    }
}

impl TextureSource for FilesystemTextureSource {
    fn get_pixels(&self) -> &[u8] {
        &self.pixels
    }
    fn get_width(&self) -> u32 {
        self.width
    }
    fn get_height(&self) -> u32 {
        self.height
    }
}
//////////////////////// Fns ///////////////////////
/// Number of levels in a full mip chain down to 1x1.
pub fn mip_levels(width: u32, height: u32) -> u32 {
    let largest = width.max(height).max(1);
    32 - largest.leading_zeros()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::env;

    #[test]
    fn mip_chain_length() {
        assert_eq!(mip_levels(1, 1), 1);
        assert_eq!(mip_levels(2, 1), 2);
        assert_eq!(mip_levels(512, 512), 10);
        assert_eq!(mip_levels(513, 20), 10);
        assert_eq!(mip_levels(1024, 768), 11);
        assert_eq!(mip_levels(0, 0), 1);
    }

    #[test]
    fn loads_png_as_rgba8() {
        let path = env::temp_dir().join(format!("cube_common_texture_{}.png", std::process::id()));
        let mut img = RgbaImage::new(4, 2);
        img.put_pixel(3, 1, Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let source = FilesystemTextureSource::new(&path).unwrap();
        assert_eq!(source.get_width(), 4);
        assert_eq!(source.get_height(), 2);
        assert_eq!(source.get_image_size(), 32);
        assert_eq!(source.get_pixels().len(), 32);
        assert_eq!(&source.get_pixels()[28..32], &[10, 20, 30, 255]);
        assert_eq!(source.mip_levels(), 3);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = FilesystemTextureSource::new(Path::new("definitely/not/here.jpg"));
        assert!(result.is_err());
    }
}
