//! Structs and functions for handling textures.
//!
//! The module provides the [`Texture`] struct which is a CPU representation of a GPU texture.

use std::{path::Path, sync::Arc};

use glow::HasContext;
use image::{ColorType, DynamicImage};

/// Pixel layout of decoded image data as uploaded to the GPU.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Red,
    Rgb,
    Rgba,
}

impl PixelFormat {
    /// Picks the upload format for a decoded image. Layouts other than 8-bit grey, RGB or
    /// RGBA are converted to RGBA.
    pub fn for_color_type(color: ColorType) -> Self {
        match color {
            ColorType::L8 => Self::Red,
            ColorType::Rgb8 => Self::Rgb,
            _ => Self::Rgba,
        }
    }

    pub fn gl_format(self) -> u32 {
        match self {
            Self::Red => glow::RED,
            Self::Rgb => glow::RGB,
            Self::Rgba => glow::RGBA,
        }
    }

    /// Extracts tightly packed pixel bytes in this format.
    fn pixels(self, image: DynamicImage) -> Vec<u8> {
        match self {
            Self::Red => image.into_luma8().into_raw(),
            Self::Rgb => image.into_rgb8().into_raw(),
            Self::Rgba => image.into_rgba8().into_raw(),
        }
    }
}

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
    width: u32,
    height: u32,
}

impl Texture {
    /// Loads an image file into a mipmapped 2D texture.
    ///
    /// A file that cannot be opened or decoded is logged and leaves an empty texture object
    /// behind; the error is only returned if no texture object can be created at all.
    pub fn load(gl: &Arc<glow::Context>, path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let texture = unsafe { gl.create_texture()? };
        let mut this = Self {
            gl: Arc::clone(gl),
            id: texture,
            width: 0,
            height: 0,
        };

        match image::open(path) {
            Ok(image) => {
                this.upload(image);
                log::debug!(
                    "loaded texture {} ({}x{})",
                    path.display(),
                    this.width,
                    this.height
                );
            }
            Err(e) => log::error!("texture failed to load at path {}: {}", path.display(), e),
        }

        Ok(this)
    }

    fn upload(&mut self, image: DynamicImage) {
        let (width, height) = (image.width(), image.height());
        let format = PixelFormat::for_color_type(image.color());
        let data = format.pixels(image);
        let gl = &self.gl;

        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
            // Single channel and RGB rows are not 4-byte aligned in general.
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                format.gl_format() as i32,
                width as i32,
                height as i32,
                0,
                format.gl_format(),
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(data.as_slice())),
            );
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 4);
            gl.generate_mipmap(glow::TEXTURE_2D);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.bind_texture(glow::TEXTURE_2D, None);
        }

        self.width = width;
        self.height = height;
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}
