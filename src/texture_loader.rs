use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use raylib::prelude::*;
use exif::{Reader, Tag, Value, In};
use tracing::{debug, warn};

use crate::engine::{ImageLoader, SlideImage};
use crate::error::LoadError;
use crate::sources::is_remote;

impl SlideImage for Texture2D {
    fn width(&self) -> u32 {
        let raw: &raylib::ffi::Texture2D = self.as_ref();
        raw.width.max(0) as u32
    }

    fn height(&self) -> u32 {
        let raw: &raylib::ffi::Texture2D = self.as_ref();
        raw.height.max(0) as u32
    }
}

/// Loads slides as GPU textures. Must live on the thread that owns the window.
pub struct RaylibImageLoader<'a> {
    rl: &'a mut RaylibHandle,
    thread: &'a RaylibThread,
    site_root: PathBuf,
    client: reqwest::blocking::Client,
}

impl<'a> RaylibImageLoader<'a> {
    pub fn new(rl: &'a mut RaylibHandle, thread: &'a RaylibThread, site_root: &Path) -> Self {
        Self {
            rl,
            thread,
            site_root: site_root.to_path_buf(),
            client: reqwest::blocking::Client::new(),
        }
    }

    fn read_bytes(&self, source: &str) -> Result<Vec<u8>, LoadError> {
        if is_remote(source) {
            let response = self
                .client
                .get(source)
                .send()
                .map_err(|e| LoadError::Fetch { url: source.to_string(), source: e })?;
            if !response.status().is_success() {
                return Err(LoadError::Status { url: source.to_string(), status: response.status().as_u16() });
            }
            let bytes = response
                .bytes()
                .map_err(|e| LoadError::Fetch { url: source.to_string(), source: e })?;
            return Ok(bytes.to_vec());
        }

        let path = self.site_root.join(source);
        fs::read(&path).map_err(|e| LoadError::Io { path, source: e })
    }
}

impl ImageLoader for RaylibImageLoader<'_> {
    type Image = Texture2D;

    fn load(&mut self, source: &str) -> Result<Texture2D, LoadError> {
        let file_bytes = self.read_bytes(source)?;
        load_texture_with_exif_rotation(self.rl, self.thread, source, &file_bytes)
    }
}

/// File extension of a path or URL, lowercased, ignoring any query string.
pub fn extension_of(source: &str) -> String {
    let without_query = source.split(['?', '#']).next().unwrap_or(source);
    Path::new(without_query)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// EXIF orientation tag of a JPEG, 1 (upright) when absent or unreadable.
pub fn exif_orientation(source: &str, file_bytes: &[u8]) -> u16 {
    let extension = extension_of(source);
    if extension != "jpg" && extension != "jpeg" {
        return 1;
    }
    match Reader::new().read_from_container(&mut Cursor::new(file_bytes)) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Value::Short(values) = &field.value {
                    if let Some(orientation) = values.first() {
                        return *orientation;
                    }
                }
            }
            1
        }
        Err(e) => {
            // Non-critical, proceed without rotation
            warn!("Could not read EXIF data for {}: {}", source, e);
            1
        }
    }
}

// --- Decode Image, Apply EXIF Rotation, Create Texture ---
pub fn load_texture_with_exif_rotation(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    source: &str,
    file_bytes: &[u8],
) -> Result<Texture2D, LoadError> {
    let orientation = exif_orientation(source, file_bytes);
    let extension = extension_of(source);

    // Extension hint for loading from memory
    let mut image = Image::load_image_from_mem(&(".".to_string() + &extension), file_bytes)
        .map_err(|e| LoadError::Decode(source.to_string(), e.to_string()))?;

    // 3 = 180 deg, 6 = 90 deg CW, 8 = 90 deg CCW. Flips are ignored.
    match orientation {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        6 => image.rotate_cw(),
        8 => image.rotate_ccw(),
        _ => {}
    }
    if orientation != 1 {
        debug!("Applied EXIF orientation {} to {}", orientation, source);
    }

    let mut texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| LoadError::Texture(source.to_string(), e.to_string()))?;
    texture.set_texture_filter(thread, TextureFilter::TEXTURE_FILTER_BILINEAR);

    // CPU copy no longer needed
    drop(image);

    Ok(texture)
}
