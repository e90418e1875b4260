use crate::Error;
use image::DynamicImage;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions the labeler picks up.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff", "gif"];

/// Shows an image to a person and returns the key they pressed.
///
/// `None` means no key could be read; the session then stops.
pub trait KeySource {
    fn read_key(&mut self, path: &Path, image: &DynamicImage) -> Result<Option<char>, Error>;
}

/// Outcome of a labeling session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelSummary {
    pub copied: usize,
    pub skipped: usize,
    /// True if the session was ended by the quit key or by running out of keys
    pub quit: bool,
}

/// Manual labeling tool: copies each image into `dest_dir` prefixed with the key that was
/// pressed for it.
#[derive(Debug, Clone)]
pub struct Labeler {
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    /// Key that ends the session
    pub quit_key: char,
}

impl Labeler {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(source_dir: P, dest_dir: Q) -> Labeler {
        Labeler {
            source_dir: source_dir.into(),
            dest_dir: dest_dir.into(),
            quit_key: '7',
        }
    }

    /// The images in the source directory, sorted by path.
    pub fn images(&self) -> Result<Vec<PathBuf>, Error> {
        let mut images = Vec::new();
        for entry in fs::read_dir(&self.source_dir)? {
            let path = entry?.path();
            let is_image = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase())
                .map_or(false, |ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));
            if is_image && path.is_file() {
                images.push(path);
            }
        }
        images.sort();
        Ok(images)
    }

    /// Label every image with a key from `keys`.
    ///
    /// Alphanumeric keys copy the image to `{dest_dir}/{key}_{name}`, the quit key (or no key)
    /// ends the session and anything else skips the image.
    ///
    /// # Errors
    /// * The source directory can not be listed or the destination can not be created
    /// * An image can not be decoded or copied
    pub fn run(&self, keys: &mut dyn KeySource) -> Result<LabelSummary, Error> {
        fs::create_dir_all(&self.dest_dir)?;
        let images = self.images()?;
        let mut summary = LabelSummary::default();
        if images.is_empty() {
            info!("No images found in {}", self.source_dir.display());
            return Ok(summary);
        }
        for path in images.iter() {
            let image = image::open(path).map_err(|source| Error::ImageRead {
                path: path.clone(),
                source,
            })?;
            let key = match keys.read_key(path, &image)? {
                Some(key) if key != self.quit_key => key,
                _ => {
                    info!("Exiting.");
                    summary.quit = true;
                    break;
                }
            };
            if key.is_alphanumeric() {
                let target = self.target_path(path, key);
                fs::copy(path, &target)?;
                info!("Copied to: {}", target.display());
                summary.copied += 1;
            } else {
                warn!("Invalid key {:?}, skipping {}", key, path.display());
                summary.skipped += 1;
            }
        }
        Ok(summary)
    }

    fn target_path(&self, path: &Path, key: char) -> PathBuf {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.dest_dir.join(format!("{}_{}", key, name))
    }
}
