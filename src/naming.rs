//! Filename conventions shared by the batch and catalog paths.
//!
//! A source directory is flat: image files plus optional `<basename>.yaml`
//! sidecars next to them.
//!
//! ```text
//! source/photos/
//! ├── harbour.jpg
//! ├── harbour.yaml        # sidecar for harbour.jpg
//! ├── IMG_0042.PNG        # extensions match case-insensitively
//! └── notes.txt           # ignored
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Image extensions picked up from the source directory (compared lowercase).
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Extension of metadata sidecar files.
pub const SIDECAR_EXTENSION: &str = "yaml";

/// Filename without its final extension: `harbour.jpg` → `harbour`.
pub fn basename(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}

/// Whether a filename carries one of the [`SUPPORTED_EXTENSIONS`].
pub fn is_supported_image(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Sidecar location for a source image: `<source_dir>/<basename>.yaml`.
pub fn sidecar_path(source_dir: &Path, filename: &str) -> PathBuf {
    source_dir.join(format!("{}.{}", basename(filename), SIDECAR_EXTENSION))
}

/// List supported image filenames in `source_dir`, sorted by name.
///
/// Only regular files directly inside the directory are considered.
/// Names that are not valid UTF-8 are skipped. Fails if the directory
/// itself can't be read.
pub fn list_source_images(source_dir: &Path) -> io::Result<Vec<String>> {
    let mut files: Vec<String> = fs::read_dir(source_dir)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| is_supported_image(name))
        .collect();

    files.sort();
    Ok(files)
}

/// Whether a slug can be used as a single output directory name.
///
/// Rejects empty slugs, `.`/`..`, and anything containing a path separator,
/// so a slug can never point outside the output root.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.trim().is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\'])
        && !slug.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn basename_strips_extension() {
        assert_eq!(basename("harbour.jpg"), "harbour");
        assert_eq!(basename("IMG_0042.PNG"), "IMG_0042");
    }

    #[test]
    fn basename_strips_only_last_extension() {
        assert_eq!(basename("sunset.final.jpeg"), "sunset.final");
    }

    #[test]
    fn basename_without_extension_is_unchanged() {
        assert_eq!(basename("README"), "README");
    }

    #[test]
    fn supported_extensions_case_insensitive() {
        assert!(is_supported_image("a.jpg"));
        assert!(is_supported_image("a.JPG"));
        assert!(is_supported_image("a.Jpeg"));
        assert!(is_supported_image("a.png"));
        assert!(is_supported_image("a.GIF"));
    }

    #[test]
    fn unsupported_files_rejected() {
        assert!(!is_supported_image("a.yaml"));
        assert!(!is_supported_image("a.webp"));
        assert!(!is_supported_image("a.tiff"));
        assert!(!is_supported_image("jpg"));
        assert!(!is_supported_image(".jpg"));
    }

    #[test]
    fn sidecar_path_uses_basename() {
        assert_eq!(
            sidecar_path(Path::new("/photos"), "harbour.JPG"),
            PathBuf::from("/photos/harbour.yaml")
        );
    }

    #[test]
    fn list_filters_and_sorts() {
        let tmp = TempDir::new().unwrap();
        for name in ["b.jpg", "a.PNG", "c.gif", "a.yaml", "notes.txt"] {
            fs::write(tmp.path().join(name), "").unwrap();
        }
        fs::create_dir(tmp.path().join("dir.jpg")).unwrap();

        let files = list_source_images(tmp.path()).unwrap();
        assert_eq!(files, vec!["a.PNG", "b.jpg", "c.gif"]);
    }

    #[test]
    fn list_missing_directory_errors() {
        let tmp = TempDir::new().unwrap();
        assert!(list_source_images(&tmp.path().join("nope")).is_err());
    }

    #[test]
    fn valid_slugs() {
        assert!(is_valid_slug("harbour"));
        assert!(is_valid_slug("2024-06-15-harbour"));
        assert!(is_valid_slug("with space"));
    }

    #[test]
    fn invalid_slugs() {
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("   "));
        assert!(!is_valid_slug("."));
        assert!(!is_valid_slug(".."));
        assert!(!is_valid_slug("../etc"));
        assert!(!is_valid_slug("a/b"));
        assert!(!is_valid_slug("a\\b"));
    }
}
