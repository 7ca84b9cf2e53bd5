//! Listing the fonts in a directory
//!
//! [`FontCatalog::scan`] finds the font files in a directory, opens each one
//! and derives a human readable name for it from its `name` table. Files that
//! cannot be opened as fonts are skipped.
//!
//! ```no_run
//! use opentype_catalog::{CatalogOptions, FontCatalog};
//!
//! let catalog = FontCatalog::scan("/usr/share/fonts", &CatalogOptions::default()).unwrap();
//! for entry in catalog.entries() {
//!     println!("{}: {}", entry.name(), entry.path().display());
//! }
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use opentype::types::NameId;
use opentype::{Font, FontBuffer, ReadError, TableProvider};
use thiserror::Error;

/// An error encountered while building or using a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read font '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ReadError,
    },
}

/// Options controlling which files a catalog includes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogOptions {
    /// File extensions to consider, compared case-insensitively.
    pub extensions: Vec<String>,
    /// Also search subdirectories.
    pub recursive: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        CatalogOptions {
            extensions: vec!["ttf".into(), "otf".into()],
            recursive: false,
        }
    }
}

impl CatalogOptions {
    fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            })
    }
}

/// A font file and its display name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    path: PathBuf,
    name: String,
}

impl CatalogEntry {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The human readable name of the font.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Open the font, mapping the file again.
    pub fn open(&self) -> Result<Font, CatalogError> {
        open_font(&self.path)
    }
}

/// The fonts found in a directory, sorted by name and then by path.
#[derive(Clone, Debug, Default)]
pub struct FontCatalog {
    entries: Vec<CatalogEntry>,
}

impl FontCatalog {
    /// Find and name the fonts in `dir`.
    ///
    /// Fails only if `dir` (or, when searching recursively, one of its
    /// subdirectories) cannot be listed.
    pub fn scan(dir: impl AsRef<Path>, options: &CatalogOptions) -> Result<Self, CatalogError> {
        let mut entries = Vec::new();
        for path in find_files(dir.as_ref(), options)? {
            match open_font(&path) {
                Ok(font) => {
                    let name = display_name(&font, &path);
                    log::debug!("found '{name}' at {}", path.display());
                    entries.push(CatalogEntry { path, name });
                }
                Err(err) => log::warn!("skipping {}: {err}", path.display()),
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.path.cmp(&b.path)));
        Ok(FontCatalog { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }
}

impl<'a> IntoIterator for &'a FontCatalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn find_files(dir: &Path, options: &CatalogOptions) -> Result<Vec<PathBuf>, CatalogError> {
    let io_err = |path: &Path| {
        let path = path.to_owned();
        move |source| CatalogError::Io { path, source }
    };
    let mut files = Vec::new();
    let mut pending = vec![dir.to_owned()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir).map_err(io_err(&dir))? {
            let entry = entry.map_err(io_err(&dir))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(io_err(&path))?;
            if file_type.is_dir() {
                if options.recursive {
                    pending.push(path);
                }
            } else if options.matches(&path) {
                files.push(path);
            }
        }
    }
    Ok(files)
}

fn open_font(path: &Path) -> Result<Font, CatalogError> {
    let io_err = |source| CatalogError::Io {
        path: path.to_owned(),
        source,
    };
    let file = File::open(path).map_err(io_err)?;
    // Safety: the map is read only. Fonts that are modified while they are
    // open may decode incorrectly, but every read is bounds checked.
    let data = unsafe { Mmap::map(&file) }.map_err(io_err)?;
    Font::new(FontBuffer::new(data)).map_err(|source| CatalogError::Read {
        path: path.to_owned(),
        source,
    })
}

/// The full name, else the family and subfamily names, else the file stem.
fn display_name(font: &Font, path: &Path) -> String {
    if let Ok(name) = font.name() {
        let get = |name_id| name.get(name_id).map(str::trim).filter(|s| !s.is_empty());
        if let Some(full_name) = get(NameId::FULL_NAME) {
            return full_name.to_string();
        }
        match (get(NameId::FAMILY_NAME), get(NameId::SUBFAMILY_NAME)) {
            (Some(family), Some(subfamily)) => return format!("{family} {subfamily}"),
            (Some(family), None) => return family.to_string(),
            _ => (),
        }
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
