//! Key events and letter-bound destinations.
//!
//! A lowercase letter moves the current image to the folder bound to that letter;
//! the uppercase letter copies it there. Both cases share one binding. Unbound
//! letters ask a caller-supplied lookup for a folder; declining leaves everything as it was.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::entry::ImageEntry;
use crate::errors::Result;
use crate::resolve::Resolved;

/// Logical key delivered by the UI shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Right,
    Left,
    Return,
    Delete,
    Letter(char),
}

impl Key {
    /// Parse a key name ("Right", "Left", "Return", "Delete" or one ASCII letter).
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "Right" => Some(Key::Right),
            "Left" => Some(Key::Left),
            "Return" => Some(Key::Return),
            "Delete" => Some(Key::Delete),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => Some(Key::Letter(c)),
                    _ => None,
                }
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Right => f.write_str("Right"),
            Key::Left => f.write_str("Left"),
            Key::Return => f.write_str("Return"),
            Key::Delete => f.write_str("Delete"),
            Key::Letter(c) => write!(f, "{c}"),
        }
    }
}

/// Letter -> folder bindings for one session. Keys are stored lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Destinations {
    bindings: BTreeMap<char, PathBuf>,
}

impl Destinations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `letter` (either case) to `folder`, replacing any previous binding.
    pub fn bind(&mut self, letter: char, folder: impl Into<PathBuf>) {
        let folder = folder.into();
        info!(key = %letter.to_ascii_lowercase(), folder = %folder.display(), "Bound destination");
        self.bindings.insert(letter.to_ascii_lowercase(), folder);
    }

    pub fn get(&self, letter: char) -> Option<&Path> {
        self.bindings.get(&letter.to_ascii_lowercase()).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &Path)> {
        self.bindings.iter().map(|(k, v)| (*k, v.as_path()))
    }
}

impl FromIterator<(char, PathBuf)> for Destinations {
    fn from_iter<I: IntoIterator<Item = (char, PathBuf)>>(iter: I) -> Self {
        let mut d = Destinations::new();
        for (k, v) in iter {
            d.bind(k, v);
        }
        d
    }
}

/// Result of a letter key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Uppercase letter: `added` is false when the copy target was already pending.
    Copy { target: PathBuf, added: bool },
    /// Lowercase letter: the UI should advance to the next image.
    Move { target: PathBuf },
    /// The folder lookup declined; nothing changed.
    Cancelled,
    /// Not a letter.
    Ignored,
}

impl KeyOutcome {
    pub fn advances(&self) -> bool {
        matches!(self, KeyOutcome::Move { .. })
    }
}

/// Apply a letter key to `entry`.
///
/// `folder_lookup` is only called for letters with no binding yet; a returned folder
/// is bound for the rest of the session.
pub fn dispose_by_key<F>(
    entry: &mut ImageEntry,
    letter: char,
    destinations: &mut Destinations,
    mut folder_lookup: F,
) -> Result<KeyOutcome>
where
    F: FnMut(char) -> Option<PathBuf>,
{
    if !letter.is_ascii_alphabetic() {
        return Ok(KeyOutcome::Ignored);
    }

    let folder = match destinations.get(letter) {
        Some(folder) => folder.to_path_buf(),
        None => match folder_lookup(letter) {
            Some(folder) => {
                destinations.bind(letter, folder.clone());
                folder
            }
            None => {
                debug!(key = %letter, "Folder prompt cancelled");
                return Ok(KeyOutcome::Cancelled);
            }
        },
    };

    if letter.is_ascii_uppercase() {
        let resolved = entry.mark_copy(&folder)?;
        let added = matches!(resolved, Resolved::Free(_));
        Ok(KeyOutcome::Copy { target: resolved.into_path(), added })
    } else {
        let target = entry.mark_move(&folder)?.to_path_buf();
        Ok(KeyOutcome::Move { target })
    }
}
