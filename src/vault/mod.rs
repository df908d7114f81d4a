//! The vault: a folder of markdown notes that captures are written into.
//!
//! Layout (paths relative to the root, all configurable):
//! - new notes go in `notes_folder/<headline>.md`
//! - daily entries are appended to `daily_folder/YYYY-MM-DD.md`
//! - inbox entries are appended to `inbox_file`

use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::capture::{Action, Capture, CaptureSink};
use crate::config::VaultConfig;

/// Longest file stem derived from a headline.
const MAX_STEM_CHARS: usize = 60;

/// Characters that are not allowed in note file names.
const FORBIDDEN: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|', '#', '^', '[', ']'];

/// Errors raised while reading or writing the vault.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("vault root '{0}' does not exist")]
    MissingRoot(PathBuf),

    #[error("nothing to save: the note is empty")]
    EmptyCapture,

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no free file name for '{0}'")]
    NameExhausted(String),
}

pub type Result<T> = std::result::Result<T, VaultError>;

/// A vault on disk.
#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
    inbox_file: PathBuf,
    daily_folder: PathBuf,
    notes_folder: PathBuf,
}

impl Vault {
    /// Open the vault described by `config`. The root must exist.
    pub fn open(config: &VaultConfig) -> Result<Self> {
        if !config.root.is_dir() {
            return Err(VaultError::MissingRoot(config.root.clone()));
        }
        Ok(Self {
            root: config.root.clone(),
            inbox_file: config.inbox_file.clone(),
            daily_folder: config.daily_folder.clone(),
            notes_folder: config.notes_folder.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Collect every `#tag` used in the vault's markdown files.
    ///
    /// Hidden directories (`.git`, `.obsidian`, ...) are skipped. Unreadable
    /// files are logged and ignored. The result is sorted and unique.
    pub fn scan_tags(&self) -> Vec<String> {
        let mut tags = BTreeSet::new();
        let walker = WalkDir::new(&self.root)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));

        for entry in walker.flatten() {
            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }
            match fs::read_to_string(entry.path()) {
                Ok(text) => tags.extend(extract_tags(&text)),
                Err(e) => warn!(path = %entry.path().display(), error = %e, "Skipping unreadable note"),
            }
        }

        debug!(count = tags.len(), root = %self.root.display(), "Scanned vault tags");
        tags.into_iter().collect()
    }

    /// Write `capture` according to its action. Returns the file written.
    pub fn save(&self, capture: &Capture) -> Result<PathBuf> {
        let headline = capture.headline().ok_or(VaultError::EmptyCapture)?;

        let path = match capture.action {
            Action::CreateNote => {
                let folder = self.root.join(&self.notes_folder);
                let path = unique_path(&folder, &file_stem(headline))?;
                write_new(&path, &note_body(capture))?;
                path
            }
            Action::AddDaily => {
                let name = format!("{}.md", capture.captured_at.format("%Y-%m-%d"));
                let path = self.root.join(&self.daily_folder).join(name);
                append(&path, &list_entry(capture))?;
                path
            }
            Action::AddInbox => {
                let path = self.root.join(&self.inbox_file);
                append(&path, &list_entry(capture))?;
                path
            }
        };

        info!(action = %capture.action, mood = %capture.mood, tags = capture.tags.len(), path = %path.display(), "Capture saved");
        Ok(path)
    }
}

impl CaptureSink for Vault {
    type Error = VaultError;

    fn store(&mut self, capture: &Capture) -> Result<String> {
        let path = self.save(capture)?;
        let shown = path.strip_prefix(&self.root).unwrap_or(&path);
        Ok(shown.display().to_string())
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Pull `#tag` tokens out of markdown text.
///
/// A tag starts with `#` at the start of a line or after whitespace and runs
/// over letters, digits, `_`, `-` and `/`. Purely numeric tokens (`#1`) and
/// headings (`# Title`) are not tags.
pub fn extract_tags(text: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut prev = ' ';
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c == '#' && prev.is_whitespace() {
            let start = i + 1;
            let mut end = start;
            while let Some(&(j, n)) = chars.peek() {
                if n.is_alphanumeric() || matches!(n, '_' | '-' | '/') {
                    end = j + n.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let tag = &text[start..end];
            if tag.chars().any(|c| !c.is_ascii_digit()) {
                tags.push(tag.to_string());
            }
            prev = text[..end].chars().next_back().unwrap_or(' ');
            continue;
        }
        prev = c;
    }
    tags
}

/// A file stem derived from a headline: forbidden characters dropped,
/// whitespace collapsed, length capped.
fn file_stem(headline: &str) -> String {
    let cleaned: String = headline.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let stem: String = collapsed.chars().take(MAX_STEM_CHARS).collect();
    let stem = stem.trim_matches(|c: char| c == '.' || c.is_whitespace()).to_string();
    if stem.is_empty() {
        "Untitled".to_string()
    } else {
        stem
    }
}

/// `folder/stem.md`, or `folder/stem N.md` for the first free N.
fn unique_path(folder: &Path, stem: &str) -> Result<PathBuf> {
    let first = folder.join(format!("{stem}.md"));
    if !first.exists() {
        return Ok(first);
    }
    (1..1000)
        .map(|n| folder.join(format!("{stem} {n}.md")))
        .find(|p| !p.exists())
        .ok_or_else(|| VaultError::NameExhausted(stem.to_string()))
}

/// Render tags as `#tag` tokens, spaces replaced by dashes.
fn tag_tokens(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{}", t.trim().trim_start_matches('#').replace(char::is_whitespace, "-")))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A standalone note with YAML front matter.
fn note_body(capture: &Capture) -> String {
    let mut out = String::from("---\n");
    out.push_str(&format!("mood: {}\n", capture.mood));
    out.push_str(&format!("created: {}\n", capture.captured_at.format("%Y-%m-%dT%H:%M:%S")));
    if capture.tags.is_empty() {
        out.push_str("tags: []\n");
    } else {
        out.push_str("tags:\n");
        for tag in &capture.tags {
            out.push_str(&format!("  - \"{}\"\n", tag.replace('"', "\\\"")));
        }
    }
    out.push_str("---\n\n");
    out.push_str(capture.text.trim_end());
    out.push('\n');
    out
}

/// A single list item: time, mood, first line and tags, then any further
/// lines indented beneath it.
fn list_entry(capture: &Capture) -> String {
    let text = capture.text.trim();
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default();

    let mut entry = format!(
        "- {} {} {}",
        capture.captured_at.format("%H:%M"),
        capture.mood.emoji(),
        first
    );
    if !capture.tags.is_empty() {
        entry.push(' ');
        entry.push_str(&tag_tokens(&capture.tags));
    }
    entry.push('\n');
    for line in lines {
        entry.push_str("  ");
        entry.push_str(line);
        entry.push('\n');
    }
    entry
}

fn write_error(path: &Path) -> impl FnOnce(std::io::Error) -> VaultError + '_ {
    move |source| VaultError::Write {
        path: path.to_path_buf(),
        source,
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error(parent))?;
    }
    Ok(())
}

/// Create `path` with `content`, failing if it already exists.
fn write_new(path: &Path, content: &str) -> Result<()> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(write_error(path))?;
    file.write_all(content.as_bytes()).map_err(write_error(path))
}

/// Append `content` to `path`, creating it if needed and starting on a fresh
/// line if the file does not end with one.
fn append(path: &Path, content: &str) -> Result<()> {
    ensure_parent(path)?;
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
        .map_err(write_error(path))?;

    let len = file.metadata().map_err(write_error(path))?.len();
    if len > 0 {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::End(-1)).map_err(write_error(path))?;
        file.read_exact(&mut last).map_err(write_error(path))?;
        if last[0] != b'\n' {
            file.write_all(b"\n").map_err(write_error(path))?;
        }
    }
    file.write_all(content.as_bytes()).map_err(write_error(path))
}
