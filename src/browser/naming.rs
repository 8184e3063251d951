//! Name-level logic shared across the browser: the natural-sort comparator
//! used for listing order, the `" (N)"` unique-name generator used by both
//! paste conflict resolution and new-entry defaults, and the filename
//! validator that guards inline rename/create.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Characters that are never legal in an entry name.
pub const FORBIDDEN_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Device names reserved by Windows, rejected everywhere for portability.
pub const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Default name for a newly created directory.
pub const DEFAULT_DIR_NAME: &str = "New Folder";
/// Default name for a newly created file.
pub const DEFAULT_FILE_NAME: &str = "New File.txt";

// ── Natural sort ─────────────────────────────────────────────────────────────

/// One run of a name: either a maximal run of ASCII digits or a maximal run
/// of anything else. Tagging the run kind keeps the comparator total when
/// two names disagree on the kind at the same position.
#[derive(Debug, PartialEq, Eq)]
enum Run<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn runs(s: &str) -> impl Iterator<Item = Run<'_>> {
    let mut rest = s;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let first_is_digit = rest.chars().next().is_some_and(|c| c.is_ascii_digit());
        let end = rest
            .find(|c: char| c.is_ascii_digit() != first_is_digit)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        rest = tail;
        Some(if first_is_digit {
            Run::Digits(run)
        } else {
            Run::Text(run)
        })
    })
}

/// Compare two digit runs numerically without parsing (arbitrary length).
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Case-insensitive natural ordering: digit runs compare numerically, text
/// runs lexicographically, and a digit run sorts before a text run at the
/// same position. `"file2"` sorts before `"file10"`.
///
/// Fully equal names under case folding fall back to a case-sensitive
/// comparison so the order stays total and deterministic.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    let mut ra = runs(&a_lower);
    let mut rb = runs(&b_lower);
    loop {
        match (ra.next(), rb.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(Run::Digits(x)), Some(Run::Digits(y))) => match cmp_digits(x, y) {
                Ordering::Equal => {}
                ord => return ord,
            },
            (Some(Run::Text(x)), Some(Run::Text(y))) => match x.cmp(y) {
                Ordering::Equal => {}
                ord => return ord,
            },
            (Some(Run::Digits(_)), Some(Run::Text(_))) => return Ordering::Less,
            (Some(Run::Text(_)), Some(Run::Digits(_))) => return Ordering::Greater,
        }
    }
}

// ── Unique-name generation ───────────────────────────────────────────────────

/// Return `dir/name`, or on collision the first `dir/stem (N).ext` that does
/// not exist yet, N counting up from 1.
///
/// This single utility serves both paste conflict renaming and default-name
/// generation for newly created entries.
pub fn unique_target(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let as_path = Path::new(name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string());
    let ext = as_path.extension().map(|e| e.to_string_lossy().to_string());

    for n in 1u32.. {
        let numbered = match &ext {
            Some(e) => format!("{} ({}).{}", stem, n, e),
            None => format!("{} ({})", stem, n),
        };
        let candidate = dir.join(&numbered);
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!("u32 exhausted probing for a unique name")
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Why a candidate entry name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("name is empty")]
    Empty,

    #[error("name contains forbidden character '{0}'")]
    ForbiddenChar(char),

    #[error("'{0}' is a reserved name")]
    Reserved(String),

    #[error("name ends with a space or period")]
    TrailingDotOrSpace,

    #[error("'{0}' already exists")]
    AlreadyExists(String),
}

/// Validate a candidate entry name against the target directory.
///
/// Checks run in a fixed order: emptiness, forbidden characters, reserved
/// device stems (case-insensitive, extension stripped), trailing space or
/// period, and finally a collision probe in `parent`.
pub fn validate_name(candidate: &str, parent: &Path) -> std::result::Result<(), NameError> {
    if candidate.trim().is_empty() {
        return Err(NameError::Empty);
    }
    if let Some(bad) = candidate.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(NameError::ForbiddenChar(bad));
    }
    let stem = Path::new(candidate)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| candidate.to_string());
    if RESERVED_NAMES
        .iter()
        .any(|r| r.eq_ignore_ascii_case(&stem))
    {
        return Err(NameError::Reserved(stem));
    }
    if candidate.ends_with(' ') || candidate.ends_with('.') {
        return Err(NameError::TrailingDotOrSpace);
    }
    if parent.join(candidate).symlink_metadata().is_ok() {
        return Err(NameError::AlreadyExists(candidate.to_string()));
    }
    Ok(())
}

/// Length of the portion of `name` that an inline rename should pre-select:
/// the stem for files with an extension, the whole name otherwise.
pub fn preselect_len(name: &str, is_dir: bool) -> usize {
    if is_dir {
        return name.len();
    }
    match Path::new(name).file_stem() {
        Some(stem) if stem.len() < name.len() => stem.len(),
        _ => name.len(),
    }
}
