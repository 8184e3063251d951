//! Synchronous filesystem primitives used by the browser: move/copy to an
//! explicit target, delete, create, and the best-effort OS integration
//! calls. All run on the dispatch thread; none are transactional.

use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::Result;

/// Create an empty file at the given path.
pub fn create_file(path: &Path) -> Result<()> {
    fs::File::create(path)?;
    Ok(())
}

/// Create a new directory at the given path.
pub fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir(path)?;
    Ok(())
}

/// Rename a file or directory within its filesystem.
pub fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to)?;
    Ok(())
}

/// Delete a file or directory. Directories are removed recursively.
pub fn delete(path: &Path) -> Result<()> {
    if path.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// Copy `src` to the explicit target `dest` — a plain file copy, or a
/// recursive copy for directories. The caller has already resolved any name
/// collision at `dest`.
pub fn copy_to(src: &Path, dest: &Path) -> Result<()> {
    if src.is_dir() {
        copy_dir_recursive(src, dest)?;
    } else {
        fs::copy(src, dest)?;
    }
    Ok(())
}

/// Move `src` to the explicit target `dest`.
///
/// Tries `fs::rename` first (same-device, instant) and falls back to
/// copy-then-delete for cross-device moves.
pub fn move_to(src: &Path, dest: &Path) -> Result<()> {
    match fs::rename(src, dest) {
        Ok(()) => Ok(()),
        Err(_) => {
            if src.is_dir() {
                copy_dir_recursive(src, dest)?;
                fs::remove_dir_all(src)?;
            } else {
                fs::copy(src, dest)?;
                fs::remove_file(src)?;
            }
            Ok(())
        }
    }
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_recursive(&src_path, &dest_path)?;
        } else {
            fs::copy(&src_path, &dest_path)?;
        }
    }
    Ok(())
}

// ── Best-effort OS integration ───────────────────────────────────────────────

/// Open a path with the OS default handler. Failures are swallowed; this is
/// a convenience, not a contract.
pub fn open_with_os(path: &Path) {
    #[cfg(target_os = "macos")]
    let result = Command::new("open").arg(path).spawn();
    #[cfg(target_os = "windows")]
    let result = Command::new("cmd")
        .args(["/C", "start", ""])
        .arg(path)
        .spawn();
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let result = Command::new("xdg-open").arg(path).spawn();

    if let Err(e) = result {
        debug!(path = %path.display(), error = %e, "open_with_os failed");
    }
}

/// Reveal a path in the OS file explorer. Failures are swallowed.
pub fn reveal_in_os(path: &Path) {
    #[cfg(target_os = "macos")]
    let result = Command::new("open").arg("-R").arg(path).spawn();
    #[cfg(target_os = "windows")]
    let result = Command::new("explorer")
        .arg(format!("/select,{}", path.display()))
        .spawn();
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let result = {
        // no portable "select in file manager" on linux; open the parent dir
        let target = path.parent().unwrap_or(path);
        Command::new("xdg-open").arg(target).spawn()
    };

    if let Err(e) = result {
        debug!(path = %path.display(), error = %e, "reveal_in_os failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn create_file_and_dir() {
        let tmp = TempDir::new().unwrap();
        create_file(&tmp.path().join("f.txt")).unwrap();
        create_dir(&tmp.path().join("d")).unwrap();
        assert!(tmp.path().join("f.txt").is_file());
        assert!(tmp.path().join("d").is_dir());
    }

    #[test]
    fn create_dir_twice_fails() {
        let tmp = TempDir::new().unwrap();
        create_dir(&tmp.path().join("dup")).unwrap();
        assert!(create_dir(&tmp.path().join("dup")).is_err());
    }

    #[test]
    fn rename_moves_entry() {
        let tmp = TempDir::new().unwrap();
        let old = tmp.path().join("old.txt");
        let new = tmp.path().join("new.txt");
        create_file(&old).unwrap();
        rename(&old, &new).unwrap();
        assert!(!old.exists());
        assert!(new.exists());
    }

    #[test]
    fn delete_file_and_dir_tree() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("parent");
        fs::create_dir_all(dir.join("child")).unwrap();
        fs::write(dir.join("child").join("f.txt"), "x").unwrap();
        delete(&dir).unwrap();
        assert!(!dir.exists());

        let file = tmp.path().join("single.txt");
        create_file(&file).unwrap();
        delete(&file).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn delete_missing_fails() {
        let tmp = TempDir::new().unwrap();
        assert!(delete(&tmp.path().join("ghost")).is_err());
    }

    #[test]
    fn copy_to_duplicates_file() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src.txt");
        fs::write(&src, "hello").unwrap();
        let dest = tmp.path().join("dest.txt");
        copy_to(&src, &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "hello");
        assert!(src.exists());
    }

    #[test]
    fn copy_to_recurses_into_directories() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("tree");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::write(src.join("a.txt"), "a").unwrap();
        fs::write(src.join("sub").join("b.txt"), "b").unwrap();

        let dest = tmp.path().join("copy");
        copy_to(&src, &dest).unwrap();
        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "a");
        assert_eq!(
            fs::read_to_string(dest.join("sub").join("b.txt")).unwrap(),
            "b"
        );
    }

    #[test]
    fn move_to_removes_source() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("move_me.txt");
        fs::write(&src, "content").unwrap();
        let dest = tmp.path().join("moved.txt");
        move_to(&src, &dest).unwrap();
        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "content");
    }

    #[test]
    fn move_to_handles_directories() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("dir");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("inner.txt"), "data").unwrap();
        let dest = tmp.path().join("elsewhere");
        move_to(&src, &dest).unwrap();
        assert!(!src.exists());
        assert!(dest.join("inner.txt").exists());
    }
}
