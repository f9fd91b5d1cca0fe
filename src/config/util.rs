//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
/// Returns the path to the config file if found.
///
/// # Example
/// ```text
/// /srv/shop/exports/          ← start
/// /srv/shop/shopfeed.toml     ← found!
/// ```
pub fn find_config_file(config_name: &Path, start: &Path) -> Option<PathBuf> {
    // Absolute paths are taken as given
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let mut current = start;
    loop {
        let candidate = current.join(config_name);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent,
            None => return None, // Reached filesystem root
        }
    }
}

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first, falling back to the path itself when
/// absolute or joined with the current directory when relative.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Expand `~` and resolve relative paths against `root`.
pub fn resolve_against(path: &Path, root: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
    let path = PathBuf::from(expanded);
    let full_path = if path.is_relative() {
        root.join(&path)
    } else {
        path
    };
    normalize_path(&full_path)
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_file_walks_up() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("shopfeed.toml"), "").unwrap();

        let found = find_config_file(Path::new("shopfeed.toml"), &nested).unwrap();
        assert_eq!(found, dir.path().join("shopfeed.toml"));
    }

    #[test]
    fn test_find_config_file_missing() {
        let dir = TempDir::new().unwrap();
        assert!(find_config_file(Path::new("definitely-not-here-4b1d.toml"), dir.path()).is_none());
    }

    #[test]
    fn test_find_config_file_absolute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        assert!(find_config_file(&path, Path::new("/")).is_none());

        fs::write(&path, "").unwrap();
        assert_eq!(find_config_file(&path, Path::new("/")), Some(path));
    }

    #[test]
    fn test_resolve_against_relative() {
        let resolved = resolve_against(Path::new("uploads"), Path::new("/srv/shop"));
        assert_eq!(resolved, PathBuf::from("/srv/shop/uploads"));
    }

    #[test]
    fn test_resolve_against_absolute() {
        let resolved = resolve_against(Path::new("/var/feeds"), Path::new("/srv/shop"));
        assert_eq!(resolved, PathBuf::from("/var/feeds"));
    }

    #[test]
    fn test_resolve_against_tilde() {
        let resolved = resolve_against(Path::new("~/feeds"), Path::new("/srv/shop"));
        assert!(!resolved.to_string_lossy().contains('~'));
        assert!(resolved.is_absolute());
    }
}
