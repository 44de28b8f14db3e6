// src/file.rs

use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
};

pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if dir.exists() && !dir.is_dir() {
        return Err(io::Error::other(format!("Path exists but is not a directory: {}", dir.display())));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}

/// Duplicate handling **only within this run**
pub fn resolve_chart_filename(
    dir: &Path,
    stem: &str,                        // already sanitized, no extension
    seen_names: &mut HashMap<String, usize>,
    ext: &str,
) -> PathBuf {
    let count = seen_names.entry(stem.to_string()).or_insert(0);

    // First occurrence: "<stem>.ext"
    // Subsequent:       "<stem> (N).ext" with N starting at 2
    let filename = if *count == 0 {
        format!("{stem}.{ext}")
    } else {
        format!("{stem} ({}).{ext}", *count + 1)
    };

    *count += 1;
    dir.join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_stems_get_numbered() {
        let mut seen = HashMap::new();
        let dir = Path::new("out");
        assert_eq!(resolve_chart_filename(dir, "gdp", &mut seen, "png"), dir.join("gdp.png"));
        assert_eq!(resolve_chart_filename(dir, "gdp", &mut seen, "png"), dir.join("gdp (2).png"));
        assert_eq!(resolve_chart_filename(dir, "pop", &mut seen, "png"), dir.join("pop.png"));
        assert_eq!(resolve_chart_filename(dir, "gdp", &mut seen, "png"), dir.join("gdp (3).png"));
    }

    #[test]
    fn file_in_the_way_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let f = tmp.path().join("taken");
        fs::write(&f, b"x").unwrap();
        assert!(ensure_directory(&f).is_err());
        assert!(ensure_directory(&tmp.path().join("a/b")).is_ok());
    }
}
