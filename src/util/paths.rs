//! Path helpers for command-line flag construction.

use std::path::Path;

/// Render a path for embedding in a command-line flag.
///
/// Paths containing whitespace are double-quoted so the expanded command
/// line keeps them as one token. Substitution slots like `$ndk` pass
/// through untouched; the external writer expands them at build time.
pub fn escape(path: &Path) -> String {
    let rendered = path.display().to_string();
    if rendered.contains(char::is_whitespace) {
        format!("\"{}\"", rendered)
    } else {
        rendered
    }
}

/// Join path segments with forward slashes.
///
/// Used for paths that embed substitution slots (e.g. `$ndk/...`): these
/// never touch the local filesystem, so the separator stays stable across
/// host platforms.
pub fn join_slots(segments: &[&str]) -> String {
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_escape_plain_path() {
        assert_eq!(escape(Path::new("include/foo")), "include/foo");
    }

    #[test]
    fn test_escape_path_with_spaces() {
        let path = PathBuf::from("C:/Program Files/LLVM/include");
        assert_eq!(escape(&path), "\"C:/Program Files/LLVM/include\"");
    }

    #[test]
    fn test_join_slots() {
        assert_eq!(
            join_slots(&["$ndk", "sources", "android", "cpufeatures"]),
            "$ndk/sources/android/cpufeatures"
        );
    }
}
