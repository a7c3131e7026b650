//! Expansion of the colon-separated `sop_paths` setting into directories.

use std::path::{Component, Path, PathBuf};

/// Name of the built-in SOP directory next to the executable.
const BUILTIN_DIR_NAME: &str = "sops";

/// Expand a colon-separated list of directories into absolute paths.
///
/// Empty and whitespace-only segments are dropped, a leading `~` maps to the
/// home directory, and each path is made absolute with symlinks resolved
/// where the path exists. Input order is kept and duplicates are not removed.
pub fn resolve(paths_spec: &str) -> Vec<PathBuf> {
    let home = directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf());
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    resolve_with(paths_spec, home.as_deref(), &cwd)
}

pub(crate) fn resolve_with(paths_spec: &str, home: Option<&Path>, cwd: &Path) -> Vec<PathBuf> {
    paths_spec
        .split(':')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| absolutize(&expand_tilde(segment, home), cwd))
        .collect()
}

/// Expand a leading `~` (alone or followed by `/`).
fn expand_tilde(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        _ => PathBuf::from(path),
    }
}

/// Join onto `cwd` when relative, then canonicalize the longest existing
/// ancestor and append the rest with `.` and `..` cleaned up lexically.
fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    for ancestor in joined.ancestors() {
        let Ok(base) = std::fs::canonicalize(ancestor) else {
            continue;
        };
        let rest = normalize_lexically(joined.strip_prefix(ancestor).unwrap_or(Path::new("")));
        if rest.as_os_str().is_empty() {
            return base;
        }
        return base.join(rest);
    }
    normalize_lexically(&joined)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            Component::ParentDir => {
                out.pop();
            },
            other => out.push(other),
        }
    }
    out
}

/// Built-in SOP directory: explicit override, then `<exe dir>/sops`, then
/// the `sops/` directory shipped with this crate.
pub fn builtin_dir(configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join(BUILTIN_DIR_NAME)))
        .filter(|dir| dir.is_dir());
    beside_exe.unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join(BUILTIN_DIR_NAME))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_empty_segments_and_expands_home() {
        let home = Path::new("/home/ada-nonexistent");
        let resolved = resolve_with("~/a: :/b:", Some(home), Path::new("/work"));
        assert_eq!(resolved, vec![
            PathBuf::from("/home/ada-nonexistent/a"),
            PathBuf::from("/b")
        ]);
    }

    #[test]
    fn empty_or_blank_spec_is_empty() {
        assert!(resolve_with("", None, Path::new("/")).is_empty());
        assert!(resolve_with("   ", None, Path::new("/")).is_empty());
        assert!(resolve_with(":::", None, Path::new("/")).is_empty());
    }

    #[test]
    fn relative_segments_join_cwd() {
        let resolved = resolve_with(
            "team/sops:./local/../other",
            None,
            Path::new("/nonexistent-root/work"),
        );
        assert_eq!(resolved, vec![
            PathBuf::from("/nonexistent-root/work/team/sops"),
            PathBuf::from("/nonexistent-root/work/other"),
        ]);
    }

    #[test]
    fn duplicates_are_kept_in_order() {
        let resolved = resolve_with("/x:/y:/x", None, Path::new("/"));
        assert_eq!(resolved.len(), 3);
        assert_eq!(resolved[0], resolved[2]);
    }

    #[test]
    fn bare_tilde_is_home_and_named_user_is_literal() {
        let home = Path::new("/home/ada-nonexistent");
        let resolved = resolve_with("~:~bob/sops", Some(home), Path::new("/w"));
        assert_eq!(resolved, vec![
            PathBuf::from("/home/ada-nonexistent"),
            PathBuf::from("/w/~bob/sops"),
        ]);
    }

    #[test]
    fn existing_paths_are_canonicalized() {
        let tmp = tempfile::tempdir().unwrap();
        let real = tmp.path().join("real");
        std::fs::create_dir(&real).unwrap();
        let spec = format!("{}/./real", tmp.path().display());
        let resolved = resolve_with(&spec, None, Path::new("/"));
        assert_eq!(resolved, vec![std::fs::canonicalize(&real).unwrap()]);
    }

    #[test]
    fn missing_tail_is_appended_to_canonical_ancestor() {
        let tmp = tempfile::tempdir().unwrap();
        let spec = format!("{}/missing/../later/sops", tmp.path().display());
        let resolved = resolve_with(&spec, None, Path::new("/"));
        assert_eq!(resolved, vec![
            std::fs::canonicalize(tmp.path()).unwrap().join("later/sops")
        ]);
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_in_existing_prefix_are_resolved() {
        let tmp = tempfile::tempdir().unwrap();
        let inner = tmp.path().join("target/inner");
        std::fs::create_dir_all(&inner).unwrap();
        std::os::unix::fs::symlink(&inner, tmp.path().join("link")).unwrap();

        let spec = format!("{}/link/../new", tmp.path().display());
        let resolved = resolve_with(&spec, None, Path::new("/"));
        assert_eq!(resolved, vec![
            std::fs::canonicalize(tmp.path().join("target")).unwrap().join("new")
        ]);
    }

    #[test]
    fn configured_builtin_dir_wins() {
        assert_eq!(
            builtin_dir(Some(Path::new("/opt/sops"))),
            PathBuf::from("/opt/sops")
        );
    }
}
