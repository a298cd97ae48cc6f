//! Lexical path arithmetic against a project root.
//!
//! Nothing here touches the filesystem: paths are joined and normalized
//! purely by their components, so a declared file does not need to exist
//! for containment to be decided.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without consulting the filesystem.
///
/// A `..` directly under the filesystem root is dropped (`/..` is `/`).
/// Leading `..` components of a relative path are kept. An empty result
/// becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(part) => out.push(part),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Resolve `candidate` against `root`.
///
/// Absolute candidates are only normalized; relative ones are joined onto
/// `root` first.
pub fn resolve_relative_to(root: &Path, candidate: impl AsRef<Path>) -> PathBuf {
    let candidate = candidate.as_ref();
    if candidate.is_absolute() {
        normalize(candidate)
    } else {
        normalize(&root.join(candidate))
    }
}

/// Returns `true` if `candidate` lies inside `root` (or is `root` itself).
///
/// Comparison is by whole components, so `/proj-old` is not inside `/proj`.
pub fn is_contained_in(root: &Path, candidate: &Path) -> bool {
    normalize(candidate).starts_with(normalize(root))
}

/// Express `candidate` relative to `root`.
///
/// Paths outside `root` come back with leading `..` components; `root`
/// itself becomes `.`.
pub fn to_relative(root: &Path, candidate: &Path) -> PathBuf {
    let root = normalize(root);
    let candidate = normalize(candidate);

    match pathdiff::diff_paths(&candidate, &root) {
        Some(rel) if rel.as_os_str().is_empty() => PathBuf::from("."),
        Some(rel) => rel,
        // Mixed absolute/relative inputs have no relative form.
        None => candidate,
    }
}

/// Render a path with forward slashes, the form written to `project.json`.
///
/// Returns `None` for paths that are not valid UTF-8, since JSON cannot
/// carry them.
pub fn to_slash(path: &Path) -> Option<String> {
    let text = path.to_str()?;
    Some(if std::path::MAIN_SEPARATOR == '/' {
        text.to_owned()
    } else {
        text.replace(std::path::MAIN_SEPARATOR, "/")
    })
}
