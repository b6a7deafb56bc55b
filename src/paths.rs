//! Translation between the container view of the library (what this service
//! scans) and the host view (what the external sync script reads).
//!
//! Everything here is plain string manipulation. No filesystem access.

/// Container prefixes written by older deployments, accepted regardless of
/// the configured container roots.
const LEGACY_CONTAINER_PREFIXES: [&str; 2] = ["/music/", "/audiobooks/"];

/// The same media tree seen from inside the service and from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRoots {
    pub container: String,
    pub host: String,
}

impl PathRoots {
    pub fn new(container: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            host: host.into(),
        }
    }

    pub fn to_host(&self, path: &str) -> String {
        to_host(path, &self.container, &self.host)
    }

    pub fn to_relative(&self, path: &str) -> String {
        to_relative(path, &self.host)
    }
}

/// Music and audiobook roots, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRoots {
    pub music: PathRoots,
    pub audiobooks: PathRoots,
}

/// `root` with exactly one trailing `/`.
fn with_trailing_slash(root: &str) -> String {
    format!("{}/", root.trim_end_matches('/'))
}

/// Strip the container root (or a legacy container prefix) from `path`.
///
/// Returns `None` when `path` is absolute but belongs to neither, i.e. it is
/// already expressed in some other namespace. Relative paths come back as-is.
pub fn container_remainder<'a>(path: &'a str, container_root: &str) -> Option<&'a str> {
    let container_prefix = with_trailing_slash(container_root);

    let remainder = if let Some(rest) = path.strip_prefix(container_prefix.as_str()) {
        rest
    } else if let Some(rest) = LEGACY_CONTAINER_PREFIXES
        .iter()
        .find_map(|prefix| path.strip_prefix(prefix))
    {
        rest
    } else if path.starts_with('/') {
        return None;
    } else {
        path
    };

    Some(remainder.strip_prefix('/').unwrap_or(remainder))
}

/// Map `path` (relative, container-absolute or host-absolute) onto `host_root`.
///
/// Idempotent: a path already under `host_root` is returned unchanged, and so
/// is any absolute path outside both the container root and the legacy
/// prefixes.
pub fn to_host(path: &str, container_root: &str, host_root: &str) -> String {
    let host_dir = with_trailing_slash(host_root);
    if path.starts_with(host_dir.as_str()) {
        return path.to_string();
    }

    match container_remainder(path, container_root) {
        Some(remainder) => format!("{host_dir}{remainder}"),
        None => path.to_string(),
    }
}

/// Inverse of [`to_host`] for paths read back from the selection file: strip
/// `host_root` when present, otherwise keep the path verbatim.
pub fn to_relative(path: &str, host_root: &str) -> String {
    let host_dir = with_trailing_slash(host_root);
    match path.strip_prefix(host_dir.as_str()) {
        Some(rest) => rest.to_string(),
        None => path.to_string(),
    }
}

/// Collapse runs of `/` and drop any trailing `/`.
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut previous_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !previous_slash {
                out.push(c);
            }
            previous_slash = true;
        } else {
            out.push(c);
            previous_slash = false;
        }
    }
    while out.ends_with('/') {
        out.pop();
    }
    out
}
