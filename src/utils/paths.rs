//! Path rewriting shared by the file operations.

/// Turns Windows-style separators into forward slashes.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

/// Path as the `exec` endpoint expects it: forward slashes, relative to the
/// working directory.
pub fn relative_exec_path(path: &str) -> String {
    let normalized = normalize_separators(path);
    match normalized.strip_prefix('/') {
        Some(rest) => rest.to_string(),
        None => normalized,
    }
}

/// Dotted module path for a python source file, e.g. `pkg/mod.py` -> `pkg.mod`.
pub fn import_path(path: &str) -> String {
    path.strip_suffix(".py")
        .unwrap_or(path)
        .replace(['\\', '/'], ".")
}

/// Starter content for a freshly created file, chosen by extension.
pub fn new_file_contents(name: &str) -> String {
    if name.ends_with(".py") {
        format!("\"\"\"\n   {}\n\"\"\"\n\n", name)
    } else if name.ends_with(".json") {
        "[]".to_string()
    } else {
        String::new()
    }
}

/// Joins a prompted name onto an optional parent folder.
pub fn join_folder(folder: Option<&str>, name: &str) -> String {
    match folder {
        Some(folder) if !folder.is_empty() => format!("{}/{}", folder, name),
        _ => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_separators() {
        assert_eq!(normalize_separators("a\\b\\c.txt"), "a/b/c.txt");
        assert_eq!(normalize_separators("/a/b"), "/a/b");
    }

    #[test]
    fn test_relative_exec_path() {
        assert_eq!(relative_exec_path("/scripts/run.py"), "scripts/run.py");
        assert_eq!(relative_exec_path("\\scripts\\run.py"), "scripts/run.py");
        assert_eq!(relative_exec_path("run.py"), "run.py");
        // only one separator is dropped
        assert_eq!(relative_exec_path("//run.py"), "/run.py");
    }

    #[test]
    fn test_import_path() {
        assert_eq!(import_path("pkg/sub/mod.py"), "pkg.sub.mod");
        assert_eq!(import_path("pkg\\mod.py"), "pkg.mod");
        assert_eq!(import_path("/mod.py"), ".mod");
        assert_eq!(import_path("pkg/data"), "pkg.data");
    }

    #[test]
    fn test_new_file_contents() {
        assert_eq!(new_file_contents("dir/a.py"), "\"\"\"\n   dir/a.py\n\"\"\"\n\n");
        assert_eq!(new_file_contents("b.json"), "[]");
        assert_eq!(new_file_contents("notes.txt"), "");
        assert_eq!(new_file_contents("Makefile"), "");
    }

    #[test]
    fn test_new_file_contents_for_bare_extension_names() {
        assert_eq!(new_file_contents(".py"), "\"\"\"\n   .py\n\"\"\"\n\n");
        assert_eq!(new_file_contents("dir/.json"), "[]");
        assert_eq!(new_file_contents("a.pyc"), "");
    }

    #[test]
    fn test_join_folder() {
        assert_eq!(join_folder(Some("dir"), "a.py"), "dir/a.py");
        assert_eq!(join_folder(Some(""), "a.py"), "a.py");
        assert_eq!(join_folder(None, "a.py"), "a.py");
    }
}
