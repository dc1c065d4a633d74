// tests/common/mod.rs
#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const CONFIG: &str = r#"# templet project settings
[bumpversion]
current_version = "0.1.0"

[bumpversion.files_whitelisted]
dot_templet = ".templet.toml"
init = "src/demo/__init__.py"

[bumpversion.files_blacklisted]
pyproject = "pyproject.toml"

[sync]
enabled = true
level = "minor"
"#;

pub const META: &str = r#"template_handle = "cli-python"
template_version = "1.3.0" # <<NO_BUMP>>
project_name = "demo"
project_version = "0.1.0"
"#;

pub const PYPROJECT: &str = r#"[tool.poetry]
name = "demo"
version = "0.1.0" # <<FORCE_BUMP>>

[tool.poetry.dependencies]
click = "8.0.1"
"#;

pub const CHANGELOG: &str = ".. _changelog:

=========
CHANGELOG
=========

This project adheres to semantic versioning.

0.1.0 (2020-01-01)
------------------

**Added**

* Created the project

**Fixed**

**Dependencies**

**Deprecated**
";

pub fn write(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

pub fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

/// A complete generated project at version 0.1.0 that lints clean
pub fn sample_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(root, "templet.toml", CONFIG);
    write(root, ".templet.toml", META);
    write(root, "pyproject.toml", PYPROJECT);
    write(root, "src/demo/__init__.py", "__version__ = \"0.1.0\"\n");
    write(root, "CHANGELOG.rst", CHANGELOG);
    write(root, "README.md", "# demo\n\nA demo command line tool.\n");
    write(root, "LICENSE", "MIT License\n");
    write(root, ".gitignore", "__pycache__/\n");
    write(root, ".github/pull_request_template.md", "Describe the change.\n");
    write(root, ".github/ISSUE_TEMPLATE/bug_report.md", "Bug report\n");
    write(root, ".github/ISSUE_TEMPLATE/feature_request.md", "Feature request\n");

    dir
}
