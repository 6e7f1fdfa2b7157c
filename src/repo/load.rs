use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::hierarchy::Hierarchy;
use super::pack::pack;
use super::parse::parse_flare_json;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutOptions {
    pub size: f64,
    pub padding: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            size: 1000.0,
            padding: 5.0,
        }
    }
}

pub fn load_repo_tree(path: &Path, options: LayoutOptions) -> Result<Hierarchy> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read hierarchy file {}", path.display()))?;
    info!(path = %path.display(), bytes = raw.len(), "read hierarchy file");

    build_repo_tree(&raw, options)
        .with_context(|| format!("failed to build layout from {}", path.display()))
}

pub fn build_repo_tree(raw: &str, options: LayoutOptions) -> Result<Hierarchy> {
    let started = Instant::now();
    let root = parse_flare_json(raw)?;
    let mut hierarchy = Hierarchy::from_raw(root);
    pack(&mut hierarchy, options.size, options.padding);

    debug!(
        nodes = hierarchy.len(),
        max_depth = hierarchy.max_depth(),
        lines = hierarchy.root().value,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "packed hierarchy"
    );
    Ok(hierarchy)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE: &str = r#"{"name": "repo", "children": [
        {"name": "a.rs", "size": 10, "author_count": 1},
        {"name": "b.rs", "size": 30, "author_count": 3}
    ]}"#;

    #[test]
    fn loads_and_packs_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write sample");

        let tree = load_repo_tree(file.path(), LayoutOptions::default()).expect("load");
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.root().value, 40.0);
        assert!((tree.root().r - 500.0).abs() < 1e-9);
        assert!(tree.node(2).r > tree.node(1).r);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("flare.json");
        let error = load_repo_tree(&path, LayoutOptions::default()).expect_err("missing file");
        assert!(format!("{error:#}").contains("flare.json"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let error = build_repo_tree("{\"name\":", LayoutOptions::default()).expect_err("bad json");
        assert!(format!("{error:#}").contains("invalid hierarchy JSON"));
    }

    #[test]
    fn layout_size_scales_the_root() {
        let options = LayoutOptions {
            size: 200.0,
            padding: 2.0,
        };
        let tree = build_repo_tree(SAMPLE, options).expect("build");
        assert!((tree.root().r - 100.0).abs() < 1e-9);
        assert!((tree.root().x - 100.0).abs() < 1e-9);
    }

    #[test]
    fn pipeline_output_with_string_shares_builds() {
        let raw = r#"{"name": ".", "children": [{"name": "src", "children": [
            {"name": "a.py", "size": 10, "author_count": 2,
             "fraction_of_lines_older_6_months": "0.25"}
        ]}]}"#;
        let tree = build_repo_tree(raw, LayoutOptions::default()).expect("build");
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.node(2).data.fraction_old, Some(0.25));
        assert_eq!(tree.root().value, 10.0);
    }
}
