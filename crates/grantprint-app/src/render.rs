//! Render use cases: Markdown from in-memory reports, and writing artifacts.

use anyhow::Context;
use camino::Utf8Path;
use grantprint_types::IngestReport;

use crate::report::to_renderable;

pub fn render_markdown(report: &IngestReport) -> String {
    grantprint_render::render_markdown(&to_renderable(report))
}

/// Write an artifact, creating parent directories as needed.
pub fn write_text(path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    std::fs::write(path, contents).with_context(|| format!("write {path}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::runtime_error_report;

    #[test]
    fn render_markdown_smoke() {
        let markdown = render_markdown(&runtime_error_report("boom"));
        assert!(markdown.contains("# Grantprint ingest plan"));
        assert!(markdown.contains("boom"));
    }

    #[test]
    fn write_text_creates_parent_dirs() {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let root = Utf8Path::from_path(tmp.path()).expect("utf8 path");
        let path = root.join("artifacts/grantprint/report.md");

        write_text(&path, b"hello").expect("write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "hello");
    }
}
