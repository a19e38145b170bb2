use std::path::Path;

use anyhow::Context;
use flowscope::flowchart::Diagram;

/// Load a diagram from its JSON file.
pub fn load_diagram(path: &Path) -> anyhow::Result<Diagram> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read diagram: {}", path.display()))?;
    Diagram::from_json(&text).with_context(|| format!("failed to parse diagram: {}", path.display()))
}

/// Display name for a diagram file.
pub fn diagram_name(path: &Path) -> String {
    path.file_stem()
        .map_or_else(|| path.display().to_string(), |s| s.to_string_lossy().into_owned())
}
