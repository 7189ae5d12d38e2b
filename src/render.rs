//! Markdown, JSON and processing-log rendering.

use chrono::Local;
use serde::Serialize;

use dirdigest_scan::{Decision, Digest, DigestNode, NodeKind, SortedLog, Verdict};

/// Digest-level metadata emitted ahead of the tree.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub tool_version: String,
    pub created_at: String,
    pub base_directory: String,
    pub mode: String,
    pub included_files_count: u64,
    pub excluded_items_count: u64,
    pub total_content_size_kb: f64,
    pub scan_duration_ms: u64,
    pub sort_keys: Vec<String>,
}

impl Metadata {
    pub fn from_digest(digest: &Digest, sort_keys: &[dirdigest_scan::SortKey]) -> Self {
        Self {
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            created_at: Local::now().to_rfc3339(),
            base_directory: digest.root_path.display().to_string(),
            mode: digest.mode.to_string(),
            included_files_count: digest.stats.included_files,
            excluded_items_count: digest.stats.excluded_items,
            total_content_size_kb: kb(digest.stats.total_content_size),
            scan_duration_ms: digest.scan_duration.as_millis() as u64,
            sort_keys: sort_keys.iter().map(ToString::to_string).collect(),
        }
    }
}

fn kb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0
}

#[derive(Serialize)]
struct JsonDigest<'a> {
    metadata: &'a Metadata,
    root: &'a DigestNode,
}

/// Render `{ "metadata": ..., "root": ... }` as pretty JSON.
pub fn json(metadata: &Metadata, root: &DigestNode) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonDigest { metadata, root })
}

/// Render the digest as Markdown: header, structure block, then file contents.
pub fn markdown(metadata: &Metadata, root: &DigestNode) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Directory Digest: {}\n", metadata.base_directory));
    out.push_str(&format!(
        "\n*Generated by dirdigest v{} on {}*\n",
        metadata.tool_version, metadata.created_at
    ));
    out.push_str(&format!(
        "*Included files: {}, Total content size: {:.2} KB*\n",
        metadata.included_files_count, metadata.total_content_size_kb
    ));
    out.push_str("\n---\n\n## Directory Structure\n\n```text\n.\n");
    structure(root, "", &mut out);
    out.push_str("```\n\n---\n\n## Contents\n");

    let mut any = false;
    root.for_each_file(&mut |file| {
        any = true;
        let (hint, body) = match (&file.content, &file.read_error) {
            (Some(content), _) => (language_hint(&file.relative_path), content.clone()),
            (None, Some(err)) => ("text", format!("Error reading file: {err}")),
            (None, None) => ("text", String::new()),
        };
        let fence = fence_for(&body);
        out.push_str(&format!("\n### `./{}`\n", file.relative_path));
        out.push_str(&format!("{fence}{hint}\n"));
        out.push_str(&body);
        if !body.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&format!("{fence}\n"));
    });
    if !any {
        out.push_str("\n*No files with content to display.*\n");
    }
    out
}

fn structure(node: &DigestNode, indent: &str, out: &mut String) {
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        match child.kind {
            NodeKind::Folder => {
                out.push_str(&format!("{indent}{branch}{}/\n", child.name));
                let next = format!("{indent}{}", if last { "    " } else { "│   " });
                structure(child, &next, out);
            }
            NodeKind::File => {
                out.push_str(&format!("{indent}{branch}{}\n", child.name));
            }
        }
    }
}

/// Backtick fence longer than any backtick run inside `body`.
fn fence_for(body: &str) -> String {
    let longest = body
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

/// Fence language from the file extension, lowercased.
fn language_hint(path: &str) -> &'static str {
    let name = path.rsplit('/').next().unwrap_or(path);
    let ext = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => return "",
    };
    match ext.as_str() {
        "rs" => "rust",
        "py" => "python",
        "js" | "mjs" | "cjs" => "javascript",
        "ts" => "typescript",
        "tsx" => "tsx",
        "jsx" => "jsx",
        "go" => "go",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "hpp" => "cpp",
        "rb" => "ruby",
        "sh" | "bash" => "bash",
        "md" => "markdown",
        "json" => "json",
        "toml" => "toml",
        "yaml" | "yml" => "yaml",
        "html" => "html",
        "css" => "css",
        "sql" => "sql",
        "txt" => "text",
        _ => "",
    }
}

/// Render the processing log in the given order, one line per decision.
///
/// Status separators are printed only when the log is grouped by status.
pub fn processing_log(sorted: &SortedLog<'_>) -> String {
    let mut out = String::new();
    let mut current: Option<Verdict> = None;

    for decision in sorted.iter() {
        if sorted.is_status_grouped() && current != Some(decision.verdict) {
            current = Some(decision.verdict);
            let title = match decision.verdict {
                Verdict::Excluded => "EXCLUDED",
                Verdict::Included => "INCLUDED",
            };
            out.push_str(&format!("--- {title} ---\n"));
        }
        out.push_str(&log_line(decision));
        out.push('\n');
    }
    out
}

fn log_line(decision: &Decision) -> String {
    let symbol = match decision.verdict {
        Verdict::Included => '+',
        Verdict::Excluded => '-',
    };
    let kind = if decision.is_folder() { "folder" } else { "file" };
    let mut line = format!(
        "{symbol} {:<8} {:<6} {:>10.2}KB  {}  ({}",
        decision.verdict.to_string(),
        kind,
        kb(decision.entry.size),
        decision.path(),
        decision.reason,
    );
    if let Some(p) = &decision.matched.include {
        line.push_str(&format!(", MSI: '{p}'"));
    }
    if let Some(p) = &decision.matched.exclude {
        line.push_str(&format!(", MSE: '{p}'"));
    }
    if let Some(p) = &decision.matched.default_ignore {
        line.push_str(&format!(", default: '{p}'"));
    }
    line.push(')');
    line
}
