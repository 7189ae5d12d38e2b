//! File content population for included tree nodes.

use std::io;
use std::path::Path;

use dirdigest_scan::DigestNode;
use tracing::{debug, warn};

/// Read the content of every included file beneath `root`.
///
/// Files that cannot be read or are not valid UTF-8 keep `content` empty and
/// carry a `read_error` note instead. Returns the number of such files.
pub fn populate(root: &Path, node: &mut DigestNode) -> usize {
    let mut failures = 0;
    node.for_each_file_mut(&mut |file| {
        let path = root.join(file.relative_path.as_str());
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                debug!(path = %file.relative_path, bytes = content.len(), "Read file");
                file.content = Some(content);
            }
            Err(err) => {
                let note = describe(&err);
                warn!(path = %file.relative_path, error = %note, "Cannot read file content");
                file.read_error = Some(note);
                failures += 1;
            }
        }
    });
    failures
}

fn describe(err: &io::Error) -> String {
    match err.kind() {
        io::ErrorKind::InvalidData => "could not decode file as UTF-8".to_string(),
        _ => err.to_string(),
    }
}
