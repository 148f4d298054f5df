use crate::corpus::Corpus;
use crate::error::{AuditError, Result};
use ignore::WalkBuilder;
use skill_document::DocumentParser;
use std::path::{Path, PathBuf};

/// Load every `<dir>/<child>/<file_name>` into a corpus named by `child`.
///
/// A single unreadable document aborts the whole load.
pub fn load_corpus(dir: &Path, file_name: &str, parser: &DocumentParser) -> Result<Corpus> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(AuditError::MissingDirectory(dir.to_path_buf())),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(AuditError::MissingDirectory(dir.to_path_buf()));
        }
        Err(err) => return Err(err.into()),
    }

    let mut corpus = Corpus::new();
    for (name, path) in discover(dir, file_name)? {
        let text = std::fs::read_to_string(&path).map_err(|source| AuditError::Read {
            path: path.clone(),
            source,
        })?;
        log::debug!("Parsing {} ({} bytes)", path.display(), text.len());
        corpus.insert(parser.parse_named(name, &text))?;
    }

    log::info!("Loaded {} documents from {}", corpus.len(), dir.display());
    Ok(corpus)
}

/// Document files exactly one directory below `dir`, sorted by path.
///
/// Symlinked skill directories and documents are followed; dangling links
/// are skipped with a warning.
fn discover(dir: &Path, file_name: &str) -> Result<Vec<(String, PathBuf)>> {
    let mut builder = WalkBuilder::new(dir);
    builder
        .standard_filters(false)
        .hidden(true) // skip .git and friends
        .follow_links(true)
        .max_depth(Some(2))
        .sort_by_file_name(|a, b| a.cmp(b));

    let mut found = Vec::new();
    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) if is_dangling_link(&err) => {
                log::warn!("Skipping dangling link: {err}");
                continue;
            }
            Err(err) => return Err(err.into()),
        };
        if entry.depth() != 2 {
            continue;
        }
        let Some(file_type) = entry.file_type() else {
            continue;
        };
        if !file_type.is_file() || entry.file_name() != file_name {
            continue;
        }

        let path = entry.path();
        let Some(name) = path
            .parent()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
        else {
            log::warn!("Skipping {}: no parent directory name", path.display());
            continue;
        };
        found.push((name, path.to_path_buf()));
    }
    Ok(found)
}

fn is_dangling_link(err: &ignore::Error) -> bool {
    err.io_error()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
}
