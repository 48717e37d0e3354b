use std::fs;
use std::io::{IsTerminal, Read};
use std::path::Path;

use crate::{ClientError, ClientResult};

pub(crate) const MAX_SOURCE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum SourceKind {
    File,
    Stdin,
}

impl SourceKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Stdin => "stdin",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ResolvedSource {
    pub(crate) source_kind: SourceKind,
    pub(crate) file_name: Option<String>,
    pub(crate) content: Vec<u8>,
}

pub(crate) fn resolve_source(
    path: Option<String>,
    stdin_override: Option<Vec<u8>>,
) -> ClientResult<ResolvedSource> {
    match path {
        Some(path_value) if path_value != "-" => read_file(&path_value),
        Some(_) => {
            let content = read_stdin(stdin_override)?.ok_or_else(|| {
                ClientError::malformed_input("path `-` means stdin input, but stdin was empty")
            })?;
            stdin_source(content)
        }
        None => match read_stdin(stdin_override)? {
            Some(content) => stdin_source(content),
            None => Err(ClientError::invalid_argument_for_command(
                "No credit report provided. Pass a file path or pipe the XML via stdin.",
                Some("report create"),
            )),
        },
    }
}

fn read_file(path_value: &str) -> ClientResult<ResolvedSource> {
    let metadata = fs::metadata(path_value)
        .map_err(|error| ClientError::unreadable_source(path_value, &error.to_string()))?;
    if metadata.len() > MAX_SOURCE_BYTES {
        return Err(ClientError::source_too_large(metadata.len(), MAX_SOURCE_BYTES));
    }

    let content = fs::read(path_value)
        .map_err(|error| ClientError::unreadable_source(path_value, &error.to_string()))?;
    ensure_not_blank(&content)?;

    let file_name = Path::new(path_value)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    Ok(ResolvedSource {
        source_kind: SourceKind::File,
        file_name,
        content,
    })
}

fn stdin_source(content: Vec<u8>) -> ClientResult<ResolvedSource> {
    if content.len() as u64 > MAX_SOURCE_BYTES {
        return Err(ClientError::source_too_large(
            content.len() as u64,
            MAX_SOURCE_BYTES,
        ));
    }
    ensure_not_blank(&content)?;

    Ok(ResolvedSource {
        source_kind: SourceKind::Stdin,
        file_name: None,
        content,
    })
}

fn ensure_not_blank(content: &[u8]) -> ClientResult<()> {
    if content.iter().all(u8::is_ascii_whitespace) {
        return Err(ClientError::malformed_input("the report is empty"));
    }
    Ok(())
}

fn read_stdin(stdin_override: Option<Vec<u8>>) -> ClientResult<Option<Vec<u8>>> {
    if let Some(value) = stdin_override {
        return Ok(non_blank(value));
    }

    if std::io::stdin().is_terminal() {
        return Ok(None);
    }

    // One byte past the limit is enough to tell an oversized upload apart.
    let mut buffer = Vec::new();
    std::io::stdin()
        .take(MAX_SOURCE_BYTES + 1)
        .read_to_end(&mut buffer)
        .map_err(|error| ClientError::unreadable_source("stdin", &error.to_string()))?;

    Ok(non_blank(buffer))
}

fn non_blank(value: Vec<u8>) -> Option<Vec<u8>> {
    if value.iter().all(u8::is_ascii_whitespace) {
        None
    } else {
        Some(value)
    }
}
