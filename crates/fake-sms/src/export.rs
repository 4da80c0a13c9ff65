//! Export of fetched messages to JSON files.

use crate::error::{AppError, AppResult};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use sms_client::Message;
use std::path::{Path, PathBuf};
use tracing::info;

/// `<dir>/<number>.json`, with path separators in the number replaced.
pub fn export_path(dir: &Path, number: &str) -> PathBuf {
    let file_stem: String = number
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    dir.join(format!("{}.json", file_stem))
}

/// Serialize messages as a tab-indented JSON array.
pub fn to_document(messages: &[Message]) -> AppResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    messages.serialize(&mut serializer)?;
    Ok(buf)
}

/// Write `messages` to `<dir>/<number>.json`, replacing any previous export.
pub async fn export_messages(
    dir: &Path,
    number: &str,
    messages: &[Message],
) -> AppResult<PathBuf> {
    let path = export_path(dir, number);
    let data = to_document(messages)?;

    tokio::fs::write(&path, &data)
        .await
        .map_err(|source| AppError::Export {
            path: path.clone(),
            source,
        })?;

    info!("Exported {} messages to {:?}", messages.len(), path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_path() {
        let dir = Path::new("/tmp/out");
        assert_eq!(export_path(dir, "+1555"), PathBuf::from("/tmp/out/+1555.json"));
        assert_eq!(export_path(dir, "a/b"), PathBuf::from("/tmp/out/a_b.json"));
    }

    #[test]
    fn test_document_is_tab_indented() {
        let doc = to_document(&[Message::new("Google", "code 1", "t1")]).unwrap();
        let text = String::from_utf8(doc).unwrap();

        assert!(text.starts_with("[\n\t{\n\t\t\"originator\": \"Google\""));
        let parsed: Vec<Message> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0].body, "code 1");
    }

    #[test]
    fn test_empty_document() {
        let doc = to_document(&[]).unwrap();
        assert_eq!(doc, b"[]");
    }

    #[tokio::test]
    async fn test_export_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let messages = vec![
            Message::new("Google", "Your code is 1234", "t1"),
            Message::new("Friend", "Hello", "t2"),
        ];

        let path = export_messages(dir.path(), "+1555", &messages).await.unwrap();

        assert_eq!(path, dir.path().join("+1555.json"));
        let written: Vec<Message> =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written, messages);
    }

    #[tokio::test]
    async fn test_export_missing_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let result = export_messages(&missing, "+1555", &[]).await;
        assert!(matches!(result, Err(AppError::Export { .. })));
    }
}
