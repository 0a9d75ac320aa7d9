//! File-backed upstream: one JSON array of rows per resource.

use std::io::ErrorKind;
use std::path::PathBuf;

use airwave_core::{FetchRequest, Record, UpstreamError, UpstreamSource};
use serde_json::Value;

/// Reads `<root>/<resource>.json` and applies the request filter locally.
#[derive(Clone, Debug)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_of(&self, resource: &str) -> PathBuf {
        self.root.join(format!("{resource}.json"))
    }
}

fn field_matches(row: &Record, field: &str, value: &str) -> bool {
    match row.get(field) {
        Some(Value::String(s)) => s == value,
        Some(Value::Number(n)) => n.to_string() == value,
        Some(Value::Bool(b)) => b.to_string() == value,
        _ => false,
    }
}

fn parse_rows(resource: &str, text: &str) -> Result<Vec<Record>, UpstreamError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| UpstreamError::Malformed(format!("{resource}: {e}")))?;
    let Value::Array(items) = value else {
        return Err(UpstreamError::Malformed(format!(
            "{resource}: expected a JSON array of rows"
        )));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(row) => Ok(row),
            _ => Err(UpstreamError::Malformed(format!(
                "{resource}: row {i} is not an object"
            ))),
        })
        .collect()
}

impl UpstreamSource for FileSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<Record>, UpstreamError> {
        let path = self.path_of(&request.resource);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(UpstreamError::NotFound(path.display().to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let mut rows = parse_rows(&request.resource, &text)?;
        if let Some(filter) = &request.filter {
            rows.retain(|row| field_matches(row, &filter.field, &filter.value));
        }
        tracing::debug!(request = %request.describe(), rows = rows.len(), "read rows");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn filters_by_string_or_number() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("market.json"),
            r#"[{"id": "m1", "dma_id": 7}, {"id": "m2", "dma_id": "8"}]"#,
        )
        .unwrap();
        let source = FileSource::new(dir.path());

        let rows = source
            .fetch(&FetchRequest::filtered("market", "dma_id", "7"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "m1");

        let all = source.fetch(&FetchRequest::all("market")).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn missing_resource_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::new(dir.path())
            .fetch(&FetchRequest::all("airplay"))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::NotFound(_)));
    }

    #[test]
    fn non_array_payload_is_malformed() {
        assert!(matches!(
            parse_rows("x", r#"{"a": 1}"#),
            Err(UpstreamError::Malformed(_))
        ));
        assert!(matches!(
            parse_rows("x", "[1]"),
            Err(UpstreamError::Malformed(_))
        ));
    }
}
