//! JSON argument parsing for the command line.

use crate::application::add_documents::AddRequest;
use crate::domain::error::DomainError;
use crate::domain::values::filter::{Where, WhereDocument};
use crate::domain::values::include::Include;
use crate::domain::values::metadata::{metadata_from_json, Metadata};
use serde_json::Value;

fn string_list(data: &Value, field: &str) -> Result<Option<Vec<String>>, DomainError> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(String::from)
                    .ok_or_else(|| DomainError::InvalidInput(format!("{field} must contain strings, got {v}")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(DomainError::InvalidInput(format!("{field} must be a list, got {other}"))),
    }
}

fn embedding_list(data: &Value) -> Result<Option<Vec<Vec<f32>>>, DomainError> {
    match data.get("embeddings") {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| DomainError::InvalidInput(format!("embeddings must be lists of numbers: {e}"))),
    }
}

fn metadata_list(data: &Value) -> Result<Option<Vec<Metadata>>, DomainError> {
    match data.get("metadatas") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items.iter().map(metadata_from_json).collect::<Result<Vec<_>, _>>().map(Some),
        Some(other) => Err(DomainError::InvalidInput(format!("metadatas must be a list, got {other}"))),
    }
}

/// Parse `{"ids": [...], "documents": [...], "metadatas": [...], "embeddings": [...]}`.
pub fn parse_batch(json: &str) -> Result<AddRequest, DomainError> {
    let data: Value = serde_json::from_str(json)?;
    let ids = string_list(&data, "ids")?.ok_or("Missing required field: ids")?;
    Ok(AddRequest {
        ids,
        documents: string_list(&data, "documents")?,
        metadatas: metadata_list(&data)?,
        embeddings: embedding_list(&data)?,
    })
}

pub fn parse_metadata(json: Option<&str>) -> Result<Option<Metadata>, DomainError> {
    json.map(|s| serde_json::from_str::<Value>(s).map_err(DomainError::from).and_then(|v| metadata_from_json(&v)))
        .transpose()
}

pub fn parse_where(json: Option<&str>) -> Result<Option<Where>, DomainError> {
    json.map(|s| serde_json::from_str::<Value>(s).map_err(DomainError::from).and_then(|v| Where::from_json(&v)))
        .transpose()
}

pub fn parse_where_document(json: Option<&str>) -> Result<Option<WhereDocument>, DomainError> {
    json.map(|s| {
        serde_json::from_str::<Value>(s)
            .map_err(DomainError::from)
            .and_then(|v| WhereDocument::from_json(&v))
    })
    .transpose()
}

pub fn parse_include(fields: Option<&[String]>) -> Result<Option<Vec<Include>>, DomainError> {
    fields
        .map(|fs| {
            fs.iter()
                .map(|f| f.trim().parse::<Include>().map_err(DomainError::InvalidInput))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_batch() {
        let req = parse_batch(
            r#"{"ids": ["doc1", "doc2"], "documents": ["document1", "document2"],
                "metadatas": [{"source": "notion"}, {"source": "google-docs"}]}"#,
        )
        .unwrap();
        assert_eq!(req.ids, vec!["doc1", "doc2"]);
        assert_eq!(req.documents.unwrap().len(), 2);
        assert_eq!(req.metadatas.unwrap()[1]["source"].as_str(), Some("google-docs"));
        assert!(req.embeddings.is_none());
    }

    #[test]
    fn test_parse_batch_with_embeddings() {
        let req = parse_batch(r#"{"ids": ["a"], "embeddings": [[0.1, 2, -3.5]]}"#).unwrap();
        assert_eq!(req.embeddings.unwrap()[0], vec![0.1_f32, 2.0, -3.5]);
    }

    #[test]
    fn test_parse_batch_errors() {
        assert!(parse_batch(r#"{"documents": ["x"]}"#).is_err());
        assert!(parse_batch(r#"{"ids": "doc1"}"#).is_err());
        assert!(parse_batch(r#"{"ids": [1]}"#).is_err());
        assert!(parse_batch(r#"{"ids": ["a"], "embeddings": [["x"]]}"#).is_err());
        assert!(parse_batch("not json").is_err());
    }

    #[test]
    fn test_parse_filters_and_include() {
        assert!(parse_where(None).unwrap().is_none());
        assert!(parse_where(Some(r#"{"source": "notion"}"#)).unwrap().is_some());
        assert!(parse_where_document(Some(r#"{"$contains": "doc"}"#)).unwrap().is_some());
        let include = parse_include(Some(&["documents".to_string(), " distances".to_string()])).unwrap();
        assert_eq!(include, Some(vec![Include::Documents, Include::Distances]));
        assert!(parse_include(Some(&["scores".to_string()])).is_err());
    }
}
