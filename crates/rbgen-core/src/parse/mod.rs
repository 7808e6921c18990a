pub mod document;

use crate::error::ParseError;
use document::ModelDocument;

/// Parse a model snapshot from YAML.
pub fn from_yaml(input: &str) -> Result<ModelDocument, ParseError> {
    let doc: ModelDocument = serde_yaml_ng::from_str(input)?;
    validate_root(&doc)?;
    Ok(doc)
}

/// Parse a model snapshot from JSON.
pub fn from_json(input: &str) -> Result<ModelDocument, ParseError> {
    let doc: ModelDocument = serde_json::from_str(input)?;
    validate_root(&doc)?;
    Ok(doc)
}

fn validate_root(doc: &ModelDocument) -> Result<(), ParseError> {
    if doc.name.trim().is_empty() {
        return Err(ParseError::MissingField("name".to_string()));
    }
    Ok(())
}
