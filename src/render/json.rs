//! JSON rendering for outlines.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{Error, Result};
use crate::model::StructuredOutline;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with four-space indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert an outline to JSON.
///
/// Non-ASCII text is written as-is rather than `\u` escaped.
pub fn to_json(outline: &StructuredOutline, format: JsonFormat) -> Result<String> {
    let bytes = match format {
        JsonFormat::Pretty => {
            let mut buf = Vec::new();
            let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
            outline
                .serialize(&mut ser)
                .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;
            buf
        }
        JsonFormat::Compact => serde_json::to_vec(outline)
            .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?,
    };

    String::from_utf8(bytes).map_err(|e| Error::Render(e.to_string()))
}

/// Write an outline as JSON to `path`, replacing any existing file.
pub fn write_json<P: AsRef<Path>>(
    outline: &StructuredOutline,
    path: P,
    format: JsonFormat,
) -> Result<()> {
    let json = to_json(outline, format)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HeadingLevel, OutlineEntry};

    fn sample() -> StructuredOutline {
        StructuredOutline {
            title: "Rapport annuel".to_string(),
            outline: vec![OutlineEntry {
                level: HeadingLevel::H1,
                text: "Présentation".to_string(),
                page: 2,
            }],
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        let expected = r#"{
    "title": "Rapport annuel",
    "outline": [
        {
            "level": "H1",
            "text": "Présentation",
            "page": 2
        }
    ]
}"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with(r#"{"title":"Rapport annuel","outline":[{"level":"H1""#));
    }

    #[test]
    fn test_empty_outline() {
        let json = to_json(&StructuredOutline::default(), JsonFormat::Pretty).unwrap();
        assert_eq!(json, "{\n    \"title\": \"\",\n    \"outline\": []\n}");
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&sample(), &path, JsonFormat::Pretty).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Présentation"));
    }
}
