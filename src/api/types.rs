use serde::{Deserialize, Serialize};

/// One entry of the backend file listing. The wire shape is a two-element
/// array `[display name, filesystem path]`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String)")]
pub struct FileEntry {
    pub name: String,
    pub path: String,
}

impl From<(String, String)> for FileEntry {
    fn from((name, path): (String, String)) -> Self {
        Self { name, path }
    }
}

#[derive(Debug, Serialize)]
pub struct ClonePayload<'a> {
    pub url: &'a str,
}

/// `dir` is serialized as an explicit `null` when the display name did not
/// resolve to a path; the backend owns that case.
#[derive(Debug, Serialize)]
pub struct ShowCodePayload<'a> {
    pub dir: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct ChatPayload<'a> {
    pub question: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TreeResponse {
    pub tree: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SourceResponse {
    pub src: String,
}

#[derive(Debug, Deserialize)]
pub struct FilesResponse {
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CodeResponse {
    #[serde(rename = "fileText")]
    pub file_text: String,
}

/// Successful chat exchange: the answer plus its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub answer: String,
    pub source: String,
}

/// Failure body shape shared by backend error responses.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_entry_decodes_from_pair() {
        let entries: Vec<FileEntry> =
            serde_json::from_value(json!([["a.py", "/repo/a.py"], ["b.py", "/repo/b.py"]]))
                .unwrap();
        assert_eq!(entries[1].name, "b.py");
        assert_eq!(entries[1].path, "/repo/b.py");
    }

    #[test]
    fn test_show_code_payload_serializes_missing_path_as_null() {
        let payload = serde_json::to_value(ShowCodePayload { dir: None }).unwrap();
        assert_eq!(payload, json!({ "dir": null }));

        let payload = serde_json::to_value(ShowCodePayload {
            dir: Some("/repo/b.py"),
        })
        .unwrap();
        assert_eq!(payload, json!({ "dir": "/repo/b.py" }));
    }

    #[test]
    fn test_chat_reply_requires_both_fields() {
        let ok: ChatReply = serde_json::from_value(json!({"answer": "x", "source": "y"})).unwrap();
        assert_eq!(ok.answer, "x");

        let missing = serde_json::from_value::<ChatReply>(json!({"answer": "x"}));
        assert!(missing.is_err());
    }
}
