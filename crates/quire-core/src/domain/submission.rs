//! Submission model: document source plus positionally indexed attachments.
//!
//! Attachments are not a counted list. They are read from form fields
//! `image{N}type`, `image{N}data`, `image{N}name` for N = 1, 2, ... and the
//! first position without a type ends the sequence. Renaming or reordering one
//! attachment therefore truncates everything after it; callers rely on this.
//!
//! The document source is kept as raw bytes. It goes to the renderer exactly as
//! received, whatever its encoding.

use std::collections::HashMap;

use bytes::Bytes;

/// AttachmentSpec は呼び出し側が渡した添付 1 件（デコード前）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentSpec {
    /// リクエスト内の位置（1 始まり）
    pub position: usize,
    pub name: String,
    /// 宣言された型。ファイル拡張子として使う（`png`, `jpeg` など）
    pub kind: String,
    /// URL-safe base64 のペイロード。欠落または空なら `None`
    pub data: Option<String>,
}

impl AttachmentSpec {
    /// スクラッチ領域内のファイル名: `<name>.<kind>`
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.name, self.kind)
    }
}

/// Submission は 1 ジョブ分の入力（ソースと添付）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    pub source: Bytes,
    pub attachments: Vec<AttachmentSpec>,
}

impl Submission {
    pub const SOURCE_FIELD: &'static str = "src";

    pub fn new(source: impl Into<Bytes>, attachments: Vec<AttachmentSpec>) -> Self {
        Self {
            source: source.into(),
            attachments,
        }
    }

    /// from_fields はフラットなフォームフィールドから Submission を組み立てる
    ///
    /// `src` が無い場合は空の文書として扱い、結果はレンダラーに任せる。
    pub fn from_fields(fields: &HashMap<String, String>) -> Self {
        let source = fields
            .get(Self::SOURCE_FIELD)
            .map(|src| Bytes::copy_from_slice(src.as_bytes()))
            .unwrap_or_default();
        Self {
            source,
            attachments: collect_attachments(fields),
        }
    }
}

/// collect_attachments は N = 1 から `image{N}*` を読み、type が欠けた位置で止まる
pub fn collect_attachments(fields: &HashMap<String, String>) -> Vec<AttachmentSpec> {
    let non_empty = |key: String| fields.get(&key).filter(|v| !v.is_empty()).cloned();

    let mut attachments = Vec::new();
    for position in 1.. {
        let Some(kind) = non_empty(format!("image{position}type")) else {
            break;
        };
        let name = non_empty(format!("image{position}name"))
            .unwrap_or_else(|| format!("image-{position}"));
        let data = non_empty(format!("image{position}data"));
        attachments.push(AttachmentSpec {
            position,
            name,
            kind,
            data,
        });
    }
    attachments
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn scan_stops_at_first_missing_type() {
        let f = fields(&[
            ("image1type", "png"),
            ("image1data", "AAAA"),
            ("image2type", "jpeg"),
            ("image2data", "BBBB"),
            // position 3 has data but no type: the sequence ends here
            ("image3data", "CCCC"),
            ("image4type", "png"),
            ("image4data", "DDDD"),
        ]);

        let attachments = collect_attachments(&f);
        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0].position, 1);
        assert_eq!(attachments[1].position, 2);
        assert_eq!(attachments[1].kind, "jpeg");
    }

    #[rstest]
    #[case::absent(None, "image-1")]
    #[case::empty(Some(""), "image-1")]
    #[case::given(Some("figure"), "figure")]
    fn name_defaults_to_position(#[case] name: Option<&str>, #[case] expected: &str) {
        let mut f = fields(&[("image1type", "png"), ("image1data", "AAAA")]);
        if let Some(name) = name {
            f.insert("image1name".to_string(), name.to_string());
        }

        let attachments = collect_attachments(&f);
        assert_eq!(attachments[0].name, expected);
        assert_eq!(attachments[0].file_name(), format!("{expected}.png"));
    }

    #[test]
    fn empty_type_terminates_like_absent_type() {
        let f = fields(&[("image1type", ""), ("image2type", "png")]);
        assert!(collect_attachments(&f).is_empty());
    }

    #[test]
    fn missing_data_is_kept_for_materializer_to_report() {
        let f = fields(&[("image1type", "png")]);
        let attachments = collect_attachments(&f);
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].data, None);
    }

    #[test]
    fn from_fields_reads_source() {
        let f = fields(&[("src", "\\doc{A}"), ("image1type", "png"), ("image1data", "AA==")]);
        let submission = Submission::from_fields(&f);
        assert_eq!(&submission.source[..], b"\\doc{A}");
        assert_eq!(submission.attachments.len(), 1);
    }

    #[test]
    fn source_bytes_are_kept_verbatim() {
        // Latin-1 "café": not UTF-8, must not be rewritten.
        let submission = Submission::new(&b"caf\xe9"[..], vec![]);
        assert_eq!(&submission.source[..], [0x63, 0x61, 0x66, 0xe9]);
    }

    #[test]
    fn from_fields_without_source_is_empty_document() {
        let submission = Submission::from_fields(&HashMap::new());
        assert_eq!(submission, Submission::default());
    }
}
