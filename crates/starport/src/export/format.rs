//! Rendering item lists as JSON or CSV.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StarsError};
use crate::github::RepoItem;

/// CSV header row. Uses the API's field names, not the in-memory ones.
pub const CSV_HEADER: [&str; 8] = [
    "id",
    "full_name",
    "url",
    "description",
    "stars",
    "language",
    "owner_login",
    "owner_url",
];

/// Export file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// Artifact name for this format; one file per format, overwritten on export.
    pub fn file_name(self) -> String {
        format!("stars.{}", self.extension())
    }

    /// MIME type, for sinks that hand the payload to a client.
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = StarsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(StarsError::invalid_input(format!(
                "unsupported export format '{other}' (expected json or csv)"
            ))),
        }
    }
}

/// JSON layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonStyle {
    #[default]
    Pretty,
    Compact,
}

/// Render items as a JSON array followed by a newline.
pub fn to_json(items: &[RepoItem], style: JsonStyle) -> Result<Vec<u8>> {
    let mut out = match style {
        JsonStyle::Pretty => serde_json::to_vec_pretty(items),
        JsonStyle::Compact => serde_json::to_vec(items),
    }
    .map_err(|e| StarsError::serialize(e.to_string()))?;
    out.push(b'\n');
    Ok(out)
}

/// Render items as CSV with a fixed header row.
///
/// Each run of line breaks inside a field becomes a single space, so every item is exactly
/// one line. Fields containing a comma or a double quote are quoted with
/// inner quotes doubled; absent values are empty fields.
pub fn to_csv(items: &[RepoItem]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| StarsError::serialize(e.to_string()))?;

    for item in items {
        writer
            .write_record([
                item.id.to_string(),
                flatten_line_breaks(&item.full_name),
                flatten_line_breaks(&item.url),
                item.description
                    .as_deref()
                    .map(flatten_line_breaks)
                    .unwrap_or_default(),
                item.star_count.to_string(),
                item.primary_language
                    .as_deref()
                    .map(flatten_line_breaks)
                    .unwrap_or_default(),
                flatten_line_breaks(&item.owner.login),
                flatten_line_breaks(&item.owner.profile_url),
            ])
            .map_err(|e| StarsError::serialize(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| StarsError::serialize(e.to_string()))
}

/// Render items in `format`.
pub fn serialize(items: &[RepoItem], format: ExportFormat, style: JsonStyle) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Json => to_json(items, style),
        ExportFormat::Csv => to_csv(items),
    }
}

/// Collapse each run of line breaks (`\r\n`, `\r` or `\n`) into one space.
fn flatten_line_breaks(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut in_break = false;
    for c in field.chars() {
        if c == '\r' || c == '\n' {
            if !in_break {
                out.push(' ');
                in_break = true;
            }
        } else {
            out.push(c);
            in_break = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::RepoOwner;

    fn item(id: u64, description: Option<&str>) -> RepoItem {
        RepoItem {
            id,
            full_name: format!("owner/repo-{id}"),
            url: format!("https://github.com/owner/repo-{id}"),
            description: description.map(String::from),
            star_count: 42,
            primary_language: None,
            owner: RepoOwner {
                login: "owner".to_string(),
                avatar_url: "https://avatars.githubusercontent.com/u/1".to_string(),
                profile_url: "https://github.com/owner".to_string(),
            },
        }
    }

    fn csv_string(items: &[RepoItem]) -> String {
        String::from_utf8(to_csv(items).unwrap()).unwrap()
    }

    #[test]
    fn test_export_format_parse_and_display() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!(" CSV ".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!(matches!(
            "yaml".parse::<ExportFormat>(),
            Err(StarsError::InvalidInput { .. })
        ));
        assert_eq!(ExportFormat::Csv.to_string(), "csv");
        assert_eq!(ExportFormat::default(), ExportFormat::Json);
    }

    #[test]
    fn test_export_format_file_names() {
        assert_eq!(ExportFormat::Json.file_name(), "stars.json");
        assert_eq!(ExportFormat::Csv.file_name(), "stars.csv");
    }

    #[test]
    fn test_csv_header_and_line_count() {
        let items = vec![item(1, Some("one")), item(2, None), item(3, Some("three"))];
        let out = csv_string(&items);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), items.len() + 1);
        assert_eq!(
            lines[0],
            "id,full_name,url,description,stars,language,owner_login,owner_url"
        );
        assert_eq!(
            lines[1],
            "1,owner/repo-1,https://github.com/owner/repo-1,one,42,,owner,https://github.com/owner"
        );
        assert!(out.ends_with('\n'));
        assert!(!out.ends_with("\n\n"));
    }

    #[test]
    fn test_csv_empty_list_is_header_only() {
        assert_eq!(
            csv_string(&[]),
            "id,full_name,url,description,stars,language,owner_login,owner_url\n"
        );
    }

    #[test]
    fn test_csv_quotes_commas_and_doubles_quotes() {
        let out = csv_string(&[item(1, Some(r#"He said "hi", ok"#))]);
        assert!(out.contains(r#","He said ""hi"", ok","#), "got: {out}");
    }

    #[test]
    fn test_csv_quotes_lone_quote_without_comma() {
        let out = csv_string(&[item(1, Some(r#"5" floppy"#))]);
        assert!(out.contains(r#","5"" floppy","#), "got: {out}");
    }

    #[test]
    fn test_csv_leaves_plain_fields_unquoted() {
        let out = csv_string(&[item(1, Some("plain text; with semicolon"))]);
        assert!(out.contains(",plain text; with semicolon,"), "got: {out}");
    }

    #[test]
    fn test_csv_collapses_line_breaks() {
        let out = csv_string(&[item(1, Some("a\r\nb\rc\nd"))]);
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains(",a b c d,"), "got: {out}");
    }

    #[test]
    fn test_csv_blank_line_in_description_is_one_space() {
        let out = csv_string(&[item(1, Some("a\n\nb"))]);
        assert!(out.contains(",a b,"), "got: {out}");
    }

    #[test]
    fn test_csv_line_break_and_comma_still_quoted() {
        let out = csv_string(&[item(1, Some("first,\nsecond"))]);
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains(r#","first, second","#), "got: {out}");
    }

    #[test]
    fn test_csv_absent_values_are_empty_not_null() {
        let out = csv_string(&[item(1, None)]);
        assert!(!out.contains("null"));
        assert!(out.contains("https://github.com/owner/repo-1,,42,,owner"));
    }

    #[test]
    fn test_csv_preserves_input_order() {
        let out = csv_string(&[item(3, None), item(1, None), item(2, None)]);
        let ids: Vec<&str> = out
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap())
            .collect();
        assert_eq!(ids, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_json_pretty_and_compact() {
        let items = vec![item(1, Some("one"))];

        let pretty = String::from_utf8(to_json(&items, JsonStyle::Pretty).unwrap()).unwrap();
        let compact = String::from_utf8(to_json(&items, JsonStyle::Compact).unwrap()).unwrap();

        assert!(pretty.contains("\n  {"));
        assert_eq!(compact.lines().count(), 1);
        assert!(compact.ends_with('\n'));

        let parsed: Vec<RepoItem> = serde_json::from_str(&compact).unwrap();
        assert_eq!(parsed, items);
        let parsed: Vec<RepoItem> = serde_json::from_str(&pretty).unwrap();
        assert_eq!(parsed, items);
    }

    #[test]
    fn test_json_empty_list() {
        assert_eq!(to_json(&[], JsonStyle::Compact).unwrap(), b"[]\n".to_vec());
    }

    #[test]
    fn test_serialize_dispatches_on_format() {
        let items = vec![item(1, None)];
        assert!(
            serialize(&items, ExportFormat::Csv, JsonStyle::Pretty)
                .unwrap()
                .starts_with(b"id,full_name")
        );
        assert!(
            serialize(&items, ExportFormat::Json, JsonStyle::Compact)
                .unwrap()
                .starts_with(b"[{")
        );
    }

    #[test]
    fn test_flatten_line_breaks() {
        assert_eq!(flatten_line_breaks("a\r\n\r\nb"), "a b");
        assert_eq!(flatten_line_breaks("a\n\nb\rc"), "a b c");
        assert_eq!(flatten_line_breaks("no breaks"), "no breaks");
        assert_eq!(flatten_line_breaks("\n"), " ");
    }
}
