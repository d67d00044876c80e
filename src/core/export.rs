use crate::core::{ExportFile, ExportKind, GroupingResult};
use crate::utils::error::{EventError, Result};

/// UTF-8 byte-order mark so spreadsheet tools pick the right encoding.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const CSV_HEADER: [&str; 2] = ["Group", "Member"];

pub fn format(result: &GroupingResult, kind: ExportKind) -> Result<Vec<u8>> {
    match kind {
        ExportKind::Text => Ok(format_text(result).into_bytes()),
        ExportKind::Csv => format_csv(result),
    }
}

/// `Label:` then `- name` per member; blank line between groups.
pub fn format_text(result: &GroupingResult) -> String {
    result
        .groups
        .iter()
        .map(|g| {
            let mut block = format!("{}:", g.label);
            for member in &g.members {
                block.push_str("\n- ");
                block.push_str(&member.name);
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn format_csv(result: &GroupingResult) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());
    writer.write_record(CSV_HEADER)?;
    for (label, name) in result.pairs() {
        writer.write_record([label, name])?;
    }
    writer
        .into_inner()
        .map_err(|e| EventError::IoError(std::io::Error::new(e.error().kind(), e.error().to_string())))
}

/// Format and attach the filename and MIME type for download.
pub fn export_file(
    result: &GroupingResult,
    kind: ExportKind,
    file_name: Option<&str>,
) -> Result<ExportFile> {
    let bytes = format(result, kind)?;
    Ok(ExportFile {
        file_name: file_name.unwrap_or(kind.default_file_name()).to_string(),
        content_type: kind.content_type(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Group, Participant};

    fn sample_result() -> GroupingResult {
        GroupingResult {
            groups: vec![
                Group {
                    id: "g1".into(),
                    label: "Group 1".into(),
                    members: vec![
                        Participant::with_id("1", "陳小明"),
                        Participant::with_id("2", "Lee, Ann"),
                    ],
                },
                Group {
                    id: "g2".into(),
                    label: "Group 2".into(),
                    members: vec![Participant::with_id("3", "Bob \"B\" Jones")],
                },
            ],
        }
    }

    fn parse_pairs(bytes: &[u8]) -> Vec<(String, String)> {
        let body = bytes.strip_prefix(UTF8_BOM).expect("missing BOM");
        let mut reader = csv::Reader::from_reader(body);
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADER.to_vec());
        reader
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[0].to_string(), r[1].to_string())
            })
            .collect()
    }

    #[test]
    fn test_text_layout() {
        let text = format_text(&sample_result());
        assert_eq!(
            text,
            "Group 1:\n- 陳小明\n- Lee, Ann\n\nGroup 2:\n- Bob \"B\" Jones"
        );
    }

    #[test]
    fn test_csv_round_trip() {
        let result = sample_result();
        let bytes = format(&result, ExportKind::Csv).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));

        let expected: Vec<(String, String)> = result
            .pairs()
            .map(|(g, m)| (g.to_string(), m.to_string()))
            .collect();
        assert_eq!(parse_pairs(&bytes), expected);
    }

    #[test]
    fn test_empty_result() {
        let empty = GroupingResult::default();
        assert!(format(&empty, ExportKind::Text).unwrap().is_empty());

        let csv = format(&empty, ExportKind::Csv).unwrap();
        assert_eq!(csv, b"\xEF\xBB\xBFGroup,Member\n".to_vec());
        assert!(parse_pairs(&csv).is_empty());
    }

    #[test]
    fn test_export_file_metadata() {
        let file = export_file(&sample_result(), ExportKind::Csv, None).unwrap();
        assert_eq!(file.file_name, "grouping-results.csv");
        assert_eq!(file.content_type, "text/csv;charset=utf-8");

        let file = export_file(&sample_result(), ExportKind::Text, Some("teams.txt")).unwrap();
        assert_eq!(file.file_name, "teams.txt");
        assert_eq!(file.content_type, "text/plain;charset=utf-8");
    }
}
