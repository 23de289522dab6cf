use std::collections::BTreeSet;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::error::Result;
use crate::flattener::flatten_into;
use crate::models::Row;
use crate::period;

/// A data entry that could not be read or parsed. Reported as a warning.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryError {
    pub name: String,
    pub message: String,
}

/// Everything gathered from one archive walk.
#[derive(Debug, Default)]
pub struct Extraction {
    pub rows: Vec<Row>,
    pub months: BTreeSet<String>,
    pub errors: Vec<EntryError>,
    pub entries_read: usize,
    pub entries_skipped: usize,
}

impl Extraction {
    /// Fold another partial extraction into this one. Months are a set union;
    /// rows and errors are appended, so each source keeps its internal order.
    pub fn merge(&mut self, other: Extraction) {
        self.rows.extend(other.rows);
        self.months.extend(other.months);
        self.errors.extend(other.errors);
        self.entries_read += other.entries_read;
        self.entries_skipped += other.entries_skipped;
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Flatten one parsed document tagged with `month`.
    pub fn add_document(&mut self, document: &Value, month: &str) {
        self.months.insert(month.to_string());
        let Some(docdata) = document
            .get("data")
            .and_then(|data| data.get("docdata"))
            .and_then(Value::as_object)
        else {
            return;
        };
        for (category, entries) in docdata {
            let Some(records) = entries.as_array() else {
                continue;
            };
            for record in records.iter().filter_map(Value::as_object) {
                flatten_into(category, record, month, &mut self.rows);
            }
        }
    }
}

/// Whether an archive entry holds a period document worth parsing.
pub fn is_data_entry(name: &str) -> bool {
    let lower = name.to_lowercase();
    !name.ends_with('/') && lower.ends_with(".json") && !lower.contains("summary")
}

pub fn parse_document(bytes: &[u8]) -> Result<Value> {
    Ok(serde_json::from_slice(bytes)?)
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
) -> std::result::Result<Vec<u8>, String> {
    let mut file = archive.by_index(index).map_err(|e| e.to_string())?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| e.to_string())?;
    Ok(bytes)
}

/// Walk every entry of a ZIP archive. Only an unreadable container is an
/// error; a bad entry is recorded in [`Extraction::errors`] and skipped.
pub fn walk_archive<R: Read + Seek>(reader: R) -> Result<Extraction> {
    let mut archive = ZipArchive::new(reader)?;
    let mut extraction = Extraction::default();

    for index in 0..archive.len() {
        let name = archive
            .name_for_index(index)
            .map(str::to_string)
            .unwrap_or_else(|| format!("<entry {index}>"));

        if !is_data_entry(&name) {
            debug!(entry = %name, "skipping non-data entry");
            extraction.entries_skipped += 1;
            continue;
        }

        let parsed = read_entry(&mut archive, index)
            .and_then(|bytes| parse_document(&bytes).map_err(|e| e.to_string()));
        match parsed {
            Ok(document) => {
                let month = period::tag(&name);
                let before = extraction.rows.len();
                extraction.add_document(&document, &month);
                extraction.entries_read += 1;
                debug!(
                    entry = %name,
                    month = %month,
                    rows = extraction.rows.len() - before,
                    "flattened entry"
                );
            }
            Err(message) => {
                warn!(entry = %name, error = %message, "failed to process entry");
                extraction.errors.push(EntryError { name, message });
            }
        }
    }

    info!(
        rows = extraction.rows.len(),
        months = extraction.months.len(),
        errors = extraction.errors.len(),
        "archive walk complete"
    );
    Ok(extraction)
}

pub fn walk(bytes: &[u8]) -> Result<Extraction> {
    walk_archive(Cursor::new(bytes))
}

pub fn walk_path(path: &Path) -> Result<Extraction> {
    let file = std::fs::File::open(path)?;
    walk_archive(std::io::BufReader::new(file))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;

    use zip::write::SimpleFileOptions;

    use crate::error::GstError;
    use crate::models::RecordShape;

    pub(crate) fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(body).unwrap();
            }
        }
        writer.finish().unwrap().into_inner()
    }

    pub(crate) const SAMPLE_DOC: &str = r#"{
        "data": {
            "docdata": {
                "cdnr": [
                    {"ctin": "27AAAAA0000A1Z5", "trdnm": "ACME",
                     "nt": [{"ntnum": "CN-1", "items": [{"txval": 100, "igst": 18}]}]}
                ],
                "b2b": [
                    {"ctin": "29BBBBB1111B1Z1", "trdnm": "Globex",
                     "inv": [{"inum": "INV-1", "val": 1180, "items": [{"txval": 1000, "sgst": 90, "cgst": 90}]}]}
                ]
            }
        }
    }"#;

    #[test]
    fn test_is_data_entry() {
        assert!(is_data_entry("A_202401.json"));
        assert!(is_data_entry("dir/B_202401.JSON"));
        assert!(!is_data_entry("dir/"));
        assert!(!is_data_entry("notes.txt"));
        assert!(!is_data_entry("GSTR2B_Summary_202401.json"));
        assert!(!is_data_entry("SUMMARY.json"));
    }

    #[test]
    fn test_parse_document_reports_json_errors() {
        let err = parse_document(b"{ broken").unwrap_err();
        assert!(matches!(err, GstError::Json(_)));
        assert!(parse_document(SAMPLE_DOC.as_bytes()).unwrap().get("data").is_some());
    }

    #[test]
    fn test_walk_single_document() {
        let bytes = zip_bytes(&[("A_202401.json", SAMPLE_DOC.as_bytes())]);
        let extraction = walk(&bytes).unwrap();
        assert_eq!(extraction.rows.len(), 2);
        assert!(extraction.rows.iter().all(|r| r.month == "20-2401"));
        assert_eq!(extraction.months.len(), 1);
        assert!(extraction.errors.is_empty());
        assert_eq!(extraction.entries_read, 1);

        let shapes: Vec<(&str, RecordShape)> = extraction
            .rows
            .iter()
            .map(|r| (r.category.as_str(), r.shape()))
            .collect();
        assert!(shapes.contains(&("cdnr", RecordShape::Note)));
        assert!(shapes.contains(&("b2b", RecordShape::Invoice)));
    }

    #[test]
    fn test_walk_isolates_bad_entries() {
        let bytes = zip_bytes(&[
            ("broken_202401.json", b"{ not json".as_slice()),
            ("latin1_202401.json", [0xffu8, 0xfe, 0x7b].as_slice()),
            ("good_202402.json", SAMPLE_DOC.as_bytes()),
        ]);
        let extraction = walk(&bytes).unwrap();
        assert_eq!(extraction.errors.len(), 2);
        assert_eq!(extraction.errors[0].name, "broken_202401.json");
        assert!(extraction.errors[1].message.starts_with("JSON error"));
        assert_eq!(extraction.rows.len(), 2);
        // Failed entries contribute no month.
        assert_eq!(extraction.months, BTreeSet::from(["20-2402".to_string()]));
    }

    #[test]
    fn test_walk_skips_non_data_entries() {
        let bytes = zip_bytes(&[
            ("reports/", b"".as_slice()),
            ("readme.txt", b"hello".as_slice()),
            ("GSTR2B_summary_202401.json", SAMPLE_DOC.as_bytes()),
            ("GSTR2B_202401.json", SAMPLE_DOC.as_bytes()),
        ]);
        let extraction = walk(&bytes).unwrap();
        assert_eq!(extraction.entries_skipped, 3);
        assert_eq!(extraction.entries_read, 1);
        assert_eq!(extraction.rows.len(), 2);
    }

    #[test]
    fn test_walk_tolerates_unexpected_document_shapes() {
        let bytes = zip_bytes(&[
            ("a_202401.json", br#"{"data": {}}"#.as_slice()),
            ("b_202402.json", br#"[1, 2, 3]"#.as_slice()),
            ("c_202403.json", br#"{"data": {"docdata": {"b2b": [7, "x", {"inv": []}], "isd": {}}}}"#.as_slice()),
        ]);
        let extraction = walk(&bytes).unwrap();
        assert!(extraction.is_empty());
        assert!(extraction.errors.is_empty());
        assert_eq!(extraction.months.len(), 3);
    }

    #[test]
    fn test_walk_rejects_non_archive() {
        assert!(walk(b"definitely not a zip").is_err());
    }

    #[test]
    fn test_merge_unions_months_and_appends_rows() {
        let first = walk(&zip_bytes(&[("a_202401.json", SAMPLE_DOC.as_bytes())])).unwrap();
        let second = walk(&zip_bytes(&[
            ("b_202401.json", SAMPLE_DOC.as_bytes()),
            ("c_202402.json", b"oops".as_slice()),
        ]))
        .unwrap();
        let mut merged = Extraction::default();
        merged.merge(first);
        merged.merge(second);
        assert_eq!(merged.rows.len(), 4);
        assert_eq!(merged.months.len(), 1);
        assert_eq!(merged.errors.len(), 1);
        assert_eq!(merged.entries_read, 2);
    }

    #[test]
    fn test_walk_path_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("returns.zip");
        std::fs::write(&path, zip_bytes(&[("a_202312.json", SAMPLE_DOC.as_bytes())])).unwrap();
        let extraction = walk_path(&path).unwrap();
        assert_eq!(extraction.rows.len(), 2);
        assert!(extraction.months.contains("20-2312"));
    }
}
