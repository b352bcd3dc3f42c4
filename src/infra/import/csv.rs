use std::path::Path;

use anyhow::{Context, Result};

use crate::usecase::ports::driver::RawRow;

/// Loads a tagged raw-row fixture from a CSV file.
///
/// Each record starts with a tag column: `group` records carry the group
/// name in the second field, `item` records carry the cell values in the
/// remaining fields. Records are returned in file order, untrimmed; the
/// table parser owns whitespace handling.
pub fn load_raw_rows(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open fixture: {}", path.display()))?;

    let mut rows = Vec::new();
    for (record_idx, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("failed to parse fixture record {record_idx}"))?;
        let tag = record.get(0).unwrap_or("");
        match tag {
            "group" => {
                let name = record
                    .get(1)
                    .filter(|name| !name.trim().is_empty())
                    .with_context(|| format!("group record {record_idx} has no name"))?;
                rows.push(RawRow::GroupHeader {
                    name: name.to_string(),
                });
            }
            "item" => {
                let cells: Vec<String> =
                    record.iter().skip(1).map(str::to_string).collect();
                rows.push(RawRow::Data { cells });
            }
            other => {
                anyhow::bail!("fixture record {record_idx} has unknown tag '{other}'")
            }
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn load_raw_rows_reads_tagged_records_in_order() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("spec.csv");
        fs::write(
            &path,
            "group,Д\nitem,Грибок 15,-,5\ngroup,ПД\nitem,Болт М6,ГОСТ 7798,12\n",
        )
        .expect("should write fixture");

        let rows = load_raw_rows(&path).expect("fixture should load");

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], RawRow::header("Д"));
        assert_eq!(rows[1], RawRow::data(vec!["Грибок 15", "-", "5"]));
        assert_eq!(rows[2], RawRow::header("ПД"));
    }

    #[test]
    fn load_raw_rows_rejects_unknown_tags() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("bad.csv");
        fs::write(&path, "header,Д\n").expect("should write fixture");

        let err = load_raw_rows(&path).expect_err("unknown tag should fail");

        assert!(err.to_string().contains("unknown tag"), "error: {err}");
    }

    #[test]
    fn load_raw_rows_rejects_unnamed_group() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("bad.csv");
        fs::write(&path, "group, \n").expect("should write fixture");

        let err = load_raw_rows(&path).expect_err("unnamed group should fail");

        assert!(err.to_string().contains("no name"), "error: {err}");
    }
}
