//! CSV output: one `userIdentifier` column, header row, one identifier per row.

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::IdentifierSet;
use crate::error::Result;
use crate::utils::config::Defaults;

/// Temp path next to the output: `<name>.tmp` in the same directory, so the rename is atomic.
pub fn temp_path_for(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| Defaults::OUTPUT_CSV.to_string());
    output
        .parent()
        .unwrap_or(Path::new("."))
        .join(format!("{name}.tmp"))
}

/// Write identifiers (any iterator of strings) as CSV to `output`, via a temp file and rename.
/// Creates missing parent directories. Returns the number of rows written.
pub fn write_identifiers_csv<I, S>(ids: I, output: &Path) -> Result<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let temp = temp_path_for(output);
    let rows = match write_rows(ids, &temp) {
        Ok(n) => n,
        Err(e) => {
            let _ = fs::remove_file(&temp);
            return Err(e);
        }
    };
    fs::rename(&temp, output)?;
    Ok(rows)
}

fn write_rows<I, S>(ids: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([Defaults::CSV_COLUMN])?;
    let mut rows = 0_usize;
    for id in ids {
        writer.write_record([id.as_ref()])?;
        rows += 1;
    }
    writer.flush()?;
    Ok(rows)
}

/// Write the final set sorted (order is not significant, but sorted output diffs cleanly).
pub fn save_to_csv(identifiers: &IdentifierSet, output: &Path) -> Result<usize> {
    let rows = write_identifiers_csv(identifiers.to_sorted_vec(), output)?;
    info!("Data saved to {}", output.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_path_for() {
        assert_eq!(
            temp_path_for(Path::new("/out/ids.csv")),
            PathBuf::from("/out/ids.csv.tmp")
        );
        assert_eq!(
            temp_path_for(Path::new("ids.csv")),
            PathBuf::from("ids.csv.tmp")
        );
    }

    #[test]
    fn test_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("ids.csv");
        let set = IdentifierSet::new();
        set.insert("b2");
        set.insert("a1");
        set.insert("a1");
        let rows = save_to_csv(&set, &out).unwrap();
        assert_eq!(rows, 2);
        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text, "userIdentifier\na1\nb2\n");
        assert!(!temp_path_for(&out).exists());
    }

    #[test]
    fn test_empty_set_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("ids.csv");
        let rows = write_identifiers_csv(Vec::<String>::new(), &out).unwrap();
        assert_eq!(rows, 0);
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "userIdentifier\n");
    }

    #[test]
    fn test_values_needing_quotes_are_quoted() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("ids.csv");
        write_identifiers_csv(["x,y"], &out).unwrap();
        assert_eq!(
            std::fs::read_to_string(&out).unwrap(),
            "userIdentifier\n\"x,y\"\n"
        );
    }
}
