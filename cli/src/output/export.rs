// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Spreadsheet export of the rule table.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use super::{RuleRow, HEADERS};

/// `<pod>_<node>.csv` in the working directory.
pub fn csv_path(pod: u32, node: u32) -> PathBuf {
    PathBuf::from(format!("{}_{}.csv", pod, node))
}

pub fn write_csv(path: &Path, rows: &[RuleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;

    writer.write_record(HEADERS)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::resolved;

    #[test]
    fn test_csv_path() {
        assert_eq!(csv_path(1, 101), PathBuf::from("1_101.csv"));
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1_101.csv");
        let rows = vec![
            RuleRow::from_resolved(&resolved("4101", "uni/tn-A/ap-app/epg-web", "uni/tn-A/ap-app/epg-db", "A:web", "permit")),
            RuleRow::from_resolved(&resolved("4100", "any", "any", "", "deny,log")),
        ];

        write_csv(&path, &rows).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "id,Source,Destination,VRF,Contract,Filter,Action,Prio,Priority,Direction,State");
        assert_eq!(lines[1], "4101,A/app/web,A/app/db,A/default,A/web,5,permit,7,fully_qual,bi-dir,enabled");
        assert!(lines[2].contains("\"deny,log\""));
    }
}
