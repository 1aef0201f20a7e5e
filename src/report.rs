//! Build report: one entry per unit and scale.

use std::path::PathBuf;

use serde::Serialize;

/// What happened to a unit at one scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitStatus {
    Written,
    /// Output already newer than every input.
    Fresh,
    /// Template has no purchase icon.
    Skipped,
    Failed,
    /// The `{scale}x` directory does not exist.
    MissingScale,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitReport {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,
    pub status: UnitStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
}

/// Outcomes for one input table.
#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub table: PathBuf,
    pub units: Vec<UnitReport>,
}

impl TableReport {
    pub fn new(table: PathBuf) -> Self {
        Self {
            table,
            units: Vec::new(),
        }
    }

    pub fn count(&self, status: UnitStatus) -> usize {
        self.units.iter().filter(|u| u.status == status).count()
    }
}

/// Outcomes for a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub tables: Vec<TableReport>,
}

impl BatchReport {
    pub fn count(&self, status: UnitStatus) -> usize {
        self.tables.iter().map(|t| t.count(status)).sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: &str, status: UnitStatus) -> UnitReport {
        UnitReport {
            id: id.to_string(),
            scale: Some(1),
            status,
            path: None,
            messages: vec![],
        }
    }

    #[test]
    fn test_counts_across_tables() {
        let mut a = TableReport::new(PathBuf::from("a.csv"));
        a.units.push(unit("x", UnitStatus::Written));
        a.units.push(unit("y", UnitStatus::Failed));
        let mut b = TableReport::new(PathBuf::from("b.csv"));
        b.units.push(unit("z", UnitStatus::Written));

        let report = BatchReport { tables: vec![a, b] };
        assert_eq!(report.count(UnitStatus::Written), 2);
        assert_eq!(report.count(UnitStatus::Failed), 1);
        assert_eq!(report.count(UnitStatus::Fresh), 0);
    }

    #[test]
    fn test_json_uses_kebab_case_status() {
        let mut table = TableReport::new(PathBuf::from("units.csv"));
        table.units.push(unit("x", UnitStatus::MissingScale));
        let report = BatchReport { tables: vec![table] };

        let json = report.to_json().unwrap();
        assert!(json.contains("\"missing-scale\""));
        assert!(!json.contains("messages"));
    }
}
