// Copyright (c) 2026 Contract Checker Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Terminal rendering: contract summary and the rule table.

use checker_core::application::ResolutionReport;
use checker_core::contract::Contract;
use colored::Colorize;

use super::{rows, RuleRow, HEADERS};

pub const EMPTY_OUTPUT: &str = "No matching criteria -> empty output";

const SEPARATOR: &str = "----------------------------------------";

pub fn contract_summary(contract: &Contract) -> Vec<String> {
    let mut lines = vec![format!("Contract: {}", contract.dn), String::new(), "Consumers:".to_string()];
    lines.extend(contract.consumers.iter().map(|c| format!("  {}", c)));
    lines.push(SEPARATOR.to_string());
    lines.push("Providers:".to_string());
    lines.extend(contract.providers.iter().map(|p| format!("  {}", p)));
    lines.push(SEPARATOR.to_string());
    lines.push("Subjects:".to_string());
    for (subject, filters) in &contract.subjects {
        lines.push(format!("  {}: {}", subject, filters.join(", ")));
    }
    lines.push(SEPARATOR.to_string());
    lines.push("Contract inheritance is omitted".to_string());
    lines
}

/// Bordered table. Returns the border, header and row lines without styling.
pub struct Table {
    widths: [usize; HEADERS.len()],
}

impl Table {
    pub fn fit(rows: &[RuleRow]) -> Self {
        let mut widths = HEADERS.map(str::len);
        for row in rows {
            for (width, cell) in widths.iter_mut().zip(row.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }
        Self { widths }
    }

    pub fn border(&self) -> String {
        let segments: Vec<String> = self.widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("+{}+", segments.join("+"))
    }

    pub fn line<S: AsRef<str>>(&self, cells: &[S]) -> String {
        let segments: Vec<String> = cells
            .iter()
            .zip(self.widths)
            .map(|(cell, width)| format!(" {:<width$} ", cell.as_ref(), width = width))
            .collect();
        format!("|{}|", segments.join("|"))
    }

    pub fn header(&self) -> String {
        self.line(&HEADERS)
    }
}

pub fn print_report(report: &ResolutionReport) {
    if report.is_empty() {
        println!("{}", EMPTY_OUTPUT.yellow());
        return;
    }

    if let Some(contract) = &report.contract {
        println!();
        for (idx, line) in contract_summary(contract).into_iter().enumerate() {
            if idx == 0 {
                println!("{}", line.bold());
            } else {
                println!("{}", line);
            }
        }
        println!();
    }

    let rows = rows(report);
    let table = Table::fit(&rows);
    println!("{}", table.border());
    println!("{}", table.header().bold());
    println!("{}", table.border());
    for row in &rows {
        let line = table.line(&row.cells());
        if row.is_deny() {
            println!("{}", line.red());
        } else {
            println!("{}", line);
        }
    }
    println!("{}", table.border());
    println!(
        "{} rules, {} routing domains, {} endpoint groups",
        rows.len(),
        report.routing_domains,
        report.endpoint_groups
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::resolved;

    #[test]
    fn test_columns_fit_widest_cell() {
        let rows = vec![RuleRow::from_resolved(&resolved(
            "4101",
            "uni/tn-A/ap-app/epg-web",
            "uni/tn-A/ap-app/epg-database",
            "A:web",
            "permit",
        ))];
        let table = Table::fit(&rows);
        let header = table.header();
        let row = table.line(&rows[0].cells());

        assert_eq!(header.len(), row.len());
        assert_eq!(table.border().len(), row.len());
        assert!(header.starts_with("| id   | Source    | Destination    |"));
        assert!(row.starts_with("| 4101 | A/app/web | A/app/database |"));
    }

    #[test]
    fn test_contract_summary() {
        let mut contract = Contract::new("uni/tn-A/brc-web");
        contract.consumers.insert("uni/tn-A/ap-app/epg-web".into());
        contract.providers.insert("uni/tn-A/ap-app/epg-db".into());
        contract.subjects.insert(
            "http".into(),
            vec!["uni/tn-common/flt-http".into(), "uni/tn-common/flt-https".into()],
        );

        let lines = contract_summary(&contract);
        assert_eq!(lines[0], "Contract: uni/tn-A/brc-web");
        assert!(lines.contains(&"  uni/tn-A/ap-app/epg-web".to_string()));
        assert!(lines.contains(&"  http: uni/tn-common/flt-http, uni/tn-common/flt-https".to_string()));
    }
}
