//! Best-effort parsing of the docking tool's textual report.
//!
//! Vina prints a results table after the search:
//!
//! ```text
//! mode |   affinity | dist from best mode
//!      | (kcal/mol) | rmsd l.b.| rmsd u.b.
//! -----+------------+----------+----------
//!    1         -7.5      0.000      0.000
//! ```

use serde::{Deserialize, Serialize};

/// One predicted binding pose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingMode {
    pub mode: u32,
    /// Predicted affinity in kcal/mol.
    pub affinity: f64,
    pub rmsd_lb: f64,
    pub rmsd_ub: f64,
}

/// Structured view over a successful run's output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DockingReport {
    pub modes: Vec<BindingMode>,
    /// Seed echoed by the tool (`Using random seed: N`).
    pub seed: Option<i64>,
}

impl DockingReport {
    pub fn parse(raw: &str) -> Self {
        let mut report = DockingReport::default();
        let mut in_table = false;

        for line in raw.lines() {
            let trimmed = line.trim();

            if let Some(rest) = trimmed.strip_prefix("Using random seed:") {
                report.seed = rest.trim().parse().ok();
                continue;
            }

            if !in_table {
                if trimmed.starts_with("-----+") {
                    in_table = true;
                }
                continue;
            }

            match parse_row(trimmed) {
                Some(mode) => report.modes.push(mode),
                None if report.modes.is_empty() && trimmed.is_empty() => {}
                None => break,
            }
        }

        report
    }

    /// Lowest (best) affinity across modes.
    pub fn best(&self) -> Option<&BindingMode> {
        self.modes
            .iter()
            .min_by(|a, b| a.affinity.total_cmp(&b.affinity))
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

fn parse_row(line: &str) -> Option<BindingMode> {
    let mut fields = line.split_whitespace();
    let mode = fields.next()?.parse().ok()?;
    let affinity = fields.next()?.parse().ok()?;
    let rmsd_lb = fields.next()?.parse().ok()?;
    let rmsd_ub = fields.next()?.parse().ok()?;
    Some(BindingMode {
        mode,
        affinity,
        rmsd_lb,
        rmsd_ub,
    })
}
