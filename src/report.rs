use crate::scheduler::Plan;
use crate::time::Duration;
use serde::Serialize;
use std::fmt::Write as _;

/// Bilan d'une transition de période.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub next_period_start: Duration,
    pub assigned: usize,
    pub redirected: usize,
    pub carried_over: usize,
    pub placed_on_leave: Vec<String>,
}

impl RunReport {
    pub fn from_plan(plan: &Plan) -> Self {
        Self {
            next_period_start: plan.next_start,
            assigned: plan.assigned,
            redirected: plan.redirected,
            carried_over: plan.carried_over,
            placed_on_leave: plan.placed_on_leave.clone(),
        }
    }
}

/// Permet de customiser le rendu du bilan (texte, JSON, etc.).
pub trait ReportRenderer {
    fn render(&self, report: &RunReport) -> anyhow::Result<String>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TextReport;

impl ReportRenderer for TextReport {
    fn render(&self, report: &RunReport) -> anyhow::Result<String> {
        let mut out = String::new();
        writeln!(out, "Period starting {}", report.next_period_start)?;
        writeln!(out, "  assigned:     {}", report.assigned)?;
        writeln!(out, "  redirected:   {}", report.redirected)?;
        writeln!(out, "  carried over: {}", report.carried_over)?;
        if !report.placed_on_leave.is_empty() {
            writeln!(out, "  weekly leave: {}", report.placed_on_leave.join(", "))?;
        }
        Ok(out)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonReport;

impl ReportRenderer for JsonReport {
    fn render(&self, report: &RunReport) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}
