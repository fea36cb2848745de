// src/reports.rs
//
// Reports panel: aggregate counts over a trailing window, summarised into meta
// lines and drawn as two line charts plus one donut.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::{
    models::ReportsEnvelope,
    view::{el, Element},
};

pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 365;
const DAY_CHOICES: [u32; 5] = [7, 14, 30, 60, 90];

pub const BOOKED_CANVAS: &str = "bookedChart";
pub const OPEN_CANVAS: &str = "openChart";
pub const DONUT_CANVAS: &str = "donutChart";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportsData {
    pub labels: Vec<String>,
    pub booked: Vec<u32>,
    pub open: Vec<u32>,
    pub total_slots_per_day: Option<u32>,
}

impl From<ReportsEnvelope> for ReportsData {
    fn from(env: ReportsEnvelope) -> Self {
        Self {
            labels: env.labels,
            booked: env.booked.iter().map(count).collect(),
            open: env.open.iter().map(count).collect(),
            total_slots_per_day: env.total_slots_per_day,
        }
    }
}

/// Numbers and numeric strings count; anything else is zero.
fn count(v: &Value) -> u32 {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n.min(f64::from(u32::MAX)) as u32)
        .unwrap_or(0)
}

/* ============================================================
   Summary
   ============================================================ */

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total_booked: u64,
    pub total_open: u64,
    pub avg_booked: String,
    pub days: u32,
    pub slots_per_day: Option<u32>,
}

impl ReportSummary {
    pub fn compute(data: &ReportsData, days: u32) -> Self {
        let total_booked: u64 = data.booked.iter().map(|&n| u64::from(n)).sum();
        let total_open: u64 = data.open.iter().map(|&n| u64::from(n)).sum();
        let avg_booked = if data.booked.is_empty() {
            "0".to_string()
        } else {
            format!("{:.1}", total_booked as f64 / data.booked.len() as f64)
        };
        Self {
            total_booked,
            total_open,
            avg_booked,
            days,
            slots_per_day: data.total_slots_per_day,
        }
    }

    pub fn meta_lines(&self) -> [String; 3] {
        let slots = self
            .slots_per_day
            .map(|n| n.to_string())
            .unwrap_or_else(|| "—".to_string());
        [
            format!("Total: {} • Avg/day: {}", self.total_booked, self.avg_booked),
            format!("Slots/day: {} • Last {} days", slots, self.days),
            format!("Booked: {} • Open: {}", self.total_booked, self.total_open),
        ]
    }
}

/* ============================================================
   Charts
   ============================================================ */

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartSpec {
    Line {
        title: &'static str,
        labels: Vec<String>,
        data: Vec<u32>,
        begin_at_zero: bool,
        tick_precision: u8,
    },
    Donut {
        labels: [&'static str; 2],
        data: [u64; 2],
        cutout: &'static str,
        tooltips: [String; 2],
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub instance: u64,
    pub spec: ChartSpec,
}

/// One live chart per canvas.
#[derive(Debug, Default, Serialize)]
pub struct ChartBoard {
    charts: BTreeMap<&'static str, Chart>,
    next_instance: u64,
    destroyed: u64,
    generation: u64,
}

fn line(title: &'static str, labels: &[String], data: &[u32]) -> ChartSpec {
    ChartSpec::Line {
        title,
        labels: labels.to_vec(),
        data: data.to_vec(),
        begin_at_zero: true,
        tick_precision: 0,
    }
}

/// `"Booked: 12 (5.5%)"`; a zero total is treated as one.
pub fn donut_tooltip(label: &str, value: u64, total: u64) -> String {
    let total = total.max(1);
    let pct = value as f64 / total as f64 * 100.0;
    format!("{label}: {value} ({pct:.1}%)")
}

impl ChartBoard {
    pub fn get(&self, canvas: &str) -> Option<&Chart> {
        self.charts.get(canvas)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[cfg(test)]
    pub fn destroyed(&self) -> u64 {
        self.destroyed
    }

    fn destroy_all(&mut self) {
        for (canvas, chart) in std::mem::take(&mut self.charts) {
            tracing::debug!(canvas, instance = chart.instance, "destroying chart");
            self.destroyed += 1;
        }
    }

    fn build(&mut self, canvas: &'static str, spec: ChartSpec) {
        self.next_instance += 1;
        self.charts.insert(
            canvas,
            Chart {
                instance: self.next_instance,
                spec,
            },
        );
    }

    pub fn rebuild(&mut self, data: &ReportsData, summary: &ReportSummary) {
        self.destroy_all();

        self.build(BOOKED_CANVAS, line("Booked", &data.labels, &data.booked));
        self.build(OPEN_CANVAS, line("Open Slots", &data.labels, &data.open));

        let total = summary.total_booked + summary.total_open;
        self.build(
            DONUT_CANVAS,
            ChartSpec::Donut {
                labels: ["Booked", "Open"],
                data: [summary.total_booked, summary.total_open],
                cutout: "65%",
                tooltips: [
                    donut_tooltip("Booked", summary.total_booked, total),
                    donut_tooltip("Open", summary.total_open, total),
                ],
            },
        );
        self.generation += 1;
    }
}

/* ============================================================
   Panel
   ============================================================ */

#[derive(Debug, Default)]
pub struct ReportsPanel {
    pub days: u32,
    pub data: Option<ReportsData>,
    pub summary: Option<ReportSummary>,
    pub charts: ChartBoard,
}

impl ReportsPanel {
    pub fn new(days: u32) -> Self {
        Self {
            days,
            ..Default::default()
        }
    }

    pub fn load(&mut self, days: u32, data: ReportsData) {
        let summary = ReportSummary::compute(&data, days);
        self.charts.rebuild(&data, &summary);
        self.days = days;
        self.summary = Some(summary);
        self.data = Some(data);
        tracing::info!(days, generation = self.charts.generation(), "reports loaded");
    }
}

pub fn valid_days(days: u32) -> bool {
    (MIN_DAYS..=MAX_DAYS).contains(&days)
}

pub fn render(panel: &ReportsPanel) -> Element {
    let mut choices: Vec<u32> = DAY_CHOICES.to_vec();
    if !choices.contains(&panel.days) {
        choices.push(panel.days);
        choices.sort_unstable();
    }
    let options = choices.into_iter().map(|d| {
        el("option")
            .attr("value", d.to_string())
            .attr_if(d == panel.days, "selected", "selected")
            .text(format!("Last {d} days"))
    });

    let metas = panel
        .summary
        .as_ref()
        .map(ReportSummary::meta_lines)
        .unwrap_or_default();

    let canvases = [BOOKED_CANVAS, OPEN_CANVAS, DONUT_CANVAS].map(|canvas| {
        el("canvas")
            .id(canvas)
            .attr_if(panel.charts.get(canvas).is_some(), "data-generation", panel.charts.generation().to_string())
    });

    el("div")
        .id("adminReports")
        .class("rp-panel")
        .child(el("select").id("rpDays").children(options))
        .children(
            metas
                .into_iter()
                .enumerate()
                .map(|(i, line)| el("div").id(format!("rpMeta{}", i + 1)).class("rp-meta").text(line)),
        )
        .child(el("div").class("rp-charts").children(canvases))
}
