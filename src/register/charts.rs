use super::domain::{Cell, Frame, REMEDIATION_STATUS, RISK_SCORE, VENDOR_NAME};
use plotters::element::Pie;
use plotters::prelude::*;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

pub const TOP_RISK_CHART: &str = "top5_high_risk.png";
pub const REMEDIATION_PIE_CHART: &str = "remediation_status_pie.png";

const TOP_N: usize = 5;

const WEDGE_COLORS: [RGBColor; 8] = [
    RGBColor(66, 133, 244),
    RGBColor(219, 68, 55),
    RGBColor(244, 180, 0),
    RGBColor(15, 157, 88),
    RGBColor(171, 71, 188),
    RGBColor(0, 172, 193),
    RGBColor(255, 112, 67),
    RGBColor(158, 157, 36),
];

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("failed to render chart: {0}")]
    Render(String),
}

/// Renders both summary charts from the flagged frame. Each chart is
/// independent and skipped (no file) when it has nothing to show.
pub fn render_charts(frame: &Frame, outdir: &Path) -> Result<Vec<PathBuf>, ChartError> {
    let mut produced = Vec::new();

    let bar_path = outdir.join(TOP_RISK_CHART);
    if render_top_risk_bar(frame, &bar_path)? {
        info!(path = %bar_path.display(), "saved top risk chart");
        produced.push(bar_path);
    }

    let pie_path = outdir.join(REMEDIATION_PIE_CHART);
    if render_remediation_pie(frame, &pie_path)? {
        info!(path = %pie_path.display(), "saved remediation status chart");
        produced.push(pie_path);
    }

    Ok(produced)
}

/// Top-N bar chart of vendors by risk score. Null scores sort below every
/// non-null score, so they only make the cut when fewer than N scored rows
/// exist; a null that does is drawn as a zero-height bar.
fn render_top_risk_bar(frame: &Frame, path: &Path) -> Result<bool, ChartError> {
    let mut entries: Vec<(String, Option<f64>)> = (0..frame.row_count())
        .map(|row| {
            (
                frame.value(row, VENDOR_NAME).render(),
                frame.value(row, RISK_SCORE).as_number(),
            )
        })
        .collect();

    entries.sort_by(|a, b| match (a.1, b.1) {
        (Some(left), Some(right)) => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    entries.truncate(TOP_N);

    if entries.is_empty() {
        return Ok(false);
    }

    let labels: Vec<String> = entries.iter().map(|(name, _)| name.clone()).collect();
    let y_max = entries
        .iter()
        .filter_map(|(_, score)| *score)
        .fold(0.0f64, f64::max)
        .max(1.0)
        * 1.1;

    let root = BitMapBackend::new(path, (800, 400)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|err| ChartError::Render(err.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Top 5 High Risk Vendors", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d((0..entries.len()).into_segmented(), 0f64..y_max)
        .map_err(|err| ChartError::Render(err.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(entries.len())
        .x_label_formatter(&|segment| match segment {
            SegmentValue::CenterOf(index) if *index < labels.len() => labels[*index].clone(),
            _ => String::new(),
        })
        .y_desc("Risk Score")
        .draw()
        .map_err(|err| ChartError::Render(err.to_string()))?;

    chart
        .draw_series(entries.iter().enumerate().map(|(index, (_, score))| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(index), 0.0),
                    (SegmentValue::Exact(index + 1), score.unwrap_or(0.0)),
                ],
                BLUE.mix(0.6).filled(),
            )
        }))
        .map_err(|err| ChartError::Render(err.to_string()))?;

    root.present()
        .map_err(|err| ChartError::Render(err.to_string()))?;
    Ok(true)
}

/// Percentage-labeled pie of rows per distinct remediation status, with
/// null status grouped under an explicit "Unknown" wedge.
fn render_remediation_pie(frame: &Frame, path: &Path) -> Result<bool, ChartError> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in 0..frame.row_count() {
        let status = match frame.value(row, REMEDIATION_STATUS) {
            Cell::Empty => "Unknown".to_string(),
            cell => cell.render(),
        };
        *counts.entry(status).or_insert(0) += 1;
    }

    if counts.is_empty() {
        return Ok(false);
    }

    let sizes: Vec<f64> = counts.values().map(|count| *count as f64).collect();
    let labels: Vec<String> = counts.keys().cloned().collect();
    let colors: Vec<RGBColor> = (0..labels.len())
        .map(|index| WEDGE_COLORS[index % WEDGE_COLORS.len()])
        .collect();

    let root = BitMapBackend::new(path, (600, 600)).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|err| ChartError::Render(err.to_string()))?;
    let root = root
        .titled("Remediation Status Distribution", ("sans-serif", 24))
        .map_err(|err| ChartError::Render(err.to_string()))?;

    let center = (300, 290);
    let radius = 200.0;
    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 18).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 16).into_font().color(&BLACK));

    root.draw(&pie)
        .map_err(|err| ChartError::Render(err.to_string()))?;
    root.present()
        .map_err(|err| ChartError::Render(err.to_string()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::{flags, loader};
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn flagged(csv: &str) -> Frame {
        let mut frame = loader::load_delimited(Cursor::new(csv.to_string())).expect("parse");
        loader::ensure_columns(&mut frame);
        flags::compute_flags(
            &mut frame,
            NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date"),
            365,
            80.0,
        );
        frame
    }

    #[test]
    fn renders_both_charts_for_populated_register() {
        let frame = flagged(
            "Vendor Name,Risk Score,Remediation Status\n\
             Acme,91,Open\nGlobex,80,In Progress\nInitech,34,Resolved\n\
             Umbrella,72,Open\nHooli,55,\nSoylent,12,Open\n",
        );
        let dir = tempfile::tempdir().expect("tempdir");
        let produced = render_charts(&frame, dir.path()).expect("render");

        assert_eq!(produced.len(), 2);
        assert!(dir.path().join(TOP_RISK_CHART).exists());
        assert!(dir.path().join(REMEDIATION_PIE_CHART).exists());
    }

    #[test]
    fn empty_register_produces_no_chart_files() {
        let frame = flagged("Vendor Name,Risk Score,Remediation Status\n");
        let dir = tempfile::tempdir().expect("tempdir");
        let produced = render_charts(&frame, dir.path()).expect("render");

        assert!(produced.is_empty());
        assert!(!dir.path().join(TOP_RISK_CHART).exists());
        assert!(!dir.path().join(REMEDIATION_PIE_CHART).exists());
    }

    #[test]
    fn null_scores_only_chart_when_scored_rows_run_short() {
        let frame = flagged(
            "Vendor Name,Risk Score\nAcme,91\nGlobex,\n",
        );
        let dir = tempfile::tempdir().expect("tempdir");
        render_charts(&frame, dir.path()).expect("render");
        assert!(dir.path().join(TOP_RISK_CHART).exists());
    }
}
