use std::fmt::Write;
use chrono::{DateTime, Local};
use crate::models::forecast::{Forecast, ForecastSeries};
use crate::statistics::Summary;
use crate::views::{ChartProjection, HeatMap};

/// Width of caption lines
const CAPTION_WIDTH: usize = 100;

/// Width of the longest bar in the chart
const BAR_WIDTH: f64 = 40.0;

/// Returns a caption line, i.e. the time of the report and the caption padded with '='
///
/// # Arguments
///
/// * 'caption' - the caption
/// * 'date_time' - report time
pub fn caption(caption: &str, date_time: DateTime<Local>) -> String {
    let caption = format!("{} {} ", date_time.format("%Y-%m-%d %H:%M:%S"), caption);

    format!("{:=<width$}", caption, width = CAPTION_WIDTH)
}

/// Renders the summary cards
///
/// # Arguments
///
/// * 'forecast' - the forecast summarized
/// * 'summary' - summary statistics of the forecast
pub fn render_summary(forecast: &Forecast, summary: &Summary) -> String {
    let location = forecast.series.records()
        .first()
        .map(|r| format!("{}°, {}°", r.latitude, r.longitude))
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "Source:        {}", forecast.provenance);
    let _ = writeln!(out, "Location:      {}", location);
    let _ = writeln!(out, "Total:         {:.2} mm ({:.2} mm/h mean)", summary.total_mm, summary.mean_mm);
    let _ = writeln!(out, "Maximum:       {:.2} mm/h at {}", summary.max_mm, summary.max_at.format("%d/%m %H:%M"));
    let _ = writeln!(out, "Rainy hours:   {} h ({:.1}% of the period)", summary.rainy_hours, summary.rainy_share_pct);
    let _ = writeln!(out, "Period:        {} h ({:.1} days)", summary.horizon_hours, summary.horizon_days);

    out
}

/// Renders hourly rainfall as horizontal bars next to the cumulative rainfall
///
/// # Arguments
///
/// * 'chart' - the chart projection to render
pub fn render_chart(chart: &ChartProjection) -> String {
    let max = chart.hourly.iter().map(|(_, v)| *v).fold(0.0, f64::max);

    let mut out = String::new();
    let _ = writeln!(out, "{:<16} {:<40} {:>8} {:>10}", "Time (UTC)", "Rainfall", "mm/h", "Cum. mm");
    for ((ts, value), (_, cumulative)) in chart.hourly.iter().zip(chart.cumulative.iter()) {
        let len = if max > 0.0 { (value / max * BAR_WIDTH).round() as usize } else { 0 };
        let _ = writeln!(out, "{:<16} {:<40} {:>8.2} {:>10.2}", ts.format("%Y-%m-%d %H:%M"), "#".repeat(len), value, cumulative);
    }

    out
}

/// Renders the date by hour heatmap, one row per date and one column per hour
///
/// # Arguments
///
/// * 'heatmap' - the heatmap to render
pub fn render_heatmap(heatmap: &HeatMap) -> String {
    let mut out = String::from("Date      ");
    for h in 0..24 {
        let _ = write!(out, " {:>4}", h);
    }
    out.push('\n');

    for (date, row) in heatmap.dates.iter().zip(heatmap.cells.iter()) {
        let _ = write!(out, "{}", date.format("%Y-%m-%d"));
        for v in row {
            let _ = write!(out, " {:>4.1}", v);
        }
        out.push('\n');
    }

    out
}

/// Renders the forecast records as a table
///
/// # Arguments
///
/// * 'series' - the series to render
pub fn render_table(series: &ForecastSeries) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<22} {:>11} {:>10} {:>10} {:>12}", "timestamp", "rainfall_mm", "latitude", "longitude", "cumulative");
    for row in series.rows() {
        let _ = writeln!(out, "{:<22} {:>11.2} {:>10.4} {:>10.4} {:>12.2}",
                         row.timestamp.format("%Y-%m-%d %H:%M:%S"),
                         row.rainfall_mm, row.latitude, row.longitude, row.cumulative_rainfall);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone, Utc};
    use crate::models::forecast::{ForecastRecord, Horizon};
    use crate::statistics::summarize;
    use crate::views::{chart_projection, heatmap};

    fn forecast() -> Forecast {
        let start = Utc.with_ymd_and_hms(2025, 9, 1, 23, 0, 0).unwrap();
        let records = [0.0, 2.0, 1.0]
            .iter()
            .enumerate()
            .map(|(i, &r)| ForecastRecord {
                timestamp: start + TimeDelta::hours(i as i64),
                rainfall_mm: r,
                latitude: -6.2,
                longitude: 106.8,
            })
            .collect();

        Forecast {
            series: ForecastSeries::new(records),
            provenance: "somewhere".to_string(),
            horizon: Horizon::OneDay,
            generated_at: start,
        }
    }

    #[test]
    fn test_caption_is_padded() {
        let t = Local.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap();
        let line = caption("Forecast", t);
        assert!(line.starts_with("2025-09-01 08:00:00 Forecast ="));
        assert_eq!(line.chars().count(), CAPTION_WIDTH);
    }

    #[test]
    fn test_summary_cards() {
        let forecast = forecast();
        let summary = summarize(&forecast.series, forecast.horizon, 0.1).unwrap();
        let text = render_summary(&forecast, &summary);

        assert!(text.contains("Source:        somewhere"));
        assert!(text.contains("Total:         3.00 mm"));
        assert!(text.contains("Maximum:       2.00 mm/h at 02/09 00:00"));
        assert!(text.contains("Rainy hours:   2 h (66.7% of the period)"));
    }

    #[test]
    fn test_chart_bars_scale_to_max() {
        let text = render_chart(&chart_projection(&forecast().series));
        let lines = text.lines().collect::<Vec<&str>>();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2].matches('#').count(), 40);
        assert_eq!(lines[3].matches('#').count(), 20);
        assert!(lines[3].ends_with("3.00"));
    }

    #[test]
    fn test_heatmap_has_row_per_date() {
        let text = render_heatmap(&heatmap(&forecast().series));
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(2).unwrap().starts_with("2025-09-02  2.0  1.0  0.0"));
    }

    #[test]
    fn test_table_formats() {
        let text = render_table(&forecast().series);
        assert!(text.contains("2025-09-02 00:00:00"));
        assert!(text.contains("-6.2000"));
        assert!(text.contains("106.8000"));
    }
}
