use std::io::{BufRead, Write};
use chrono::{Local, Utc};
use log::{error, info, warn};
use crate::config::Config;
use crate::errors::{ForecastRequestError, GfsRainWorkerError};
use crate::export::save_exports;
use crate::models::forecast::Forecast;
use crate::report::{caption, render_chart, render_heatmap, render_summary, render_table};
use crate::session::Session;
use crate::statistics::summarize;
use crate::views::{chart_projection, heatmap, heatmap_available};

/// Message shown when a request yields no forecast
pub const TRY_AGAIN: &str = "Failed to retrieve rainfall data. Please try again.";

/// How results are presented
#[derive(Debug, Clone, Default)]
pub struct Presentation {
    pub show_table: bool,
    pub export: bool,
}

/// One forecast request as entered by a user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Request {
    pub lat: f64,
    pub long: f64,
    pub hours: u32,
}

/// Serves the single request given by the configuration
///
/// # Arguments
///
/// * 'session' - the session to request the forecast from
/// * 'config' - configuration holding location, horizon and export directory
/// * 'presentation' - what to present besides summary and chart
/// * 'out' - where the report is written
pub fn run_once<W: Write>(session: &mut Session, config: &Config, presentation: &Presentation, out: &mut W)
    -> Result<bool, GfsRainWorkerError> {

    let request = Request {
        lat: config.geo_ref.lat,
        long: config.geo_ref.long,
        hours: config.forecast.hours.hours(),
    };

    serve(session, config, &request, presentation, out)
}

/// Serves requests read line by line, `<lat> <long> <hours>`, until end of input or a line
/// reading `quit`. Lines that can't be parsed are reported and skipped.
///
/// # Arguments
///
/// * 'session' - the session to request forecasts from
/// * 'config' - configuration holding the export directory
/// * 'presentation' - what to present besides summary and chart
/// * 'input' - where requests are read from
/// * 'out' - where reports are written
pub fn run_interactive<R: BufRead, W: Write>(session: &mut Session, config: &Config, presentation: &Presentation,
                                             input: R, out: &mut W) -> Result<usize, GfsRainWorkerError> {
    let mut served = 0;

    writeln!(out, "Enter <latitude> <longitude> <hours>, hours one of 24, 48, 72, 120 or 168 ('quit' to end)")?;
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") {
            break;
        }

        match parse_request(line) {
            Some(request) => {
                if serve(session, config, &request, presentation, out)? {
                    served += 1;
                }
            },
            None => {
                warn!("unparsable request: {}", line);
                writeln!(out, "Could not read '{}', expected <latitude> <longitude> <hours>", line)?;
            },
        }
    }

    info!("session ended after {} served requests", served);
    Ok(served)
}

/// Parses a request line of latitude, longitude and hours separated by whitespace and/or commas
///
/// # Arguments
///
/// * 'line' - the line to parse
pub fn parse_request(line: &str) -> Option<Request> {
    let mut parts = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty());

    let lat = parts.next()?.parse::<f64>().ok()?;
    let long = parts.next()?.parse::<f64>().ok()?;
    let hours = parts.next()?.parse::<u32>().ok()?;

    if parts.next().is_some() {
        return None;
    }

    Some(Request { lat, long, hours })
}

/// Requests a forecast and presents it. Returns false if no forecast was produced.
/// Rejected input is reported with its reason, a failed generation with a "try again".
///
/// # Arguments
///
/// * 'session' - the session to request the forecast from
/// * 'config' - configuration holding the export directory
/// * 'request' - the request
/// * 'presentation' - what to present besides summary and chart
/// * 'out' - where the report is written
fn serve<W: Write>(session: &mut Session, config: &Config, request: &Request, presentation: &Presentation, out: &mut W)
    -> Result<bool, GfsRainWorkerError> {

    let threshold = session.params().no_rain_threshold;
    match session.try_request(request.lat, request.long, request.hours, Utc::now()) {
        Ok(forecast) => {
            present(forecast, threshold, out, presentation)?;

            if presentation.export {
                let (csv, json) = save_exports(&config.files.export_dir, &forecast.series,
                                               request.lat, request.long, Local::now())?;
                writeln!(out, "Saved {}", csv.display())?;
                writeln!(out, "Saved {}", json.display())?;
            }
            Ok(true)
        },
        Err(ForecastRequestError::Request(e)) => {
            warn!("rejected request {:?}: {}", request, e);
            writeln!(out, "Invalid request: {}", e)?;
            Ok(false)
        },
        Err(ForecastRequestError::Generation(e)) => {
            error!("failed to get forecast for {}, {} ({} hours): {}", request.lat, request.long, request.hours, e);
            writeln!(out, "{}", TRY_AGAIN)?;
            Ok(false)
        },
    }
}

/// Writes the report of a forecast: summary, chart, heatmap when the horizon allows it and
/// optionally the data table
///
/// # Arguments
///
/// * 'forecast' - the forecast to present
/// * 'no_rain_threshold' - threshold used when counting rainy hours
/// * 'out' - where the report is written
/// * 'presentation' - what to present besides summary and chart
pub fn present<W: Write>(forecast: &Forecast, no_rain_threshold: f64, out: &mut W, presentation: &Presentation)
    -> Result<(), GfsRainWorkerError> {

    let now = Local::now();
    writeln!(out, "{}", caption("Rainfall forecast", now))?;
    if let Some(summary) = summarize(&forecast.series, forecast.horizon, no_rain_threshold) {
        write!(out, "{}", render_summary(forecast, &summary))?;
    }

    writeln!(out, "{}", caption("Hourly and cumulative rainfall", now))?;
    write!(out, "{}", render_chart(&chart_projection(&forecast.series)))?;

    if heatmap_available(forecast.horizon) {
        writeln!(out, "{}", caption("Rainfall heatmap (mm, date x hour UTC)", now))?;
        write!(out, "{}", render_heatmap(&heatmap(&forecast.series)))?;
    }

    if presentation.show_table {
        writeln!(out, "{}", caption("Data", now))?;
        write!(out, "{}", render_table(&forecast.series))?;
    }

    Ok(())
}
