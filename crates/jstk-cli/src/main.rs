//! JS-Toolkit CLI
//!
//! CLI tool for inspecting captured endpoint dumps with the same filtering
//! and windowing the DevTools panel uses.

mod capture;

use std::io::{self, Write};

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jstk_core::window::WindowState;
use jstk_core::{
    DataSource, FilterState, Panel, PanelConfig, PanelContext, PanelEvent, QueryOutcome,
    ScrollMetrics, Selection, WindowConfig,
};

use crate::capture::{load_config, CaptureFile};

#[derive(Parser)]
#[command(name = "jstk-cli")]
#[command(about = "JS-Toolkit capture inspection tools")]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Capture dump (JSON)
    #[arg(short, long)]
    input: String,

    /// Only endpoints referenced by this script ("All" for any)
    #[arg(long, default_value = "All")]
    source: String,

    /// Only endpoints seen on this webpage ("All" for any)
    #[arg(long, default_value = "All")]
    webpage: String,

    /// Substring to search for in endpoints
    #[arg(long, default_value = "")]
    search: String,

    /// Panel config (JSON)
    #[arg(short, long)]
    config: Option<String>,
}

impl FilterArgs {
    fn filter(&self) -> FilterState {
        FilterState::new(
            Selection::parse(&self.source),
            Selection::parse(&self.webpage),
            &self.search,
        )
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum ScrollDirection {
    Down,
    Up,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one window of filtered endpoints
    Query {
        #[command(flatten)]
        filter: FilterArgs,

        /// First row of the window
        #[arg(long, default_value_t = 0)]
        start: usize,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Replay scroll triggers and print the window start after each
    Scroll {
        #[command(flatten)]
        filter: FilterArgs,

        /// Comma separated scroll triggers
        #[arg(short, long, value_delimiter = ',', required = true)]
        events: Vec<ScrollDirection>,
    },

    /// Remove every record from a capture dump
    Clear {
        /// Capture dump (JSON)
        #[arg(short, long)]
        input: String,
    },

    /// Summarize a capture dump
    Stats {
        /// Capture dump (JSON)
        #[arg(short, long)]
        input: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let mut out = std::io::stdout().lock();
    let result = match cli.command {
        Commands::Query { filter, start, json } => cmd_query(&mut out, &filter, start, json),
        Commands::Scroll { filter, events } => cmd_scroll(&mut out, &filter, &events),
        Commands::Clear { input } => cmd_clear(&mut out, &input),
        Commands::Stats { input } => cmd_stats(&mut out, &input),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn write_failed(e: io::Error) -> String {
    format!("Failed to write output: {}", e)
}

fn cmd_query<W: Write>(out: &mut W, args: &FilterArgs, start: usize, json: bool) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let source = DataSource::new(CaptureFile::new(&args.input), config.search_case);
    let result = source
        .query(&args.filter())
        .map_err(|e| format!("Failed to query '{}': {}", args.input, e))?;

    let window_config = WindowConfig::from(&config);
    let window = WindowState { start }.clamped(result.filtered_len(), &window_config);
    let visible = result.visible(&window, &window_config);

    if json {
        let rows: Vec<_> = visible.iter().map(|(_, record)| *record).collect();
        let doc = serde_json::json!({
            "endpointCount": result.filtered_len(),
            "sourceCount": result.js_files.len(),
            "webpageCount": result.webpages.len(),
            "startIndex": window.start,
            "rows": rows,
        });
        let text = serde_json::to_string_pretty(&doc)
            .map_err(|e| format!("Failed to encode output: {}", e))?;
        writeln!(out, "{}", text).map_err(write_failed)?;
        return Ok(());
    }

    writeln!(
        out,
        "ENDPOINT ({})  SOURCE ({})  WEBPAGE ({})",
        result.filtered_len(),
        result.js_files.len(),
        result.webpages.len()
    )
    .map_err(write_failed)?;
    for (index, record) in &visible {
        writeln!(out, "{:>6}  {}  {}  {}", index, record.endpoint, record.source_file, record.webpage)
            .map_err(write_failed)?;
    }
    if result.skipped > 0 {
        writeln!(out, "({} malformed records skipped)", result.skipped).map_err(write_failed)?;
    }

    Ok(())
}

fn cmd_scroll<W: Write>(out: &mut W, args: &FilterArgs, events: &[ScrollDirection]) -> Result<(), String> {
    let config = load_config(args.config.as_deref())?;
    let source = DataSource::new(CaptureFile::new(&args.input), config.search_case);

    let mut panel = Panel::new(config, PanelContext::default());
    let filter = args.filter();
    panel.apply(PanelEvent::SelectLocation(filter.selected_location));
    panel.apply(PanelEvent::SelectWebpage(filter.selected_webpage));
    panel.apply(PanelEvent::Search(filter.search_query));
    if panel.refresh(&source) != QueryOutcome::Applied {
        return Err(panel.error().unwrap_or("query failed").to_string());
    }

    writeln!(out, "filtered: {}, window: {}", panel.data().filtered_len(), config.window_size)
        .map_err(write_failed)?;
    for (step, direction) in events.iter().enumerate() {
        panel.apply(PanelEvent::Scroll(synthetic_metrics(*direction, &config)));
        let name = format!("{:?}", direction).to_lowercase();
        writeln!(out, "{:>4}  {:<4}  start={}", step + 1, name, panel.window().start)
            .map_err(write_failed)?;
    }

    Ok(())
}

/// Scroll geometry that trips exactly one threshold.
fn synthetic_metrics(direction: ScrollDirection, config: &PanelConfig) -> ScrollMetrics {
    let client_height = 760.0;
    let margin = config.bottom_threshold.max(config.top_threshold) + 1.0;
    let scroll_height = client_height + 2.0 * margin;
    match direction {
        ScrollDirection::Down => ScrollMetrics::new(scroll_height - client_height, scroll_height, client_height),
        ScrollDirection::Up => ScrollMetrics::new(0.0, scroll_height, client_height),
    }
}

fn cmd_clear<W: Write>(out: &mut W, input: &str) -> Result<(), String> {
    let mut source = DataSource::new(CaptureFile::new(input), Default::default());
    source
        .clear_all()
        .map_err(|e| format!("Failed to clear '{}': {}", input, e))?;
    writeln!(out, "Cleared '{}'", source.store().path().display()).map_err(write_failed)?;
    Ok(())
}

fn cmd_stats<W: Write>(out: &mut W, input: &str) -> Result<(), String> {
    let source = DataSource::new(CaptureFile::new(input), Default::default());
    let result = source
        .query(&FilterState::default())
        .map_err(|e| format!("Failed to read '{}': {}", input, e))?;

    writeln!(out, "Capture: {}", input).map_err(write_failed)?;
    writeln!(out, "  Records:   {} valid, {} skipped", result.urls.len(), result.skipped)
        .map_err(write_failed)?;
    writeln!(out, "  Sources:   {}", result.js_files.len()).map_err(write_failed)?;
    for file in &result.js_files {
        writeln!(out, "    {}", file).map_err(write_failed)?;
    }
    writeln!(out, "  Webpages:  {}", result.webpages.len()).map_err(write_failed)?;
    for page in &result.webpages {
        writeln!(out, "    {}", page).map_err(write_failed)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    use jstk_core::ingest::write_capture;
    use jstk_core::RawRecord;

    fn temp_capture(name: &str, records: &[RawRecord]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("jstk-main-{}-{}.json", name, std::process::id()));
        fs::write(&path, write_capture(records).unwrap()).unwrap();
        path
    }

    fn numbered(count: usize) -> Vec<RawRecord> {
        (0..count)
            .map(|i| RawRecord::new(&format!("/api/{i}"), &format!("s{}.js", i % 3), &format!("p{}", i % 2)))
            .collect()
    }

    fn args_for(path: &PathBuf) -> FilterArgs {
        FilterArgs {
            input: path.to_str().unwrap().to_string(),
            source: "All".to_string(),
            webpage: "All".to_string(),
            search: String::new(),
            config: None,
        }
    }

    #[test]
    fn test_query_json_shape_and_start_clamp() {
        let path = temp_capture("query", &numbered(100));
        let mut out = Vec::new();
        cmd_query(&mut out, &args_for(&path), 500, true).unwrap();
        fs::remove_file(&path).unwrap();

        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["endpointCount"], 100);
        assert_eq!(doc["sourceCount"], 3);
        assert_eq!(doc["webpageCount"], 2);
        assert_eq!(doc["startIndex"], 60);
        let rows = doc["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 40);
        assert_eq!(rows[0]["endpoint"], "/api/60");
        assert_eq!(rows[0]["sourceFile"], "s0.js");
        assert_eq!(rows[39]["endpoint"], "/api/99");
    }

    #[test]
    fn test_query_table_filters() {
        let path = temp_capture("table", &numbered(10));
        let args = FilterArgs { source: "s1.js".to_string(), webpage: "p0".to_string(), ..args_for(&path) };
        let mut out = Vec::new();
        cmd_query(&mut out, &args, 0, false).unwrap();
        fs::remove_file(&path).unwrap();

        // Only /api/4 is both on s1.js and p0.
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ENDPOINT (1)  SOURCE (3)  WEBPAGE (2)");
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("/api/4  s1.js  p0"));
    }

    #[test]
    fn test_scroll_replay_stops_at_last_window() {
        let path = temp_capture("scroll", &numbered(100));
        let events = [ScrollDirection::Down; 5];
        let mut out = Vec::new();
        cmd_scroll(&mut out, &args_for(&path), &events).unwrap();
        fs::remove_file(&path).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("filtered: 100, window: 40"));
        let starts: Vec<usize> = text
            .lines()
            .filter_map(|line| line.split("start=").nth(1))
            .map(|n| n.parse().unwrap())
            .collect();
        assert_eq!(starts, vec![20, 40, 60, 60, 60]);
    }

    #[test]
    fn test_scroll_up_after_down() {
        let path = temp_capture("scroll-up", &numbered(100));
        let events = [ScrollDirection::Down, ScrollDirection::Down, ScrollDirection::Up, ScrollDirection::Up, ScrollDirection::Up];
        let mut out = Vec::new();
        cmd_scroll(&mut out, &args_for(&path), &events).unwrap();
        fs::remove_file(&path).unwrap();

        let text = String::from_utf8(out).unwrap();
        let starts: Vec<&str> = text.lines().filter_map(|line| line.split("start=").nth(1)).collect();
        assert_eq!(starts, vec!["20", "40", "20", "0", "0"]);
    }

    #[test]
    fn test_clear_rewrites_empty_array() {
        let path = temp_capture("clear", &numbered(5));
        let mut out = Vec::new();
        cmd_clear(&mut out, path.to_str().unwrap()).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(contents, write_capture(&[]).unwrap());
        assert_eq!(serde_json::from_str::<serde_json::Value>(&contents).unwrap(), serde_json::json!([]));
        assert!(String::from_utf8(out).unwrap().starts_with("Cleared '"));
    }

    #[test]
    fn test_stats_counts() {
        let mut records = numbered(6);
        records.push(RawRecord { webpage: None, ..RawRecord::new("/broken", "s9.js", "") });
        let path = temp_capture("stats", &records);
        let mut out = Vec::new();
        cmd_stats(&mut out, path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  Records:   6 valid, 1 skipped\n"));
        assert!(text.contains("  Sources:   3\n    s0.js\n    s1.js\n    s2.js\n"));
        assert!(text.contains("  Webpages:  2\n    p0\n    p1\n"));
    }

    #[test]
    fn test_missing_capture_is_empty_query() {
        let path = std::env::temp_dir().join(format!("jstk-main-absent-{}.json", std::process::id()));
        let mut out = Vec::new();
        cmd_query(&mut out, &args_for(&path), 0, true).unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["endpointCount"], 0);
        assert_eq!(doc["startIndex"], 0);
        assert!(doc["rows"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_synthetic_metrics_trip_one_threshold() {
        let config = PanelConfig::default();
        let down = synthetic_metrics(ScrollDirection::Down, &config);
        assert!(down.distance_to_bottom() < config.bottom_threshold);
        assert!(down.scroll_top >= config.top_threshold);

        let up = synthetic_metrics(ScrollDirection::Up, &config);
        assert!(up.scroll_top < config.top_threshold);
        assert!(up.distance_to_bottom() >= config.bottom_threshold);
    }

    #[test]
    fn test_cli_parses_scroll_events() {
        let cli = Cli::try_parse_from([
            "jstk-cli", "scroll", "--input", "c.json", "--events", "down,down,up", "--source", "x.js",
        ])
        .unwrap();
        match cli.command {
            Commands::Scroll { filter, events } => {
                assert_eq!(events, vec![ScrollDirection::Down, ScrollDirection::Down, ScrollDirection::Up]);
                assert_eq!(filter.filter().selected_location, Selection::from("x.js"));
                assert!(filter.filter().selected_webpage.is_all());
            }
            _ => panic!("expected scroll command"),
        }
    }
}
