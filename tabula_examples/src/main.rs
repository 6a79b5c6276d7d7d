// Copyright 2025 the Tabula Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `tabula`: run a table transform over raw query results stored as JSON.
//!
//! ```text
//! tabula --data batches.json --panel panel.json
//! tabula --data batches.json --transform timeseries_aggregations --describe
//! tabula --list
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use tabula_core::TableModel;
use tabula_transforms::{ColumnOption, RawBatch, TransformParams};
use tracing_subscriber::filter::LevelFilter;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(about = "Reduce time series, tables, documents or annotations to a single table.")]
struct Args {
    /// Raw result batches: a JSON array of batches, or one batch object.
    #[arg(long, required_unless_present = "list")]
    data: Option<PathBuf>,

    /// Panel options (`transform`, `columns`, `parsingCodeType`, `sort`).
    #[arg(long)]
    panel: Option<PathBuf>,

    /// Transform to run, overriding the panel options.
    #[arg(long)]
    transform: Option<String>,

    /// Pick the transform from the shape of the data, like the panel editor does.
    #[arg(long)]
    auto: bool,

    /// Print the table unsorted.
    #[arg(long)]
    no_sort: bool,

    /// List the registered transforms and exit.
    #[arg(long)]
    list: bool,

    /// Print the columns the transform offers for selection and exit.
    #[arg(long)]
    describe: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log transform decisions to stderr (repeat for more detail).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.list {
        print!("{}", list_transforms());
        return Ok(());
    }

    let Some(data) = args.data.as_deref() else {
        bail!("--data is required");
    };
    let batches = tabula_transforms::parse_batches(&read_json(data)?)
        .with_context(|| format!("parsing batches in {}", data.display()))?;

    let panel = match &args.panel {
        Some(path) => serde_json::from_value::<TransformParams>(read_json(path)?)
            .with_context(|| format!("parsing panel options in {}", path.display()))?,
        None => TransformParams::default(),
    };
    let params = resolve_params(panel, args.transform.as_deref(), args.auto, &batches);

    let out = if args.describe {
        let columns = tabula_transforms::describe_output_columns(&batches, &params.transform)?;
        render_options(&columns, args.format)?
    } else {
        render_table(&batches, &params, !args.no_sort, args.format)?
    };
    print!("{out}");
    Ok(())
}

/// One line per registered transform: name, then description.
fn list_transforms() -> String {
    tabula_transforms::transforms()
        .map(|(name, description)| format!("{name:<26}{description}\n"))
        .collect()
}

/// Panel options with the command-line overrides applied.
fn resolve_params(
    mut params: TransformParams,
    transform: Option<&str>,
    auto: bool,
    batches: &[RawBatch],
) -> TransformParams {
    if let Some(name) = transform {
        params.transform = name.into();
    }
    if auto && params.auto_select(batches) {
        log::info!("using transform {}", params.transform);
    }
    params
}

fn render_table(
    batches: &[RawBatch],
    params: &TransformParams,
    sort: bool,
    format: OutputFormat,
) -> Result<String> {
    let mut model = tabula_transforms::apply(batches, params)
        .with_context(|| format!("running transform {}", params.transform))?;
    if sort {
        model.sort(&params.sort);
    }
    Ok(match format {
        OutputFormat::Text => render_text(&model),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(&model)?),
    })
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn render_options(columns: &[ColumnOption], format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text if columns.is_empty() => "(no selectable columns)\n".to_owned(),
        OutputFormat::Text => columns
            .iter()
            .map(|c| format!("{}\t{}\n", c.text, c.value))
            .collect(),
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(columns)?),
    })
}

/// Left-aligned columns separated by two spaces, header underlined.
fn render_text(model: &TableModel) -> String {
    let header: Vec<String> = model
        .columns
        .iter()
        .map(|c| {
            if c.sort {
                let arrow = if c.desc { 'v' } else { '^' };
                format!("{} {arrow}", c.text)
            } else {
                c.text.clone()
            }
        })
        .collect();
    let body: Vec<Vec<String>> = model
        .rows
        .iter()
        .map(|row| row.iter().map(ToString::to_string).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (i, cell) in row.iter().enumerate() {
            let w = cell.chars().count();
            match widths.get_mut(i) {
                Some(slot) => *slot = (*slot).max(w),
                None => widths.push(w),
            }
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &body {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

/// Installs a stderr subscriber; `log` records from the library crates are bridged into it.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    // Fails only if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tabula_core::{Cell, Column, SortSpec};
    use tabula_transforms::{TransformKind, parse_batches};

    use super::*;

    fn table_batches() -> Vec<RawBatch> {
        parse_batches(&json!([{
            "type": "table",
            "columns": [{ "text": "Host" }, { "text": "Load" }],
            "rows": [["a", 1], ["b", 3], ["c", 2]],
        }]))
        .unwrap()
    }

    #[test]
    fn text_rendering_aligns_columns() {
        let mut model = TableModel::with_columns(vec![Column::new("Metric"), Column::new("Avg")]);
        model.push_row(vec![Cell::from("cpu"), Cell::Number(2.5)]);
        model.push_row(vec![Cell::from("memory"), Cell::Missing]);
        model.sort(&SortSpec::by(1, false));
        assert_eq!(
            render_text(&model),
            "Metric  Avg ^\n------  -----\nmemory\ncpu     2.5\n"
        );
    }

    #[test]
    fn list_shows_every_transform() {
        let listed = list_transforms();
        assert_eq!(listed.lines().count(), TransformKind::ALL.len());
        assert!(listed.starts_with("timeseries_to_rows        Time series to rows\n"));
        assert!(listed.contains("parsing_decoder"));
    }

    #[test]
    fn data_is_required_unless_listing() {
        assert!(Args::try_parse_from(["tabula"]).is_err());
        let args = Args::try_parse_from(["tabula", "--list"]).unwrap();
        assert!(args.list && args.data.is_none());
        let args =
            Args::try_parse_from(["tabula", "--data", "d.json", "--no-sort", "-vv"]).unwrap();
        assert!(args.no_sort);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn auto_switches_to_table_for_relations() {
        let batches = table_batches();
        let params = resolve_params(TransformParams::default(), None, true, &batches);
        assert_eq!(params.transform, "table");

        let params = resolve_params(TransformParams::default(), None, false, &batches);
        assert_eq!(params.transform, "timeseries_to_columns");

        let params = resolve_params(TransformParams::default(), Some("json"), false, &batches);
        assert_eq!(params.transform, "json");
    }

    #[test]
    fn describe_lists_selectable_columns() {
        let columns = tabula_transforms::describe_output_columns(&table_batches(), "table").unwrap();
        assert_eq!(
            render_options(&columns, OutputFormat::Text).unwrap(),
            "Host\tHost\nLoad\tLoad\n"
        );
        assert_eq!(
            render_options(&[], OutputFormat::Text).unwrap(),
            "(no selectable columns)\n"
        );
        let json: serde_json::Value =
            serde_json::from_str(&render_options(&columns, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(json[1], json!({ "text": "Load", "value": "Load" }));
    }

    #[test]
    fn no_sort_keeps_transform_order() {
        let batches = table_batches();
        let params = TransformParams {
            sort: SortSpec::by(1, true),
            ..TransformParams::new(TransformKind::Table)
        };
        let sorted = render_table(&batches, &params, true, OutputFormat::Text).unwrap();
        let unsorted = render_table(&batches, &params, false, OutputFormat::Text).unwrap();
        let first_host = |out: &str| out.lines().nth(2).unwrap().chars().next().unwrap();
        assert_eq!(first_host(&sorted), 'b');
        assert_eq!(first_host(&unsorted), 'a');
    }
}
