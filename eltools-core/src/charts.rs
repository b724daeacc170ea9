//! # Web Chart Module
//!
//! Builds chart objects for a browser-side plotting library. A chart is
//! plain data: an element kind (curve, path or overlay), its key and value
//! dimensions, the data to draw and the styling options. Charts serialize
//! to JSON with `serde_json`.
//!
//! ## Charts
//! - Magnet structure strip along `s`
//! - Optical functions (`betax`, `etax`, ...) along `s`
//! - Top view of the machine (`Z` against `X`)
//! - Resonance diagram and tune marker in the tune square

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::error;

use crate::error::Result;
use crate::resonance::{Point, Segment};
use crate::sdds::{CommandRunner, Converter, DEFAULT_MAG_FILE, MAG_COLUMNS};
use crate::table::{ColumnData, Table};
use crate::tunes::{self, PLUS_HALF_LENGTH};

/// Interactive tools shown on every line chart.
const TOOLS: [&str; 4] = ["box_zoom", "pan", "wheel_zoom", "reset"];
const CHART_WIDTH: u32 = 700;
/// Tune marker colour (turquoise).
pub const TUNES_COLOR: &str = "#30d5c8";
pub const RESONANCE_COLOR: &str = "red";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Curve,
    Path,
    Overlay,
}

/// An axis of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dimension {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<(f64, f64)>,
}

impl Dimension {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: None,
            unit: None,
            range: None,
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn range(mut self, low: f64, high: f64) -> Self {
        self.range = Some((low, high));
        self
    }
}

/// Styling options. Unset options are left to the plotting library.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Options {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_grid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_frame: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_title: Option<bool>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hide_axes: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    /// Hover tooltip template, e.g. `@ElementName`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<String>,
}

impl Options {
    fn interactive() -> Self {
        Self {
            show_grid: Some(true),
            tools: TOOLS.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }

    fn bare() -> Self {
        Self {
            show_frame: Some(false),
            show_title: Some(false),
            hide_axes: true,
            ..Self::interactive()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataColumn {
    pub name: String,
    pub values: ColumnData,
}

/// What a chart draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartData {
    /// Named columns; the key dimension comes first.
    Columns(Vec<DataColumn>),
    /// Independent polylines.
    Paths(Vec<Vec<Point>>),
    /// Charts drawn on top of each other.
    Layers(Vec<Chart>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub element: ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub kdims: Vec<Dimension>,
    pub vdims: Vec<Dimension>,
    pub data: ChartData,
    pub opts: Options,
}

impl Chart {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn column(table: &Table, name: &str) -> Result<DataColumn> {
    let values = match table.numeric(name) {
        Ok(values) => ColumnData::Numeric(values.to_vec()),
        Err(_) => ColumnData::Text(table.text(name)?),
    };
    Ok(DataColumn {
        name: name.to_string(),
        values,
    })
}

/// The magnet structure strip: `Profile` along `s`, element name on hover.
pub fn structure_chart(table: &Table) -> Result<Chart> {
    let data = vec![
        column(table, "s")?,
        column(table, "Profile")?,
        column(table, "ElementName")?,
    ];
    Ok(Chart {
        element: ElementKind::Curve,
        group: Some("mag".to_string()),
        label: None,
        kdims: vec![Dimension::new("s").label("s").unit("m")],
        vdims: vec![Dimension::new("Profile"), Dimension::new("ElementName")],
        data: ChartData::Columns(data),
        opts: Options {
            width: Some(CHART_WIDTH),
            height: Some(70),
            color: Some("black".to_string()),
            alpha: Some(0.3),
            hover: Some("@ElementName".to_string()),
            ..Options::bare()
        },
    })
}

/// An optical function along `s`, with the value axis running from zero
/// to 10% above the maximum.
pub fn function_chart(table: &Table, func: &str, color: &str, label: &str) -> Result<Chart> {
    let values = table.numeric(func)?;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok(Chart {
        element: ElementKind::Curve,
        group: None,
        label: Some(label.to_string()),
        kdims: vec![Dimension::new("s").label("s").unit("m")],
        vdims: vec![
            Dimension::new(func)
                .label(label)
                .unit("m")
                .range(0.0, 1.1 * max),
        ],
        data: ChartData::Columns(vec![column(table, "s")?, column(table, func)?]),
        opts: Options {
            width: Some(CHART_WIDTH),
            height: Some(300),
            color: Some(color.to_string()),
            alpha: Some(0.7),
            line_width: Some(3.0),
            ..Options::interactive()
        },
    })
}

/// The top view of the machine built by [`Converter::acc_view`].
pub fn view_chart(table: &Table) -> Result<Chart> {
    Ok(Chart {
        element: ElementKind::Curve,
        group: None,
        label: None,
        kdims: vec![Dimension::new("Z").label("Z").unit("m").range(-32.0, 32.0)],
        vdims: vec![Dimension::new("X").label("X").unit("m")],
        data: ChartData::Columns(vec![column(table, "Z")?, column(table, "X")?]),
        opts: Options {
            width: Some(CHART_WIDTH),
            height: Some(400),
            color: Some("blue".to_string()),
            alpha: Some(0.3),
            ..Options::bare()
        },
    })
}

fn paths(segments: &[Segment]) -> ChartData {
    ChartData::Paths(segments.iter().map(|s| s.points().to_vec()).collect())
}

/// A `+` marker at the fractional tunes.
pub fn tunes_chart(nu_x: f64, nu_y: f64) -> Chart {
    Chart {
        element: ElementKind::Path,
        group: None,
        label: None,
        kdims: vec![Dimension::new("x"), Dimension::new("y")],
        vdims: Vec::new(),
        data: paths(&tunes::plus_marker(nu_x, nu_y, PLUS_HALF_LENGTH)),
        opts: Options {
            color: Some(TUNES_COLOR.to_string()),
            line_width: Some(4.0),
            ..Options::default()
        },
    }
}

/// The resonance lines in the unit tune square.
pub fn resonance_chart(segments: &[Segment], color: &str) -> Chart {
    Chart {
        element: ElementKind::Path,
        group: None,
        label: None,
        kdims: vec![
            Dimension::new("ν_x").range(0.0, 1.0),
            Dimension::new("ν_y").range(0.0, 1.0),
        ],
        vdims: Vec::new(),
        data: paths(segments),
        opts: Options {
            width: Some(CHART_WIDTH),
            height: Some(CHART_WIDTH),
            color: Some(color.to_string()),
            line_width: Some(1.0),
            ..Options::default()
        },
    }
}

/// Draws `charts` on shared axes; the first chart's dimensions win.
pub fn overlay(charts: Vec<Chart>) -> Chart {
    let (kdims, vdims) = charts
        .first()
        .map(|c| (c.kdims.clone(), c.vdims.clone()))
        .unwrap_or_default();
    Chart {
        element: ElementKind::Overlay,
        group: None,
        label: None,
        kdims,
        vdims,
        data: ChartData::Layers(charts),
        opts: Options::default(),
    }
}

/// Where a plotting call takes its data from.
#[derive(Debug, Clone, Copy)]
pub enum PlotSource<'a> {
    Table(&'a Table),
    File(&'a Path),
}

impl<'a> From<&'a Table> for PlotSource<'a> {
    fn from(table: &'a Table) -> Self {
        PlotSource::Table(table)
    }
}

impl<'a> From<&'a Path> for PlotSource<'a> {
    fn from(path: &'a Path) -> Self {
        PlotSource::File(path)
    }
}

/// Chart front end that reads SDDS files on demand.
///
/// Every method returns `None` after logging when the data cannot be read
/// or lacks a required column.
#[derive(Debug, Clone)]
pub struct HvGraphics<R> {
    converter: Converter<R>,
    mag_file: PathBuf,
}

impl<R: CommandRunner> HvGraphics<R> {
    pub fn new(converter: Converter<R>) -> Self {
        Self {
            converter,
            mag_file: PathBuf::from(DEFAULT_MAG_FILE),
        }
    }

    /// Magnet profile file combined with a floor file by [`Self::acc_view_plot`].
    pub fn with_mag_file(mut self, mag_file: impl Into<PathBuf>) -> Self {
        self.mag_file = mag_file.into();
        self
    }

    pub fn converter(&self) -> &Converter<R> {
        &self.converter
    }

    pub fn plot_structure<'a>(&self, source: impl Into<PlotSource<'a>>) -> Option<Chart> {
        let chart = match source.into() {
            PlotSource::Table(table) => structure_chart(table),
            PlotSource::File(path) => structure_chart(&self.converter.sdds_to_table(path, &MAG_COLUMNS)?),
        };
        log_failure("structure", chart)
    }

    pub fn plot_function<'a>(
        &self,
        source: impl Into<PlotSource<'a>>,
        func: &str,
        color: &str,
        label: &str,
    ) -> Option<Chart> {
        let chart = match source.into() {
            PlotSource::Table(table) => function_chart(table, func, color, label),
            PlotSource::File(path) => {
                let table = self
                    .converter
                    .sdds_to_table(path, &["ElementName", "s", func])?;
                function_chart(&table, func, color, label)
            }
        };
        log_failure(func, chart)
    }

    /// Plots a lattice view table, or builds one from a floor coordinate file.
    pub fn acc_view_plot<'a>(&self, source: impl Into<PlotSource<'a>>) -> Option<Chart> {
        let chart = match source.into() {
            PlotSource::Table(table) => view_chart(table),
            PlotSource::File(path) => view_chart(&self.converter.acc_view(path, &self.mag_file)?),
        };
        log_failure("lattice view", chart)
    }

    pub fn tunes(&self, nu_x: f64, nu_y: f64) -> Chart {
        tunes_chart(nu_x, nu_y)
    }

    pub fn res_diag(&self, segments: &[Segment], color: &str) -> Chart {
        resonance_chart(segments, color)
    }
}

fn log_failure(what: &str, chart: Result<Chart>) -> Option<Chart> {
    chart
        .map_err(|e| error!("[CHARTS] cannot plot {what}: {e}"))
        .ok()
}
