use std::fmt::Write;

use serde::Serialize;
use serde_json::{json, Value};

use super::{write_escaped, Error, ASSETS_HOST};


#[derive(Debug, Clone, Copy, Serialize)]
pub struct Piece {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max: Option<i64>,
	pub label: &'static str,
	pub color: &'static str,
}

const fn piece(min: Option<i64>, max: Option<i64>, label: &'static str, color: &'static str) -> Piece {
	Piece{min, max, label, color}
}

/// Color bands for current active cases per province.
pub static CHINA_PIECES: &'static [Piece] = &[
	piece(Some(5000), None, ">5000", "#893448"),
	piece(Some(1000), Some(4999), "1000-4999", "#ff585e"),
	piece(Some(500), Some(999), "500-1000", "#fb8146"),
	piece(Some(101), Some(499), "101-499", "#ffA500"),
	piece(Some(10), Some(100), "10-100", "#ffb248"),
	piece(Some(1), Some(9), "1-9", "#fff2d1"),
	piece(None, Some(1), "0", "#ffffff"),
];

/// Color bands for current active cases per country.
pub static WORLD_PIECES: &'static [Piece] = &[
	piece(Some(20000), None, ">20000", "#893448"),
	piece(Some(10000), Some(19999), "10000-19999", "#ff585e"),
	piece(Some(5000), Some(9999), "5000-9999", "#fb8146"),
	piece(Some(1001), Some(4999), "1001-4999", "#ffA500"),
	piece(Some(100), Some(1000), "100-1000", "#ffb248"),
	piece(Some(0), Some(99), "0-99", "#fff2d1"),
];


fn page(title: &str, scripts: &[String], width: u32, height: u32, option: &Value) -> Result<String, Error> {
	// keep "</script>" inside string values from ending the block early
	let option = serde_json::to_string(option)?.replace("</", "<\\/");
	let mut out = String::new();
	out.write_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>")?;
	write_escaped(&mut out, title)?;
	out.write_str("</title>\n")?;
	for src in scripts.iter() {
		writeln!(out, "<script type=\"text/javascript\" src=\"{}\"></script>", src)?;
	}
	write!(
		out,
		"</head>\n<body>\n<div id=\"chart\" style=\"width:{}px; height:{}px;\"></div>\n<script type=\"text/javascript\">\nvar chart = echarts.init(document.getElementById('chart'), 'white', {{renderer: 'canvas'}});\nchart.setOption({});\n</script>\n</body>\n</html>\n",
		width, height, option,
	)?;
	Ok(out)
}


#[derive(Debug, Clone)]
pub struct MapChart {
	pub title: String,
	pub subtitle: Option<String>,
	/// ECharts map name, `china` or `world`.
	pub map: &'static str,
	pub show_labels: bool,
	pub pieces: &'static [Piece],
}

/// Piecewise choropleth of one integer value per named area.
pub fn map_chart(chart: &MapChart, data: &[(&str, i64)]) -> Result<String, Error> {
	let data: Vec<Value> = data.iter()
		.map(|(name, value)| json!({"name": name, "value": value}))
		.collect();
	let option = json!({
		"title": {
			"text": chart.title,
			"subtext": chart.subtitle.as_deref().unwrap_or(""),
		},
		"tooltip": {"trigger": "item"},
		"visualMap": {
			"type": "piecewise",
			"pieces": chart.pieces,
		},
		"series": [{
			"type": "map",
			"map": chart.map,
			"showLegendSymbol": false,
			"label": {"show": chart.show_labels},
			"data": data,
		}],
	});
	let scripts = vec![
		format!("{}echarts.min.js", ASSETS_HOST),
		format!("{}maps/{}.js", ASSETS_HOST, chart.map),
	];
	page(&chart.title, &scripts, 900, 500, &option)
}


#[derive(Debug, Clone)]
pub struct BarChart {
	pub title: String,
	pub series: String,
	pub width: u32,
	pub height: u32,
	pub rotate_x: i32,
	pub rotate_y: Option<i32>,
}

/// Bar chart of one ratio per category, rounded to two decimals.
pub fn bar_chart(chart: &BarChart, data: &[(&str, f64)]) -> Result<String, Error> {
	let categories: Vec<&str> = data.iter().map(|(name, _)| *name).collect();
	let values: Vec<f64> = data.iter().map(|(_, v)| (v * 100.0).round() / 100.0).collect();
	let mut y_axis = json!({"type": "value"});
	if let Some(r) = chart.rotate_y {
		y_axis["axisLabel"] = json!({"rotate": r});
	}
	let option = json!({
		"title": {"text": chart.title},
		"tooltip": {"trigger": "axis"},
		"legend": {"data": [chart.series]},
		"xAxis": {
			"type": "category",
			"data": categories,
			"axisLabel": {"rotate": chart.rotate_x, "interval": 0},
		},
		"yAxis": y_axis,
		"series": [{
			"type": "bar",
			"name": chart.series,
			"data": values,
		}],
	});
	let scripts = vec![format!("{}echarts.min.js", ASSETS_HOST)];
	page(&chart.title, &scripts, chart.width, chart.height, &option)
}
