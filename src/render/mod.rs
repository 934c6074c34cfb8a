//! Output artifacts for a single run: ECharts pages and SVG images.
//!
//! None of these renderers look at anything but the rows they are handed; the
//! pipeline decides which rows (filtered, sorted, truncated) go where.

use std::fmt;
use std::fmt::Write;

mod echarts;
mod squares;
mod wordcloud;

pub use echarts::{bar_chart, map_chart, BarChart, MapChart, Piece, CHINA_PIECES, WORLD_PIECES};
pub use squares::{square_grid, Square, SquareGrid};
pub use wordcloud::{PlacedWord, WordCloud};


/// Where the generated pages load ECharts and its map shapes from.
pub static ASSETS_HOST: &'static str = "https://assets.pyecharts.org/assets/";


#[derive(Debug)]
pub enum Error {
	Format(fmt::Error),
	Json(serde_json::Error),
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Format(_) => f.write_str("failed to format page"),
			Self::Json(e) => write!(f, "failed to serialize chart options: {}", e),
		}
	}
}

impl std::error::Error for Error {}

impl From<fmt::Error> for Error {
	fn from(other: fmt::Error) -> Self {
		Self::Format(other)
	}
}

impl From<serde_json::Error> for Error {
	fn from(other: serde_json::Error) -> Self {
		Self::Json(other)
	}
}


pub(crate) fn write_escaped<W: Write>(w: &mut W, s: &str) -> fmt::Result {
	for c in s.chars() {
		match c {
			'&' => w.write_str("&amp;")?,
			'<' => w.write_str("&lt;")?,
			'>' => w.write_str("&gt;")?,
			'"' => w.write_str("&quot;")?,
			'\'' => w.write_str("&#39;")?,
			c => w.write_char(c)?,
		}
	}
	Ok(())
}
