use std::fmt;
use std::fmt::Write;

use log::debug;

use super::write_escaped;


static PALETTE: &'static [&'static str] = &[
	"#29648c", "#893448", "#ff585e", "#fb8146", "#69c864", "#ffa500", "#5470c6", "#73c0de",
];


#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
	pub text: String,
	pub weight: u64,
	pub font_size: f64,
	/// Left end of the baseline.
	pub x: f64,
	pub y: f64,
	pub width: f64,
}


/// Frequency-weighted word cloud rendered as SVG text.
///
/// Words are placed largest first in centered rows; whatever does not fit on
/// the canvas is left out. Text widths are estimated, CJK glyphs as one em and
/// everything else as 0.6 em.
#[derive(Debug, Clone)]
pub struct WordCloud {
	pub width: u32,
	pub height: u32,
	pub min_font: f64,
	pub max_font: f64,
	pub margin: f64,
}

impl Default for WordCloud {
	fn default() -> Self {
		Self{
			width: 1000,
			height: 600,
			min_font: 12.0,
			max_font: 96.0,
			margin: 10.0,
		}
	}
}

fn estimate_width(text: &str, font_size: f64) -> f64 {
	text.chars().map(|c| {
		if c >= '\u{2e80}' {
			font_size
		} else {
			font_size * 0.6
		}
	}).sum()
}

impl WordCloud {
	fn font_size(&self, weight: u64, max_weight: u64) -> f64 {
		let t = (weight as f64 / max_weight as f64).sqrt();
		self.min_font + (self.max_font - self.min_font) * t
	}

	pub fn layout(&self, words: &[(&str, u64)]) -> Vec<PlacedWord> {
		let mut sorted: Vec<(&str, u64)> = words.iter()
			.filter(|(text, weight)| *weight > 0 && !text.is_empty())
			.copied()
			.collect();
		sorted.sort_by(|a, b| b.1.cmp(&a.1));
		let max_weight = match sorted.first() {
			Some((_, w)) => *w,
			None => return Vec::new(),
		};

		let usable = self.width as f64 - 2.0 * self.margin;
		let mut rows: Vec<Vec<PlacedWord>> = Vec::new();
		let mut row: Vec<PlacedWord> = Vec::new();
		let mut x = 0.0;
		let mut top = self.margin;
		let mut row_height: f64 = 0.0;
		let mut dropped = 0;
		for (text, weight) in sorted.into_iter() {
			let mut font_size = self.font_size(weight, max_weight);
			let mut width = estimate_width(text, font_size);
			if width > usable {
				font_size *= usable / width;
				width = usable;
			}
			let spacing = if row.is_empty() { 0.0 } else { font_size * 0.4 };
			if !row.is_empty() && x + spacing + width > usable {
				top += row_height * 1.15;
				rows.push(std::mem::replace(&mut row, Vec::new()));
				x = 0.0;
				row_height = 0.0;
			}
			let spacing = if row.is_empty() { 0.0 } else { font_size * 0.4 };
			let line_height = row_height.max(font_size);
			if top + line_height > self.height as f64 - self.margin {
				dropped += 1;
				continue
			}
			row.push(PlacedWord{
				text: text.to_string(),
				weight,
				font_size,
				x: x + spacing,
				y: 0.0,
				width,
			});
			x += spacing + width;
			row_height = line_height;
		}
		if !row.is_empty() {
			rows.push(row);
		}
		if dropped > 0 {
			debug!("word cloud dropped {} words which did not fit", dropped);
		}

		// center each row horizontally and put all words of a row on a common
		// baseline
		let mut result = Vec::new();
		let mut top = self.margin;
		for row in rows.into_iter() {
			let height = row.iter().fold(0.0f64, |acc, w| acc.max(w.font_size));
			let used = row.last().map(|w| w.x + w.width).unwrap_or(0.0);
			let offset = self.margin + (usable - used) / 2.0;
			let baseline = top + height * 0.85;
			for mut word in row.into_iter() {
				word.x += offset;
				word.y = baseline;
				result.push(word);
			}
			top += height * 1.15;
		}
		result
	}

	pub fn render_svg(&self, words: &[(&str, u64)]) -> Result<String, fmt::Error> {
		let mut out = String::new();
		writeln!(
			out,
			"<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">",
			w = self.width,
			h = self.height,
		)?;
		writeln!(out, "<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>")?;
		for (i, word) in self.layout(words).iter().enumerate() {
			write!(
				out,
				"<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"{:.2}\" font-weight=\"bold\" fill=\"{}\">",
				word.x, word.y, word.font_size, PALETTE[i % PALETTE.len()],
			)?;
			write_escaped(&mut out, &word.text)?;
			out.write_str("</text>\n")?;
		}
		out.write_str("</svg>\n")?;
		Ok(out)
	}
}
