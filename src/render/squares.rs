use std::fmt;
use std::fmt::Write;

use crate::context::CaseCounts;

use super::write_escaped;


static CONFIRMED_COLOR: &'static str = "#29648c";
static HEALED_COLOR: &'static str = "#69c864";
static DEAD_COLOR: &'static str = "#000000";
static BACKGROUND: &'static str = "#fafaf0";

static CELL: f64 = 200.0;
static GAP: f64 = 20.0;
static TITLE_HEIGHT: f64 = 30.0;
static HEADER_HEIGHT: f64 = 60.0;


#[derive(Debug, Clone, PartialEq)]
pub struct Square {
	pub label: String,
	pub confirmed: u64,
	pub healed: u64,
	pub dead: u64,
}

impl Square {
	pub fn of<T: CaseCounts>(rec: &T) -> Self {
		Self{
			label: rec.name().to_string(),
			confirmed: rec.confirmed(),
			healed: rec.healed(),
			dead: rec.dead(),
		}
	}
}


/// Nested squares whose side lengths are proportional to the confirmed,
/// healed and dead counts, laid out in a grid.
///
/// All cells share one scale: a count equal to `scale` fills a whole cell.
#[derive(Debug, Clone)]
pub struct SquareGrid {
	pub title: String,
	pub columns: usize,
	pub scale: u64,
}

impl SquareGrid {
	fn side(&self, count: u64) -> f64 {
		if self.scale == 0 {
			return 0.0
		}
		(count as f64 / self.scale as f64).min(1.0) * CELL
	}

	fn write_square<W: Write>(&self, w: &mut W, cx: f64, cy: f64, count: u64, color: &str) -> fmt::Result {
		let side = self.side(count);
		if side <= 0.0 {
			return Ok(())
		}
		writeln!(
			w,
			"<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
			cx - side / 2.0, cy - side / 2.0, side, side, color,
		)
	}

	fn write_cell<W: Write>(&self, w: &mut W, x: f64, y: f64, sq: &Square) -> fmt::Result {
		write!(w, "<g>\n<text x=\"{:.2}\" y=\"{:.2}\" font-size=\"20\" text-anchor=\"middle\">", x + CELL / 2.0, y + 22.0)?;
		write_escaped(w, &sq.label)?;
		w.write_str("</text>\n")?;
		let top = y + TITLE_HEIGHT;
		writeln!(
			w,
			"<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>",
			x, top, CELL, CELL, BACKGROUND,
		)?;
		let (cx, cy) = (x + CELL / 2.0, top + CELL / 2.0);
		self.write_square(w, cx, cy, sq.confirmed, CONFIRMED_COLOR)?;
		self.write_square(w, cx, cy, sq.healed, HEALED_COLOR)?;
		self.write_square(w, cx, cy, sq.dead, DEAD_COLOR)?;
		w.write_str("</g>\n")
	}

	fn write_legend<W: Write>(&self, w: &mut W, x: f64) -> fmt::Result {
		let entries = [("confirm", CONFIRMED_COLOR), ("heal", HEALED_COLOR), ("dead", DEAD_COLOR)];
		for (i, (label, color)) in entries.iter().enumerate() {
			let lx = x + (i as f64) * 110.0;
			writeln!(w, "<rect x=\"{:.2}\" y=\"40\" width=\"14\" height=\"14\" fill=\"{}\"/>", lx, color)?;
			writeln!(w, "<text x=\"{:.2}\" y=\"52\" font-size=\"14\">{}</text>", lx + 20.0, label)?;
		}
		Ok(())
	}

	pub fn render(&self, cells: &[Square]) -> Result<String, fmt::Error> {
		let columns = self.columns.max(1);
		let rows = (cells.len() + columns - 1) / columns;
		let width = GAP + (columns as f64) * (CELL + GAP);
		let height = HEADER_HEIGHT + GAP + (rows as f64) * (CELL + TITLE_HEIGHT + GAP);

		let mut out = String::new();
		writeln!(
			out,
			"<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.0}\" height=\"{:.0}\" viewBox=\"0 0 {:.0} {:.0}\">",
			width, height, width, height,
		)?;
		writeln!(out, "<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>")?;
		write!(out, "<text x=\"{:.2}\" y=\"28\" font-size=\"24\" text-anchor=\"middle\">", width / 2.0)?;
		write_escaped(&mut out, &self.title)?;
		out.write_str("</text>\n")?;
		self.write_legend(&mut out, GAP)?;
		for (i, sq) in cells.iter().enumerate() {
			let x = GAP + ((i % columns) as f64) * (CELL + GAP);
			let y = HEADER_HEIGHT + GAP + ((i / columns) as f64) * (CELL + TITLE_HEIGHT + GAP);
			self.write_cell(&mut out, x, y, sq)?;
		}
		out.write_str("</svg>\n")?;
		Ok(out)
	}
}

pub fn square_grid(title: &str, columns: usize, scale: u64, cells: &[Square]) -> Result<String, fmt::Error> {
	SquareGrid{
		title: title.to_string(),
		columns,
		scale,
	}.render(cells)
}


#[cfg(test)]
mod tests {
	use super::*;

	fn sq(label: &str, confirmed: u64, healed: u64, dead: u64) -> Square {
		Square{label: label.into(), confirmed, healed, dead}
	}

	#[test]
	fn sides_share_one_scale() {
		let grid = SquareGrid{title: "t".into(), columns: 5, scale: 1000};
		assert_eq!(grid.side(1000), CELL);
		assert_eq!(grid.side(250), CELL / 4.0);
		// larger than the reference count is clipped to the cell
		assert_eq!(grid.side(5000), CELL);
	}

	#[test]
	fn zero_scale_draws_no_squares() {
		let svg = square_grid("空", 1, 0, &[sq("x", 0, 0, 0)]).unwrap();
		// background and cell only
		assert_eq!(svg.matches(CONFIRMED_COLOR).count(), 1);
		assert_eq!(svg.matches(BACKGROUND).count(), 1);
	}

	#[test]
	fn one_group_per_cell() {
		let cells = vec![sq("湖北", 68000, 63000, 4500), sq("A&B", 10, 5, 1), sq("c", 1, 0, 0)];
		let svg = square_grid("COVID-19 Square - China", 2, 68000, &cells).unwrap();
		assert!(svg.starts_with("<svg"));
		assert!(svg.trim_end().ends_with("</svg>"));
		assert_eq!(svg.matches("<g>").count(), 3);
		assert!(svg.contains("A&amp;B"));
		// two rows of two columns
		assert!(svg.contains("height=\"580\""));
	}
}
