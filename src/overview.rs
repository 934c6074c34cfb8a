use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use log::{debug, info};

use super::context::{CountryRecord, DomesticFeed, InternationalFeed, RegionRecord};
use super::export;
use super::names::{join, JoinReport, NameMapping};
use super::progress::{ProgressSink, StepMeter};
use super::rates::{sort_desc, with_rates, RateFilter, RateKey, RateRecord};
use super::render;


static TOP_PROVINCES: usize = 25;
static TOP_COUNTRIES: usize = 20;


#[derive(Debug)]
pub enum Error {
	IO(io::Error),
	Render(fmt::Error),
	Chart(serde_json::Error),
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::IO(e) => fmt::Display::fmt(e, f),
			Self::Render(_) => f.write_str("failed to render image"),
			Self::Chart(e) => write!(f, "failed to serialize chart options: {}", e),
		}
	}
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
	fn from(other: io::Error) -> Self {
		Self::IO(other)
	}
}

impl From<fmt::Error> for Error {
	fn from(other: fmt::Error) -> Self {
		Self::Render(other)
	}
}

impl From<serde_json::Error> for Error {
	fn from(other: serde_json::Error) -> Self {
		Self::Chart(other)
	}
}

impl From<render::Error> for Error {
	fn from(other: render::Error) -> Self {
		match other {
			render::Error::Format(e) => Self::Render(e),
			render::Error::Json(e) => Self::Chart(e),
		}
	}
}


/// Everything derived from one pair of feed snapshots.
#[derive(Debug, Clone)]
pub struct Tables {
	pub last_update: NaiveDateTime,
	pub china: CountryRecord,
	pub regions: Vec<RegionRecord>,
	/// Foreign countries plus the national total.
	pub world: Vec<CountryRecord>,
	pub join: JoinReport,
	/// Provinces passing [`RateFilter::DOMESTIC`], highest heal rate first.
	pub region_rates: Vec<RateRecord<RegionRecord>>,
	/// Countries passing [`RateFilter::INTERNATIONAL`], highest dead rate first.
	pub world_rates: Vec<RateRecord<CountryRecord>>,
}

impl Tables {
	pub fn build(domestic: DomesticFeed, international: InternationalFeed, names: &NameMapping) -> Self {
		let world = international.with_china(&domestic);
		let join = join(&world, names);
		join.log_gaps();

		let mut region_rates = RateFilter::DOMESTIC.apply(with_rates(domestic.regions.iter().cloned()));
		sort_desc(&mut region_rates, RateKey::HealRate);
		let mut world_rates = RateFilter::INTERNATIONAL.apply(with_rates(world.iter().cloned()));
		sort_desc(&mut world_rates, RateKey::DeadRate);

		info!(
			"{} provinces, {} countries ({} on the world map), data as of {}",
			domestic.regions.len(),
			world.len(),
			join.joined.len(),
			domestic.last_update,
		);
		Self{
			last_update: domestic.last_update,
			china: domestic.china,
			regions: domestic.regions,
			world,
			join,
			region_rates,
			world_rates,
		}
	}

	/// The national total followed by the provinces with the most confirmed
	/// cases.
	pub fn china_squares(&self) -> Vec<render::Square> {
		let mut ranked = with_rates(self.regions.iter());
		sort_desc(&mut ranked, RateKey::Confirmed);
		let mut result = vec![render::Square::of(&self.china)];
		result.extend(ranked.iter().take(TOP_PROVINCES).map(|r| render::Square::of(r.inner)));
		result
	}

	/// The mapped countries with the most confirmed cases, by english name.
	pub fn world_squares(&self) -> Vec<render::Square> {
		let mut ranked = with_rates(self.join.joined.iter());
		sort_desc(&mut ranked, RateKey::Confirmed);
		ranked.iter().take(TOP_COUNTRIES).map(|r| render::Square::of(r.inner)).collect()
	}
}

pub static ARTIFACTS: &'static [&'static str] = &[
	"domestic.csv",
	"international.csv",
	"world_joined.csv",
	"china_map.html",
	"world_map.html",
	"china_rates.html",
	"world_rates.html",
	"china_squares.svg",
	"world_squares.svg",
	"china_wordcloud.svg",
	"world_wordcloud.svg",
];

fn write_text(path: &Path, text: &str) -> io::Result<()> {
	fs::write(path, text.as_bytes())
}

fn write_artifact(tables: &Tables, name: &str, path: &Path) -> Result<(), Error> {
	let subtitle = format!("{}", tables.last_update);
	match name {
		"domestic.csv" => export::write_regions(io::BufWriter::new(fs::File::create(path)?), &tables.regions)?,
		"international.csv" => export::write_countries(io::BufWriter::new(fs::File::create(path)?), &tables.world)?,
		"world_joined.csv" => export::write_joined(io::BufWriter::new(fs::File::create(path)?), &tables.join.joined)?,
		"china_map.html" => {
			let data: Vec<(&str, i64)> = tables.regions.iter()
				.map(|r| (r.name.as_str(), r.current_active))
				.collect();
			write_text(path, &render::map_chart(&render::MapChart{
				title: "COVID-19中国现有地区现有确诊人数地图".into(),
				subtitle: Some(subtitle),
				map: "china",
				show_labels: true,
				pieces: render::CHINA_PIECES,
			}, &data)?)?
		},
		"world_map.html" => {
			let data: Vec<(&str, i64)> = tables.join.joined.iter()
				.map(|j| (j.english.as_str(), j.record.current_active))
				.collect();
			write_text(path, &render::map_chart(&render::MapChart{
				title: "COVID-19世界各国现有确诊人数地图".into(),
				subtitle: Some(subtitle),
				map: "world",
				show_labels: false,
				pieces: render::WORLD_PIECES,
			}, &data)?)?
		},
		"china_rates.html" => {
			let data: Vec<(&str, f64)> = tables.region_rates.iter()
				.map(|r| (r.name.as_str(), r.heal_rate))
				.collect();
			write_text(path, &render::bar_chart(&render::BarChart{
				title: "中国各省 COVID-19 治愈率".into(),
				series: "中国".into(),
				width: 900,
				height: 400,
				rotate_x: 45,
				rotate_y: None,
			}, &data)?)?
		},
		"world_rates.html" => {
			let data: Vec<(&str, f64)> = tables.world_rates.iter()
				.map(|r| (r.name.as_str(), r.dead_rate))
				.collect();
			write_text(path, &render::bar_chart(&render::BarChart{
				title: "世界各国 COVID-19 死亡率".into(),
				series: "世界".into(),
				width: 3500,
				height: 800,
				rotate_x: 90,
				rotate_y: Some(45),
			}, &data)?)?
		},
		"china_squares.svg" => write_text(path, &render::square_grid(
			"COVID-19 Square - China",
			5,
			tables.china.confirmed,
			&tables.china_squares(),
		)?)?,
		"world_squares.svg" => {
			let cells = tables.world_squares();
			let scale = cells.first().map(|c| c.confirmed).unwrap_or(0);
			write_text(path, &render::square_grid("COVID-19 Square - World", 4, scale, &cells)?)?
		},
		"china_wordcloud.svg" => {
			let words: Vec<(&str, u64)> = tables.region_rates.iter()
				.map(|r| (r.name.as_str(), r.confirmed))
				.collect();
			write_text(path, &render::WordCloud::default().render_svg(&words)?)?
		},
		"world_wordcloud.svg" => {
			let words: Vec<(&str, u64)> = tables.world_rates.iter()
				.map(|r| (r.name.as_str(), r.confirmed))
				.collect();
			write_text(path, &render::WordCloud::default().render_svg(&words)?)?
		},
		other => {
			return Err(Error::IO(io::Error::new(
				io::ErrorKind::InvalidInput,
				format!("unknown artifact {}", other),
			)))
		},
	};
	Ok(())
}

/// Write every file of [`ARTIFACTS`] into `outdir`, creating it if needed.
pub fn write_artifacts<P: AsRef<Path>, S: ProgressSink + ?Sized>(
	tables: &Tables,
	outdir: P,
	progress: &mut S,
) -> Result<Vec<PathBuf>, Error> {
	let outdir = outdir.as_ref();
	fs::create_dir_all(outdir)?;
	let mut pm = StepMeter::new(progress, ARTIFACTS.len());
	let mut result = Vec::with_capacity(ARTIFACTS.len());
	for name in ARTIFACTS.iter() {
		let path = outdir.join(name);
		pm.step(name);
		write_artifact(tables, name, &path)?;
		debug!("wrote {}", path.display());
		result.push(path);
	}
	pm.finish();
	Ok(result)
}


#[cfg(test)]
mod tests {
	use super::*;

	use chrono::NaiveDate;

	use crate::context::CHINA;

	fn country(name: &str, now: i64, confirmed: u64, dead: u64, healed: u64) -> CountryRecord {
		CountryRecord{name: name.into(), current_active: now, confirmed, dead, healed}
	}

	fn sample() -> Tables {
		let domestic = DomesticFeed{
			last_update: NaiveDate::from_ymd(2022, 11, 20).and_hms(14, 33, 0),
			china: country(CHINA, 300, 1000, 50, 650),
			regions: vec![
				RegionRecord::new("湖北", 600, 500, 20),
				RegionRecord::new("北京", 300, 100, 0),
				RegionRecord::new("广东", 100, 50, 30),
			],
		};
		let international = InternationalFeed{
			countries: vec![
				country("美国", 10, 500, 20, 100),
				country("Atlantis", 1, 10, 1, 1),
				country("日本", 1, 100, 0, 99),
			],
		};
		Tables::build(domestic, international, &NameMapping::builtin())
	}

	#[test]
	fn world_gets_national_total_once() {
		let t = sample();
		assert_eq!(t.world.len(), 4);
		assert_eq!(t.world.iter().filter(|c| c.name.as_str() == CHINA).count(), 1);
		assert_eq!(t.join.gaps.len(), 1);
		assert_eq!(t.join.gaps[0].as_str(), "Atlantis");
		assert!(t.join.joined.iter().any(|j| j.english.as_str() == "China"));
	}

	#[test]
	fn rate_tables_are_filtered_and_sorted() {
		let t = sample();
		// 北京 has no deaths
		let names: Vec<&str> = t.region_rates.iter().map(|r| r.name.as_str()).collect();
		assert_eq!(names, vec!["湖北", "广东"]);
		// 日本 has no deaths; by dead rate Atlantis 10%, 中国 5%, 美国 4%
		let names: Vec<&str> = t.world_rates.iter().map(|r| r.name.as_str()).collect();
		assert_eq!(names, vec!["Atlantis", CHINA, "美国"]);
	}

	#[test]
	fn squares_rank_by_confirmed() {
		let t = sample();
		let labels: Vec<String> = t.china_squares().into_iter().map(|s| s.label).collect();
		assert_eq!(labels, vec![CHINA, "湖北", "北京", "广东"]);
		let labels: Vec<String> = t.world_squares().into_iter().map(|s| s.label).collect();
		assert_eq!(labels, vec!["China", "United States", "Japan"]);
	}

	#[derive(Default)]
	struct Quiet(usize);

	impl ProgressSink for Quiet {
		fn update(&mut self, _done: usize, _total: usize, _what: &str) {
			self.0 += 1;
		}

		fn finish(&mut self, _total: usize) {}
	}

	#[test]
	fn writes_every_artifact() {
		let dir = tempfile::tempdir().unwrap();
		let mut quiet = Quiet::default();
		let written = write_artifacts(&sample(), dir.path().join("out"), &mut quiet).unwrap();
		assert_eq!(written.len(), ARTIFACTS.len());
		assert_eq!(quiet.0, ARTIFACTS.len());
		for path in written.iter() {
			let meta = fs::metadata(path).unwrap();
			assert!(meta.len() > 0, "{} is empty", path.display());
		}
		let csv = fs::read_to_string(dir.path().join("out").join("domestic.csv")).unwrap();
		assert!(csv.starts_with("province,nowConfirm,confirm,heal,dead\n湖北,80,600,500,20\n"));
	}
}
