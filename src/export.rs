use std::io;

use serde::Serialize;

use csv;

use super::context::{CountryRecord, JoinedCountryRecord, RegionRecord};


static REGION_HEADER: &'static [&'static str] = &["province", "nowConfirm", "confirm", "heal", "dead"];
static COUNTRY_HEADER: &'static [&'static str] = &["country", "nowConfirm", "confirm", "dead", "heal"];
static JOINED_HEADER: &'static [&'static str] = &["english", "country", "nowConfirm", "confirm", "dead", "heal"];


/// csv derives the header from the first serialized row, so an empty table
/// gets `header` written explicitly.
fn write_rows<W: io::Write, T: Serialize>(w: W, header: &[&str], rows: &[T]) -> io::Result<()> {
	let mut w = csv::Writer::from_writer(w);
	if rows.is_empty() {
		w.write_record(header)?;
	}
	for row in rows.iter() {
		w.serialize(row)?;
	}
	w.flush()?;
	Ok(())
}

/// `province,nowConfirm,confirm,heal,dead`
pub fn write_regions<W: io::Write>(w: W, regions: &[RegionRecord]) -> io::Result<()> {
	write_rows(w, REGION_HEADER, regions)
}

/// `country,nowConfirm,confirm,dead,heal`
pub fn write_countries<W: io::Write>(w: W, countries: &[CountryRecord]) -> io::Result<()> {
	write_rows(w, COUNTRY_HEADER, countries)
}


#[derive(Debug, Serialize)]
struct JoinedRow<'x> {
	english: &'x str,
	country: &'x str,
	#[serde(rename = "nowConfirm")]
	current_active: i64,
	confirm: u64,
	dead: u64,
	heal: u64,
}

/// `english,country,nowConfirm,confirm,dead,heal`
pub fn write_joined<W: io::Write>(w: W, joined: &[JoinedCountryRecord]) -> io::Result<()> {
	let rows: Vec<JoinedRow> = joined.iter().map(|j| JoinedRow{
		english: &j.english,
		country: &j.record.name,
		current_active: j.record.current_active,
		confirm: j.record.confirmed,
		dead: j.record.dead,
		heal: j.record.healed,
	}).collect();
	write_rows(w, JOINED_HEADER, &rows)
}
