use std::convert::TryFrom;
use std::fmt;

use chrono::NaiveDateTime;

use enum_map::Enum;

use serde::{Deserialize, Serialize};

use smartstring::alias::{String as SmartString};


/// Label under which the national total is added to the world table.
pub static CHINA: &'static str = "中国";


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum)]
pub enum FeedShape {
	Domestic,
	International,
}

impl FeedShape {
	pub fn label(&self) -> &'static str {
		match self {
			Self::Domestic => "domestic",
			Self::International => "international",
		}
	}
}

impl fmt::Display for FeedShape {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.label())
	}
}


/// Common view on the cumulative counters of a region or country.
pub trait CaseCounts {
	fn name(&self) -> &str;
	fn confirmed(&self) -> u64;
	fn healed(&self) -> u64;
	fn dead(&self) -> u64;
	fn current_active(&self) -> i64;
}

impl<'x, T: CaseCounts> CaseCounts for &'x T {
	fn name(&self) -> &str {
		(**self).name()
	}

	fn confirmed(&self) -> u64 {
		(**self).confirmed()
	}

	fn healed(&self) -> u64 {
		(**self).healed()
	}

	fn dead(&self) -> u64 {
		(**self).dead()
	}

	fn current_active(&self) -> i64 {
		(**self).current_active()
	}
}

fn exact_active(confirmed: u64, healed: u64, dead: u64) -> i128 {
	confirmed as i128 - healed as i128 - dead as i128
}

/// `confirmed - healed - dead`, or `None` if that does not fit an `i64`.
pub(crate) fn active_from_totals(confirmed: u64, healed: u64, dead: u64) -> Option<i64> {
	i64::try_from(exact_active(confirmed, healed, dead)).ok()
}


/// One province of the domestic feed.
///
/// `current_active` is always derived from the three totals and goes negative
/// when the feed reports more healed plus dead than confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionRecord {
	#[serde(rename = "province")]
	pub name: SmartString,
	#[serde(rename = "nowConfirm")]
	pub current_active: i64,
	#[serde(rename = "confirm")]
	pub confirmed: u64,
	#[serde(rename = "heal")]
	pub healed: u64,
	#[serde(rename = "dead")]
	pub dead: u64,
}

impl RegionRecord {
	/// Like [`RegionRecord::from_totals`], but clamps `current_active` to the
	/// `i64` range instead of failing.
	pub fn new<S: Into<SmartString>>(name: S, confirmed: u64, healed: u64, dead: u64) -> Self {
		let exact = exact_active(confirmed, healed, dead);
		let current_active = i64::try_from(exact).unwrap_or(
			if exact > 0 { i64::MAX } else { i64::MIN }
		);
		Self{
			name: name.into(),
			current_active,
			confirmed,
			healed,
			dead,
		}
	}

	/// Returns `None` if `confirmed - healed - dead` is out of `i64` range.
	pub fn from_totals<S: Into<SmartString>>(name: S, confirmed: u64, healed: u64, dead: u64) -> Option<Self> {
		Some(Self{
			name: name.into(),
			current_active: active_from_totals(confirmed, healed, dead)?,
			confirmed,
			healed,
			dead,
		})
	}
}

impl CaseCounts for RegionRecord {
	fn name(&self) -> &str {
		&self.name
	}

	fn confirmed(&self) -> u64 {
		self.confirmed
	}

	fn healed(&self) -> u64 {
		self.healed
	}

	fn dead(&self) -> u64 {
		self.dead
	}

	fn current_active(&self) -> i64 {
		self.current_active
	}
}


/// One country of the international feed.
///
/// `current_active` is whatever the feed reported as `nowConfirm`; it is not
/// checked against the totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryRecord {
	#[serde(rename = "country")]
	pub name: SmartString,
	#[serde(rename = "nowConfirm")]
	pub current_active: i64,
	#[serde(rename = "confirm")]
	pub confirmed: u64,
	#[serde(rename = "dead")]
	pub dead: u64,
	#[serde(rename = "heal")]
	pub healed: u64,
}

impl CaseCounts for CountryRecord {
	fn name(&self) -> &str {
		&self.name
	}

	fn confirmed(&self) -> u64 {
		self.confirmed
	}

	fn healed(&self) -> u64 {
		self.healed
	}

	fn dead(&self) -> u64 {
		self.dead
	}

	fn current_active(&self) -> i64 {
		self.current_active
	}
}


/// A country that survived the name join, carrying both labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedCountryRecord {
	pub english: SmartString,
	pub record: CountryRecord,
}

impl CaseCounts for JoinedCountryRecord {
	fn name(&self) -> &str {
		&self.english
	}

	fn confirmed(&self) -> u64 {
		self.record.confirmed
	}

	fn healed(&self) -> u64 {
		self.record.healed
	}

	fn dead(&self) -> u64 {
		self.record.dead
	}

	fn current_active(&self) -> i64 {
		self.record.current_active
	}
}


#[derive(Debug, Clone)]
pub struct DomesticFeed {
	pub last_update: NaiveDateTime,
	/// National total, shaped like a row of the international feed.
	pub china: CountryRecord,
	pub regions: Vec<RegionRecord>,
}

#[derive(Debug, Clone)]
pub struct InternationalFeed {
	pub countries: Vec<CountryRecord>,
}

impl InternationalFeed {
	/// The international list plus the national total, which the foreign feed
	/// does not carry.
	pub fn with_china(&self, domestic: &DomesticFeed) -> Vec<CountryRecord> {
		let mut result = Vec::with_capacity(self.countries.len() + 1);
		result.extend(self.countries.iter().filter(|c| c.name.as_str() != CHINA).cloned());
		result.push(domestic.china.clone());
		result
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn region_active_is_derived() {
		let r = RegionRecord::new("Hubei", 68000, 63000, 4500);
		assert_eq!(r.current_active, 500);
		assert_eq!(r.name.as_str(), "Hubei");
	}

	#[test]
	fn region_active_may_go_negative() {
		let r = RegionRecord::new("Xizang", 10, 9, 3);
		assert_eq!(r.current_active, -2);
	}

	#[test]
	fn region_active_out_of_range() {
		assert!(RegionRecord::from_totals("Y", u64::MAX, 0, 0).is_none());
		assert!(RegionRecord::from_totals("Y", 0, u64::MAX, u64::MAX).is_none());
		assert_eq!(RegionRecord::new("Y", u64::MAX, 0, 0).current_active, i64::MAX);
		assert_eq!(RegionRecord::new("Y", 0, i64::MAX as u64, 2).current_active, i64::MIN);
		assert_eq!(RegionRecord::from_totals("Y", 0, i64::MAX as u64, 1).unwrap().current_active, i64::MIN);
	}

	#[test]
	fn joined_counts_use_english_name() {
		let j = JoinedCountryRecord{
			english: "United States".into(),
			record: CountryRecord{
				name: "美国".into(),
				current_active: 7,
				confirmed: 10,
				dead: 1,
				healed: 2,
			},
		};
		assert_eq!(j.name(), "United States");
		assert_eq!(j.current_active(), 7);
		assert_eq!(j.healed(), 2);
	}
}
