use std::fmt;

use log::debug;

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

use chrono::NaiveDateTime;

use smartstring::alias::{String as SmartString};

use super::context::{
	CountryRecord, DomesticFeed, FeedShape, InternationalFeed, RegionRecord, CHINA,
	active_from_totals,
};


/// The payload did not have the shape the feed is documented to have.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedInput {
	pub shape: FeedShape,
	/// Position of the offending entry in the feed's list, if the failure is
	/// attributable to a single entry.
	pub index: Option<usize>,
	pub reason: String,
}

impl MalformedInput {
	fn structural<S: Into<String>>(shape: FeedShape, reason: S) -> Self {
		Self{shape, index: None, reason: reason.into()}
	}

	fn at<S: Into<String>>(shape: FeedShape, index: usize, reason: S) -> Self {
		Self{shape, index: Some(index), reason: reason.into()}
	}
}

impl fmt::Display for MalformedInput {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self.index {
			Some(i) => write!(f, "malformed {} feed at entry #{}: {}", self.shape, i, self.reason),
			None => write!(f, "malformed {} feed: {}", self.shape, self.reason),
		}
	}
}

impl std::error::Error for MalformedInput {}


/// A row type which can be produced from one entry of a feed list.
pub trait FeedRecord: Sized + 'static {
	const SHAPE: FeedShape;

	fn from_entry(index: usize, entry: &Value) -> Result<Self, MalformedInput>;
}


/// Locate the list of per-entity entries inside a decoded payload.
pub fn entries(shape: FeedShape, payload: &Value) -> Result<&[Value], MalformedInput> {
	let list = match shape {
		FeedShape::Domestic => {
			let root = payload.get("areaTree")
				.and_then(Value::as_array)
				.ok_or_else(|| MalformedInput::structural(shape, "missing areaTree list"))?
				.first()
				.ok_or_else(|| MalformedInput::structural(shape, "areaTree is empty"))?;
			root.get("children")
		},
		FeedShape::International => payload.get("foreignList"),
	};
	match list.and_then(Value::as_array) {
		Some(v) => Ok(&v[..]),
		None => Err(MalformedInput::structural(shape, match shape {
			FeedShape::Domestic => "missing areaTree[0].children list",
			FeedShape::International => "missing foreignList list",
		})),
	}
}

/// Lazily convert the entries of a payload into rows.
///
/// The outer `Result` fails if the list itself cannot be found; each item
/// fails individually if its entry is malformed.
pub fn records<'x, R: FeedRecord>(
	payload: &'x Value,
) -> Result<impl Iterator<Item = Result<R, MalformedInput>> + 'x, MalformedInput> {
	let list = entries(R::SHAPE, payload)?;
	Ok(list.iter().enumerate().map(|(i, entry)| R::from_entry(i, entry)))
}

/// Convert all entries of a payload, failing on the first malformed one.
pub fn normalize<R: FeedRecord>(payload: &Value) -> Result<Vec<R>, MalformedInput> {
	let result = records::<R>(payload)?.collect::<Result<Vec<_>, _>>()?;
	debug!("normalized {} {} records", result.len(), R::SHAPE);
	Ok(result)
}


fn entry_error(shape: FeedShape, index: usize, entry: &Value, err: serde_json::Error) -> MalformedInput {
	match entry.get("name").and_then(Value::as_str) {
		Some(name) => MalformedInput::at(shape, index, format!("{} ({})", err, name)),
		None => MalformedInput::at(shape, index, err.to_string()),
	}
}


#[derive(Debug, Clone, Deserialize)]
struct RawTotals {
	confirm: u64,
	heal: u64,
	dead: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct RawAreaNode {
	name: SmartString,
	total: RawTotals,
}

#[derive(Debug, Clone, Deserialize)]
struct RawForeignEntry {
	name: SmartString,
	#[serde(rename = "nowConfirm")]
	now_confirm: i64,
	confirm: u64,
	dead: u64,
	heal: u64,
}

impl FeedRecord for RegionRecord {
	const SHAPE: FeedShape = FeedShape::Domestic;

	fn from_entry(index: usize, entry: &Value) -> Result<Self, MalformedInput> {
		let raw = RawAreaNode::deserialize(entry)
			.map_err(|e| entry_error(Self::SHAPE, index, entry, e))?;
		let total = raw.total;
		RegionRecord::from_totals(raw.name, total.confirm, total.heal, total.dead)
			.ok_or_else(|| MalformedInput::at(
				Self::SHAPE,
				index,
				format!(
					"current count out of range (confirm {}, heal {}, dead {})",
					total.confirm, total.heal, total.dead,
				),
			))
	}
}

impl FeedRecord for CountryRecord {
	const SHAPE: FeedShape = FeedShape::International;

	fn from_entry(index: usize, entry: &Value) -> Result<Self, MalformedInput> {
		let raw = RawForeignEntry::deserialize(entry)
			.map_err(|e| entry_error(Self::SHAPE, index, entry, e))?;
		Ok(CountryRecord{
			name: raw.name,
			current_active: raw.now_confirm,
			confirmed: raw.confirm,
			dead: raw.dead,
			healed: raw.heal,
		})
	}
}


fn qq_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
	where D: Deserializer<'de>
{
	let s = String::deserialize(deserializer)?;
	NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").map_err(de::Error::custom)
}

#[derive(Debug, Clone, Deserialize)]
struct RawDomesticHeader {
	#[serde(rename = "lastUpdateTime", deserialize_with = "qq_timestamp")]
	last_update: NaiveDateTime,
}

impl DomesticFeed {
	pub fn from_payload(payload: &Value) -> Result<Self, MalformedInput> {
		let shape = FeedShape::Domestic;
		let header = RawDomesticHeader::deserialize(payload)
			.map_err(|e| MalformedInput::structural(shape, e.to_string()))?;
		let total = payload.get("areaTree")
			.and_then(|v| v.get(0))
			.and_then(|v| v.get("total"))
			.ok_or_else(|| MalformedInput::structural(shape, "missing areaTree[0].total"))?;
		let total = RawTotals::deserialize(total)
			.map_err(|e| MalformedInput::structural(shape, format!("areaTree[0].total: {}", e)))?;
		let current_active = active_from_totals(total.confirm, total.heal, total.dead)
			.ok_or_else(|| MalformedInput::structural(shape, "areaTree[0].total: current count out of range"))?;
		let china = CountryRecord{
			name: CHINA.into(),
			current_active,
			confirmed: total.confirm,
			dead: total.dead,
			healed: total.heal,
		};
		Ok(Self{
			last_update: header.last_update,
			china,
			regions: normalize(payload)?,
		})
	}
}

impl InternationalFeed {
	pub fn from_payload(payload: &Value) -> Result<Self, MalformedInput> {
		Ok(Self{
			countries: normalize(payload)?,
		})
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	use serde_json::json;

	fn domestic_payload(children: Value) -> Value {
		json!({
			"lastUpdateTime": "2022-11-20 14:33:00",
			"areaTree": [{
				"name": "中国",
				"total": {"confirm": 1000, "heal": 700, "dead": 50},
				"children": children,
			}],
		})
	}

	#[test]
	fn domestic_computes_current_active() {
		let payload = domestic_payload(json!([
			{"name": "Hubei", "total": {"confirm": 68000, "heal": 63000, "dead": 4500}},
		]));
		let regions: Vec<RegionRecord> = normalize(&payload).unwrap();
		assert_eq!(regions, vec![RegionRecord{
			name: "Hubei".into(),
			current_active: 500,
			confirmed: 68000,
			healed: 63000,
			dead: 4500,
		}]);
	}

	#[test]
	fn domestic_keeps_input_order_and_duplicates() {
		let payload = domestic_payload(json!([
			{"name": "广东", "total": {"confirm": 3, "heal": 1, "dead": 0}},
			{"name": "北京", "total": {"confirm": 5, "heal": 2, "dead": 1}},
			{"name": "广东", "total": {"confirm": 3, "heal": 1, "dead": 0}},
		]));
		let regions: Vec<RegionRecord> = normalize(&payload).unwrap();
		let names: Vec<&str> = regions.iter().map(|r| r.name.as_str()).collect();
		assert_eq!(names, vec!["广东", "北京", "广东"]);
		for r in regions.iter() {
			assert_eq!(r.current_active, r.confirmed as i64 - r.healed as i64 - r.dead as i64);
		}
	}

	#[test]
	fn international_passes_current_active_through() {
		let payload = json!({"foreignList": [
			{"name": "美国", "nowConfirm": 123, "confirm": 1000, "heal": 400, "dead": 100},
		]});
		let countries: Vec<CountryRecord> = normalize(&payload).unwrap();
		assert_eq!(countries.len(), 1);
		assert_eq!(countries[0].name.as_str(), "美国");
		assert_eq!(countries[0].current_active, 123);
		assert_ne!(countries[0].current_active, 1000 - 400 - 100);
	}

	#[test]
	fn malformed_child_reports_position() {
		let payload = domestic_payload(json!([
			{"name": "北京", "total": {"confirm": 5, "heal": 2, "dead": 1}},
			{"name": "上海", "total": {"confirm": 5, "dead": 1}},
		]));
		let err = normalize::<RegionRecord>(&payload).unwrap_err();
		assert_eq!(err.shape, FeedShape::Domestic);
		assert_eq!(err.index, Some(1));
		assert!(err.reason.contains("heal"), "{}", err.reason);
		assert!(err.reason.contains("上海"), "{}", err.reason);
	}

	#[test]
	fn out_of_range_current_is_malformed() {
		let payload = domestic_payload(json!([
			{"name": "北京", "total": {"confirm": 5, "heal": 2, "dead": 1}},
			{"name": "上海", "total": {"confirm": 0, "heal": i64::MAX, "dead": 2}},
		]));
		let err = normalize::<RegionRecord>(&payload).unwrap_err();
		assert_eq!(err.shape, FeedShape::Domestic);
		assert_eq!(err.index, Some(1));
		assert!(err.reason.contains("out of range"), "{}", err.reason);

		let payload = domestic_payload(json!([
			{"name": "上海", "total": {"confirm": u64::MAX, "heal": 0, "dead": 0}},
		]));
		assert_eq!(normalize::<RegionRecord>(&payload).unwrap_err().index, Some(0));
	}

	#[test]
	fn out_of_range_national_total_is_malformed() {
		let mut payload = domestic_payload(json!([]));
		payload["areaTree"][0]["total"] = json!({"confirm": u64::MAX, "heal": 0, "dead": 0});
		let err = DomesticFeed::from_payload(&payload).unwrap_err();
		assert_eq!(err.index, None);
		assert!(err.reason.contains("out of range"), "{}", err.reason);
	}

	#[test]
	fn malformed_country_reports_position() {
		let payload = json!({"foreignList": [
			{"name": "日本", "nowConfirm": 1, "confirm": 2, "heal": 1, "dead": 0},
			{"name": "法国", "nowConfirm": 1, "confirm": "many", "heal": 1, "dead": 0},
		]});
		let err = normalize::<CountryRecord>(&payload).unwrap_err();
		assert_eq!(err.index, Some(1));
	}

	#[test]
	fn lazy_records_yield_until_failure() {
		let payload = json!({"foreignList": [
			{"name": "日本", "nowConfirm": 1, "confirm": 2, "heal": 1, "dead": 0},
			{"name": "法国"},
		]});
		let mut iter = records::<CountryRecord>(&payload).unwrap();
		assert!(iter.next().unwrap().is_ok());
		assert!(iter.next().unwrap().is_err());
		assert!(iter.next().is_none());
	}

	#[test]
	fn missing_list_is_structural() {
		let err = normalize::<CountryRecord>(&json!({"globalStatis": {}})).unwrap_err();
		assert_eq!(err.index, None);
		let err = normalize::<RegionRecord>(&json!({"areaTree": []})).unwrap_err();
		assert_eq!(err.index, None);
		assert!(err.to_string().contains("areaTree is empty"));
	}

	#[test]
	fn domestic_feed_carries_national_total() {
		let payload = domestic_payload(json!([]));
		let feed = DomesticFeed::from_payload(&payload).unwrap();
		assert_eq!(feed.china.name.as_str(), CHINA);
		assert_eq!(feed.china.current_active, 250);
		assert_eq!(feed.last_update.to_string(), "2022-11-20 14:33:00");
		assert!(feed.regions.is_empty());
	}

	#[test]
	fn domestic_feed_rejects_bad_timestamp() {
		let mut payload = domestic_payload(json!([]));
		payload["lastUpdateTime"] = json!("yesterday");
		assert!(DomesticFeed::from_payload(&payload).is_err());
	}
}
