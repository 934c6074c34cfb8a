use std::cmp::Ordering;
use std::ops::Deref;

use log::debug;

use super::context::CaseCounts;


/// `num / confirmed`, or zero if nothing was confirmed.
fn ratio(num: u64, confirmed: u64) -> f64 {
	if confirmed == 0 {
		return 0.0
	}
	num as f64 / confirmed as f64
}


/// A record annotated with its dead and heal rates.
///
/// Rates are not clamped: a feed reporting more healed than confirmed yields a
/// heal rate above one. A record with zero confirmed cases has both rates at
/// zero.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRecord<T> {
	pub inner: T,
	pub dead_rate: f64,
	pub heal_rate: f64,
}

impl<T: CaseCounts> RateRecord<T> {
	pub fn new(inner: T) -> Self {
		let confirmed = inner.confirmed();
		Self{
			dead_rate: ratio(inner.dead(), confirmed),
			heal_rate: ratio(inner.healed(), confirmed),
			inner,
		}
	}
}

impl<T> Deref for RateRecord<T> {
	type Target = T;

	fn deref(&self) -> &Self::Target {
		&self.inner
	}
}

pub fn with_rates<T: CaseCounts, I: IntoIterator<Item = T>>(records: I) -> Vec<RateRecord<T>> {
	records.into_iter().map(RateRecord::new).collect()
}


#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
	Inclusive(f64),
	Exclusive(f64),
}

impl Bound {
	fn admits_above(&self, v: f64) -> bool {
		match *self {
			Self::Inclusive(b) => v >= b,
			Self::Exclusive(b) => v > b,
		}
	}

	fn admits_below(&self, v: f64) -> bool {
		match *self {
			Self::Inclusive(b) => v <= b,
			Self::Exclusive(b) => v < b,
		}
	}
}


/// Keeps records whose heal rate lies within `heal_min..heal_max` and whose
/// dead rate lies above `dead_min`. A `None` bound admits everything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateFilter {
	pub heal_min: Option<Bound>,
	pub heal_max: Option<Bound>,
	pub dead_min: Option<Bound>,
}

impl RateFilter {
	/// Provinces with `heal_rate <= 1.0` and `dead_rate > 0.0`.
	///
	/// Note that the upper heal bound is inclusive here but exclusive in
	/// [`RateFilter::INTERNATIONAL`]; both are kept as the published charts
	/// were made.
	pub const DOMESTIC: RateFilter = RateFilter{
		heal_min: None,
		heal_max: Some(Bound::Inclusive(1.0)),
		dead_min: Some(Bound::Exclusive(0.0)),
	};

	/// Countries with `heal_rate < 0.90` and `dead_rate > 0.0`.
	pub const INTERNATIONAL: RateFilter = RateFilter{
		heal_min: None,
		heal_max: Some(Bound::Exclusive(0.90)),
		dead_min: Some(Bound::Exclusive(0.0)),
	};

	pub const ALL: RateFilter = RateFilter{
		heal_min: None,
		heal_max: None,
		dead_min: None,
	};

	pub fn admits<T>(&self, rec: &RateRecord<T>) -> bool {
		self.heal_min.map_or(true, |b| b.admits_above(rec.heal_rate))
			&& self.heal_max.map_or(true, |b| b.admits_below(rec.heal_rate))
			&& self.dead_min.map_or(true, |b| b.admits_above(rec.dead_rate))
	}

	pub fn apply<T>(&self, records: Vec<RateRecord<T>>) -> Vec<RateRecord<T>> {
		let before = records.len();
		let result: Vec<_> = records.into_iter().filter(|r| self.admits(r)).collect();
		debug!("rate filter kept {} of {} records", result.len(), before);
		result
	}
}


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateKey {
	HealRate,
	DeadRate,
	Confirmed,
}

/// Sort descending by the given key. Ties keep their input order.
pub fn sort_desc<T: CaseCounts>(records: &mut [RateRecord<T>], key: RateKey) {
	records.sort_by(|a, b| -> Ordering {
		match key {
			RateKey::HealRate => b.heal_rate.total_cmp(&a.heal_rate),
			RateKey::DeadRate => b.dead_rate.total_cmp(&a.dead_rate),
			RateKey::Confirmed => b.inner.confirmed().cmp(&a.inner.confirmed()),
		}
	});
}
