use std::env;
use std::fmt;
use std::time::Duration;

use enum_map::{enum_map, EnumMap};

use super::context::FeedShape;


pub static DEFAULT_DOMESTIC_URL: &'static str = "https://view.inews.qq.com/g2/getOnsInfo?name=disease_h5";
pub static DEFAULT_FOREIGN_URL: &'static str = "https://view.inews.qq.com/g2/getOnsInfo?name=disease_foreign";
pub static DEFAULT_TIMEOUT_SECS: u64 = 30;


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
	InvalidTimeout(String),
}

impl fmt::Display for ConfigError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::InvalidTimeout(v) => write!(f, "NCOV_TIMEOUT_SECS must be a positive number of seconds, got {:?}", v),
		}
	}
}

impl std::error::Error for ConfigError {}


#[derive(Debug, Clone)]
pub struct Config {
	pub endpoints: EnumMap<FeedShape, String>,
	/// Applied to each request individually.
	pub timeout: Duration,
}

impl Default for Config {
	fn default() -> Self {
		Self{
			endpoints: enum_map!{
				FeedShape::Domestic => DEFAULT_DOMESTIC_URL.to_string(),
				FeedShape::International => DEFAULT_FOREIGN_URL.to_string(),
			},
			timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
		}
	}
}

impl Config {
	/// Read `NCOV_DOMESTIC_URL`, `NCOV_FOREIGN_URL` and `NCOV_TIMEOUT_SECS`,
	/// falling back to the public endpoints and a 30 second timeout.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|k| env::var(k).ok())
	}

	pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
		let mut result = Self::default();
		if let Some(url) = lookup("NCOV_DOMESTIC_URL") {
			result.endpoints[FeedShape::Domestic] = url;
		}
		if let Some(url) = lookup("NCOV_FOREIGN_URL") {
			result.endpoints[FeedShape::International] = url;
		}
		if let Some(raw) = lookup("NCOV_TIMEOUT_SECS") {
			let secs = match raw.trim().parse::<u64>() {
				Ok(v) if v > 0 => v,
				_ => return Err(ConfigError::InvalidTimeout(raw)),
			};
			result.timeout = Duration::from_secs(secs);
		}
		Ok(result)
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	use std::collections::HashMap;

	fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
		move |k: &str| map.get(k).cloned()
	}

	#[test]
	fn defaults_point_at_tencent() {
		let cfg = Config::from_lookup(lookup_in(&[])).unwrap();
		assert_eq!(cfg.endpoints[FeedShape::Domestic], DEFAULT_DOMESTIC_URL);
		assert_eq!(cfg.endpoints[FeedShape::International], DEFAULT_FOREIGN_URL);
		assert_eq!(cfg.timeout, Duration::from_secs(30));
	}

	#[test]
	fn overrides_apply() {
		let cfg = Config::from_lookup(lookup_in(&[
			("NCOV_FOREIGN_URL", "http://127.0.0.1:9000/foreign"),
			("NCOV_TIMEOUT_SECS", " 5 "),
		])).unwrap();
		assert_eq!(cfg.endpoints[FeedShape::Domestic], DEFAULT_DOMESTIC_URL);
		assert_eq!(cfg.endpoints[FeedShape::International], "http://127.0.0.1:9000/foreign");
		assert_eq!(cfg.timeout, Duration::from_secs(5));
	}

	#[test]
	fn rejects_bad_timeout() {
		for bad in ["0", "-1", "soon"].iter() {
			let err = Config::from_lookup(lookup_in(&[("NCOV_TIMEOUT_SECS", *bad)])).unwrap_err();
			assert_eq!(err, ConfigError::InvalidTimeout(bad.to_string()));
		}
	}
}
