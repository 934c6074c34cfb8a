use std::fmt;
use std::io;
use std::io::Read;
use std::path::Path;

use log::{debug, info, trace};

use reqwest;
use bytes::Bytes;

use serde::Deserialize;
use serde_json::Value;

use enum_map::EnumMap;

use super::config::Config;
use super::context::{DomesticFeed, FeedShape, InternationalFeed};
use super::ioutil::magic_open;
use super::qq::MalformedInput;


#[derive(Debug)]
pub enum Error {
	Request(reqwest::Error),
	Status(reqwest::StatusCode),
	Envelope(serde_json::Error),
	Malformed(MalformedInput),
	IO(io::Error),
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Request(e) => fmt::Display::fmt(e, f),
			Self::Status(s) => write!(f, "unexpected response status {}", s),
			Self::Envelope(e) => write!(f, "invalid response envelope: {}", e),
			Self::Malformed(e) => fmt::Display::fmt(e, f),
			Self::IO(e) => fmt::Display::fmt(e, f),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Request(e) => Some(e),
			Self::Envelope(e) => Some(e),
			Self::Malformed(e) => Some(e),
			Self::IO(e) => Some(e),
			Self::Status(_) => None,
		}
	}
}

impl From<reqwest::Error> for Error {
	fn from(err: reqwest::Error) -> Self {
		Self::Request(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Self::Envelope(err)
	}
}

impl From<MalformedInput> for Error {
	fn from(err: MalformedInput) -> Self {
		Self::Malformed(err)
	}
}

impl From<io::Error> for Error {
	fn from(err: io::Error) -> Self {
		Self::IO(err)
	}
}


#[derive(Debug, Clone, Deserialize)]
struct Envelope {
	// the inner payload is a JSON document serialized into a string
	data: String,
}

/// Unwrap the outer envelope and parse the JSON string in its `data` field.
pub fn decode_envelope(body: &[u8]) -> Result<Value, Error> {
	let envelope: Envelope = serde_json::from_slice(body)?;
	trace!("decoding {} bytes of inner payload", envelope.data.len());
	Ok(serde_json::from_str(&envelope.data)?)
}

/// Read a saved envelope from disk; `.gz` files are decompressed on the fly.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<Value, Error> {
	let path = path.as_ref();
	let mut body = Vec::new();
	magic_open(path)?.read_to_end(&mut body)?;
	debug!("read {} bytes of envelope from {}", body.len(), path.display());
	decode_envelope(&body)
}


pub struct Client {
	client: reqwest::blocking::Client,
	endpoints: EnumMap<FeedShape, String>,
}

impl Client {
	pub fn new(config: &Config) -> Result<Self, Error> {
		let client = reqwest::blocking::Client::builder()
			.timeout(config.timeout)
			.build()?;
		Ok(Self{
			client,
			endpoints: config.endpoints.clone(),
		})
	}

	/// Fetch the raw envelope of one feed without decoding it.
	pub fn fetch_raw(&self, shape: FeedShape) -> Result<Bytes, Error> {
		let url = &self.endpoints[shape];
		info!("fetching {} feed from {}", shape, url);
		let resp = self.client.get(url.as_str()).send()?;
		let status = resp.status();
		if !status.is_success() {
			return Err(Error::Status(status))
		}
		let body = resp.bytes()?;
		debug!("received {} bytes for {} feed", body.len(), shape);
		Ok(body)
	}

	pub fn fetch(&self, shape: FeedShape) -> Result<Value, Error> {
		decode_envelope(&self.fetch_raw(shape)?)
	}

	pub fn domestic(&self) -> Result<DomesticFeed, Error> {
		Ok(DomesticFeed::from_payload(&self.fetch(FeedShape::Domestic)?)?)
	}

	pub fn international(&self) -> Result<InternationalFeed, Error> {
		Ok(InternationalFeed::from_payload(&self.fetch(FeedShape::International)?)?)
	}
}
