pub mod render;
mod ioutil;
mod config;
mod context;
mod feed;
mod qq;
mod names;
mod rates;
mod export;
mod progress;
mod overview;

pub use ioutil::{magic_open, magic_write};
pub use config::*;
pub use context::*;
pub use feed::{decode_envelope, load_snapshot, Client, Error as FeedError};
pub use qq::*;
pub use names::*;
pub use rates::*;
pub use export::*;
pub use progress::*;
pub use overview::{write_artifacts, Error as OutputError, Tables, ARTIFACTS};


/// Load both feeds from saved envelopes instead of the network.
pub fn load_snapshots<P: AsRef<std::path::Path>, Q: AsRef<std::path::Path>>(
	domestic: P,
	international: Q,
) -> Result<(DomesticFeed, InternationalFeed), FeedError> {
	let domestic = DomesticFeed::from_payload(&load_snapshot(domestic)?)?;
	let international = InternationalFeed::from_payload(&load_snapshot(international)?)?;
	Ok((domestic, international))
}
