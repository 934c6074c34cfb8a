use std::path::PathBuf;

use log::info;

use ncov::{Client, Config, NameMapping, Tables};


fn usage() -> ! {
	eprintln!("usage: qq_overview OUTDIR [DOMESTIC_SNAPSHOT FOREIGN_SNAPSHOT]");
	std::process::exit(2)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt::init();
	let argv: Vec<String> = std::env::args().collect();
	let outdir = match argv.get(1) {
		Some(v) => PathBuf::from(v),
		None => usage(),
	};

	let (domestic, international) = match (argv.get(2), argv.get(3)) {
		(Some(d), Some(f)) => {
			println!("loading snapshots ...");
			ncov::load_snapshots(d, f)?
		},
		(None, None) => {
			let config = Config::from_env()?;
			let client = Client::new(&config)?;
			println!("fetching feeds ...");
			(client.domestic()?, client.international()?)
		},
		_ => usage(),
	};

	let names = NameMapping::builtin();
	for (en, zh) in names.duplicates() {
		info!("name table lists {} again as {}; first entry wins", zh, en);
	}

	println!("deriving tables ...");
	let tables = Tables::build(domestic, international, &names);

	println!("writing {} ...", outdir.display());
	let written = ncov::write_artifacts(&tables, &outdir, &mut *ncov::default_output())?;
	info!("wrote {} files", written.len());
	Ok(())
}
