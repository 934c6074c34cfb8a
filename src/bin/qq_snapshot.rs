use ncov::{Client, Config, FeedShape};


fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt::init();
	let argv: Vec<String> = std::env::args().collect();
	if argv.len() != 3 {
		eprintln!("usage: qq_snapshot DOMESTIC_OUT FOREIGN_OUT");
		std::process::exit(2)
	}

	let client = Client::new(&Config::from_env()?)?;
	for (shape, path) in [FeedShape::Domestic, FeedShape::International].iter().zip(argv[1..].iter()) {
		println!("saving {} feed to {} ...", shape, path);
		let body = client.fetch_raw(*shape)?;
		// refuse to save something the pipeline could not read back
		ncov::decode_envelope(&body)?;
		ncov::magic_write(path, &body)?;
	}
	Ok(())
}
