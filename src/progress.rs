use std::io;
use std::io::Write;
use std::time;

use log::info;


pub trait ProgressSink {
	fn update(&mut self, done: usize, total: usize, what: &str);
	fn finish(&mut self, total: usize);
}


/// Redraws a single status line on the terminal.
pub struct TtyProgress {
	t0: time::Instant,
	width: usize,
}

impl TtyProgress {
	pub fn new() -> Self {
		Self{
			t0: time::Instant::now(),
			width: 0,
		}
	}
}

impl ProgressSink for TtyProgress {
	fn update(&mut self, done: usize, total: usize, what: &str) {
		let line = format!("[{:>3}/{:<3}] {}", done, total, what);
		let pad = self.width.saturating_sub(line.chars().count());
		print!("{}{:pad$}\r", line, "", pad = pad);
		let _ = io::stdout().flush();
		self.width = line.chars().count();
	}

	fn finish(&mut self, total: usize) {
		let dt = self.t0.elapsed().as_secs_f64();
		let line = format!("[{:>3}/{:<3}] done in {:.2}s", total, total, dt);
		let pad = self.width.saturating_sub(line.chars().count());
		println!("{}{:pad$}", line, "", pad = pad);
	}
}


/// Reports each step as a log record, for non-interactive runs.
pub struct LogProgress;

impl ProgressSink for LogProgress {
	fn update(&mut self, done: usize, total: usize, what: &str) {
		info!("[{}/{}] {}", done, total, what);
	}

	fn finish(&mut self, total: usize) {
		info!("finished {} steps", total);
	}
}


pub fn default_output() -> Box<dyn ProgressSink> {
	if isatty::stdout_isatty() {
		Box::new(TtyProgress::new())
	} else {
		Box::new(LogProgress)
	}
}


/// Counts through a known number of named steps.
pub struct StepMeter<'s, S: ProgressSink + ?Sized> {
	sink: &'s mut S,
	done: usize,
	total: usize,
}

impl<'s, S: ProgressSink + ?Sized> StepMeter<'s, S> {
	pub fn new(sink: &'s mut S, total: usize) -> Self {
		Self{sink, done: 0, total}
	}

	pub fn step(&mut self, what: &str) {
		self.done += 1;
		self.sink.update(self.done, self.total.max(self.done), what);
	}

	pub fn done(&self) -> usize {
		self.done
	}

	pub fn finish(self) {
		self.sink.finish(self.done);
	}
}
