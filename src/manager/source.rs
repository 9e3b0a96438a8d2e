/*!
# `JPEG Line` - Source Manager
*/

use crate::{
	codec::Fill,
	JpegError,
	ManagerKind,
	Registry,
	Warning,
};
use std::io::{
	self,
	Read,
};
use super::Lease;



/// # Staging Buffer Size.
pub(crate) const BUFFER_SIZE: usize = 4096;

/// # Synthetic Fill Limit.
///
/// An engine that keeps asking for data after this many fake end markers is
/// not going to finish, so the manager stops feeding it.
const MAX_SYNTHETIC: u8 = 64;

/// # End of Image Marker.
const EOI: [u8; 2] = [0xFF, 0xD9];



/// # Source Manager.
///
/// Pulls bytes from the caller's stream into a fixed staging buffer for the
/// engine.
///
/// If the stream runs dry before the engine is done, the manager supplies an
/// end-of-image marker and records a [`Warning::Truncated`] rather than
/// failing, leaving it to the engine to decide how bad things are. Read
/// failures are kept for the pipeline to report as [`JpegError::Read`].
pub(crate) struct SourceManager<'a, R> {
	lease: Lease<'a>,
	src: R,
	buf: Box<[u8]>,
	pos: usize,
	end: usize,
	synthetic: u8,
	warnings: Vec<Warning>,
	error: Option<io::Error>,
}

impl<'a, R: Read> SourceManager<'a, R> {
	/// # New.
	///
	/// ## Errors
	///
	/// This will only fail if the registry is absurdly full.
	pub(crate) fn new(registry: &'a Registry, src: R) -> Result<Self, JpegError> {
		Ok(Self {
			lease: registry.register(ManagerKind::Source, BUFFER_SIZE)?,
			src,
			buf: vec![0; BUFFER_SIZE].into_boxed_slice(),
			pos: 0,
			end: 0,
			synthetic: 0,
			warnings: Vec::new(),
			error: None,
		})
	}

	/// # Take Error.
	///
	/// Return the read failure, if any, that interrupted the stream.
	pub(crate) fn take_error(&mut self) -> Option<io::Error> { self.error.take() }

	/// # Take Warnings.
	pub(crate) fn take_warnings(&mut self) -> Vec<Warning> {
		std::mem::take(&mut self.warnings)
	}

	/// # Bytes Read.
	pub(crate) fn transferred(&self) -> u64 { self.lease.transferred() }

	/// # Refill.
	fn refill(&mut self) -> io::Result<()> {
		self.pos = 0;
		self.end = 0;

		loop {
			match self.src.read(&mut self.buf) {
				Ok(0) => break,
				Ok(n) => {
					self.end = n;
					self.lease.record(n);
					return Ok(());
				},
				Err(e) if e.kind() == io::ErrorKind::Interrupted => {},
				Err(e) => {
					let kind = e.kind();
					tracing::debug!(handle=%self.lease.handle(), "Source read failed: {e}");
					self.error = Some(e);
					return Err(kind.into());
				},
			}
		}

		// The stream is over.
		if self.synthetic == 0 {
			tracing::warn!(handle=%self.lease.handle(), "{}", Warning::Truncated);
			self.warnings.push(Warning::Truncated);
		}
		if self.synthetic < MAX_SYNTHETIC {
			self.synthetic += 1;
			self.buf[..2].copy_from_slice(&EOI);
			self.end = 2;
		}

		Ok(())
	}
}

impl<R: Read> Fill for SourceManager<'_, R> {
	fn fill(&mut self) -> io::Result<&[u8]> {
		if self.pos >= self.end { self.refill()?; }
		Ok(&self.buf[self.pos..self.end])
	}

	fn consume(&mut self, amt: usize) {
		self.pos = self.pos.saturating_add(amt).min(self.end);
	}
}
