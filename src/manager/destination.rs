/*!
# `JPEG Line` - Destination Manager
*/

use crate::{
	codec::Flush,
	JpegError,
	ManagerKind,
	Registry,
};
use std::io::{
	self,
	Write,
};
use super::{
	Lease,
	source::BUFFER_SIZE,
};



/// # Destination Manager.
///
/// Collects the engine's output in a fixed staging buffer and pushes it to
/// the caller's stream whenever the buffer fills up, and once more at the
/// end. Write failures are kept for the pipeline to report as
/// [`JpegError::Write`].
pub(crate) struct DestinationManager<'a, W> {
	lease: Lease<'a>,
	dst: W,
	buf: Vec<u8>,
	error: Option<io::Error>,
}

impl<'a, W: Write> DestinationManager<'a, W> {
	/// # New.
	///
	/// ## Errors
	///
	/// This will only fail if the registry is absurdly full.
	pub(crate) fn new(registry: &'a Registry, dst: W) -> Result<Self, JpegError> {
		Ok(Self {
			lease: registry.register(ManagerKind::Destination, BUFFER_SIZE)?,
			dst,
			buf: Vec::with_capacity(BUFFER_SIZE),
			error: None,
		})
	}

	/// # Take Error.
	pub(crate) fn take_error(&mut self) -> Option<io::Error> { self.error.take() }

	/// # Bytes Written.
	pub(crate) fn transferred(&self) -> u64 { self.lease.transferred() }

	/// # Finish.
	///
	/// Flush whatever is left, then the stream itself.
	///
	/// ## Errors
	///
	/// Returns [`JpegError::Write`] if the stream rejects the data.
	pub(crate) fn finish(&mut self) -> Result<(), JpegError> {
		let res = self.flush_staged().and_then(|()| self.dst.flush());
		match (res, self.take_error()) {
			(_, Some(e)) | (Err(e), None) => Err(JpegError::Write(e)),
			(Ok(()), None) => Ok(()),
		}
	}
}

impl<W: Write> Flush for DestinationManager<'_, W> {
	fn stage(&mut self, data: &[u8]) -> io::Result<usize> {
		if self.buf.len() >= BUFFER_SIZE { self.flush_staged()?; }

		let len = data.len().min(BUFFER_SIZE - self.buf.len());
		self.buf.extend_from_slice(&data[..len]);
		if self.buf.len() >= BUFFER_SIZE { self.flush_staged()?; }
		Ok(len)
	}

	fn flush_staged(&mut self) -> io::Result<()> {
		if self.buf.is_empty() { return Ok(()); }

		match self.dst.write_all(&self.buf) {
			Ok(()) => {
				self.lease.record(self.buf.len());
				self.buf.clear();
				Ok(())
			},
			Err(e) => {
				let kind = e.kind();
				tracing::debug!(handle=%self.lease.handle(), "Destination write failed: {e}");
				self.error = Some(e);
				Err(kind.into())
			},
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	/// # Writer With a Size Limit.
	struct Cramped(Vec<u8>, usize);

	impl Write for Cramped {
		fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
			if self.0.len() + buf.len() > self.1 {
				Err(io::Error::new(io::ErrorKind::WriteZero, "full"))
			}
			else {
				self.0.extend_from_slice(buf);
				Ok(buf.len())
			}
		}

		fn flush(&mut self) -> io::Result<()> { Ok(()) }
	}

	#[test]
	fn t_stage() {
		let registry = Registry::new();
		let mut out = Vec::new();
		let mut dst = DestinationManager::new(&registry, &mut out).unwrap();
		assert_eq!(registry.len_of(ManagerKind::Destination), 1);

		let data: Vec<u8> = (0..=255).cycle().take(10_000).collect();
		let mut sent = 0;
		while sent < data.len() {
			sent += dst.stage(&data[sent..]).unwrap();
		}

		// Two full buffers went out, the rest is waiting.
		assert_eq!(dst.buf.len(), 10_000 - BUFFER_SIZE * 2);
		assert_eq!(registry.get(dst.lease.handle()).unwrap().transferred, 8192);

		dst.finish().unwrap();
		drop(dst);
		assert_eq!(out, data);
		assert!(registry.is_empty());
	}

	#[test]
	fn t_stage_error() {
		let registry = Registry::new();
		let mut dst = DestinationManager::new(&registry, Cramped(Vec::new(), 100)).unwrap();
		assert_eq!(dst.stage(&[0; 50]).unwrap(), 50);
		assert_eq!(dst.stage(&[0; 70]).unwrap(), 70);

		// Nothing has been written yet, so the failure happens at the end.
		assert!(matches!(dst.finish(), Err(JpegError::Write(_))));

		// Small writes are fine.
		let mut dst = DestinationManager::new(&registry, Cramped(Vec::new(), 100)).unwrap();
		dst.stage(&[1; 20]).unwrap();
		dst.finish().unwrap();
		assert_eq!(dst.dst.0, vec![1; 20]);
	}
}
