/*!
# `JPEG Line` - Error
*/

use std::{
	error::Error,
	fmt,
	io,
};



#[derive(Debug)]
/// # Errors.
///
/// Everything that can go wrong during a decode or encode call.
///
/// Format and engine errors carry the engine's own message. Caller-contract
/// problems ([`JpegError::Dimensions`], [`JpegError::EmptyImage`],
/// [`JpegError::Overflow`]) and capability problems
/// ([`JpegError::Unsupported`]) are raised before the engine is touched.
pub enum JpegError {
	/// # Engine Failure.
	///
	/// The engine gave up partway through.
	Codec(String),

	/// # Negative Dimensions.
	Dimensions,

	/// # Empty Image.
	///
	/// Zero-area images cannot be encoded.
	EmptyImage,

	/// # Not a JPEG.
	///
	/// The header was missing, malformed, or ended too soon.
	Format(String),

	/// # Dimensions Out of Range.
	Overflow,

	/// # I/O Read Error.
	Read(io::Error),

	/// # Scanline Misuse.
	///
	/// Scanlines were pushed or pulled out of order, too many times, or with
	/// the wrong length.
	Scanline,

	/// # Unsupported.
	///
	/// The requested capability is not available in this build.
	Unsupported(&'static str),

	/// # I/O Write Error.
	Write(io::Error),
}

impl Error for JpegError {
	fn source(&self) -> Option<&(dyn Error + 'static)> {
		match self {
			Self::Read(e) | Self::Write(e) => Some(e),
			_ => None,
		}
	}
}

impl fmt::Display for JpegError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Codec(s) => write!(f, "The image could not be processed: {s}"),
			Self::Format(s) => write!(f, "Invalid JPEG: {s}"),
			Self::Read(e) => write!(f, "Unable to read the source: {e}"),
			Self::Unsupported(s) => write!(f, "Unsupported in this build: {s}."),
			Self::Write(e) => write!(f, "Unable to write the output: {e}"),
			_ => f.write_str(self.as_str()),
		}
	}
}

impl JpegError {
	#[must_use]
	/// # As Str.
	///
	/// Return a short English description of the error kind, without any
	/// payload.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Codec(_) => "The image could not be processed.",
			Self::Dimensions => "Image dimensions cannot be negative.",
			Self::EmptyImage => "The image is empty.",
			Self::Format(_) => "Invalid JPEG.",
			Self::Overflow => "The image dimensions are out of range.",
			Self::Read(_) => "Unable to read the source.",
			Self::Scanline => "Scanlines were transferred out of order.",
			Self::Unsupported(_) => "Unsupported in this build.",
			Self::Write(_) => "Unable to write the output.",
		}
	}

	#[must_use]
	/// # Is I/O?
	///
	/// Returns `true` for failures of the underlying stream.
	pub const fn is_io(&self) -> bool { matches!(self, Self::Read(_) | Self::Write(_)) }
}



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Warnings.
///
/// Non-fatal diagnostics reported alongside a decoded image.
pub enum Warning {
	/// # Truncated Stream.
	///
	/// The stream ended before the image did; the remainder was filled in.
	Truncated,
}

impl fmt::Display for Warning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Truncated => f.write_str("Premature end of JPEG stream."),
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_display() {
		assert_eq!(JpegError::EmptyImage.to_string(), "The image is empty.");
		assert_eq!(
			JpegError::Format("no SOI".to_owned()).to_string(),
			"Invalid JPEG: no SOI",
		);
		assert_eq!(JpegError::Format(String::new()).as_str(), "Invalid JPEG.");
		assert_eq!(Warning::Truncated.to_string(), "Premature end of JPEG stream.");
	}

	#[test]
	fn t_source() {
		let err = JpegError::Read(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
		assert!(err.is_io());
		assert!(err.source().is_some());
		assert!(JpegError::Scanline.source().is_none());
		assert!(! JpegError::Overflow.is_io());
	}
}
