/*!
# `JPEG Line` - Codec Engine

The actual bitstream work is done by `jpeg-decoder` and `jpeg-encoder`. This
module wraps them in a small stateful interface (begin, move scanlines,
finish) and feeds them through the [`Fill`] and [`Flush`] capabilities the
resource managers implement.
*/

mod compress;
mod decompress;

pub(crate) use compress::{
	Compress,
	CompressSettings,
	InColor,
};
pub(crate) use decompress::{
	Decompress,
	DecompressSettings,
	OutColor,
};

use crate::JpegError;
use std::io::{
	self,
	Read,
	Write,
};



/// # Fill Capability.
///
/// Implemented by source managers; the engine pulls from it.
pub(crate) trait Fill {
	/// # Fill.
	///
	/// Return the staged bytes, refilling from the stream first if nothing
	/// is left. An empty slice means the stream is done for good.
	///
	/// ## Errors
	///
	/// Stream failures are passed through.
	fn fill(&mut self) -> io::Result<&[u8]>;

	/// # Consume.
	///
	/// Mark `amt` staged bytes as used.
	fn consume(&mut self, amt: usize);
}

/// # Flush Capability.
///
/// Implemented by destination managers; the engine pushes into it.
pub(crate) trait Flush {
	/// # Stage.
	///
	/// Copy as much of `data` as fits into the staging buffer, flushing it to
	/// the stream when full, and return the number of bytes taken.
	///
	/// ## Errors
	///
	/// Stream failures are passed through.
	fn stage(&mut self, data: &[u8]) -> io::Result<usize>;

	/// # Flush Staged.
	///
	/// Push everything staged so far to the stream.
	///
	/// ## Errors
	///
	/// Stream failures are passed through.
	fn flush_staged(&mut self) -> io::Result<()>;
}



/// # Engine Reader.
///
/// Presents a [`Fill`] as a plain reader for the decoder.
pub(crate) struct Reader<'s, S>(&'s mut S);

impl<S: Fill> Read for Reader<'_, S> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let staged = self.0.fill()?;
		let len = staged.len().min(buf.len());
		buf[..len].copy_from_slice(&staged[..len]);
		self.0.consume(len);
		Ok(len)
	}
}

/// # Engine Writer.
///
/// Presents a [`Flush`] as a plain writer for the encoder.
pub(crate) struct Writer<'d, D>(&'d mut D);

impl<D: Flush> Write for Writer<'_, D> {
	#[inline]
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> { self.0.stage(buf) }

	#[inline]
	fn flush(&mut self) -> io::Result<()> { self.0.flush_staged() }
}



/// # Map Decoder Error.
///
/// Stream failures are reported as-is; the pipelines swap in the manager's
/// original error where there is one.
fn decode_error(err: jpeg_decoder::Error) -> JpegError {
	match err {
		jpeg_decoder::Error::Format(s) => JpegError::Format(s),
		jpeg_decoder::Error::Io(e) =>
			if e.kind() == io::ErrorKind::UnexpectedEof {
				JpegError::Format("unexpected end of stream".to_owned())
			}
			else { JpegError::Read(e) },
		e => JpegError::Codec(e.to_string()),
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		manager::{
			destination::DestinationManager,
			source::SourceManager,
		},
		ColorModel,
		Registry,
		SubsampleRatio,
	};

	/// # Encode Rows.
	fn encode(registry: &Registry, settings: CompressSettings, rows: &[Vec<u8>]) -> Vec<u8> {
		let mut out = Vec::new();
		let mut dst = DestinationManager::new(registry, &mut out).unwrap();
		let mut enc = Compress::begin(&mut dst, settings).unwrap();
		for row in rows { enc.write_scanline(row).unwrap(); }
		enc.finish().unwrap();
		dst.finish().unwrap();
		drop(dst);
		out
	}

	#[test]
	fn t_reader() {
		let registry = Registry::new();
		let raw: Vec<u8> = (0..=255).collect();
		let mut src = SourceManager::new(&registry, raw.as_slice()).unwrap();
		let mut reader = Reader(&mut src);

		let mut buf = [0_u8; 100];
		assert_eq!(reader.read(&mut buf).unwrap(), 100);
		assert_eq!(buf[99], 99);
		// The rest, then a run of fake end markers.
		let mut rest = Vec::new();
		reader.read_to_end(&mut rest).unwrap();
		assert_eq!(rest.len(), 156 + 2 * 64);
		assert_eq!(&rest[..156], &raw[100..]);
		assert_eq!(&rest[156..158], &[0xFF, 0xD9]);
	}

	#[test]
	fn t_writer() {
		let registry = Registry::new();
		let mut out = Vec::new();
		let mut dst = DestinationManager::new(&registry, &mut out).unwrap();
		let mut writer = Writer(&mut dst);
		writer.write_all(&[5; 5000]).unwrap();
		writer.flush().unwrap();
		drop(dst);
		assert_eq!(out, vec![5; 5000]);
	}

	#[test]
	fn t_roundtrip() {
		let registry = Registry::new();
		let rows: Vec<Vec<u8>> = (0..16_u8)
			.map(|y| (0..24_u8).map(|x| x.wrapping_mul(y)).collect())
			.collect();

		let raw = encode(&registry, CompressSettings {
			width: 8,
			height: 16,
			color: InColor::Rgb,
			quality: 90,
			sampling: SubsampleRatio::R444,
			progressive: false,
			optimize: false,
		}, &rows);
		assert_eq!(&raw[..2], &[0xFF, 0xD8]);

		let mut src = SourceManager::new(&registry, raw.as_slice()).unwrap();
		let mut dec = Decompress::begin(&mut src, DecompressSettings {
			scale: None,
			color: OutColor::Rgba,
			fancy_upsampling: true,
			block_smoothing: true,
		}).unwrap();
		assert_eq!(dec.size(), (8, 16));
		assert_eq!(dec.color_model(), ColorModel::YCbCr);

		let mut row = vec![0; 32];
		for _ in 0..16 {
			dec.read_scanline(&mut row).unwrap();
			assert!(row.chunks_exact(4).all(|px| px[3] == 255));
		}

		// One too many.
		assert!(matches!(dec.read_scanline(&mut row), Err(JpegError::Scanline)));
		dec.finish().unwrap();
		drop(src);
		assert!(registry.is_empty());
	}

	#[test]
	fn t_gray() {
		let registry = Registry::new();
		let rows: Vec<Vec<u8>> = (0..8_u8).map(|y| vec![y * 30; 8]).collect();
		let raw = encode(&registry, CompressSettings {
			width: 8,
			height: 8,
			color: InColor::Luma,
			quality: 100,
			sampling: SubsampleRatio::R444,
			progressive: true,
			optimize: true,
		}, &rows);

		let mut src = SourceManager::new(&registry, raw.as_slice()).unwrap();
		let mut dec = Decompress::begin(&mut src, DecompressSettings {
			scale: None,
			color: OutColor::Gray,
			fancy_upsampling: false,
			block_smoothing: false,
		}).unwrap();
		assert_eq!(dec.color_model(), ColorModel::Gray);

		// Rows must have the right length.
		let mut row = vec![0; 9];
		assert!(matches!(dec.read_scanline(&mut row), Err(JpegError::Scanline)));

		let mut row = vec![0; 8];
		for y in 0..8_u8 {
			dec.read_scanline(&mut row).unwrap();
			assert!(row.iter().all(|&v| v.abs_diff(y * 30) <= 1), "{y}: {row:?}");
		}
		dec.finish().unwrap();
	}

	#[test]
	fn t_scanline_misuse() {
		let registry = Registry::new();
		let mut out = Vec::new();
		let mut dst = DestinationManager::new(&registry, &mut out).unwrap();
		let settings = CompressSettings {
			width: 2,
			height: 2,
			color: InColor::Rgb,
			quality: 75,
			sampling: SubsampleRatio::R420,
			progressive: false,
			optimize: false,
		};

		// Empty and oversized images never start.
		assert!(matches!(
			Compress::begin(&mut dst, CompressSettings { width: 0, ..settings }),
			Err(JpegError::EmptyImage),
		));
		assert!(matches!(
			Compress::begin(&mut dst, CompressSettings { height: 70_000, ..settings }),
			Err(JpegError::Overflow),
		));

		let mut enc = Compress::begin(&mut dst, settings).unwrap();
		assert!(matches!(enc.write_scanline(&[0; 5]), Err(JpegError::Scanline)));
		enc.write_scanline(&[0; 6]).unwrap();

		// Not enough rows.
		assert!(matches!(enc.finish(), Err(JpegError::Scanline)));
	}

	#[test]
	fn t_not_jpeg() {
		let registry = Registry::new();
		for raw in [&b""[..], &b"\xFF\xD8"[..], &b"GIF89a"[..]] {
			let mut src = SourceManager::new(&registry, raw).unwrap();
			let res = Decompress::begin(&mut src, DecompressSettings {
				scale: None,
				color: OutColor::Rgb,
				fancy_upsampling: true,
				block_smoothing: true,
			});
			assert!(matches!(res, Err(JpegError::Format(_))), "{raw:?}");
		}
		assert!(registry.is_empty());
	}
}
