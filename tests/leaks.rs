/*!
# `JPEG Line` - Leak Check

This gets its own binary so nothing else touches the global registry while
it runs.
*/

use jpegline::{
	DecoderOptions,
	EncoderOptions,
	JpegError,
	Rectangle,
	Registry,
	RgbColor,
	RgbImage,
	SubsampleRatio,
	YCbCrImage,
};
use std::io;



/// # Reader That Fails Once the Data Runs Out.
struct Dying<'a>(&'a [u8]);

impl io::Read for Dying<'_> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		if self.0.is_empty() {
			return Err(io::Error::new(io::ErrorKind::ConnectionAborted, "closed"));
		}
		let len = buf.len().min(self.0.len()).min(512);
		buf[..len].copy_from_slice(&self.0[..len]);
		self.0 = &self.0[len..];
		Ok(len)
	}
}

/// # Sample Image.
fn sample() -> RgbImage {
	let mut img = RgbImage::new(Rectangle::from_size(160, 120)).unwrap();
	for x in 0..160 {
		for y in 0..120 {
			img.set_rgb(x, y, RgbColor::new(x as u8, y as u8, 128));
		}
	}
	img
}



#[test_log::test]
fn t_global_registry() {
	let registry = Registry::global();
	assert!(registry.is_empty());

	// Good calls.
	let mut raw = Vec::new();
	jpegline::encode(&mut raw, &sample(), &EncoderOptions::with_quality(80)).unwrap();
	assert!(registry.is_empty());

	jpegline::decode_config(raw.as_slice()).unwrap();
	jpegline::decode(raw.as_slice(), &DecoderOptions::default()).unwrap();
	jpegline::decode_into_rgb(raw.as_slice(), &DecoderOptions::default()).unwrap();
	jpegline::decode_into_rgba(raw.as_slice(), &DecoderOptions::default()).unwrap();
	assert!(registry.is_empty());

	// Bad calls.
	assert!(jpegline::decode(&b""[..], &DecoderOptions::default()).is_err());
	let _res = jpegline::decode(&raw[..raw.len() / 3], &DecoderOptions::default());
	assert!(matches!(
		jpegline::decode(Dying(&raw[..raw.len() / 2]), &DecoderOptions::default()),
		Err(JpegError::Read(_)),
	));
	let empty = YCbCrImage::new_aligned(Rectangle::default(), SubsampleRatio::R420).unwrap();
	assert!(matches!(
		jpegline::encode(io::sink(), &empty, &EncoderOptions::default()),
		Err(JpegError::EmptyImage),
	));
	assert!(registry.is_empty());

	// Lots of calls at once.
	std::thread::scope(|s| {
		for _ in 0..4 {
			s.spawn(|| {
				for _ in 0..8 {
					let img = jpegline::decode(raw.as_slice(), &DecoderOptions::default()).unwrap();
					jpegline::encode(io::sink(), &img, &EncoderOptions::default()).unwrap();
				}
			});
		}
	});

	assert!(registry.is_empty());
}
