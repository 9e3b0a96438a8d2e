/*!
# `JPEG Line` - Resource Managers

Every decode or encode call gets one source or destination manager, and each
manager is listed in a [`Registry`] for exactly as long as the call runs.
Registration happens through a [`Lease`], which removes the entry when it
drops, so the registry empties out on every exit path: success, error, or
unwinding panic.
*/

pub(super) mod destination;
pub(super) mod source;

use dactyl::NiceU64;
use parking_lot::Mutex;
use std::fmt;



/// # Global Registry.
static GLOBAL: Registry = Registry::new();



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Manager Kind.
pub enum ManagerKind {
	/// # Source (Decode).
	Source,

	/// # Destination (Encode).
	Destination,
}

impl fmt::Display for ManagerKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Source => "source",
			Self::Destination => "destination",
		})
	}
}



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Handle.
///
/// An opaque reference to a registry entry. Handles are never reused as-is:
/// once an entry is removed its slot's generation moves on, so a stale handle
/// simply stops resolving.
pub struct Handle {
	index: u32,
	generation: u32,
}

impl fmt::Display for Handle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}.{}", self.index, self.generation)
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Registry Entry.
///
/// The bookkeeping kept for one live manager.
pub struct Entry {
	/// # Kind.
	pub kind: ManagerKind,

	/// # Staging Buffer Size.
	pub capacity: usize,

	/// # Bytes Transferred So Far.
	pub transferred: u64,
}



#[derive(Debug)]
/// # Slot.
struct Slot {
	generation: u32,
	entry: Option<Entry>,
}

#[derive(Debug)]
/// # Arena.
struct Arena {
	slots: Vec<Slot>,
	free: Vec<u32>,
	len: usize,
}

impl Arena {
	/// # New.
	const fn new() -> Self {
		Self { slots: Vec::new(), free: Vec::new(), len: 0 }
	}

	/// # Get (Mutable).
	fn get_mut(&mut self, handle: Handle) -> Option<&mut Entry> {
		let slot = self.slots.get_mut(usize::try_from(handle.index).ok()?)?;
		if slot.generation == handle.generation { slot.entry.as_mut() }
		else { None }
	}

	/// # Insert.
	fn insert(&mut self, entry: Entry) -> Option<Handle> {
		let index =
			if let Some(index) = self.free.pop() { index }
			else {
				let index = u32::try_from(self.slots.len()).ok()?;
				self.slots.push(Slot { generation: 0, entry: None });
				index
			};

		let slot = self.slots.get_mut(usize::try_from(index).ok()?)?;
		slot.entry = Some(entry);
		self.len += 1;
		Some(Handle { index, generation: slot.generation })
	}

	/// # Remove.
	fn remove(&mut self, handle: Handle) -> Option<Entry> {
		let slot = self.slots.get_mut(usize::try_from(handle.index).ok()?)?;
		if slot.generation != handle.generation { return None; }

		let entry = slot.entry.take()?;
		slot.generation = slot.generation.wrapping_add(1);
		self.free.push(handle.index);
		self.len -= 1;
		Some(entry)
	}
}



#[derive(Debug)]
/// # Manager Registry.
///
/// A lock-guarded, generation-checked arena of live managers. The pipelines
/// use [`Registry::global`] by default, but any registry can be injected
/// through [`Jpeg::new`](crate::Jpeg::new), which is handy for tests that
/// want to watch their own calls without interference.
///
/// ## Examples
///
/// ```
/// use jpegline::{DecoderOptions, Jpeg, Registry};
///
/// let registry = Registry::new();
/// let jpeg = Jpeg::new(&registry);
///
/// assert!(jpeg.decode(&b""[..], &DecoderOptions::default()).is_err());
/// assert!(registry.is_empty());
/// ```
pub struct Registry {
	inner: Mutex<Arena>,
}

impl Default for Registry {
	#[inline]
	fn default() -> Self { Self::new() }
}

impl Registry {
	#[must_use]
	/// # New.
	pub const fn new() -> Self {
		Self { inner: parking_lot::const_mutex(Arena::new()) }
	}

	#[must_use]
	/// # Global.
	///
	/// The process-wide registry used by the crate-level functions.
	pub fn global() -> &'static Self { &GLOBAL }
}

/// ## Getters.
impl Registry {
	#[must_use]
	/// # Length.
	///
	/// The number of managers currently alive.
	pub fn len(&self) -> usize { self.inner.lock().len }

	#[must_use]
	/// # Is Empty?
	pub fn is_empty(&self) -> bool { self.len() == 0 }

	#[must_use]
	/// # Length by Kind.
	pub fn len_of(&self, kind: ManagerKind) -> usize {
		self.inner.lock().slots.iter()
			.filter(|s| s.entry.is_some_and(|e| e.kind == kind))
			.count()
	}

	#[must_use]
	/// # Get.
	///
	/// Return a copy of the entry for `handle`, if it is still alive.
	pub fn get(&self, handle: Handle) -> Option<Entry> {
		self.inner.lock().get_mut(handle).map(|e| *e)
	}
}

/// ## Lifecycle.
impl Registry {
	/// # Register.
	///
	/// Add a new entry and return the lease that owns it.
	///
	/// ## Errors
	///
	/// This only fails if more than `u32::MAX` managers are alive at once.
	pub(crate) fn register(&self, kind: ManagerKind, capacity: usize)
	-> Result<Lease<'_>, crate::JpegError> {
		let handle = self.inner.lock()
			.insert(Entry { kind, capacity, transferred: 0 })
			.ok_or(crate::JpegError::Overflow)?;

		tracing::trace!(%handle, %kind, "Registered manager.");
		Ok(Lease { registry: self, handle })
	}

	/// # Record Transfer.
	fn record(&self, handle: Handle, bytes: usize) {
		if let Some(e) = self.inner.lock().get_mut(handle) {
			e.transferred = e.transferred.saturating_add(bytes as u64);
		}
	}

	/// # Release.
	fn release(&self, handle: Handle) -> Option<Entry> {
		self.inner.lock().remove(handle)
	}
}



#[derive(Debug)]
/// # Lease.
///
/// Scoped ownership of one registry entry. Dropping it removes the entry.
pub(crate) struct Lease<'a> {
	registry: &'a Registry,
	handle: Handle,
}

impl Drop for Lease<'_> {
	fn drop(&mut self) {
		if let Some(e) = self.registry.release(self.handle) {
			tracing::trace!(
				handle=%self.handle,
				kind=%e.kind,
				"Released manager after {} bytes.",
				NiceU64::from(e.transferred),
			);
		}
	}
}

impl Lease<'_> {
	#[must_use]
	/// # Handle.
	pub(crate) const fn handle(&self) -> Handle { self.handle }

	/// # Record Transfer.
	pub(crate) fn record(&self, bytes: usize) {
		self.registry.record(self.handle, bytes);
	}

	#[must_use]
	/// # Bytes Transferred.
	pub(crate) fn transferred(&self) -> u64 {
		self.registry.get(self.handle).map_or(0, |e| e.transferred)
	}
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_lease() {
		let registry = Registry::new();
		assert!(registry.is_empty());

		let a = registry.register(ManagerKind::Source, 4096).unwrap();
		let b = registry.register(ManagerKind::Destination, 4096).unwrap();
		assert_eq!(registry.len(), 2);
		assert_eq!(registry.len_of(ManagerKind::Source), 1);
		assert_eq!(registry.len_of(ManagerKind::Destination), 1);

		a.record(100);
		a.record(23);
		assert_eq!(
			registry.get(a.handle()),
			Some(Entry { kind: ManagerKind::Source, capacity: 4096, transferred: 123 }),
		);

		let stale = a.handle();
		drop(a);
		assert_eq!(registry.len(), 1);
		assert_eq!(registry.len_of(ManagerKind::Source), 0);
		assert!(registry.get(stale).is_none());

		// The slot is reused, but the old handle stays dead.
		let c = registry.register(ManagerKind::Source, 1).unwrap();
		assert_ne!(c.handle(), stale);
		assert!(registry.get(stale).is_none());
		assert!(registry.get(c.handle()).is_some());

		drop(b);
		drop(c);
		assert!(registry.is_empty());
	}

	#[test]
	fn t_panic() {
		let registry = Registry::new();
		let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
			let _lease = registry.register(ManagerKind::Destination, 4096).unwrap();
			assert_eq!(registry.len(), 1);
			panic!("Boom.");
		}));
		assert!(res.is_err());
		assert!(registry.is_empty());
	}

	#[test]
	fn t_threads() {
		let registry = Registry::new();
		std::thread::scope(|s| {
			for i in 0..8 {
				let registry = &registry;
				s.spawn(move || {
					for _ in 0..250 {
						let kind =
							if i % 2 == 0 { ManagerKind::Source }
							else { ManagerKind::Destination };
						let lease = registry.register(kind, 4096).unwrap();
						lease.record(1);
						assert_eq!(registry.get(lease.handle()).map(|e| e.transferred), Some(1));
					}
				});
			}

			// Watch from the outside while the workers churn.
			for _ in 0..100 { assert!(registry.len() <= 8); }
		});

		assert!(registry.is_empty());
	}
}
