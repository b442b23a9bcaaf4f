use std::collections::HashMap;
use std::collections::HashSet;
use std::hash::{DefaultHasher, Hash, Hasher};


/// Per-export table mapping stable string keys to 64-bit unique ids.
///
/// UIDs are positive, nonzero (0 is the synthetic document root), and stable
/// for a given key within one registry. They are not guaranteed stable across
/// separate runs.
#[derive(Debug, Default)]
pub struct UidRegistry {
	by_key: HashMap<String, i64>,
	used: HashSet<i64>,
}

impl UidRegistry {
	/// Create an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Return the UID for `key`, assigning one on first use.
	pub fn uid(&mut self, key: &str) -> i64 {
		if let Some(uid) = self.by_key.get(key) {
			return *uid;
		}

		let mut hasher = DefaultHasher::new();
		key.hash(&mut hasher);
		let mut uid = (hasher.finish() & (i64::MAX as u64)) as i64;

		// 0 is reserved for the root; probe past collisions.
		while uid == 0 || self.used.contains(&uid) {
			uid = uid.wrapping_add(1) & i64::MAX;
		}

		self.used.insert(uid);
		self.by_key.insert(key.to_owned(), uid);
		uid
	}

	/// Return the UID for `key` if one was already assigned.
	pub fn get(&self, key: &str) -> Option<i64> {
		self.by_key.get(key).copied()
	}
}
