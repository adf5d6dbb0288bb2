//! Slot+generation handle table backing the C-visible buffer handles.
//!
//! A handle is a `u64` that encodes which slot a value lives in and
//! which generation of that slot issued it. Destroying a buffer bumps
//! the slot's generation, so a handle kept by the host after destroy
//! stops resolving instead of aliasing whatever occupies the slot next.
//! Double-destroy resolves to nothing and is therefore harmless.

/// Upper 32 bits: slot index. Lower 32 bits: generation.
fn pack(slot: u32, generation: u32) -> u64 {
    ((slot as u64) << 32) | (generation as u64)
}

fn unpack(handle: u64) -> (u32, u32) {
    ((handle >> 32) as u32, handle as u32)
}

struct Entry<T> {
    generation: u32,
    value: Option<T>,
}

/// Maps `u64` handles to owned values, detecting stale handles.
///
/// Freed slots are recycled through a free list with an incremented
/// generation, so old handles to the slot no longer match.
pub(crate) struct HandleTable<T> {
    entries: Vec<Entry<T>>,
    free: Vec<u32>,
}

impl<T> HandleTable<T> {
    /// Create an empty table. `const` so it can back a `static`.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store a value, returning the handle that names it.
    pub fn insert(&mut self, value: T) -> u64 {
        match self.free.pop() {
            Some(slot) => {
                let entry = &mut self.entries[slot as usize];
                entry.value = Some(value);
                pack(slot, entry.generation)
            }
            None => {
                let slot = self.entries.len() as u32;
                self.entries.push(Entry {
                    generation: 0,
                    value: Some(value),
                });
                pack(slot, 0)
            }
        }
    }

    /// Resolve a handle, or `None` if it is stale or never existed.
    pub fn get(&self, handle: u64) -> Option<&T> {
        let (slot, generation) = unpack(handle);
        let entry = self.entries.get(slot as usize)?;
        if entry.generation != generation {
            return None;
        }
        entry.value.as_ref()
    }

    /// Take the value out of a handle's slot and invalidate the handle.
    ///
    /// Returns `None` for stale or unknown handles, so removing twice
    /// is safe. If the slot's generation counter wraps to 0 the slot is
    /// retired rather than recycled: a recycled slot back at generation
    /// 0 would resurrect handles from its first life.
    pub fn remove(&mut self, handle: u64) -> Option<T> {
        let (slot, generation) = unpack(handle);
        let entry = self.entries.get_mut(slot as usize)?;
        if entry.generation != generation {
            return None;
        }
        let value = entry.value.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        if entry.generation != 0 {
            self.free.push(slot);
        }
        Some(value)
    }
}
