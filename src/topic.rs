// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topic handles and the bounded topic registry (C3).
//!
//! The registry itself is grounded on `fixedmap::FixedMap`: a fixed-size
//! array of `Option<(K, V)>`, linear scan, no allocation. Unlike
//! `FixedMap::insert`, which panics on overflow, registration here goes
//! through [`crate::platform::Platform::fatal`] -- panicking out of a log
//! call would defeat the entire point of a logging subsystem.

use core::sync::atomic::{AtomicI16, Ordering};

use crate::platform::{FatalKind, Platform};

/// Identifies a registered topic prefix.
pub type TopicHandle = i16;

/// Sentinel for "no topic" / "not yet registered". Signed so it can be
/// distinguished from the valid topic id `0`.
pub const INVALID_TOPIC: TopicHandle = i16::MIN;

const FIRST_FREE_TOPIC: TopicHandle = 0;

/// Bounded `TopicHandle -> &str` map with monotonic id allocation.
///
/// `MAX` is the capacity (`tMaxTopicCount` in the source). Ids are handed
/// out by [`TopicRegistry::register`] via a `fetch_add`, so registration
/// may safely race across tasks; lookup via [`TopicRegistry::find`] never
/// mutates the table, matching invariant I5 (topic ids, once allocated,
/// are stable for process lifetime).
pub struct TopicRegistry<const MAX: usize> {
    next_free: AtomicI16,
    entries: [Option<(TopicHandle, &'static str)>; MAX],
}

impl<const MAX: usize> TopicRegistry<MAX> {
    /// An empty registry, suitable for a `const` static initializer.
    pub const fn new() -> Self {
        Self {
            next_free: AtomicI16::new(FIRST_FREE_TOPIC),
            entries: [None; MAX],
        }
    }

    /// Allocates the next topic id and associates it with `prefix`.
    ///
    /// Calls [`Platform::fatal`] with [`FatalKind::OutOfTopics`] if the
    /// table is already full; the `prefix` argument's lifetime must be
    /// `'static` because the registry retains it for process lifetime.
    pub fn register<P: Platform>(
        &mut self,
        platform: &P,
        prefix: &'static str,
    ) -> TopicHandle {
        let id = self.next_free.fetch_add(1, Ordering::Relaxed);
        match self.entries.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some((id, prefix));
                id
            }
            None => platform.fatal(FatalKind::OutOfTopics),
        }
    }

    /// Looks up the prefix for `id`, if registered.
    pub fn find(&self, id: TopicHandle) -> Option<&'static str> {
        self.entries
            .iter()
            .flatten()
            .find(|(topic, _)| *topic == id)
            .map(|(_, prefix)| *prefix)
    }
}

impl<const MAX: usize> Default for TopicRegistry<MAX> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::NullPlatform;

    #[test]
    fn register_and_find() {
        let platform = NullPlatform::default();
        let mut registry: TopicRegistry<4> = TopicRegistry::new();
        let sys = registry.register(&platform, "sys");
        let net = registry.register(&platform, "net");
        assert_eq!(sys, 0);
        assert_eq!(net, 1);
        assert_eq!(registry.find(sys), Some("sys"));
        assert_eq!(registry.find(net), Some("net"));
        assert_eq!(registry.find(INVALID_TOPIC), None);
    }

    #[test]
    #[should_panic]
    fn overflow_is_fatal() {
        let platform = NullPlatform::default();
        let mut registry: TopicRegistry<1> = TopicRegistry::new();
        registry.register(&platform, "a");
        registry.register(&platform, "b");
    }
}
