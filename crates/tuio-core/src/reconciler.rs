//! Per-profile frame reconciliation
//!
//! A [`Reconciler`] owns the live instance table for one profile kind across
//! every source. "set" and "alive" messages only queue deltas; nothing becomes
//! visible until the source's "fseq" commits the frame. Stale frames (UDP
//! reordering or duplication) are discarded whole.
//!
//! ## Frame gate
//!
//! A frame `f` from a source whose last committed frame is `p` is committed if
//! - `f == -1` (an update that does not advance time), or
//! - `f - p > 0`, or
//! - `f - p < -past_frame_threshold` (the sender restarted).
//!
//! The first frame seen from a source is always committed.

use parking_lot::Mutex;
use rosc::OscMessage;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::mem;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::address::Command;
use crate::callback::CallbackList;
use crate::decode;
use crate::profile::Profile;
use crate::touch::{Touch, TouchEvent, Viewport};

/// Default tolerance for frames from "the past" before a reset is assumed
pub const DEFAULT_PAST_FRAME_THRESHOLD: i32 = 10;

/// Frame number meaning "refresh, not a new frame"
pub const UPDATE_FRAME: i32 = -1;

/// Entry point the client uses to route messages without knowing the profile type
pub trait MessageHandler: Send + Sync {
    /// Process one TUIO message from `sender` (usually its IP address)
    fn handle_message(&self, sender: &str, msg: &OscMessage);
}

/// Sizes of the uncommitted delta buffers for one source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingCounts {
    pub adds: usize,
    pub updates: usize,
    pub deletes: usize,
}

impl PendingCounts {
    pub fn is_empty(&self) -> bool {
        self.adds == 0 && self.updates == 0 && self.deletes == 0
    }
}

struct SourceState<P> {
    instances: BTreeMap<i32, P>,
    adds: Vec<P>,
    updates: Vec<P>,
    deletes: Vec<i32>,
    previous_frame: Option<i32>,
}

impl<P> Default for SourceState<P> {
    fn default() -> Self {
        Self {
            instances: BTreeMap::new(),
            adds: Vec::new(),
            updates: Vec::new(),
            deletes: Vec::new(),
            previous_frame: None,
        }
    }
}

struct State<P> {
    sources: BTreeMap<String, SourceState<P>>,
    /// Names announced by "source" messages, keyed by sender, until its next fseq
    announced: HashMap<String, String>,
}

/// State tracker for one profile kind
pub struct Reconciler<P: Profile> {
    state: Mutex<State<P>>,
    past_frame_threshold: AtomicI32,
    viewport: Arc<dyn Viewport>,
    added: CallbackList<P>,
    updated: CallbackList<P>,
    removed: CallbackList<P>,
    touches_began: CallbackList<TouchEvent>,
    touches_moved: CallbackList<TouchEvent>,
    touches_ended: CallbackList<TouchEvent>,
}

impl<P: Profile> Reconciler<P> {
    pub fn new(viewport: Arc<dyn Viewport>) -> Self {
        Self {
            state: Mutex::new(State {
                sources: BTreeMap::new(),
                announced: HashMap::new(),
            }),
            past_frame_threshold: AtomicI32::new(DEFAULT_PAST_FRAME_THRESHOLD),
            viewport,
            added: CallbackList::new(),
            updated: CallbackList::new(),
            removed: CallbackList::new(),
            touches_began: CallbackList::new(),
            touches_moved: CallbackList::new(),
            touches_ended: CallbackList::new(),
        }
    }

    pub fn with_past_frame_threshold(self, threshold: i32) -> Self {
        self.set_past_frame_threshold(threshold);
        self
    }

    pub fn past_frame_threshold(&self) -> i32 {
        self.past_frame_threshold.load(Ordering::Relaxed)
    }

    /// Negative thresholds are clamped to 0
    pub fn set_past_frame_threshold(&self, threshold: i32) {
        self.past_frame_threshold
            .store(threshold.max(0), Ordering::Relaxed);
    }

    /// Fired once per committed add
    pub fn added(&self) -> &CallbackList<P> {
        &self.added
    }

    /// Fired once per committed update
    pub fn updated(&self) -> &CallbackList<P> {
        &self.updated
    }

    /// Fired once per committed removal, with the last committed value
    pub fn removed(&self) -> &CallbackList<P> {
        &self.removed
    }

    pub fn touches_began(&self) -> &CallbackList<TouchEvent> {
        &self.touches_began
    }

    pub fn touches_moved(&self) -> &CallbackList<TouchEvent> {
        &self.touches_moved
    }

    pub fn touches_ended(&self) -> &CallbackList<TouchEvent> {
        &self.touches_ended
    }

    /// Copy of the committed instances, for one source or (`None`) all of them
    ///
    /// Instances are ordered by source, then session id.
    pub fn instances(&self, source: Option<&str>) -> Vec<P> {
        let state = self.state.lock();
        match source {
            Some(source) => state
                .sources
                .get(source)
                .map(|s| s.instances.values().cloned().collect())
                .unwrap_or_default(),
            None => state
                .sources
                .values()
                .flat_map(|s| s.instances.values().cloned())
                .collect(),
        }
    }

    /// Committed instances converted to touches on the current viewport
    pub fn active_touches(&self, source: Option<&str>) -> Vec<Touch> {
        let time = self.viewport.elapsed_seconds();
        let size = self.viewport.size();
        self.instances(source)
            .iter()
            .map(|p| p.to_touch(time, size))
            .collect()
    }

    /// Every source this reconciler holds state for
    pub fn sources(&self) -> BTreeSet<String> {
        self.state.lock().sources.keys().cloned().collect()
    }

    /// Last committed frame number for `source`
    pub fn previous_frame(&self, source: &str) -> Option<i32> {
        self.state
            .lock()
            .sources
            .get(source)
            .and_then(|s| s.previous_frame)
    }

    /// Uncommitted deltas queued for `source`
    pub fn pending(&self, source: &str) -> PendingCounts {
        self.state
            .lock()
            .sources
            .get(source)
            .map(|s| PendingCounts {
                adds: s.adds.len(),
                updates: s.updates.len(),
                deletes: s.deletes.len(),
            })
            .unwrap_or_default()
    }

    /// Drop all tracked state; subscribers are kept
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.sources.clear();
        state.announced.clear();
    }

    fn process(&self, sender: &str, msg: &OscMessage) {
        let command = match decode::command(msg) {
            Ok(command) => command,
            Err(e) => {
                debug!("{} ignoring message from {}: {}", P::KIND, sender, e);
                return;
            }
        };

        let mut state = self.state.lock();
        let state = &mut *state;

        if command == Command::Source {
            match decode::source_name(msg) {
                Ok(name) => {
                    trace!("{} sender {} announced source {}", P::KIND, sender, name);
                    state.announced.insert(sender.to_string(), name.to_string());
                }
                Err(e) => debug!("{} bad source message from {}: {}", P::KIND, sender, e),
            }
            return;
        }

        let source = state
            .announced
            .get(sender)
            .cloned()
            .unwrap_or_else(|| sender.to_string());
        let entry = state.sources.entry(source.clone()).or_default();

        match command {
            Command::Set => {
                let mut profile = P::from_set_message(msg);
                if !profile.is_valid() {
                    return;
                }
                profile.set_source(source);

                let id = profile.session_id();
                let known = entry.instances.contains_key(&id)
                    || entry.adds.iter().any(|p| p.session_id() == id);
                if known {
                    entry.updates.push(profile);
                } else {
                    entry.adds.push(profile);
                }
            }
            Command::Alive => {
                let alive: BTreeSet<i32> = decode::alive_ids(msg).into_iter().collect();
                entry.deletes.extend(
                    entry
                        .instances
                        .keys()
                        .filter(|id| !alive.contains(id))
                        .copied(),
                );
            }
            Command::Fseq => {
                state.announced.remove(sender);
                match decode::frame(msg) {
                    Ok(frame) => self.commit(entry, &source, frame),
                    Err(e) => debug!("{} bad fseq from {}: {}", P::KIND, sender, e),
                }
            }
            Command::Source => {}
        }
    }

    fn accepts(&self, previous: Option<i32>, frame: i32) -> bool {
        if frame == UPDATE_FRAME {
            return true;
        }
        match previous {
            None => true,
            Some(previous) => {
                let delta = frame.wrapping_sub(previous);
                delta > 0 || i64::from(delta) < -i64::from(self.past_frame_threshold())
            }
        }
    }

    fn commit(&self, entry: &mut SourceState<P>, source: &str, frame: i32) {
        let adds = mem::take(&mut entry.adds);
        let updates = mem::take(&mut entry.updates);
        let deletes = mem::take(&mut entry.deletes);

        if !self.accepts(entry.previous_frame, frame) {
            debug!(
                "{} discarding frame {} from {} (last committed {:?})",
                P::KIND,
                frame,
                source,
                entry.previous_frame
            );
            return;
        }

        let time = self.viewport.elapsed_seconds();
        let size = self.viewport.size();

        let mut began = Vec::with_capacity(adds.len());
        for profile in adds {
            began.push(profile.to_touch(time, size));
            entry.instances.insert(profile.session_id(), profile.clone());
            self.added.call(&profile);
        }

        let mut moved = Vec::with_capacity(updates.len());
        for profile in updates {
            moved.push(profile.to_touch(time, size));
            entry.instances.insert(profile.session_id(), profile.clone());
            self.updated.call(&profile);
        }

        let mut ended = Vec::with_capacity(deletes.len());
        for id in deletes {
            if let Some(profile) = entry.instances.get(&id) {
                ended.push(profile.to_touch(time, size));
                self.removed.call(profile);
            }
            entry.instances.remove(&id);
        }

        for (touches, callbacks) in [
            (began, &self.touches_began),
            (moved, &self.touches_moved),
            (ended, &self.touches_ended),
        ] {
            if !touches.is_empty() {
                callbacks.call(&TouchEvent {
                    source: source.to_string(),
                    touches,
                });
            }
        }

        if frame != UPDATE_FRAME {
            entry.previous_frame = Some(frame);
        }
        trace!("{} committed frame {} from {}", P::KIND, frame, source);
    }
}

impl<P: Profile> MessageHandler for Reconciler<P> {
    fn handle_message(&self, sender: &str, msg: &OscMessage) {
        self.process(sender, msg);
    }
}

impl<P: Profile> fmt::Debug for Reconciler<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("kind", &P::KIND)
            .field("past_frame_threshold", &self.past_frame_threshold())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Cursor2d;
    use crate::touch::FixedViewport;

    #[test]
    fn test_accepts_gate() {
        let r: Reconciler<Cursor2d> = Reconciler::new(Arc::new(FixedViewport::default()));
        assert!(r.accepts(None, 0));
        assert!(r.accepts(Some(5), 6));
        assert!(!r.accepts(Some(5), 5));
        assert!(!r.accepts(Some(5), -5));
        assert!(r.accepts(Some(5), -6));
        assert!(r.accepts(Some(5), UPDATE_FRAME));
        assert!(r.accepts(Some(i32::MAX), i32::MIN));
    }

    #[test]
    fn test_extreme_thresholds() {
        let r: Reconciler<Cursor2d> =
            Reconciler::new(Arc::new(FixedViewport::default())).with_past_frame_threshold(i32::MIN);
        assert_eq!(r.past_frame_threshold(), 0);
        assert!(!r.accepts(Some(5), 5));
        assert!(r.accepts(Some(5), 4));

        r.set_past_frame_threshold(i32::MAX);
        assert!(!r.accepts(Some(5), 4));
        assert!(!r.accepts(Some(0), i32::MIN + 1));
        assert!(r.accepts(Some(5), 6));
    }
}
