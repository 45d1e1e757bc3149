//! One reconciler per TUIO profile kind

use std::collections::BTreeSet;
use std::sync::Arc;
use tuio_core::{
    Blob25d, Blob2d, Blob3d, Cursor25d, Cursor2d, Cursor3d, MessageHandler, Object25d, Object2d,
    Object3d, Profile, ProfileKind, Reconciler, Viewport,
};

/// Profile types the client tracks, mapped to their reconciler
pub trait Tracked: Profile {
    fn select(set: &ReconcilerSet) -> &Reconciler<Self>;
}

/// The nine per-kind reconcilers, each with its own lock
#[derive(Debug)]
pub struct ReconcilerSet {
    cursors: Reconciler<Cursor2d>,
    cursors25d: Reconciler<Cursor25d>,
    cursors3d: Reconciler<Cursor3d>,
    objects: Reconciler<Object2d>,
    objects25d: Reconciler<Object25d>,
    objects3d: Reconciler<Object3d>,
    blobs: Reconciler<Blob2d>,
    blobs25d: Reconciler<Blob25d>,
    blobs3d: Reconciler<Blob3d>,
}

impl ReconcilerSet {
    pub fn new(viewport: Arc<dyn Viewport>, past_frame_threshold: i32) -> Self {
        let set = Self {
            cursors: Reconciler::new(viewport.clone()),
            cursors25d: Reconciler::new(viewport.clone()),
            cursors3d: Reconciler::new(viewport.clone()),
            objects: Reconciler::new(viewport.clone()),
            objects25d: Reconciler::new(viewport.clone()),
            objects3d: Reconciler::new(viewport.clone()),
            blobs: Reconciler::new(viewport.clone()),
            blobs25d: Reconciler::new(viewport.clone()),
            blobs3d: Reconciler::new(viewport),
        };
        set.set_past_frame_threshold(past_frame_threshold);
        set
    }

    pub fn get<P: Tracked>(&self) -> &Reconciler<P> {
        P::select(self)
    }

    /// Handler for messages on `kind`'s address
    pub fn route(&self, kind: ProfileKind) -> &dyn MessageHandler {
        match kind {
            ProfileKind::Cursor2d => &self.cursors,
            ProfileKind::Cursor25d => &self.cursors25d,
            ProfileKind::Cursor3d => &self.cursors3d,
            ProfileKind::Object2d => &self.objects,
            ProfileKind::Object25d => &self.objects25d,
            ProfileKind::Object3d => &self.objects3d,
            ProfileKind::Blob2d => &self.blobs,
            ProfileKind::Blob25d => &self.blobs25d,
            ProfileKind::Blob3d => &self.blobs3d,
        }
    }

    pub fn set_past_frame_threshold(&self, threshold: i32) {
        self.cursors.set_past_frame_threshold(threshold);
        self.cursors25d.set_past_frame_threshold(threshold);
        self.cursors3d.set_past_frame_threshold(threshold);
        self.objects.set_past_frame_threshold(threshold);
        self.objects25d.set_past_frame_threshold(threshold);
        self.objects3d.set_past_frame_threshold(threshold);
        self.blobs.set_past_frame_threshold(threshold);
        self.blobs25d.set_past_frame_threshold(threshold);
        self.blobs3d.set_past_frame_threshold(threshold);
    }

    /// Union of the sources known to every reconciler
    pub fn sources(&self) -> BTreeSet<String> {
        let mut all = self.cursors.sources();
        all.extend(self.cursors25d.sources());
        all.extend(self.cursors3d.sources());
        all.extend(self.objects.sources());
        all.extend(self.objects25d.sources());
        all.extend(self.objects3d.sources());
        all.extend(self.blobs.sources());
        all.extend(self.blobs25d.sources());
        all.extend(self.blobs3d.sources());
        all
    }

    pub fn reset(&self) {
        self.cursors.reset();
        self.cursors25d.reset();
        self.cursors3d.reset();
        self.objects.reset();
        self.objects25d.reset();
        self.objects3d.reset();
        self.blobs.reset();
        self.blobs25d.reset();
        self.blobs3d.reset();
    }
}

macro_rules! tracked {
    ($($ty:ty => $field:ident),* $(,)?) => {
        $(
            impl Tracked for $ty {
                fn select(set: &ReconcilerSet) -> &Reconciler<Self> {
                    &set.$field
                }
            }
        )*
    };
}

tracked! {
    Cursor2d => cursors,
    Cursor25d => cursors25d,
    Cursor3d => cursors3d,
    Object2d => objects,
    Object25d => objects25d,
    Object3d => objects3d,
    Blob2d => blobs,
    Blob25d => blobs25d,
    Blob3d => blobs3d,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuio_core::FixedViewport;

    #[test]
    fn test_route_matches_select() {
        let set = ReconcilerSet::new(Arc::new(FixedViewport::default()), 5);
        assert_eq!(set.get::<Blob25d>().past_frame_threshold(), 5);

        let msg = tuio_core::OscMessage {
            addr: ProfileKind::Object3d.address().to_string(),
            args: vec![
                tuio_core::OscType::String("fseq".into()),
                tuio_core::OscType::Int(1),
            ],
        };
        set.route(ProfileKind::Object3d).handle_message("s", &msg);

        assert_eq!(set.get::<Object3d>().previous_frame("s"), Some(1));
        assert!(set.get::<Object2d>().sources().is_empty());
        assert_eq!(set.sources().len(), 1);

        set.reset();
        assert!(set.sources().is_empty());
    }
}
