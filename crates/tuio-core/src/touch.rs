//! Touch records synthesized from committed cursor frames
//!
//! TUIO coordinates are normalized to `[0, 1]`. A [`Viewport`] supplies the
//! pixel size they are scaled to and the clock used to timestamp touches.

use glam::Vec2;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Opaque per-event payload a host framework may attach to a touch
pub type NativeEvent = Arc<dyn Any + Send + Sync>;

/// A single touch point, in viewport pixels
#[derive(Clone)]
pub struct Touch {
    pub position: Vec2,
    pub prev_position: Vec2,
    /// Session id of the cursor that produced this touch
    pub id: u32,
    /// Seconds on the viewport clock at commit time
    pub time: f64,
    pub native: Option<NativeEvent>,
}

impl Touch {
    pub fn new(position: Vec2, prev_position: Vec2, id: u32, time: f64) -> Self {
        Self {
            position,
            prev_position,
            id,
            time,
            native: None,
        }
    }
}

impl fmt::Debug for Touch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Touch")
            .field("position", &self.position)
            .field("prev_position", &self.prev_position)
            .field("id", &self.id)
            .field("time", &self.time)
            .field("native", &self.native.is_some())
            .finish()
    }
}

/// A batch of touches sharing one began/moved/ended classification
#[derive(Debug, Clone)]
pub struct TouchEvent {
    /// Source whose frame produced the batch
    pub source: String,
    pub touches: Vec<Touch>,
}

impl TouchEvent {
    pub fn len(&self) -> usize {
        self.touches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touches.is_empty()
    }
}

/// The host surface that touches are delivered to
pub trait Viewport: Send + Sync {
    /// Current size in pixels
    fn size(&self) -> Vec2;

    /// Seconds elapsed on the host clock
    fn elapsed_seconds(&self) -> f64;
}

/// A viewport of constant size, timed from its creation
#[derive(Debug, Clone)]
pub struct FixedViewport {
    size: Vec2,
    started: Instant,
}

impl FixedViewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            started: Instant::now(),
        }
    }
}

impl Default for FixedViewport {
    /// Unit viewport: touches stay in normalized coordinates
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl Viewport for FixedViewport {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn elapsed_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// A viewport whose size is queried from the host on every frame
pub struct DynamicViewport<F> {
    size_fn: F,
    started: Instant,
}

impl<F> DynamicViewport<F>
where
    F: Fn() -> Vec2 + Send + Sync,
{
    pub fn new(size_fn: F) -> Self {
        Self {
            size_fn,
            started: Instant::now(),
        }
    }
}

impl<F> Viewport for DynamicViewport<F>
where
    F: Fn() -> Vec2 + Send + Sync,
{
    fn size(&self) -> Vec2 {
        (self.size_fn)()
    }

    fn elapsed_seconds(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Scale a normalized position and velocity into a touch
///
/// The previous position is reconstructed as `position - velocity`.
pub fn scaled_touch(position: Vec2, velocity: Vec2, session_id: i32, time: f64, size: Vec2) -> Touch {
    Touch::new(
        position * size,
        (position - velocity) * size,
        session_id as u32,
        time,
    )
}
