//! Tracked entity profiles
//!
//! Every profile carries the sender-assigned session id and the source it was
//! received from, plus the kinematic fields of its TUIO 1.1 schema. Profiles
//! are plain values: snapshots and callbacks always receive copies.

use glam::{Vec2, Vec3};
use rosc::OscMessage;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::address::ProfileKind;
use crate::decode::{self, SetArgs};
use crate::error::Result;
use crate::touch::{scaled_touch, Touch};

/// Session id of a profile that failed to decode
pub const INVALID_SESSION_ID: i32 = -1;

/// Capability shared by every tracked entity
pub trait Profile: Clone + fmt::Debug + Send + Sync + 'static {
    /// Profile kind, and with it the OSC address this type decodes from
    const KIND: ProfileKind;

    fn session_id(&self) -> i32;

    fn source(&self) -> &str;

    fn set_source(&mut self, source: String);

    /// Populate from a "set" argument list (argument 0 is the command)
    fn decode(args: &SetArgs<'_>) -> Result<Self>;

    /// The sentinel returned when decoding fails
    fn invalid() -> Self;

    /// Position projected onto the x/y plane
    fn planar_position(&self) -> Vec2;

    /// Velocity projected onto the x/y plane
    fn planar_velocity(&self) -> Vec2;

    fn is_valid(&self) -> bool {
        self.session_id() != INVALID_SESSION_ID
    }

    /// Decode a "set" message, returning the sentinel on any failure
    fn from_set_message(msg: &OscMessage) -> Self {
        decode::decode_set::<Self>(msg).unwrap_or_else(|e| {
            debug!("{} decode failed: {}", Self::KIND, e);
            Self::invalid()
        })
    }

    /// Convert to a touch scaled to `size` pixels
    fn to_touch(&self, time: f64, size: Vec2) -> Touch {
        scaled_touch(
            self.planar_position(),
            self.planar_velocity(),
            self.session_id(),
            time,
            size,
        )
    }
}

macro_rules! identity_accessors {
    () => {
        fn session_id(&self) -> i32 {
            self.session_id
        }

        fn source(&self) -> &str {
            &self.source
        }

        fn set_source(&mut self, source: String) {
            self.source = source;
        }

        fn invalid() -> Self {
            Self {
                session_id: INVALID_SESSION_ID,
                ..Default::default()
            }
        }
    };
}

// ============================================================================
// Cursors
// ============================================================================

/// `/tuio/2Dcur`: set s x y X Y m
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cursor2d {
    pub session_id: i32,
    pub source: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub acceleration: f32,
}

impl Profile for Cursor2d {
    const KIND: ProfileKind = ProfileKind::Cursor2d;

    identity_accessors!();

    fn decode(args: &SetArgs<'_>) -> Result<Self> {
        Ok(Self {
            session_id: args.int32(1)?,
            source: String::new(),
            position: args.vec2(2)?,
            velocity: args.vec2(4)?,
            acceleration: args.float(6)?,
        })
    }

    fn planar_position(&self) -> Vec2 {
        self.position
    }

    fn planar_velocity(&self) -> Vec2 {
        self.velocity
    }
}

/// `/tuio/25Dcur`: set s x y z X Y Z m
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cursor25d {
    pub session_id: i32,
    pub source: String,
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: f32,
}

impl Profile for Cursor25d {
    const KIND: ProfileKind = ProfileKind::Cursor25d;

    identity_accessors!();

    fn decode(args: &SetArgs<'_>) -> Result<Self> {
        Ok(Self {
            session_id: args.int32(1)?,
            source: String::new(),
            position: args.vec3(2)?,
            velocity: args.vec3(5)?,
            acceleration: args.float(8)?,
        })
    }

    fn planar_position(&self) -> Vec2 {
        self.position.truncate()
    }

    fn planar_velocity(&self) -> Vec2 {
        self.velocity.truncate()
    }
}

/// `/tuio/3Dcur`: set s x y z X Y Z m
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cursor3d {
    pub session_id: i32,
    pub source: String,
    pub position: Vec3,
    pub velocity: Vec3,
    pub acceleration: f32,
}

impl Profile for Cursor3d {
    const KIND: ProfileKind = ProfileKind::Cursor3d;

    identity_accessors!();

    fn decode(args: &SetArgs<'_>) -> Result<Self> {
        Ok(Self {
            session_id: args.int32(1)?,
            source: String::new(),
            position: args.vec3(2)?,
            velocity: args.vec3(5)?,
            acceleration: args.float(8)?,
        })
    }

    fn planar_position(&self) -> Vec2 {
        self.position.truncate()
    }

    fn planar_velocity(&self) -> Vec2 {
        self.velocity.truncate()
    }
}

// ============================================================================
// Objects
// ============================================================================

/// `/tuio/2Dobj`: set s i x y a X Y A m r
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Object2d {
    pub session_id: i32,
    pub source: String,
    /// Fiducial id of the tangible
    pub class_id: i32,
    pub position: Vec2,
    /// Radians, `0..2PI`
    pub angle: f32,
    pub velocity: Vec2,
    pub rotation_velocity: f32,
    pub acceleration: f32,
    pub rotation_acceleration: f32,
}

impl Profile for Object2d {
    const KIND: ProfileKind = ProfileKind::Object2d;

    identity_accessors!();

    fn decode(args: &SetArgs<'_>) -> Result<Self> {
        Ok(Self {
            session_id: args.int32(1)?,
            source: String::new(),
            class_id: args.int32(2)?,
            position: args.vec2(3)?,
            angle: args.float(5)?,
            velocity: args.vec2(6)?,
            rotation_velocity: args.float(8)?,
            acceleration: args.float(9)?,
            rotation_acceleration: args.float(10)?,
        })
    }

    fn planar_position(&self) -> Vec2 {
        self.position
    }

    fn planar_velocity(&self) -> Vec2 {
        self.velocity
    }
}

/// `/tuio/25Dobj`: set s i x y z a X Y Z A m r
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Object25d {
    pub session_id: i32,
    pub source: String,
    pub class_id: i32,
    pub position: Vec3,
    pub angle: f32,
    pub velocity: Vec3,
    pub rotation_velocity: f32,
    pub acceleration: f32,
    pub rotation_acceleration: f32,
}

impl Profile for Object25d {
    const KIND: ProfileKind = ProfileKind::Object25d;

    identity_accessors!();

    fn decode(args: &SetArgs<'_>) -> Result<Self> {
        Ok(Self {
            session_id: args.int32(1)?,
            source: String::new(),
            class_id: args.int32(2)?,
            position: args.vec3(3)?,
            angle: args.float(6)?,
            velocity: args.vec3(7)?,
            rotation_velocity: args.float(10)?,
            acceleration: args.float(11)?,
            rotation_acceleration: args.float(12)?,
        })
    }

    fn planar_position(&self) -> Vec2 {
        self.position.truncate()
    }

    fn planar_velocity(&self) -> Vec2 {
        self.velocity.truncate()
    }
}

/// `/tuio/3Dobj`: set s i x y z a b c X Y Z A B C m r
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Object3d {
    pub session_id: i32,
    pub source: String,
    pub class_id: i32,
    pub position: Vec3,
    /// Euler angles a, b, c
    pub angle: Vec3,
    pub velocity: Vec3,
    pub rotation_velocity: Vec3,
    pub acceleration: f32,
    pub rotation_acceleration: f32,
}

impl Profile for Object3d {
    const KIND: ProfileKind = ProfileKind::Object3d;

    identity_accessors!();

    fn decode(args: &SetArgs<'_>) -> Result<Self> {
        Ok(Self {
            session_id: args.int32(1)?,
            source: String::new(),
            class_id: args.int32(2)?,
            position: args.vec3(3)?,
            angle: args.vec3(6)?,
            velocity: args.vec3(9)?,
            rotation_velocity: args.vec3(12)?,
            acceleration: args.float(15)?,
            rotation_acceleration: args.float(16)?,
        })
    }

    fn planar_position(&self) -> Vec2 {
        self.position.truncate()
    }

    fn planar_velocity(&self) -> Vec2 {
        self.velocity.truncate()
    }
}

// ============================================================================
// Blobs
// ============================================================================

/// `/tuio/2Dblb`: set s x y a w h f X Y A m r
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blob2d {
    pub session_id: i32,
    pub source: String,
    pub position: Vec2,
    pub angle: f32,
    /// Width and height
    pub dimensions: Vec2,
    pub area: f32,
    pub velocity: Vec2,
    pub rotation_velocity: f32,
    pub acceleration: f32,
    pub rotation_acceleration: f32,
}

impl Profile for Blob2d {
    const KIND: ProfileKind = ProfileKind::Blob2d;

    identity_accessors!();

    fn decode(args: &SetArgs<'_>) -> Result<Self> {
        Ok(Self {
            session_id: args.int32(1)?,
            source: String::new(),
            position: args.vec2(2)?,
            angle: args.float(4)?,
            dimensions: args.vec2(5)?,
            area: args.float(7)?,
            velocity: args.vec2(8)?,
            rotation_velocity: args.float(10)?,
            acceleration: args.float(11)?,
            rotation_acceleration: args.float(12)?,
        })
    }

    fn planar_position(&self) -> Vec2 {
        self.position
    }

    fn planar_velocity(&self) -> Vec2 {
        self.velocity
    }
}

/// `/tuio/25Dblb`: set s x y z a w h f X Y Z A m r
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blob25d {
    pub session_id: i32,
    pub source: String,
    pub position: Vec3,
    pub angle: f32,
    pub dimensions: Vec2,
    pub area: f32,
    pub velocity: Vec3,
    pub rotation_velocity: f32,
    pub acceleration: f32,
    pub rotation_acceleration: f32,
}

impl Profile for Blob25d {
    const KIND: ProfileKind = ProfileKind::Blob25d;

    identity_accessors!();

    fn decode(args: &SetArgs<'_>) -> Result<Self> {
        Ok(Self {
            session_id: args.int32(1)?,
            source: String::new(),
            position: args.vec3(2)?,
            angle: args.float(5)?,
            dimensions: args.vec2(6)?,
            area: args.float(8)?,
            velocity: args.vec3(9)?,
            rotation_velocity: args.float(12)?,
            acceleration: args.float(13)?,
            rotation_acceleration: args.float(14)?,
        })
    }

    fn planar_position(&self) -> Vec2 {
        self.position.truncate()
    }

    fn planar_velocity(&self) -> Vec2 {
        self.velocity.truncate()
    }
}

/// `/tuio/3Dblb`: set s x y z a b c w h d v X Y Z A B C m r
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Blob3d {
    pub session_id: i32,
    pub source: String,
    pub position: Vec3,
    pub angle: Vec3,
    /// Width, height and depth
    pub dimensions: Vec3,
    pub volume: f32,
    pub velocity: Vec3,
    pub rotation_velocity: Vec3,
    pub acceleration: f32,
    pub rotation_acceleration: f32,
}

impl Profile for Blob3d {
    const KIND: ProfileKind = ProfileKind::Blob3d;

    identity_accessors!();

    fn decode(args: &SetArgs<'_>) -> Result<Self> {
        Ok(Self {
            session_id: args.int32(1)?,
            source: String::new(),
            position: args.vec3(2)?,
            angle: args.vec3(5)?,
            dimensions: args.vec3(8)?,
            volume: args.float(11)?,
            velocity: args.vec3(12)?,
            rotation_velocity: args.vec3(15)?,
            acceleration: args.float(18)?,
            rotation_acceleration: args.float(19)?,
        })
    }

    fn planar_position(&self) -> Vec2 {
        self.position.truncate()
    }

    fn planar_velocity(&self) -> Vec2 {
        self.velocity.truncate()
    }
}
