//! TUIO message constructors

use tuio_core::{Command, OscMessage, OscType, ProfileKind};

fn message(kind: ProfileKind, command: Command, args: Vec<OscType>) -> OscMessage {
    let mut all = Vec::with_capacity(args.len() + 1);
    all.push(OscType::String(command.as_str().to_string()));
    all.extend(args);
    OscMessage {
        addr: kind.address().to_string(),
        args: all,
    }
}

/// "set" with an int session id followed by floats
pub fn set(kind: ProfileKind, session_id: i32, floats: &[f32]) -> OscMessage {
    let mut args = vec![OscType::Int(session_id)];
    args.extend(floats.iter().map(|f| OscType::Float(*f)));
    message(kind, Command::Set, args)
}

/// 2D cursor at rest
pub fn cursor2d(session_id: i32, x: f32, y: f32) -> OscMessage {
    set(ProfileKind::Cursor2d, session_id, &[x, y, 0.0, 0.0, 0.0])
}

/// 2D cursor with velocity and acceleration
pub fn cursor2d_moving(session_id: i32, x: f32, y: f32, vx: f32, vy: f32, accel: f32) -> OscMessage {
    set(ProfileKind::Cursor2d, session_id, &[x, y, vx, vy, accel])
}

pub fn cursor25d(session_id: i32, x: f32, y: f32, z: f32) -> OscMessage {
    set(
        ProfileKind::Cursor25d,
        session_id,
        &[x, y, z, 0.0, 0.0, 0.0, 0.0],
    )
}

/// 2D object with fiducial `class_id`
pub fn object2d(session_id: i32, class_id: i32, x: f32, y: f32, angle: f32) -> OscMessage {
    let mut args = vec![OscType::Int(session_id), OscType::Int(class_id)];
    args.extend(
        [x, y, angle, 0.0, 0.0, 0.0, 0.0, 0.0]
            .iter()
            .map(|f| OscType::Float(*f)),
    );
    message(ProfileKind::Object2d, Command::Set, args)
}

pub fn alive(kind: ProfileKind, ids: &[i32]) -> OscMessage {
    message(
        kind,
        Command::Alive,
        ids.iter().map(|id| OscType::Int(*id)).collect(),
    )
}

pub fn fseq(kind: ProfileKind, frame: i32) -> OscMessage {
    message(kind, Command::Fseq, vec![OscType::Int(frame)])
}

pub fn source(kind: ProfileKind, name: &str) -> OscMessage {
    message(kind, Command::Source, vec![OscType::String(name.to_string())])
}
