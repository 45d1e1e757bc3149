//! Positional decoding of TUIO OSC messages
//!
//! A TUIO message is an OSC message whose first argument is a command string
//! (`source`, `set`, `alive`, `fseq`) followed by command-specific arguments.
//! Profiles are populated from "set" messages by index, following the TUIO 1.1
//! schema for their address.

use glam::{Vec2, Vec3};
use rosc::{OscMessage, OscType};

use crate::address::Command;
use crate::error::{Error, Result};
use crate::profile::Profile;

/// Typed, indexed view over an OSC argument list
#[derive(Debug, Clone, Copy)]
pub struct SetArgs<'a> {
    args: &'a [OscType],
}

impl<'a> SetArgs<'a> {
    pub fn new(args: &'a [OscType]) -> Self {
        Self { args }
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    fn get(&self, index: usize) -> Result<&'a OscType> {
        self.args
            .get(index)
            .ok_or(Error::MissingArgument { index })
    }

    /// Read a 32-bit integer. A 64-bit long is accepted when it fits.
    pub fn int32(&self, index: usize) -> Result<i32> {
        match self.get(index)? {
            OscType::Int(i) => Ok(*i),
            OscType::Long(l) => i32::try_from(*l).map_err(|_| Error::ArgumentType {
                index,
                expected: "int32",
            }),
            _ => Err(Error::ArgumentType {
                index,
                expected: "int32",
            }),
        }
    }

    /// Read a float. Doubles are narrowed and integers widened.
    pub fn float(&self, index: usize) -> Result<f32> {
        match self.get(index)? {
            OscType::Float(f) => Ok(*f),
            OscType::Double(d) => Ok(*d as f32),
            OscType::Int(i) => Ok(*i as f32),
            _ => Err(Error::ArgumentType {
                index,
                expected: "float",
            }),
        }
    }

    pub fn string(&self, index: usize) -> Result<&'a str> {
        match self.get(index)? {
            OscType::String(s) => Ok(s.as_str()),
            _ => Err(Error::ArgumentType {
                index,
                expected: "string",
            }),
        }
    }

    /// Two consecutive floats starting at `index`
    pub fn vec2(&self, index: usize) -> Result<Vec2> {
        Ok(Vec2::new(self.float(index)?, self.float(index + 1)?))
    }

    /// Three consecutive floats starting at `index`
    pub fn vec3(&self, index: usize) -> Result<Vec3> {
        Ok(Vec3::new(
            self.float(index)?,
            self.float(index + 1)?,
            self.float(index + 2)?,
        ))
    }
}

/// Parse the command in argument 0
pub fn command(msg: &OscMessage) -> Result<Command> {
    SetArgs::new(&msg.args).string(0)?.parse()
}

/// Decode a "set" message into profile `P`
///
/// Fails when the address belongs to another profile, the command is not
/// "set", or the argument list does not match the profile schema.
pub fn decode_set<P: Profile>(msg: &OscMessage) -> Result<P> {
    let expected = P::KIND.address();
    if msg.addr != expected {
        return Err(Error::AddressMismatch {
            expected,
            actual: msg.addr.clone(),
        });
    }

    let args = SetArgs::new(&msg.args);
    match args.string(0)?.parse()? {
        Command::Set => P::decode(&args),
        other => Err(Error::UnknownCommand(other.as_str().to_string())),
    }
}

/// Session ids enumerated by an "alive" message
///
/// Arguments that are not integers are skipped.
pub fn alive_ids(msg: &OscMessage) -> Vec<i32> {
    let args = SetArgs::new(&msg.args);
    (1..args.len()).filter_map(|i| args.int32(i).ok()).collect()
}

/// Frame number carried by an "fseq" message
pub fn frame(msg: &OscMessage) -> Result<i32> {
    SetArgs::new(&msg.args).int32(1)
}

/// Source name carried by a "source" message
pub fn source_name(msg: &OscMessage) -> Result<&str> {
    SetArgs::new(&msg.args).string(1)
}
