//! TUIO 1.1 profile addresses and message commands

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// The nine profiles defined by TUIO 1.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProfileKind {
    Cursor2d,
    Cursor25d,
    Cursor3d,
    Object2d,
    Object25d,
    Object3d,
    Blob2d,
    Blob25d,
    Blob3d,
}

impl ProfileKind {
    /// Every profile, in address-table order
    pub const ALL: [ProfileKind; 9] = [
        ProfileKind::Cursor2d,
        ProfileKind::Cursor25d,
        ProfileKind::Cursor3d,
        ProfileKind::Object2d,
        ProfileKind::Object25d,
        ProfileKind::Object3d,
        ProfileKind::Blob2d,
        ProfileKind::Blob25d,
        ProfileKind::Blob3d,
    ];

    /// OSC address carrying this profile
    pub fn address(self) -> &'static str {
        match self {
            ProfileKind::Cursor2d => "/tuio/2Dcur",
            ProfileKind::Cursor25d => "/tuio/25Dcur",
            ProfileKind::Cursor3d => "/tuio/3Dcur",
            ProfileKind::Object2d => "/tuio/2Dobj",
            ProfileKind::Object25d => "/tuio/25Dobj",
            ProfileKind::Object3d => "/tuio/3Dobj",
            ProfileKind::Blob2d => "/tuio/2Dblb",
            ProfileKind::Blob25d => "/tuio/25Dblb",
            ProfileKind::Blob3d => "/tuio/3Dblb",
        }
    }

    /// Look up the profile for an OSC address
    pub fn from_address(addr: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.address() == addr)
    }

    /// Number of arguments in a well-formed "set" message, command included
    pub fn set_arity(self) -> usize {
        match self {
            ProfileKind::Cursor2d => 7,
            ProfileKind::Cursor25d | ProfileKind::Cursor3d => 9,
            ProfileKind::Object2d => 11,
            ProfileKind::Object25d => 13,
            ProfileKind::Object3d => 17,
            ProfileKind::Blob2d => 13,
            ProfileKind::Blob25d => 15,
            ProfileKind::Blob3d => 20,
        }
    }

    pub fn is_cursor(self) -> bool {
        matches!(
            self,
            ProfileKind::Cursor2d | ProfileKind::Cursor25d | ProfileKind::Cursor3d
        )
    }
}

impl fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.address())
    }
}

impl FromStr for ProfileKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_address(s).ok_or_else(|| Error::UnknownAddress(s.to_string()))
    }
}

/// The command carried in argument 0 of every TUIO message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Source,
    Set,
    Alive,
    Fseq,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Source => "source",
            Command::Set => "set",
            Command::Alive => "alive",
            Command::Fseq => "fseq",
        }
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "source" => Ok(Command::Source),
            "set" => Ok(Command::Set),
            "alive" => Ok(Command::Alive),
            "fseq" => Ok(Command::Fseq),
            other => Err(Error::UnknownCommand(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_lookup() {
        for kind in ProfileKind::ALL {
            assert_eq!(ProfileKind::from_address(kind.address()), Some(kind));
        }
        assert_eq!(ProfileKind::from_address("/tuio/4Dcur"), None);
        assert!("/tuio/2Dcur".parse::<ProfileKind>().is_ok());
    }

    #[test]
    fn test_command_parse() {
        assert_eq!("fseq".parse::<Command>().unwrap(), Command::Fseq);
        assert!(matches!(
            "bogus".parse::<Command>(),
            Err(Error::UnknownCommand(_))
        ));
    }
}
