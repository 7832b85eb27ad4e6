//! Keyboard key codes
//!
//! Platform windows report virtual-key codes; [`KeyCode::from_virtual_key`]
//! maps the keys the engine reacts to and keeps everything else as
//! [`KeyCode::Other`].

use serde::{Deserialize, Serialize};

/// Key codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum KeyCode {
    /// W key
    W,
    /// A key
    A,
    /// S key
    S,
    /// D key
    D,
    /// Q key
    Q,
    /// E key
    E,
    /// Up arrow
    Up,
    /// Down arrow
    Down,
    /// Left arrow
    Left,
    /// Right arrow
    Right,
    /// Space bar
    Space,
    /// Escape key
    Escape,
    /// Any other key, by virtual-key code
    Other(u32),
}

impl KeyCode {
    /// Map a virtual-key code (Win32 `VK_*` numbering) to a key
    pub const fn from_virtual_key(code: u32) -> Self {
        match code {
            0x57 => Self::W,
            0x41 => Self::A,
            0x53 => Self::S,
            0x44 => Self::D,
            0x51 => Self::Q,
            0x45 => Self::E,
            0x26 => Self::Up,
            0x28 => Self::Down,
            0x25 => Self::Left,
            0x27 => Self::Right,
            0x20 => Self::Space,
            0x1B => Self::Escape,
            other => Self::Other(other),
        }
    }
}
