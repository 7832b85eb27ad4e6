//! Platform window abstraction
//!
//! The engine only needs two things from a window: a per-frame poll that
//! reports whether the user asked to quit, and a hook for raw key state
//! changes. Real platform backends live outside this crate;
//! [`HeadlessWindow`] drives the engine from a script instead.

use std::collections::BTreeMap;
use std::fmt;

use crate::input::KeyCode;

/// Receives `(virtual_key_code, is_pressed)` for every key state change
pub type KeyCallback = Box<dyn FnMut(u32, bool)>;

/// Opaque identifier a renderer uses to attach to a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle {
    /// Backend-specific window id
    pub raw: u64,
    /// Client area width in pixels
    pub width: u32,
    /// Client area height in pixels
    pub height: u32,
}

/// A platform window the frame loop can poll
pub trait Window {
    /// Pump platform events once
    ///
    /// Key changes are forwarded to the installed key callback before this
    /// returns. Returns `true` when the window wants the engine to exit.
    fn update(&mut self) -> bool;

    /// Handle passed to the renderer during initialization
    fn handle(&self) -> WindowHandle;

    /// Install the raw key notification hook, replacing any previous one
    fn set_key_callback(&mut self, callback: KeyCallback);

    /// Window title
    fn title(&self) -> &str;
}

/// Window without a platform surface
///
/// Polls succeed until the optional frame limit is exceeded or
/// [`HeadlessWindow::request_close`] is called. Scripted key changes are
/// delivered on the poll of the frame they were scheduled for (frames are
/// numbered from 1).
pub struct HeadlessWindow {
    title: String,
    handle: WindowHandle,
    frame: u64,
    frame_limit: Option<u64>,
    close_requested: bool,
    script: BTreeMap<u64, Vec<(u32, bool)>>,
    key_callback: Option<KeyCallback>,
}

impl HeadlessWindow {
    /// Create a window that never asks to exit on its own
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            handle: WindowHandle { raw: 1, width, height },
            frame: 0,
            frame_limit: None,
            close_requested: false,
            script: BTreeMap::new(),
            key_callback: None,
        }
    }

    /// Request exit once `frames` frames have been polled
    pub fn with_frame_limit(mut self, frames: u64) -> Self {
        self.frame_limit = Some(frames);
        self
    }

    /// Schedule a key change for the poll of `frame`
    pub fn with_key_event(mut self, frame: u64, key: KeyCode, is_pressed: bool) -> Self {
        self.script
            .entry(frame)
            .or_default()
            .push((virtual_key_of(key), is_pressed));
        self
    }

    /// Schedule a raw virtual-key change for the poll of `frame`
    pub fn with_raw_key_event(mut self, frame: u64, virtual_key: u32, is_pressed: bool) -> Self {
        self.script.entry(frame).or_default().push((virtual_key, is_pressed));
        self
    }

    /// Make the next poll report an exit request
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Number of polls so far
    pub fn frames_polled(&self) -> u64 {
        self.frame
    }
}

impl Window for HeadlessWindow {
    fn update(&mut self) -> bool {
        self.frame += 1;

        if let Some(events) = self.script.remove(&self.frame) {
            match self.key_callback.as_mut() {
                Some(callback) => {
                    for (key, pressed) in events {
                        callback(key, pressed);
                    }
                }
                None => log::debug!("Dropped {} key events: no key callback", events.len()),
            }
        }

        self.close_requested || self.frame_limit.is_some_and(|limit| self.frame > limit)
    }

    fn handle(&self) -> WindowHandle {
        self.handle
    }

    fn set_key_callback(&mut self, callback: KeyCallback) {
        self.key_callback = Some(callback);
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl fmt::Debug for HeadlessWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessWindow")
            .field("title", &self.title)
            .field("frame", &self.frame)
            .field("frame_limit", &self.frame_limit)
            .field("close_requested", &self.close_requested)
            .finish_non_exhaustive()
    }
}

const fn virtual_key_of(key: KeyCode) -> u32 {
    match key {
        KeyCode::W => 0x57,
        KeyCode::A => 0x41,
        KeyCode::S => 0x53,
        KeyCode::D => 0x44,
        KeyCode::Q => 0x51,
        KeyCode::E => 0x45,
        KeyCode::Up => 0x26,
        KeyCode::Down => 0x28,
        KeyCode::Left => 0x25,
        KeyCode::Right => 0x27,
        KeyCode::Space => 0x20,
        KeyCode::Escape => 0x1B,
        KeyCode::Other(code) => code,
    }
}
