//! `minifb`-backed implementations of `DisplaySink` and `InputSource`.
//!
//! Grounded on the teacher's `ui/visualizer.rs` (the only place Phosphor
//! blits a raw pixel buffer to a window) and on the original SDL loop's
//! blit/event-pump shape, re-expressed against `minifb`'s blocking
//! `update_with_buffer` + polled key state instead of an SDL event queue.

use std::time::{Duration, Instant};

use minifb::{Window, WindowOptions};

use crate::display::{DisplaySink, FrameBuffer, KeyEvent, SCREEN_HEIGHT, SCREEN_PADDING, SCREEN_WIDTH};
use crate::frame::InputSource;
use crate::input::key_to_id;

pub struct MinifbHost {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    scale: usize,
    prev_pressed: [bool; 80],
}

impl MinifbHost {
    pub fn new(title: &str, scale: usize) -> Result<Self, String> {
        let scale = scale.max(1);
        let width = SCREEN_WIDTH * scale + SCREEN_PADDING * 2;
        let height = SCREEN_HEIGHT * scale + SCREEN_PADDING * 2;
        let window = Window::new(title, width, height, WindowOptions::default())
            .map_err(|e| format!("failed to initialize display: {e}"))?;
        Ok(Self {
            window,
            buffer: vec![0u32; width * height],
            width,
            height,
            scale,
            prev_pressed: [false; 80],
        })
    }
}

impl DisplaySink for MinifbHost {
    fn present(&mut self, frame: &FrameBuffer) {
        frame.blit_scaled(&mut self.buffer, self.width, self.scale);
        let _ = self
            .window
            .update_with_buffer(&self.buffer, self.width, self.height);
    }
}

impl InputSource for MinifbHost {
    fn poll(&mut self, deadline: Instant) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        loop {
            let mut now_pressed = [false; 80];
            for key in self.window.get_keys() {
                if let Some(id) = key_to_id(key) {
                    now_pressed[id] = true;
                }
            }
            for id in 0..80 {
                if now_pressed[id] != self.prev_pressed[id] {
                    events.push(KeyEvent {
                        key_id: id,
                        pressed: now_pressed[id],
                    });
                }
            }
            self.prev_pressed = now_pressed;

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            std::thread::sleep(remaining.min(Duration::from_millis(5)));
            if Instant::now() >= deadline {
                break;
            }
        }
        events
    }

    fn close_requested(&self) -> bool {
        !self.window.is_open()
    }
}
