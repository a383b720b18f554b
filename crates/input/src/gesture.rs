//! Gesture interpretation: touch begin/move/end to game commands.
//!
//! A touch that barely moves and ends quickly is a tap. A quick flick is a
//! swipe, recognised on release. Anything held longer than the swipe window
//! turns into a drag that follows the finger.

use arrayvec::ArrayVec;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::types::{InputCommand, SwipeDirection, Vec2};

/// Raw touch sample; positions in field cell units, time in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TouchEvent {
    Begin { pos: Vec2, time: f32 },
    Move { pos: Vec2, time: f32 },
    End { pos: Vec2, time: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Furthest a touch may travel and still count as a tap (cells).
    pub tap_max_distance: f32,
    pub tap_max_secs: f32,
    /// Shortest travel recognised as a swipe (cells).
    pub swipe_min_distance: f32,
    /// Touches held longer than this become drags.
    pub swipe_max_secs: f32,
    /// Emit `TapAt` instead of `Tap`.
    pub tap_to_place: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_max_distance: 0.3,
            tap_max_secs: 0.25,
            swipe_min_distance: 1.5,
            swipe_max_secs: 0.2,
            tap_to_place: false,
        }
    }
}

/// At most two commands come out of one touch event.
pub type Commands = ArrayVec<InputCommand, 2>;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Touch {
    start: Vec2,
    start_time: f32,
    dragging: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GestureInterpreter {
    config: GestureConfig,
    touch: Option<Touch>,
}

impl GestureInterpreter {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            touch: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn is_dragging(&self) -> bool {
        self.touch.is_some_and(|t| t.dragging)
    }

    pub fn handle(&mut self, event: TouchEvent) -> Commands {
        let mut out = Commands::new();
        match event {
            TouchEvent::Begin { pos, time } => {
                self.touch = Some(Touch {
                    start: pos,
                    start_time: time,
                    dragging: false,
                });
            }
            TouchEvent::Move { pos, time } => {
                let Some(touch) = self.touch.as_mut() else {
                    return out;
                };
                if !touch.dragging {
                    let travelled = (pos - touch.start).length();
                    let held = time - touch.start_time;
                    if travelled > self.config.tap_max_distance && held > self.config.swipe_max_secs {
                        trace!("drag started at ({:.2}, {:.2})", pos.x, pos.y);
                        touch.dragging = true;
                    }
                }
                if touch.dragging {
                    out.push(InputCommand::DragTo { x: pos.x, y: pos.y });
                }
            }
            TouchEvent::End { pos, time } => {
                let Some(touch) = self.touch.take() else {
                    return out;
                };
                if touch.dragging {
                    out.push(InputCommand::DragTo { x: pos.x, y: pos.y });
                    return out;
                }
                if let Some(command) = self.classify(&touch, pos, time) {
                    trace!("gesture {}", command.as_str());
                    out.push(command);
                }
            }
        }
        out
    }

    fn classify(&self, touch: &Touch, end: Vec2, time: f32) -> Option<InputCommand> {
        let delta = end - touch.start;
        let travelled = delta.length();
        let held = time - touch.start_time;

        if travelled <= self.config.tap_max_distance && held <= self.config.tap_max_secs {
            return Some(if self.config.tap_to_place {
                InputCommand::TapAt { x: end.x, y: end.y }
            } else {
                InputCommand::Tap
            });
        }
        if travelled < self.config.swipe_min_distance || held > self.config.swipe_max_secs {
            return None;
        }
        // Rows grow upwards.
        let dir = if delta.x.abs() >= delta.y.abs() {
            if delta.x < 0.0 {
                SwipeDirection::Left
            } else {
                SwipeDirection::Right
            }
        } else if delta.y < 0.0 {
            SwipeDirection::Down
        } else {
            SwipeDirection::Up
        };
        Some(InputCommand::Swipe(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn begin(x: f32, y: f32, time: f32) -> TouchEvent {
        TouchEvent::Begin { pos: Vec2::new(x, y), time }
    }

    fn moved(x: f32, y: f32, time: f32) -> TouchEvent {
        TouchEvent::Move { pos: Vec2::new(x, y), time }
    }

    fn end(x: f32, y: f32, time: f32) -> TouchEvent {
        TouchEvent::End { pos: Vec2::new(x, y), time }
    }

    #[test]
    fn test_tap() {
        let mut g = GestureInterpreter::default();
        assert!(g.handle(begin(2.0, 5.0, 0.0)).is_empty());
        let out = g.handle(end(2.1, 5.0, 0.1));
        assert_eq!(out.as_slice(), &[InputCommand::Tap]);
    }

    #[test]
    fn test_tap_to_place() {
        let mut g = GestureInterpreter::new(GestureConfig {
            tap_to_place: true,
            ..GestureConfig::default()
        });
        g.handle(begin(2.0, 5.0, 0.0));
        let out = g.handle(end(2.0, 5.0, 0.1));
        assert_eq!(out.as_slice(), &[InputCommand::TapAt { x: 2.0, y: 5.0 }]);
    }

    #[test]
    fn test_swipes() {
        let mut g = GestureInterpreter::default();
        let cases = [
            ((-3.0, 0.5), SwipeDirection::Left),
            ((3.0, -0.5), SwipeDirection::Right),
            ((0.5, -4.0), SwipeDirection::Down),
            ((0.0, 2.0), SwipeDirection::Up),
        ];
        for ((dx, dy), dir) in cases {
            g.handle(begin(4.0, 4.0, 1.0));
            assert!(g.handle(moved(4.0 + dx / 2.0, 4.0 + dy / 2.0, 1.05)).is_empty());
            let out = g.handle(end(4.0 + dx, 4.0 + dy, 1.1));
            assert_eq!(out.as_slice(), &[InputCommand::Swipe(dir)]);
        }
    }

    #[test]
    fn test_slow_move_becomes_drag() {
        let mut g = GestureInterpreter::default();
        g.handle(begin(1.0, 6.0, 0.0));
        let out = g.handle(moved(2.0, 6.0, 0.5));
        assert!(g.is_dragging());
        assert_eq!(out.as_slice(), &[InputCommand::DragTo { x: 2.0, y: 6.0 }]);
        let out = g.handle(moved(3.0, 4.0, 0.6));
        assert_eq!(out.as_slice(), &[InputCommand::DragTo { x: 3.0, y: 4.0 }]);
        let out = g.handle(end(3.0, 3.0, 0.7));
        assert_eq!(out.as_slice(), &[InputCommand::DragTo { x: 3.0, y: 3.0 }]);
        assert!(!g.is_dragging());
    }

    #[test]
    fn test_long_press_without_travel_is_ignored() {
        let mut g = GestureInterpreter::default();
        g.handle(begin(1.0, 1.0, 0.0));
        assert!(g.handle(end(1.0, 1.0, 2.0)).is_empty());
        assert!(g.handle(end(1.0, 1.0, 2.0)).is_empty());
    }

    #[test]
    fn test_config_json_defaults() {
        let cfg: GestureConfig = serde_json::from_str(r#"{"tap_to_place": true}"#).unwrap();
        assert!(cfg.tap_to_place);
        assert_eq!(cfg.swipe_min_distance, GestureConfig::default().swipe_min_distance);
    }
}
