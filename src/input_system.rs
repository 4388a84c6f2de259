use crate::screen::MouseInput;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::{Keycode, Mod};
use sdl2::mouse::MouseButton;
use sdl2::EventPump;

/// Input the screen manager understands
///
/// Raw SDL2 events are reduced to this small set before dispatch, so the
/// screens never see window-system details they don't handle.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Quit,
    Key { key: Keycode, keymod: Mod },
    /// Committed text (profile name entry)
    Text(String),
    Mouse(MouseInput),
    /// Drawable size changed
    Resized(u32, u32),
}

/// InputSystem turns SDL2 events into InputEvents
///
/// It tracks whether the left mouse button is held so motion events can
/// report drags without querying SDL mouse state.
pub struct InputSystem {
    left_held: bool,
}

impl InputSystem {
    pub fn new() -> Self {
        InputSystem { left_held: false }
    }

    /// Polls every pending SDL2 event and returns the translated input
    pub fn poll_events(&mut self, event_pump: &mut EventPump) -> Vec<InputEvent> {
        let events: Vec<Event> = event_pump.poll_iter().collect();
        events
            .into_iter()
            .filter_map(|event| self.translate(event))
            .collect()
    }

    /// Translates one event, `None` for events nothing listens to
    pub fn translate(&mut self, event: Event) -> Option<InputEvent> {
        match event {
            Event::Quit { .. } => Some(InputEvent::Quit),
            Event::KeyDown {
                keycode: Some(key),
                keymod,
                ..
            } => Some(InputEvent::Key { key, keymod }),
            Event::TextInput { text, .. } => Some(InputEvent::Text(text)),
            Event::MouseButtonDown {
                mouse_btn, x, y, ..
            } => {
                if mouse_btn == MouseButton::Left {
                    self.left_held = true;
                }
                Some(InputEvent::Mouse(MouseInput::Down {
                    x,
                    y,
                    button: mouse_btn,
                }))
            }
            Event::MouseButtonUp {
                mouse_btn, x, y, ..
            } => {
                if mouse_btn == MouseButton::Left {
                    self.left_held = false;
                }
                Some(InputEvent::Mouse(MouseInput::Up {
                    x,
                    y,
                    button: mouse_btn,
                }))
            }
            Event::MouseMotion { x, y, .. } => Some(InputEvent::Mouse(MouseInput::Motion {
                x,
                y,
                held: self.left_held,
            })),
            Event::MouseWheel { y, .. } => Some(InputEvent::Mouse(MouseInput::Wheel { dy: y })),
            Event::Window {
                win_event: WindowEvent::SizeChanged(w, h),
                ..
            } if w > 0 && h > 0 => Some(InputEvent::Resized(w as u32, h as u32)),
            _ => None,
        }
    }
}

impl Default for InputSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether either shift key is part of `keymod`
pub fn shift_held(keymod: Mod) -> bool {
    keymod.intersects(Mod::LSHIFTMOD | Mod::RSHIFTMOD)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse_down(x: i32, y: i32) -> Event {
        Event::MouseButtonDown {
            timestamp: 0,
            window_id: 0,
            which: 0,
            mouse_btn: MouseButton::Left,
            clicks: 1,
            x,
            y,
        }
    }

    fn mouse_up(x: i32, y: i32) -> Event {
        Event::MouseButtonUp {
            timestamp: 0,
            window_id: 0,
            which: 0,
            mouse_btn: MouseButton::Left,
            clicks: 1,
            x,
            y,
        }
    }

    #[test]
    fn test_quit_and_keys() {
        let mut input = InputSystem::new();
        assert_eq!(input.translate(Event::Quit { timestamp: 0 }), Some(InputEvent::Quit));

        let key = Event::KeyDown {
            timestamp: 0,
            window_id: 0,
            keycode: Some(Keycode::Escape),
            scancode: None,
            keymod: Mod::NOMOD,
            repeat: false,
        };
        assert_eq!(
            input.translate(key),
            Some(InputEvent::Key {
                key: Keycode::Escape,
                keymod: Mod::NOMOD
            })
        );
    }

    #[test]
    fn test_text_input() {
        let mut input = InputSystem::new();
        let event = Event::TextInput {
            timestamp: 0,
            window_id: 0,
            text: "Ve".to_string(),
        };
        assert_eq!(input.translate(event), Some(InputEvent::Text("Ve".to_string())));
    }

    fn motion(x: i32, y: i32) -> Event {
        Event::MouseMotion {
            timestamp: 0,
            window_id: 0,
            which: 0,
            mousestate: sdl2::mouse::MouseState::from_sdl_state(0),
            x,
            y,
            xrel: 0,
            yrel: 0,
        }
    }

    #[test]
    fn test_left_button_tracking() {
        let mut input = InputSystem::new();
        assert_eq!(
            input.translate(motion(5, 5)),
            Some(InputEvent::Mouse(MouseInput::Motion { x: 5, y: 5, held: false }))
        );

        assert_eq!(
            input.translate(mouse_down(10, 20)),
            Some(InputEvent::Mouse(MouseInput::Down {
                x: 10,
                y: 20,
                button: MouseButton::Left
            }))
        );
        assert_eq!(
            input.translate(motion(12, 22)),
            Some(InputEvent::Mouse(MouseInput::Motion { x: 12, y: 22, held: true }))
        );

        input.translate(mouse_up(12, 22));
        assert_eq!(
            input.translate(motion(14, 24)),
            Some(InputEvent::Mouse(MouseInput::Motion { x: 14, y: 24, held: false }))
        );
    }

    #[test]
    fn test_shift_held() {
        assert!(shift_held(Mod::LSHIFTMOD));
        assert!(shift_held(Mod::RSHIFTMOD | Mod::LCTRLMOD));
        assert!(!shift_held(Mod::NOMOD));
    }
}
