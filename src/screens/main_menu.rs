//! Main menu hub linking the front-end screens together

use super::draw_backdrop;
use crate::context::AppContext;
use crate::gui::{Menu, MenuItem};
use crate::screen::{is_left_click, MouseInput, Screen, ScreenRequest, Transition};
use crate::text::draw_simple_text;
use sdl2::keyboard::{Keycode, Mod};
use sdl2::pixels::Color;
use sdl2::render::Canvas;
use sdl2::video::Window;

/// Entries in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Play,
    PsychTest,
    VideoLibrary,
    Settings,
    Profiles,
    Credits,
    Quit,
}

pub const ACTIONS: [MenuAction; 7] = [
    MenuAction::Play,
    MenuAction::PsychTest,
    MenuAction::VideoLibrary,
    MenuAction::Settings,
    MenuAction::Profiles,
    MenuAction::Credits,
    MenuAction::Quit,
];

impl MenuAction {
    pub fn label_key(self) -> &'static str {
        match self {
            MenuAction::Play => "menu.play",
            MenuAction::PsychTest => "menu.psych_test",
            MenuAction::VideoLibrary => "menu.video_library",
            MenuAction::Settings => "menu.settings",
            MenuAction::Profiles => "menu.profiles",
            MenuAction::Credits => "menu.credits",
            MenuAction::Quit => "menu.quit",
        }
    }

    /// The psych test result is stored in the profile, so it needs one
    pub fn requires_profile(self) -> bool {
        self == MenuAction::PsychTest
    }

    fn item(self, label: &str, has_profile: bool) -> MenuItem {
        if self.requires_profile() && !has_profile {
            MenuItem::disabled(label)
        } else {
            MenuItem::new(label)
        }
    }

    /// Profiles are swapped in place of the menu; everything else opens on top
    pub fn transition(self) -> Transition {
        match self {
            MenuAction::Play => Transition::Push(ScreenRequest::Shipwalk),
            MenuAction::PsychTest => Transition::Push(ScreenRequest::PsychTest),
            MenuAction::VideoLibrary => Transition::Push(ScreenRequest::VideoLibrary),
            MenuAction::Settings => Transition::Push(ScreenRequest::Settings),
            MenuAction::Profiles => Transition::Switch(ScreenRequest::Profiles),
            MenuAction::Credits => Transition::Push(ScreenRequest::Credits),
            MenuAction::Quit => Transition::Quit,
        }
    }
}

pub struct MainMenuScreen {
    menu: Menu,
}

impl MainMenuScreen {
    pub fn new() -> Self {
        MainMenuScreen {
            menu: Menu::new("", Vec::new()),
        }
    }

    fn activate(&self) -> Transition {
        match self.menu.activated().and_then(|i| ACTIONS.get(i)) {
            Some(action) => action.transition(),
            None => Transition::None,
        }
    }
}

impl Default for MainMenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<AppContext<'_>> for MainMenuScreen {
    fn name(&self) -> &'static str {
        "main-menu"
    }

    /// Rebuilt on every entry so a language change shows up immediately
    fn on_enter(&mut self, ctx: &mut AppContext<'_>) {
        let selected = self.menu.selected_index();
        let has_profile = ctx.profile.is_some();
        let items = ACTIONS
            .iter()
            .map(|action| action.item(ctx.tr(action.label_key()), has_profile))
            .collect();
        self.menu = Menu::new(ctx.tr("menu.title"), items);
        self.menu.select(selected);
    }

    fn draw(&mut self, canvas: &mut Canvas<Window>, ctx: &mut AppContext<'_>) -> Result<(), String> {
        draw_backdrop(canvas, ctx, "menu.png")?;
        let layout = ctx.layout;
        self.menu.render(canvas, &layout)?;

        let profile = match ctx.profile_name() {
            Some(name) => format!("{} {}", ctx.tr("menu.pilot"), name),
            None => ctx.tr("menu.no_profile").to_string(),
        };
        let margin = layout.px(8) as i32;
        draw_simple_text(
            canvas,
            &profile,
            margin,
            layout.height as i32 - margin - layout.px(14) as i32,
            Color::RGB(150, 150, 160),
            layout.scale * 2,
        )
    }

    fn keyboard(&mut self, _ctx: &mut AppContext<'_>, key: Keycode, _keymod: Mod) -> Transition {
        match key {
            Keycode::Up | Keycode::W => self.menu.select_previous(),
            Keycode::Down | Keycode::S => self.menu.select_next(),
            Keycode::Return | Keycode::KpEnter | Keycode::Space => return self.activate(),
            Keycode::Escape => return Transition::Quit,
            _ => {}
        }
        Transition::None
    }

    fn mouse(&mut self, ctx: &mut AppContext<'_>, input: MouseInput) -> Transition {
        let layout = ctx.layout;
        match input {
            MouseInput::Motion { x, y, .. } => {
                if let Some(index) = self.menu.item_at(x, y, &layout) {
                    self.menu.select(index);
                }
                Transition::None
            }
            MouseInput::Down { x, y, .. } if is_left_click(&input) => {
                match self.menu.item_at(x, y, &layout) {
                    Some(index) => {
                        self.menu.select(index);
                        self.activate()
                    }
                    None => Transition::None,
                }
            }
            _ => Transition::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actions_cover_every_entry() {
        assert_eq!(ACTIONS.len(), 7);
        assert_eq!(ACTIONS[0], MenuAction::Play);
        assert_eq!(ACTIONS[6], MenuAction::Quit);
    }

    #[test]
    fn test_action_transitions() {
        assert_eq!(
            MenuAction::Play.transition(),
            Transition::Push(ScreenRequest::Shipwalk)
        );
        assert_eq!(
            MenuAction::Profiles.transition(),
            Transition::Switch(ScreenRequest::Profiles)
        );
        assert_eq!(MenuAction::Quit.transition(), Transition::Quit);
    }

    #[test]
    fn test_activate_follows_selection() {
        let mut screen = MainMenuScreen::new();
        screen.menu = Menu::new(
            "MENU",
            ACTIONS.iter().map(|a| MenuItem::new(a.label_key())).collect(),
        );
        screen.menu.select(5);
        assert_eq!(screen.activate(), Transition::Push(ScreenRequest::Credits));
    }

    #[test]
    fn test_psych_test_disabled_without_profile() {
        let items: Vec<MenuItem> = ACTIONS.iter().map(|a| a.item(a.label_key(), false)).collect();
        assert!(!items[1].enabled);
        assert!(items.iter().filter(|item| !item.enabled).count() == 1);

        let mut menu = Menu::new("MENU", items);
        assert!(!menu.select(1));
        menu.select(0);
        menu.select_next();
        assert_eq!(menu.selected_index(), 2);

        assert!(MenuAction::PsychTest.item("PSYCH TEST", true).enabled);
    }
}
