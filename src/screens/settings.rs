//! Settings dialogs
//!
//! The root menu opens one page per settings group. A page edits a draft
//! copy of the settings; nothing reaches the context until APPLY.

use super::draw_backdrop;
use crate::config::{Settings, RESOLUTIONS};
use crate::context::AppContext;
use crate::gui::{Menu, MenuItem, OptionList, OptionRow, RowHit};
use crate::input_system::shift_held;
use crate::locale::available_languages;
use crate::screen::{is_left_click, MouseInput, Screen, ScreenRequest, SettingsPage, Transition};
use log::info;
use sdl2::keyboard::{Keycode, Mod};
use sdl2::render::Canvas;
use sdl2::video::Window;

/// Range steps are multiplied by this while Shift is held
pub const SHIFT_MULTIPLIER: i32 = 5;

impl SettingsPage {
    pub fn title_key(self) -> &'static str {
        match self {
            SettingsPage::Video => "settings.video",
            SettingsPage::Audio => "settings.audio",
            SettingsPage::Game => "settings.game",
        }
    }

    pub fn fields(self) -> &'static [Field] {
        match self {
            SettingsPage::Video => &[Field::Resolution, Field::Fullscreen, Field::Vsync],
            SettingsPage::Audio => &[Field::Master, Field::Music, Field::Effects, Field::Muted],
            SettingsPage::Game => &[
                Field::Language,
                Field::Subtitles,
                Field::SkipSeenMovies,
                Field::CreditsSpeed,
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Resolution,
    Fullscreen,
    Vsync,
    Master,
    Music,
    Effects,
    Muted,
    Language,
    Subtitles,
    SkipSeenMovies,
    CreditsSpeed,
}

/// How a field is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Toggle,
    Range { min: i32, max: i32, step: i32 },
    Choice,
}

impl Field {
    pub fn label_key(self) -> &'static str {
        match self {
            Field::Resolution => "settings.resolution",
            Field::Fullscreen => "settings.fullscreen",
            Field::Vsync => "settings.vsync",
            Field::Master => "settings.master",
            Field::Music => "settings.music",
            Field::Effects => "settings.effects",
            Field::Muted => "settings.mute",
            Field::Language => "settings.language",
            Field::Subtitles => "settings.subtitles",
            Field::SkipSeenMovies => "settings.skip_seen",
            Field::CreditsSpeed => "settings.credits_speed",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Fullscreen | Field::Vsync | Field::Muted | Field::Subtitles | Field::SkipSeenMovies => {
                FieldKind::Toggle
            }
            Field::Master | Field::Music | Field::Effects => FieldKind::Range {
                min: 0,
                max: 100,
                step: 5,
            },
            Field::CreditsSpeed => FieldKind::Range {
                min: 20,
                max: 120,
                step: 10,
            },
            Field::Resolution | Field::Language => FieldKind::Choice,
        }
    }
}

/// One row of a settings page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    Field(Field),
    Apply,
    Cancel,
}

/// Result of activating a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Apply,
    Cancel,
}

/// Draft editor for one settings page
#[derive(Debug, Clone)]
pub struct SettingsForm {
    page: SettingsPage,
    original: Settings,
    draft: Settings,
    rows: Vec<FormRow>,
    selected: usize,
    languages: Vec<String>,
}

impl SettingsForm {
    pub fn new(page: SettingsPage, settings: &Settings, languages: Vec<String>) -> Self {
        let mut rows: Vec<FormRow> = page.fields().iter().copied().map(FormRow::Field).collect();
        rows.push(FormRow::Apply);
        rows.push(FormRow::Cancel);

        SettingsForm {
            page,
            original: settings.clone(),
            draft: settings.clone(),
            rows,
            selected: 0,
            languages,
        }
    }

    pub fn page(&self) -> SettingsPage {
        self.page
    }

    pub fn rows(&self) -> &[FormRow] {
        &self.rows
    }

    pub fn draft(&self) -> &Settings {
        &self.draft
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select(&mut self, index: usize) {
        if index < self.rows.len() {
            self.selected = index;
        }
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % self.rows.len();
    }

    pub fn select_previous(&mut self) {
        self.selected = (self.selected + self.rows.len() - 1) % self.rows.len();
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.original
    }

    pub fn video_changed(&self) -> bool {
        self.draft.video != self.original.video
    }

    pub fn language_changed(&self) -> bool {
        self.draft.game.language != self.original.game.language
    }

    /// Adjusts the selected row by `direction` steps (negative = left)
    pub fn adjust(&mut self, direction: i32, fast: bool) -> bool {
        self.adjust_row(self.selected, direction, fast)
    }

    pub fn adjust_row(&mut self, index: usize, direction: i32, fast: bool) -> bool {
        let Some(FormRow::Field(field)) = self.rows.get(index).copied() else {
            return false;
        };

        match field.kind() {
            FieldKind::Toggle => {
                let value = self.toggle_mut(field);
                *value = !*value;
            }
            FieldKind::Range { min, max, step } => {
                let step = if fast { step * SHIFT_MULTIPLIER } else { step };
                let current = self.range_value(field);
                self.set_range_value(field, (current + direction.signum() * step).clamp(min, max));
            }
            FieldKind::Choice => self.cycle_choice(field, direction.signum()),
        }
        true
    }

    /// Activates the selected row: toggles a field or reports APPLY / CANCEL
    pub fn activate(&mut self) -> FormAction {
        match self.rows[self.selected] {
            FormRow::Apply => FormAction::Apply,
            FormRow::Cancel => FormAction::Cancel,
            FormRow::Field(_) => {
                self.adjust(1, false);
                FormAction::None
            }
        }
    }

    /// Display text for a field's current draft value
    pub fn value_text(&self, field: Field) -> String {
        match field.kind() {
            FieldKind::Toggle => {
                let on = match field {
                    Field::Fullscreen => self.draft.video.fullscreen,
                    Field::Vsync => self.draft.video.vsync,
                    Field::Muted => self.draft.audio.muted,
                    Field::Subtitles => self.draft.game.subtitles,
                    _ => self.draft.game.skip_seen_movies,
                };
                if on { "ON".to_string() } else { "OFF".to_string() }
            }
            FieldKind::Range { .. } => self.range_value(field).to_string(),
            FieldKind::Choice => match field {
                Field::Resolution => format!("{}X{}", self.draft.video.width, self.draft.video.height),
                _ => self.draft.game.language.to_uppercase(),
            },
        }
    }

    fn toggle_mut(&mut self, field: Field) -> &mut bool {
        match field {
            Field::Fullscreen => &mut self.draft.video.fullscreen,
            Field::Vsync => &mut self.draft.video.vsync,
            Field::Muted => &mut self.draft.audio.muted,
            Field::Subtitles => &mut self.draft.game.subtitles,
            _ => &mut self.draft.game.skip_seen_movies,
        }
    }

    fn range_value(&self, field: Field) -> i32 {
        match field {
            Field::Master => self.draft.audio.master as i32,
            Field::Music => self.draft.audio.music as i32,
            Field::Effects => self.draft.audio.effects as i32,
            _ => self.draft.game.credits_speed as i32,
        }
    }

    fn set_range_value(&mut self, field: Field, value: i32) {
        match field {
            Field::Master => self.draft.audio.master = value as u8,
            Field::Music => self.draft.audio.music = value as u8,
            Field::Effects => self.draft.audio.effects = value as u8,
            _ => self.draft.game.credits_speed = value as u32,
        }
    }

    fn cycle_choice(&mut self, field: Field, direction: i32) {
        match field {
            Field::Resolution => {
                let current = (self.draft.video.width, self.draft.video.height);
                let index = step_index(RESOLUTIONS.iter().position(|&r| r == current), RESOLUTIONS.len(), direction);
                let (width, height) = RESOLUTIONS[index];
                self.draft.video.width = width;
                self.draft.video.height = height;
            }
            _ => {
                if self.languages.is_empty() {
                    return;
                }
                let current = self.languages.iter().position(|l| *l == self.draft.game.language);
                let index = step_index(current, self.languages.len(), direction);
                self.draft.game.language = self.languages[index].clone();
            }
        }
    }
}

/// Next index in a wrapping list; an unknown current value starts at the front
fn step_index(current: Option<usize>, len: usize, direction: i32) -> usize {
    match current {
        Some(index) if direction < 0 => (index + len - 1) % len,
        Some(index) => (index + 1) % len,
        None => 0,
    }
}

/// VIDEO / AUDIO / GAME / BACK
pub struct SettingsRootScreen {
    menu: Menu,
}

const ROOT_PAGES: [SettingsPage; 3] = [SettingsPage::Video, SettingsPage::Audio, SettingsPage::Game];

impl SettingsRootScreen {
    pub fn new() -> Self {
        SettingsRootScreen {
            menu: Menu::new("", Vec::new()),
        }
    }

    fn activate(&self) -> Transition {
        match self.menu.activated() {
            Some(index) => match ROOT_PAGES.get(index) {
                Some(page) => Transition::Push(ScreenRequest::SettingsPage(*page)),
                None => Transition::Pop,
            },
            None => Transition::None,
        }
    }
}

impl Default for SettingsRootScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen<AppContext<'_>> for SettingsRootScreen {
    fn name(&self) -> &'static str {
        "settings"
    }

    fn on_enter(&mut self, ctx: &mut AppContext<'_>) {
        let selected = self.menu.selected_index();
        let mut items: Vec<MenuItem> = ROOT_PAGES
            .iter()
            .map(|page| MenuItem::new(ctx.tr(page.title_key())))
            .collect();
        items.push(MenuItem::new(ctx.tr("common.back")));
        self.menu = Menu::new(ctx.tr("settings.title"), items);
        self.menu.select(selected);
    }

    fn draw(&mut self, canvas: &mut Canvas<Window>, ctx: &mut AppContext<'_>) -> Result<(), String> {
        draw_backdrop(canvas, ctx, "menu.png")?;
        self.menu.render(canvas, &ctx.layout)
    }

    fn keyboard(&mut self, _ctx: &mut AppContext<'_>, key: Keycode, _keymod: Mod) -> Transition {
        match key {
            Keycode::Up => self.menu.select_previous(),
            Keycode::Down => self.menu.select_next(),
            Keycode::Return | Keycode::KpEnter => return self.activate(),
            Keycode::Escape => return Transition::Pop,
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

/// One settings page over a [`SettingsForm`]
pub struct SettingsPageScreen {
    form: SettingsForm,
    list: OptionList,
}

impl SettingsPageScreen {
    pub fn new(page: SettingsPage, ctx: &AppContext<'_>) -> Self {
        let languages = available_languages(&ctx.paths.lang());
        SettingsPageScreen {
            form: SettingsForm::new(page, &ctx.settings, languages),
            list: OptionList::new(ctx.tr(page.title_key())),
        }
    }

    fn refresh_rows(&mut self, ctx: &AppContext<'_>) {
        let rows = self
            .form
            .rows()
            .iter()
            .map(|row| match row {
                FormRow::Field(field) => OptionRow {
                    label: ctx.tr(field.label_key()).to_string(),
                    value: self.form.value_text(*field),
                },
                FormRow::Apply => OptionRow {
                    label: ctx.tr("common.apply").to_string(),
                    value: String::new(),
                },
                FormRow::Cancel => OptionRow {
                    label: ctx.tr("common.cancel").to_string(),
                    value: String::new(),
                },
            })
            .collect();
        self.list.set_rows(rows);
    }

    fn apply(&mut self, ctx: &mut AppContext<'_>) -> Transition {
        if self.form.is_dirty() {
            let video_changed = self.form.video_changed();
            let language_changed = self.form.language_changed();
            ctx.settings = self.form.draft().clone();
            ctx.video_changed |= video_changed;
            if language_changed {
                ctx.reload_strings();
            }
            ctx.save_settings();
            info!("{:?} settings applied", self.form.page());
        }
        Transition::Pop
    }

    fn act(&mut self, ctx: &mut AppContext<'_>, action: FormAction) -> Transition {
        match action {
            FormAction::Apply => self.apply(ctx),
            FormAction::Cancel => Transition::Pop,
            FormAction::None => {
                self.refresh_rows(ctx);
                Transition::None
            }
        }
    }
}

impl Screen<AppContext<'_>> for SettingsPageScreen {
    fn name(&self) -> &'static str {
        "settings-page"
    }

    fn on_enter(&mut self, ctx: &mut AppContext<'_>) {
        self.refresh_rows(ctx);
    }

    fn draw(&mut self, canvas: &mut Canvas<Window>, ctx: &mut AppContext<'_>) -> Result<(), String> {
        draw_backdrop(canvas, ctx, "menu.png")?;
        self.list.render(canvas, &ctx.layout, self.form.selected())
    }

    fn keyboard(&mut self, ctx: &mut AppContext<'_>, key: Keycode, keymod: Mod) -> Transition {
        let fast = shift_held(keymod);
        match key {
            Keycode::Up => self.form.select_previous(),
            Keycode::Down => self.form.select_next(),
            Keycode::Left => {
                self.form.adjust(-1, fast);
                self.refresh_rows(ctx);
            }
            Keycode::Right => {
                self.form.adjust(1, fast);
                self.refresh_rows(ctx);
            }
            Keycode::Return | Keycode::KpEnter | Keycode::Space => {
                let action = self.form.activate();
                return self.act(ctx, action);
            }
            Keycode::Escape => return Transition::Pop,
            _ => {}
        }
        Transition::None
    }

    fn mouse(&mut self, ctx: &mut AppContext<'_>, input: MouseInput) -> Transition {
        let layout = ctx.layout;
        match input {
            MouseInput::Motion { x, y, .. } => {
                if let Some(RowHit::Row(i) | RowHit::Decrease(i) | RowHit::Increase(i)) =
                    self.list.hit(x, y, &layout)
                {
                    self.form.select(i);
                }
                Transition::None
            }
            MouseInput::Down { x, y, .. } if is_left_click(&input) => {
                match self.list.hit(x, y, &layout) {
                    Some(RowHit::Decrease(i)) => {
                        self.form.adjust_row(i, -1, false);
                        self.refresh_rows(ctx);
                        Transition::None
                    }
                    Some(RowHit::Increase(i)) => {
                        self.form.adjust_row(i, 1, false);
                        self.refresh_rows(ctx);
                        Transition::None
                    }
                    Some(RowHit::Row(i)) => {
                        self.form.select(i);
                        let action = self.form.activate();
                        self.act(ctx, action)
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

    fn languages() -> Vec<String> {
        vec!["de".to_string(), "en".to_string()]
    }

    #[test]
    fn test_rows_end_with_apply_and_cancel() {
        let form = SettingsForm::new(SettingsPage::Audio, &Settings::default(), languages());
        assert_eq!(form.rows().len(), 6);
        assert_eq!(form.rows()[4], FormRow::Apply);
        assert_eq!(form.rows()[5], FormRow::Cancel);
    }

    #[test]
    fn test_range_steps_and_clamps() {
        let mut form = SettingsForm::new(SettingsPage::Audio, &Settings::default(), languages());
        assert!(form.adjust(1, false));
        assert_eq!(form.draft().audio.master, 85);

        form.adjust(1, true);
        assert_eq!(form.draft().audio.master, 100);

        for _ in 0..10 {
            form.adjust(-1, true);
        }
        assert_eq!(form.draft().audio.master, 0);
    }

    #[test]
    fn test_toggle_and_dirty() {
        let mut form = SettingsForm::new(SettingsPage::Video, &Settings::default(), languages());
        assert!(!form.is_dirty());
        form.select(1);
        form.adjust(-1, false);
        assert!(form.draft().video.fullscreen);
        assert!(form.is_dirty());
        assert!(form.video_changed());
        assert_eq!(form.value_text(Field::Fullscreen), "ON");
    }

    #[test]
    fn test_resolution_cycles() {
        let mut form = SettingsForm::new(SettingsPage::Video, &Settings::default(), languages());
        assert_eq!(form.value_text(Field::Resolution), "1280X720");
        form.adjust(1, false);
        assert_eq!(form.value_text(Field::Resolution), "1600X900");
        form.adjust(-1, false);
        form.adjust(-1, false);
        form.adjust(-1, false);
        assert_eq!(form.value_text(Field::Resolution), "2560X1440");
    }

    #[test]
    fn test_language_choice() {
        let mut form = SettingsForm::new(SettingsPage::Game, &Settings::default(), languages());
        form.adjust(1, false);
        assert_eq!(form.draft().game.language, "de");
        assert!(form.language_changed());
        assert!(!form.video_changed());
    }

    #[test]
    fn test_credits_speed_range() {
        let mut form = SettingsForm::new(SettingsPage::Game, &Settings::default(), languages());
        form.select(3);
        form.adjust(1, false);
        assert_eq!(form.draft().game.credits_speed, 50);
        form.adjust(1, true);
        assert_eq!(form.draft().game.credits_speed, 100);
        form.adjust(1, true);
        assert_eq!(form.draft().game.credits_speed, 120);
    }

    #[test]
    fn test_activate_rows() {
        let mut form = SettingsForm::new(SettingsPage::Game, &Settings::default(), languages());
        form.select(1);
        assert_eq!(form.activate(), FormAction::None);
        assert!(!form.draft().game.subtitles);

        form.select(4);
        assert_eq!(form.activate(), FormAction::Apply);
        form.select_next();
        assert_eq!(form.activate(), FormAction::Cancel);
        form.select_next();
        assert_eq!(form.selected(), 0);
    }
}
