use kaboom_core::{self as game, KeyValueStore, StorageKey};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::storage::LocalStore;
use crate::utils::next_seed;

pub trait HasUpdate {
    fn has_update(self) -> bool;
}

impl<E: core::fmt::Display> HasUpdate for Result<game::FlagOutcome, E> {
    fn has_update(self) -> bool {
        match self {
            Ok(outcome) => outcome.has_update(),
            Err(err) => {
                log::trace!("flag ignored: {}", err);
                false
            }
        }
    }
}

impl<E: core::fmt::Display> HasUpdate for Result<game::RevealOutcome, E> {
    fn has_update(self) -> bool {
        match self {
            Ok(outcome) => outcome.has_update(),
            Err(err) => {
                log::trace!("reveal ignored: {}", err);
                false
            }
        }
    }
}

/// What the renderer gets to draw.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GameView<'a> {
    #[serde(flatten)]
    session: &'a game::GameSession,
    mines_left: i32,
    time: String,
    best_time: Option<String>,
}

/// Host-side controller: owns the session and forwards renderer events to it.
///
/// Generic over the store so it can run against [`game::MemoryStore`] outside a browser.
#[derive(Debug)]
pub struct Game<S: KeyValueStore> {
    store: S,
    settings: game::Settings,
    best_times: game::BestTimes,
    session: game::GameSession,
}

impl<S: KeyValueStore> Game<S> {
    /// Resumes the saved game if there is a usable one, otherwise starts a fresh default game.
    pub fn new(store: S, seed: u64) -> game::Result<Self> {
        let settings = game::load_or_default(&store);
        let best_times = game::load_or_default(&store);

        let session = match game::GameSession::restore(&store) {
            Some(session) => {
                log::debug!("resumed {} game", session.difficulty());
                session
            }
            None => game::GameSession::new(game::Difficulty::default(), seed)?,
        };

        let mut this = Self {
            store,
            settings,
            best_times,
            session,
        };
        this.save_session();
        Ok(this)
    }

    pub fn session(&self) -> &game::GameSession {
        &self.session
    }

    pub fn settings(&self) -> &game::Settings {
        &self.settings
    }

    pub fn best_time(&self) -> Option<u32> {
        self.best_times.get(self.session.difficulty())
    }

    pub fn set_settings(&mut self, settings: game::Settings) {
        self.settings = settings;
        game::save(&mut self.store, &self.settings);
    }

    pub fn reveal(&mut self, coords: game::Coord2) -> bool {
        let before = self.session.status();
        let updated = self.session.reveal(coords, &self.settings).has_update();
        self.after_move(before, updated)
    }

    pub fn toggle_flag(&mut self, coords: game::Coord2) -> bool {
        let before = self.session.status();
        let updated = self.session.toggle_flag(coords).has_update();
        self.after_move(before, updated)
    }

    pub fn chord_reveal(&mut self, coords: game::Coord2) -> bool {
        let before = self.session.status();
        let updated = self.session.chord_reveal(coords).has_update();
        self.after_move(before, updated)
    }

    pub fn tip(&mut self) -> game::Result<Option<game::Coord2>> {
        let before = self.session.status();
        let tip = self.session.tip()?;
        self.after_move(before, tip.is_some());
        Ok(tip.map(|(coords, _)| coords))
    }

    pub fn new_game(&mut self, seed: u64) -> game::Result<()> {
        self.change_difficulty(self.session.difficulty(), seed)
    }

    pub fn change_difficulty(&mut self, difficulty: game::Difficulty, seed: u64) -> game::Result<()> {
        self.session = game::GameSession::new(difficulty, seed)?;
        self.save_session();
        Ok(())
    }

    /// One second of wall-clock time passed.
    pub fn tick(&mut self) {
        if self.session.tick(&self.settings) {
            self.save_session();
        }
    }

    /// A move counts as an update when the board changed or the status moved on.
    fn after_move(&mut self, before: game::GameStatus, updated: bool) -> bool {
        if !updated && self.session.status() == before {
            return false;
        }

        let finished = self.session.status().is_finished();
        if self.session.status() == game::GameStatus::Won {
            let difficulty = self.session.difficulty();
            let secs = self.session.elapsed_secs();
            if self.best_times.record(difficulty, secs) {
                log::info!("new best time on {}: {}", difficulty, game::format_time(secs));
                game::save(&mut self.store, &self.best_times);
            }
        }

        if finished || self.settings.auto_save {
            self.save_session();
        }
        true
    }

    fn save_session(&mut self) {
        if !self.session.persist(&mut self.store) {
            log::warn!("{} not saved", game::GameSession::KEY);
        }
    }

    fn view(&self) -> GameView<'_> {
        GameView {
            session: &self.session,
            mines_left: self.session.mines_left(),
            time: game::format_time(self.session.elapsed_secs()),
            best_time: self.best_time().map(game::format_time),
        }
    }
}

/// JavaScript entry point, backed by `localStorage`.
#[wasm_bindgen]
pub struct KaboomGame {
    inner: Game<LocalStore>,
}

#[wasm_bindgen]
impl KaboomGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<KaboomGame, JsError> {
        let inner = Game::new(LocalStore, next_seed())?;
        Ok(Self { inner })
    }

    pub fn reveal(&mut self, row: u8, col: u8) -> bool {
        self.inner.reveal((row, col))
    }

    pub fn flag(&mut self, row: u8, col: u8) -> bool {
        self.inner.toggle_flag((row, col))
    }

    pub fn chord(&mut self, row: u8, col: u8) -> bool {
        self.inner.chord_reveal((row, col))
    }

    /// Reveals a suggested cell. Returns `false` when there was nothing left to suggest.
    pub fn tip(&mut self) -> Result<bool, JsError> {
        Ok(self.inner.tip()?.is_some())
    }

    #[wasm_bindgen(js_name = newGame)]
    pub fn new_game(&mut self) -> Result<(), JsError> {
        Ok(self.inner.new_game(next_seed())?)
    }

    #[wasm_bindgen(js_name = changeDifficulty)]
    pub fn change_difficulty(&mut self, name: &str) -> Result<(), JsError> {
        let difficulty: game::Difficulty = name.parse()?;
        Ok(self.inner.change_difficulty(difficulty, next_seed())?)
    }

    pub fn tick(&mut self) {
        self.inner.tick();
    }

    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> Result<String, JsError> {
        Ok(serde_json::to_string(&self.inner.view())?)
    }
}
