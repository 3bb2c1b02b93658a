use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Idle -> Playing
/// - Idle -> Won / Lost (first reveal ends the game)
/// - Playing -> Won / Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Idle,
    Playing,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// One game as the host application tracks it: the board plus everything the engine does not own.
///
/// The flag counter is kept here instead of being derived from the board, so toggling a flag does
/// not need a full scan.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    #[serde(rename = "board")]
    field: Minefield,
    difficulty: Difficulty,
    #[serde(rename = "gameStatus")]
    status: GameStatus,
    mine_count: CellCount,
    flag_count: CellCount,
    #[serde(rename = "timer")]
    elapsed_secs: u32,
    #[serde(rename = "firstClick")]
    first_action: bool,
    #[serde(default)]
    seed: u64,
}

impl GameSession {
    pub fn new(difficulty: Difficulty, seed: u64) -> Result<Self> {
        let config = difficulty.game_config();
        let field = RandomMinefieldGenerator::new(seed, None).generate(config)?;
        log::debug!("new {} game, seed {}", difficulty, seed);

        Ok(Self {
            mine_count: field.mine_count(),
            field,
            difficulty,
            status: GameStatus::Idle,
            flag_count: 0,
            elapsed_secs: 0,
            first_action: true,
            seed,
        })
    }

    pub fn field(&self) -> &Minefield {
        &self.field
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn is_first_action(&self) -> bool {
        self.first_action
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Mines minus flags; negative when the player has over-flagged.
    pub fn mines_left(&self) -> i32 {
        i32::from(self.mine_count) - i32::from(self.flag_count)
    }

    pub fn reveal(&mut self, coords: Coord2, settings: &Settings) -> Result<RevealOutcome> {
        let coords = self.field.validate_coords(coords)?;
        self.check_not_finished()?;

        if settings.safe_first_reveal && self.field[coords].is_hidden() {
            self.ensure_safe_start(coords)?;
        }
        self.mark_started();

        let (field, outcome) = self.field.reveal(coords)?;
        self.field = field;
        self.apply_reveal_outcome(outcome);
        Ok(outcome)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        self.check_not_finished()?;
        let (field, outcome) = self.field.toggle_flag(coords)?;
        self.mark_started();

        self.field = field;
        self.flag_count = self.flag_count.saturating_add_signed(outcome.delta());
        Ok(outcome)
    }

    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.check_playing()?;
        let (field, outcome) = self.field.chord_reveal(coords)?;

        self.field = field;
        self.apply_reveal_outcome(outcome);
        Ok(outcome)
    }

    /// Opens the cell picked by [`Minefield::find_tip_cell`], returning where it was.
    pub fn tip(&mut self) -> Result<Option<(Coord2, RevealOutcome)>> {
        self.check_playing()?;
        let Some(coords) = self.field.find_tip_cell() else {
            log::debug!("no tip available");
            return Ok(None);
        };

        let (field, outcome) = self.field.reveal(coords)?;
        self.field = field;
        self.apply_reveal_outcome(outcome);
        log::debug!("tip revealed {:?}", coords);
        Ok(Some((coords, outcome)))
    }

    /// Advances the timer by one second of play. Returns whether an autosave is due.
    pub fn tick(&mut self, settings: &Settings) -> bool {
        if self.status != GameStatus::Playing {
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        settings.autosave_due(self.elapsed_secs)
    }

    /// Checks that a restored session is internally consistent.
    pub fn validate(&self) -> Result<()> {
        let config = self.difficulty.game_config();
        if self.field.size() != config.size {
            return Err(GameError::InvalidBoardShape);
        }
        if self.field.mine_count() != self.mine_count {
            return Err(GameError::CorruptLayout);
        }
        if self.field.flagged_count() != self.flag_count {
            return Err(GameError::CorruptLayout);
        }
        self.field.check_layout()?;
        self.check_status_matches_board()
    }

    /// Loads the saved session, or `None` when there is none worth resuming.
    pub fn restore<S: KeyValueStore + ?Sized>(store: &S) -> Option<Self> {
        let session: Self = load(store)?;
        match session.validate() {
            Ok(()) => Some(session),
            Err(err) => {
                log::warn!("discarding saved session: {}", err);
                None
            }
        }
    }

    pub fn persist<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> bool {
        save(store, self)
    }

    /// Moves the mines out of the way of the very first reveal, keeping flags already placed.
    fn ensure_safe_start(&mut self, coords: Coord2) -> Result<()> {
        if self.field.revealed_count() > 0 {
            return Ok(());
        }

        let config = self.difficulty.game_config();
        match RandomMinefieldGenerator::new(self.seed, Some(coords)).generate(config) {
            Ok(field) => {
                log::debug!("regenerated layout around first reveal at {:?}", coords);
                self.field = field.with_flags_from(&self.field);
                self.mine_count = self.field.mine_count();
                Ok(())
            }
            Err(GameError::TooManyMines) => {
                log::warn!("board too dense for a safe start, keeping layout");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// A running game has no revealed mine and safe cells left to open, a lost one shows its
    /// mines and a won one has every safe cell open.
    fn check_status_matches_board(&self) -> Result<()> {
        let mine_shown = self
            .field
            .cells()
            .any(|cell| cell.is_mine() && cell.is_revealed());
        let won = self.field.check_win();

        let consistent = match self.status {
            GameStatus::Idle | GameStatus::Playing => !mine_shown && !won,
            GameStatus::Won => !mine_shown && won,
            GameStatus::Lost => mine_shown,
        };
        if consistent {
            Ok(())
        } else {
            Err(GameError::CorruptLayout)
        }
    }

    fn apply_reveal_outcome(&mut self, outcome: RevealOutcome) {
        match outcome {
            RevealOutcome::HitMine => {
                self.status = GameStatus::Lost;
                self.field = self.field.reveal_all_mines();
                log::debug!("game lost after {}s", self.elapsed_secs);
            }
            RevealOutcome::Won => {
                self.status = GameStatus::Won;
                log::debug!("game won after {}s", self.elapsed_secs);
            }
            RevealOutcome::Revealed | RevealOutcome::NoChange => {}
        }
    }

    fn mark_started(&mut self) {
        self.first_action = false;
        if self.status == GameStatus::Idle {
            self.status = GameStatus::Playing;
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.status.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn check_playing(&self) -> Result<()> {
        match self.status {
            GameStatus::Playing => Ok(()),
            GameStatus::Won | GameStatus::Lost => Err(GameError::AlreadyEnded),
            GameStatus::Idle => Err(GameError::NotPlaying),
        }
    }
}

impl StorageKey for GameSession {
    const KEY: &'static str = "kaboom:session:v1";
}
