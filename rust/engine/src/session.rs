use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::GameError;
use crate::game::{Game, GameConfig};
use crate::history::{HandEvent, HandLogger};
use crate::player::{PlayerAction, PlayerId};
use crate::rules::LegalAction;
use crate::strategy::{Strategy, TableView};

/// Who controls a seat: a human submitting actions over the boundary, or a
/// bot strategy driven by the session itself.
pub enum SeatOccupant {
    Human,
    Bot(Box<dyn Strategy>),
}

impl SeatOccupant {
    fn is_human(&self) -> bool {
        matches!(self, SeatOccupant::Human)
    }
}

/// One table and its roster. The game sits behind a mutex so a session
/// serializes its own actions without blocking other sessions.
pub struct Session {
    pub id: String,
    game: Mutex<Game>,
    seats: Vec<SeatOccupant>,
    logger: Option<Mutex<HandLogger>>,
    last_logged_hand: AtomicU64,
    closed: AtomicBool,
}

impl Session {
    fn lock_game(&self) -> MutexGuard<'_, Game> {
        self.game.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Play out consecutive bot turns until a human is up or the hand ends.
    ///
    /// A strategy returning an illegal action gets one retry against a
    /// fresh view; a second rejection is replaced with a check when legal,
    /// otherwise a fold. Fatal errors propagate and freeze the game.
    fn drive_bots(&self, game: &mut Game) -> Result<(), GameError> {
        while let Some(seat) = game.current_actor() {
            if self.closed.load(Ordering::Acquire) {
                return Err(GameError::SessionAborted);
            }
            let strategy = match &self.seats[seat] {
                SeatOccupant::Human => break,
                SeatOccupant::Bot(strategy) => strategy,
            };
            let view = game.table_view(Some(seat))?;
            let action = strategy.decide(&view);
            match game.submit(seat, &action) {
                Ok(_) => continue,
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!(
                        session = %self.id,
                        seat,
                        strategy = strategy.name(),
                        %err,
                        "bot returned an illegal action, retrying"
                    );
                }
            }
            let view = game.table_view(Some(seat))?;
            let retry = strategy.decide(&view);
            match game.submit(seat, &retry) {
                Ok(_) => continue,
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    let fallback = default_action(&view);
                    warn!(
                        session = %self.id,
                        seat,
                        strategy = strategy.name(),
                        %err,
                        ?fallback,
                        "bot retry rejected, applying default action"
                    );
                    game.submit(seat, &fallback)?;
                }
            }
        }
        Ok(())
    }

    fn maybe_log_hand(&self, game: &Game) {
        let Some(logger) = &self.logger else { return };
        let Some(record) = game.hand_record() else { return };
        let hand_no: u64 = record
            .hand_id
            .rsplit('-')
            .next()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0);
        if self.last_logged_hand.swap(hand_no, Ordering::AcqRel) == hand_no {
            return;
        }
        let mut logger = logger.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = logger.log_hand(&record) {
            warn!(session = %self.id, %err, "failed to append hand record");
        }
    }
}

/// The default action when a strategy keeps misbehaving: check if the
/// player owes nothing, otherwise fold.
fn default_action(view: &TableView) -> PlayerAction {
    if view.can(|a| matches!(a, LegalAction::Check)) {
        PlayerAction::Check
    } else {
        PlayerAction::Fold
    }
}

/// Owns every active session. All operations take the session id; state
/// reads and action submissions on different sessions never contend.
#[derive(Default)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session, deal the first hand, and play any leading bot
    /// turns. Returns the fresh session id.
    pub fn create_session(
        &self,
        config: GameConfig,
        seats: Vec<SeatOccupant>,
        log_path: Option<PathBuf>,
    ) -> Result<String, GameError> {
        if seats.len() != config.num_players {
            return Err(GameError::InvalidConfig(format!(
                "{} seats configured but {} occupants given",
                config.num_players,
                seats.len()
            )));
        }
        let logger = match log_path {
            Some(path) => {
                let logger = HandLogger::create(&path).map_err(|err| {
                    GameError::InvalidConfig(format!("cannot open hand log: {err}"))
                })?;
                Some(Mutex::new(logger))
            }
            None => None,
        };

        let mut game = Game::new(config)?;
        game.start_hand()?;

        let id = Uuid::new_v4().to_string();
        let session = Arc::new(Session {
            id: id.clone(),
            game: Mutex::new(game),
            seats,
            logger,
            last_logged_hand: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        });
        {
            let mut game = session.lock_game();
            session.drive_bots(&mut game)?;
            session.maybe_log_hand(&game);
        }

        info!(session = %id, seed = session.lock_game().seed(), "session created");
        self.write_sessions().insert(id.clone(), session);
        Ok(id)
    }

    /// Submit a human action, then let bots respond.
    pub fn submit_action(
        &self,
        session_id: &str,
        seat: PlayerId,
        action: &PlayerAction,
    ) -> Result<TableView, GameError> {
        let session = self.get(session_id)?;
        if !session.seats.get(seat).is_some_and(SeatOccupant::is_human) {
            return Err(GameError::invalid_action(format!(
                "seat {seat} is not controlled by a human"
            )));
        }
        let mut game = session.lock_game();
        game.submit(seat, action)?;
        session.drive_bots(&mut game)?;
        session.maybe_log_hand(&game);
        game.table_view(Some(seat))
    }

    /// Deal the next hand of a session whose previous hand has finished.
    pub fn start_hand(&self, session_id: &str) -> Result<TableView, GameError> {
        let session = self.get(session_id)?;
        let mut game = session.lock_game();
        game.start_hand()?;
        session.drive_bots(&mut game)?;
        session.maybe_log_hand(&game);
        game.table_view(None)
    }

    /// Current state as seen by `viewer`; `None` sees only public cards.
    pub fn get_state(
        &self,
        session_id: &str,
        viewer: Option<PlayerId>,
    ) -> Result<TableView, GameError> {
        let session = self.get(session_id)?;
        let game = session.lock_game();
        game.table_view(viewer)
    }

    /// Event history of the session, oldest first, redacted for `viewer`:
    /// hole cards appear only for the viewer's own seat and for hands shown
    /// at showdown.
    pub fn get_history(
        &self,
        session_id: &str,
        viewer: Option<PlayerId>,
    ) -> Result<Vec<HandEvent>, GameError> {
        let session = self.get(session_id)?;
        let game = session.lock_game();
        Ok(game.history().redacted(viewer))
    }

    /// Tear a session down. In-flight calls finish against the closed flag.
    pub fn delete_session(&self, session_id: &str) -> Result<(), GameError> {
        let session = self
            .write_sessions()
            .remove(session_id)
            .ok_or_else(|| GameError::SessionNotFound(session_id.to_string()))?;
        session.closed.store(true, Ordering::Release);
        info!(session = %session_id, "session deleted");
        Ok(())
    }

    pub fn session_count(&self) -> usize {
        self.read_sessions().len()
    }

    fn get(&self, session_id: &str) -> Result<Arc<Session>, GameError> {
        self.read_sessions()
            .get(session_id)
            .cloned()
            .ok_or_else(|| GameError::SessionNotFound(session_id.to_string()))
    }

    fn read_sessions(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<Session>>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_sessions(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<Session>>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}
