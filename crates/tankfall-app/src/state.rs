//! State shared between the runner and the game loop thread.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use tankfall_core::commands::{PlayerCommand, TickInput};
use tankfall_core::state::GameStateSnapshot;

/// Messages sent from the runner to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Replace the input applied on every following tick.
    /// Without one, the loop drives the tank with the autopilot.
    Input(TickInput),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handle to a running game loop.
///
/// `mpsc::Sender` is Send but not Sync, so it sits behind a `Mutex` when the
/// handle is shared. The latest snapshot is shared with the loop thread.
pub struct LoopHandle {
    pub command_tx: Mutex<mpsc::Sender<GameLoopCommand>>,
    /// Updated by the game loop thread after each tick.
    pub latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
}

impl LoopHandle {
    pub fn new(
        command_tx: mpsc::Sender<GameLoopCommand>,
        latest_snapshot: Arc<Mutex<Option<GameStateSnapshot>>>,
    ) -> Self {
        Self {
            command_tx: Mutex::new(command_tx),
            latest_snapshot,
        }
    }

    /// Forward a message to the loop. Returns false once the loop has stopped.
    pub fn send(&self, command: GameLoopCommand) -> bool {
        match self.command_tx.lock() {
            Ok(tx) => tx.send(command).is_ok(),
            Err(_) => false,
        }
    }

    /// Clone of the most recent snapshot, if the loop has ticked yet.
    pub fn snapshot(&self) -> Option<GameStateSnapshot> {
        self.latest_snapshot.lock().ok().and_then(|s| s.clone())
    }
}
