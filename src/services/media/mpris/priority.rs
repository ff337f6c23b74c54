use std::collections::{HashSet, VecDeque};

use crate::services::media::PlayerId;

/// Orders players by how recently they started playing.
///
/// The front is the player the widget follows. A player that starts
/// playing moves to the front; newly seen players join at the back;
/// players that disappear are dropped.
#[derive(Debug, Default)]
pub struct PriorityStack {
    stack: VecDeque<PlayerId>,
    playing: HashSet<PlayerId>,
}

impl PriorityStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves `player` to the front.
    pub fn push(&mut self, player: PlayerId) {
        if let Some(pos) = self.stack.iter().position(|p| *p == player) {
            self.stack.remove(pos);
        }
        self.stack.push_front(player);
    }

    /// Feeds one observation of every present player and whether it is
    /// playing. Only a transition into playing promotes a player, so a
    /// player the user explicitly switched away from is not re-promoted
    /// on every observation.
    pub fn observe(&mut self, players: &[(PlayerId, bool)]) {
        self.stack
            .retain(|id| players.iter().any(|(present, _)| present == id));
        self.playing
            .retain(|id| players.iter().any(|(present, _)| present == id));

        for (id, _) in players {
            if !self.stack.contains(id) {
                self.stack.push_back(id.clone());
            }
        }

        for (id, is_playing) in players {
            if *is_playing {
                if self.playing.insert(id.clone()) {
                    self.push(id.clone());
                }
            } else {
                self.playing.remove(id);
            }
        }
    }

    /// The player currently in front.
    pub fn current(&self) -> Option<&PlayerId> {
        self.stack.front()
    }
}
