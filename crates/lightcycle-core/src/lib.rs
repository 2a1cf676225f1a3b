pub mod events;
pub mod player;
pub mod time;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::player::{Pilot, Player};

    /// Create `n` players; the first `humans` slots are human, the rest computer.
    pub fn make_players(n: usize, humans: usize) -> Vec<Player> {
        (0..n)
            .map(|i| {
                let pilot = if i < humans {
                    Pilot::Human
                } else {
                    Pilot::Computer
                };
                Player::new(i, format!("Player{}", i + 1), pilot)
            })
            .collect()
    }

    /// Create `n` computer-controlled players.
    pub fn make_bots(n: usize) -> Vec<Player> {
        make_players(n, 0)
    }

}
