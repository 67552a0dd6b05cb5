//! Game phase machine
//!
//! The game is always in exactly one phase. Commands come from the face
//! buttons; `Collision` comes from the engine's own tick.

use crate::input::Line;

/// Game phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GamePhase {
    /// Obstacles falling, player moving
    Running,
    /// Frozen until pause is toggled again
    Paused,
    /// High score screen, frozen until B again
    HighScore,
    /// Player hit an obstacle; waiting for restart or exit
    GameOver,
    /// Game left; the caller decides what comes next
    Exited,
}

/// Inputs that change the game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameCommand {
    /// Button A
    TogglePause,
    /// Button B
    ShowHighScore,
    /// Button X
    Restart,
    /// Button Y
    Exit,
    /// Player overlapped an obstacle this tick
    Collision,
}

impl GameCommand {
    /// Command bound to a face button, if any
    pub fn from_line(line: Line) -> Option<Self> {
        match line {
            Line::A => Some(GameCommand::TogglePause),
            Line::B => Some(GameCommand::ShowHighScore),
            Line::X => Some(GameCommand::Restart),
            Line::Y => Some(GameCommand::Exit),
            _ => None,
        }
    }
}

impl GamePhase {
    /// Whether the per-tick simulation runs in this phase
    pub fn is_live(&self) -> bool {
        matches!(self, GamePhase::Running)
    }

    /// Whether a restart command is honored in this phase
    pub fn accepts_restart(&self) -> bool {
        matches!(
            self,
            GamePhase::Running | GamePhase::Paused | GamePhase::GameOver
        )
    }

    /// Process a command and return the next phase
    pub fn transition(self, command: GameCommand) -> Self {
        use GameCommand::*;
        use GamePhase::*;

        match (self, command) {
            // Running transitions
            (Running, TogglePause) => Paused,
            (Running, ShowHighScore) => HighScore,
            (Running, Collision) => GameOver,

            // Paused transitions
            (Paused, TogglePause) => Running,

            // HighScore transitions
            (HighScore, ShowHighScore) => Running,

            // Restart and exit
            (Running | Paused | GameOver, Restart) => Running,
            (Running | Paused | GameOver, Exit) => Exited,

            // Default: stay in current phase
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_toggle() {
        let paused = GamePhase::Running.transition(GameCommand::TogglePause);
        assert_eq!(paused, GamePhase::Paused);
        let running = paused.transition(GameCommand::TogglePause);
        assert_eq!(running, GamePhase::Running);
    }

    #[test]
    fn test_collision_only_while_running() {
        assert_eq!(
            GamePhase::Running.transition(GameCommand::Collision),
            GamePhase::GameOver
        );
        assert_eq!(
            GamePhase::Paused.transition(GameCommand::Collision),
            GamePhase::Paused
        );
    }

    #[test]
    fn test_exit_from_any_active_phase() {
        for phase in [GamePhase::Running, GamePhase::Paused, GamePhase::GameOver] {
            assert_eq!(phase.transition(GameCommand::Exit), GamePhase::Exited);
        }
    }

    #[test]
    fn test_restart_returns_to_running() {
        for phase in [GamePhase::Running, GamePhase::Paused, GamePhase::GameOver] {
            assert!(phase.accepts_restart());
            assert_eq!(phase.transition(GameCommand::Restart), GamePhase::Running);
        }
        assert!(!GamePhase::Exited.accepts_restart());
    }

    #[test]
    fn test_high_score_screen_waits_for_b() {
        let shown = GamePhase::Running.transition(GameCommand::ShowHighScore);
        assert_eq!(shown, GamePhase::HighScore);
        assert_eq!(shown.transition(GameCommand::Exit), GamePhase::HighScore);
        assert_eq!(shown.transition(GameCommand::TogglePause), GamePhase::HighScore);
        assert_eq!(shown.transition(GameCommand::ShowHighScore), GamePhase::Running);
    }

    #[test]
    fn test_exited_is_terminal() {
        for command in [
            GameCommand::TogglePause,
            GameCommand::ShowHighScore,
            GameCommand::Restart,
            GameCommand::Exit,
            GameCommand::Collision,
        ] {
            assert_eq!(GamePhase::Exited.transition(command), GamePhase::Exited);
        }
    }

    #[test]
    fn test_button_bindings() {
        assert_eq!(GameCommand::from_line(Line::A), Some(GameCommand::TogglePause));
        assert_eq!(GameCommand::from_line(Line::Y), Some(GameCommand::Exit));
        assert_eq!(GameCommand::from_line(Line::Left), None);
        assert_eq!(GameCommand::from_line(Line::Select), None);
    }
}
