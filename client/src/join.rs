use common::{GameId, GameSession};

/// Next step of the join flow for one attempt. The UI interprets the
/// step: opening the directory chooser, raising the confirmation
/// notification, showing the password prompt, or sending the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinStep {
    /// Player rating is outside the session's bounds and the player
    /// has not confirmed yet. Checked before anything else happens.
    ConfirmRating { player_rating: i32 },
    /// No valid game directory configured; the action can only retry
    /// after one is selected.
    NeedGameDirectory,
    NeedPassword,
    Proceed {
        game_id: GameId,
        password: Option<String>,
    },
}

/// Decides what joining `session` requires right now. Pure; the same
/// ordering as the original flow: rating confirmation, then game
/// directory, then password, then the actual join call.
pub fn plan_join(
    session: &GameSession,
    password: Option<&str>,
    player_rating: i32,
    game_directory_set: bool,
    rating_confirmed: bool,
) -> JoinStep {
    if !rating_confirmed && !session.rating_in_bounds(player_rating) {
        return JoinStep::ConfirmRating { player_rating };
    }
    if !game_directory_set {
        return JoinStep::NeedGameDirectory;
    }
    if session.password_protected && password.is_none() {
        return JoinStep::NeedPassword;
    }
    JoinStep::Proceed {
        game_id: session.id,
        password: password.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::GameStatus;

    fn session(min_rating: i32, max_rating: i32, password_protected: bool) -> GameSession {
        GameSession {
            id: GameId::new(9),
            title: "Glacier Duel".to_string(),
            host: "SolarNomad".to_string(),
            map_name: "glacier_gap".to_string(),
            featured_mod: "vanilla".to_string(),
            num_players: 1,
            max_players: 2,
            min_rating,
            max_rating,
            password_protected,
            teams: vec![],
            status: GameStatus::Open,
        }
    }

    #[test]
    fn test_rating_out_of_bounds_requires_confirmation_first() {
        // Even with no game directory and a password-protected game,
        // the confirmation comes before any other step.
        let s = session(800, 1500, true);
        assert_eq!(
            plan_join(&s, None, 1600, false, false),
            JoinStep::ConfirmRating { player_rating: 1600 }
        );
        assert_eq!(
            plan_join(&s, None, 700, true, false),
            JoinStep::ConfirmRating { player_rating: 700 }
        );
    }

    #[test]
    fn test_confirmed_join_skips_rating_check() {
        let s = session(800, 1500, false);
        assert_eq!(
            plan_join(&s, None, 1600, true, true),
            JoinStep::Proceed {
                game_id: GameId::new(9),
                password: None,
            }
        );
    }

    #[test]
    fn test_missing_game_directory_blocks_join() {
        let s = session(0, 3000, false);
        assert_eq!(plan_join(&s, None, 1200, false, false), JoinStep::NeedGameDirectory);
    }

    #[test]
    fn test_password_prompt_only_when_protected_and_absent() {
        let protected = session(0, 3000, true);
        assert_eq!(plan_join(&protected, None, 1200, true, false), JoinStep::NeedPassword);
        assert_eq!(
            plan_join(&protected, Some("sesame"), 1200, true, false),
            JoinStep::Proceed {
                game_id: GameId::new(9),
                password: Some("sesame".to_string()),
            }
        );

        let open = session(0, 3000, false);
        assert_eq!(
            plan_join(&open, None, 1200, true, false),
            JoinStep::Proceed {
                game_id: GameId::new(9),
                password: None,
            }
        );
    }

    #[test]
    fn test_rating_inside_bounds_proceeds_without_confirmation() {
        let s = session(800, 1500, false);
        assert_eq!(
            plan_join(&s, None, 1500, true, false),
            JoinStep::Proceed {
                game_id: GameId::new(9),
                password: None,
            }
        );
    }
}
