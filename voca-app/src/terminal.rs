use std::fmt::Write;
use std::str::FromStr;

use voca_types::{GameStatus, GradeSelector, GradeStats, GuessMode, RoundKind, RoundView};

pub const HELP: &str = "Commands: <letter> | next | giveup | grade <1-6|all> | reset | stats | help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Guess(char),
    Next,
    GiveUp,
    Grade(GradeSelector),
    Reset,
    Stats,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err("Empty command".to_string());
        };
        let arg = words.next();
        if words.next().is_some() {
            return Err(format!("Too many arguments: {:?}", line.trim()));
        }

        let mut chars = head.chars();
        if let (Some(c), None, None) = (chars.next(), chars.next(), arg) {
            if c.is_alphabetic() {
                return Ok(Command::Guess(c));
            }
        }

        match (head.to_lowercase().as_str(), arg) {
            ("next", None) => Ok(Command::Next),
            ("giveup" | "give-up", None) => Ok(Command::GiveUp),
            ("grade", Some(grade)) => grade.parse::<GradeSelector>().map(Command::Grade),
            ("grade", None) => Err("Usage: grade <1-6|all>".to_string()),
            ("reset", None) => Ok(Command::Reset),
            ("stats", None) => Ok(Command::Stats),
            ("help" | "?", None) => Ok(Command::Help),
            ("quit" | "exit", None) => Ok(Command::Quit),
            _ => Err(format!("Unknown command: {:?}", line.trim())),
        }
    }
}

/// Multi-line text rendering of a round view
pub fn render_view(view: &RoundView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Grade {} ==", view.grade);

    match view.kind {
        RoundKind::AllSolved => {
            let _ = writeln!(out, "{}", view.hints.hint1);
            let _ = writeln!(out, "Type 'next' to play this grade again.");
            return out;
        }
        RoundKind::Unavailable => {
            let _ = writeln!(out, "{}", view.hints.hint1);
            if let Some(reason) = &view.hints.hint2 {
                let _ = writeln!(out, "({})", reason);
            }
            return out;
        }
        RoundKind::Word => {}
    }

    let balloons = "o".repeat(view.lives_remaining as usize)
        + &"x".repeat(view.max_lives.saturating_sub(view.lives_remaining) as usize);
    let _ = writeln!(out, "Lives: [{}]", balloons);
    if !view.category.is_empty() {
        let _ = writeln!(out, "Category: {}", view.category);
    }
    let _ = writeln!(out, "Hint: {}", view.hints.hint1);
    if let Some(hint2) = &view.hints.hint2 {
        let _ = writeln!(out, "Hint: {}", hint2);
    }
    let _ = writeln!(out, "Word: {}  ({} letters)", view.display, view.word_length);

    if view.mode == GuessMode::Positional && view.status == GameStatus::Playing {
        let tiles: String = view.letter_tiles.iter().map(|c| format!("{} ", c)).collect();
        let _ = writeln!(out, "Tiles: {}", tiles.trim_end());
    }
    if !view.wrong_letters.is_empty() {
        let wrong: String = view.wrong_letters.iter().collect();
        let _ = writeln!(out, "Missed: {}", wrong);
    }

    match (view.status, &view.solution) {
        (GameStatus::Won, Some(solution)) => {
            let _ = writeln!(out, "Solved! The word was {}. Type 'next' for another.", solution);
        }
        (GameStatus::Lost, Some(solution)) => {
            let _ = writeln!(out, "Out of balloons. The word was {}. Type 'next' to try another.", solution);
        }
        _ => {}
    }
    out
}

/// Per-grade dashboard lines
pub fn render_stats(played: &[(GradeSelector, GradeStats)], reward_balance: u64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Reward points: {}", reward_balance);
    if played.is_empty() {
        let _ = writeln!(out, "No games played yet.");
    }
    for (grade, stats) in played {
        let _ = writeln!(
            out,
            "Grade {:>3}: {} won, {} lost, streak {} (best {})",
            grade.to_string(),
            stats.wins,
            stats.losses,
            stats.current_streak,
            stats.best_streak
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use voca_core::{CurrentRound, GameSession};
    use voca_types::{Grade, WordEntry, WordHints};

    fn word(text: &str) -> WordEntry {
        WordEntry {
            id: format!("{}_1_0", text),
            word: text.to_string(),
            hints: WordHints {
                hint1: "A pet that says meow".to_string(),
                hint2: Some("It has whiskers".to_string()),
            },
            category: "animals".to_string(),
            grade: Grade::new(1).unwrap(),
        }
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("a".parse::<Command>(), Ok(Command::Guess('a')));
        assert_eq!(" Z ".parse::<Command>(), Ok(Command::Guess('Z')));
        assert_eq!("next".parse::<Command>(), Ok(Command::Next));
        assert_eq!("GIVEUP".parse::<Command>(), Ok(Command::GiveUp));
        assert_eq!("grade all".parse::<Command>(), Ok(Command::Grade(GradeSelector::All)));
        assert_eq!(
            "grade 4".parse::<Command>(),
            Ok(Command::Grade(GradeSelector::Grade(Grade::new(4).unwrap())))
        );
        assert_eq!("quit".parse::<Command>(), Ok(Command::Quit));
        assert_eq!("?".parse::<Command>(), Ok(Command::Help));
        assert_eq!("stats".parse::<Command>(), Ok(Command::Stats));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("".parse::<Command>().is_err());
        assert!("grade".parse::<Command>().is_err());
        assert!("grade 9".parse::<Command>().is_err());
        assert!("next now".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
        assert!("7".parse::<Command>().is_err());
    }

    #[test]
    fn test_render_active_round() {
        let mut session = GameSession::start_round(word("cat"), GuessMode::FreeLetter);
        session.evaluate_guess('a').unwrap();
        session.evaluate_guess('z').unwrap();

        let text = render_view(&session.view(GradeSelector::DEFAULT));
        assert!(text.contains("Lives: [ooooox]"));
        assert!(text.contains("Word: _ A _"));
        assert!(text.contains("Missed: Z"));
        assert!(text.contains("Category: animals"));
        assert!(!text.contains("CAT"));
    }

    #[test]
    fn test_render_reveals_solution_after_loss() {
        let mut session = GameSession::start_round(word("cat"), GuessMode::FreeLetter);
        session.finalize_loss();
        let text = render_view(&session.view(GradeSelector::DEFAULT));
        assert!(text.contains("The word was CAT"));
    }

    #[test]
    fn test_render_placeholder_rounds() {
        let all_solved = CurrentRound::AllSolved {
            grade: GradeSelector::All,
        };
        let text = render_view(&all_solved.view(GradeSelector::All, GuessMode::Positional));
        assert!(text.contains("Type 'next'"));
        assert!(!text.contains("Lives"));
    }

    #[test]
    fn test_render_stats() {
        let stats = GradeStats {
            wins: 3,
            losses: 1,
            current_streak: 2,
            best_streak: 2,
        };
        let text = render_stats(&[(GradeSelector::All, stats)], 40);
        assert!(text.contains("Reward points: 40"));
        assert!(text.contains("3 won, 1 lost, streak 2 (best 2)"));
        assert!(render_stats(&[], 0).contains("No games played yet."));
    }
}
