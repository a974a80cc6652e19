//! Go Text Protocol (GTP) front-end.
//!
//! Implements GTP version 2 so the player can be driven by GoGui, Sabaki
//! or a test script.
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`, `quit`
//! - `boardsize <size>` - resize and clear the board (2 to 25)
//! - `clear_board` - reset the board to empty
//! - `komi <value>` - set komi (rebuilds the player)
//! - `play <color> <vertex>` - play a move
//! - `genmove <color>` - generate, play and return a move
//! - `legal_moves <color>` - list legal vertices, sorted
//! - `showboard` - print the board
//! - `gogui-rules_final_result` - area score of the current board

use std::io::{self, BufRead, Write};

use anyhow::Result;
use tracing::debug;

use crate::board::{Color, GoBoard, format_point, parse_point};
use crate::config::EngineConfig;
use crate::constants::{MAX_SIZE, MIN_SIZE};
use crate::engine::SimulationPlayer;
use crate::score::score_board;

/// The list of known GTP commands.
const KNOWN_COMMANDS: &[&str] = &[
    "boardsize",
    "clear_board",
    "genmove",
    "gogui-rules_final_result",
    "known_command",
    "komi",
    "legal_moves",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "version",
];

/// GTP engine state.
pub struct GtpEngine {
    board: GoBoard,
    player: SimulationPlayer,
}

impl GtpEngine {
    /// Create an engine with an empty board of the configured size.
    pub fn new(config: EngineConfig) -> Self {
        let board = GoBoard::new(config.size);
        Self {
            board,
            player: SimulationPlayer::new(config),
        }
    }

    pub fn board(&self) -> &GoBoard {
        &self.board
    }

    /// Run the command loop on stdin and stdout.
    pub fn run_stdio(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run(stdin.lock(), stdout.lock())
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let args = &parts[1..];
            debug!(%command, ?args, "gtp command");

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();

            write!(output, "{prefix}{id_str} {message}\n\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command ID from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        if end > 0 {
            if let Ok(id) = trimmed[..end].parse::<u32>() {
                return (Some(id), trimmed[end..].trim());
            }
        }
        (None, trimmed)
    }

    fn parse_color(args: &[&str]) -> Result<Color, String> {
        let arg = args.first().ok_or("missing color")?;
        Color::parse(arg).ok_or_else(|| format!("invalid color: {arg}"))
    }

    /// Execute a GTP command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match self.dispatch(command, args) {
            Ok(response) => (true, response),
            Err(message) => (false, message),
        }
    }

    fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<String, String> {
        match command {
            "name" => Ok("go3-sim".to_string()),

            "version" => Ok(env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => Ok("2".to_string()),

            "list_commands" => Ok(KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                let cmd = args.first().ok_or("missing argument")?;
                let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                Ok(if known { "true" } else { "false" }.to_string())
            }

            "quit" => Ok(String::new()),

            "boardsize" => {
                let arg = args.first().ok_or("missing argument")?;
                let size: usize = arg.parse().map_err(|_| "invalid size".to_string())?;
                if !(MIN_SIZE..=MAX_SIZE).contains(&size) {
                    return Err(format!(
                        "unacceptable size, must be {MIN_SIZE} to {MAX_SIZE} (got {size})"
                    ));
                }
                self.board.reset(size);
                Ok(String::new())
            }

            "clear_board" => {
                self.board.reset(self.board.size());
                Ok(String::new())
            }

            "komi" => {
                let arg = args.first().ok_or("missing argument")?;
                let komi: f64 = arg
                    .parse()
                    .ok()
                    .filter(|k: &f64| k.is_finite())
                    .ok_or_else(|| "invalid komi".to_string())?;
                let config = EngineConfig {
                    komi,
                    ..self.player.config().clone()
                };
                let rng = self.player.fork_rng();
                self.player = SimulationPlayer::with_rng(config, rng);
                Ok(String::new())
            }

            "play" => {
                if args.len() < 2 {
                    return Err("missing arguments".to_string());
                }
                let color = Self::parse_color(args)?;
                let vertex = args[1];
                let pt = parse_point(vertex, self.board.size())
                    .ok_or_else(|| format!("illegal move: \"{vertex}\" wrong coordinate"))?;
                self.board
                    .play_move(pt, color)
                    .map_err(|err| format!("illegal move: \"{vertex}\" {err}"))?;
                Ok(String::new())
            }

            "genmove" => {
                let color = Self::parse_color(args)?;
                let mv = self.player.get_move(&self.board, color);
                let vertex = format_point(mv, self.board.size());
                self.board
                    .play_move(mv, color)
                    .map_err(|err| format!("illegal move: {vertex} {err}"))?;
                Ok(vertex)
            }

            "legal_moves" => {
                let color = Self::parse_color(args)?;
                let mut moves: Vec<String> = self
                    .board
                    .empty_points()
                    .into_iter()
                    .filter(|&pt| self.board.is_legal(pt, color))
                    .map(|pt| format_point(pt, self.board.size()))
                    .collect();
                moves.sort();
                Ok(moves.join(" "))
            }

            "showboard" => Ok(format!("\n{}", self.board)),

            "gogui-rules_final_result" => {
                let score = score_board(&self.board, self.player.komi());
                Ok(if score > 0.0 {
                    format!("B+{score:.1}")
                } else if score < 0.0 {
                    format!("W+{:.1}", -score)
                } else {
                    "0".to_string()
                })
            }

            _ => Err(format!("unknown command: {command}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GtpEngine {
        GtpEngine::new(EngineConfig {
            size: 5,
            sim: 2,
            komi: 0.5,
            seed: Some(3),
            ..Default::default()
        })
    }

    #[test]
    fn test_parse_id_with_id() {
        let (id, cmd) = GtpEngine::parse_id("123 name");
        assert_eq!(id, Some(123));
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_parse_id_without_id() {
        let (id, cmd) = GtpEngine::parse_id("name");
        assert_eq!(id, None);
        assert_eq!(cmd, "name");
    }

    #[test]
    fn test_name_and_protocol() {
        let mut engine = engine();
        assert_eq!(engine.execute("name", &[]), (true, "go3-sim".to_string()));
        assert_eq!(engine.execute("protocol_version", &[]), (true, "2".to_string()));
    }

    #[test]
    fn test_known_command() {
        let mut engine = engine();
        assert_eq!(engine.execute("known_command", &["genmove"]).1, "true");
        assert_eq!(engine.execute("known_command", &["undo"]).1, "false");
        assert!(!engine.execute("known_command", &[]).0);
    }

    #[test]
    fn test_boardsize() {
        let mut engine = engine();
        assert!(engine.execute("boardsize", &["9"]).0);
        assert_eq!(engine.board().size(), 9);
        assert!(!engine.execute("boardsize", &["1"]).0);
        assert!(!engine.execute("boardsize", &["26"]).0);
        assert!(!engine.execute("boardsize", &["nine"]).0);
        assert_eq!(engine.board().size(), 9);
    }

    #[test]
    fn test_play_and_clear() {
        let mut engine = engine();
        assert!(engine.execute("play", &["black", "C3"]).0);
        let (ok, msg) = engine.execute("play", &["white", "c3"]);
        assert!(!ok);
        assert_eq!(msg, "illegal move: \"c3\" point is not empty");
        assert!(!engine.execute("play", &["white", "z9"]).0);
        assert!(!engine.execute("play", &["green", "a1"]).0);

        assert!(engine.execute("clear_board", &[]).0);
        assert_eq!(engine.board().empty_points().len(), 25);
    }

    #[test]
    fn test_genmove_plays_legal_move() {
        let mut engine = engine();
        let (ok, vertex) = engine.execute("genmove", &["b"]);
        assert!(ok);
        let pt = parse_point(&vertex, 5).expect("genmove returns a vertex");
        if vertex != "pass" {
            assert_eq!(engine.board().get_color(pt), Color::Black);
        }
        assert_eq!(engine.board().current_player(), Color::White);
    }

    #[test]
    fn test_legal_moves_sorted() {
        let mut engine = engine();
        engine.execute("boardsize", &["2"]);
        engine.execute("play", &["b", "a1"]);
        let (ok, moves) = engine.execute("legal_moves", &["w"]);
        assert!(ok);
        assert_eq!(moves, "A2 B1 B2");
    }

    #[test]
    fn test_komi_and_final_result() {
        let mut engine = engine();
        assert_eq!(engine.execute("gogui-rules_final_result", &[]).1, "W+0.5");
        assert!(engine.execute("komi", &["0"]).0);
        assert_eq!(engine.execute("gogui-rules_final_result", &[]).1, "0");
        engine.execute("play", &["b", "c3"]);
        assert_eq!(engine.execute("gogui-rules_final_result", &[]).1, "B+25.0");
        assert!(!engine.execute("komi", &["lots"]).0);
    }

    #[test]
    fn test_run_loop_formats_responses() {
        let mut engine = engine();
        let input = b"1 name\n# comment\n\nfoo\n2 quit\nname\n";
        let mut output = Vec::new();
        engine.run(&input[..], &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        assert_eq!(text, "=1 go3-sim\n\n? unknown command: foo\n\n=2 \n\n");
    }
}
