//! Stockfish engine wrapper using UCI protocol (async I/O)

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::engine::{EngineLauncher, Evaluator};
use crate::error::AnalyzerError;

/// Result of a single position evaluation
#[derive(Debug, Clone, Default)]
pub struct EvalResult {
    /// Centipawn score (from engine's perspective, i.e., side to move)
    pub cp: Option<i32>,
    /// Mate in N moves (positive = side to move mates)
    pub mate: Option<i32>,
}

/// Stockfish engine instance
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and complete the UCI handshake
    /// within `config.startup_timeout`.
    pub async fn spawn(config: &EngineConfig) -> Result<Self, AnalyzerError> {
        let mut process = Command::new(&config.stockfish_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AnalyzerError::Engine(format!(
                    "Failed to spawn engine at {}: {e}",
                    config.stockfish_path
                ))
            })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| AnalyzerError::Engine("Engine stdin not captured".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| AnalyzerError::Engine("Engine stdout not captured".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
        };

        tokio::time::timeout(config.startup_timeout, engine.handshake(config))
            .await
            .map_err(|_| {
                AnalyzerError::Engine(format!(
                    "Engine did not become ready within {}s",
                    config.startup_timeout.as_secs()
                ))
            })??;

        info!(path = %config.stockfish_path, "Engine ready");
        Ok(engine)
    }

    async fn handshake(&mut self, config: &EngineConfig) -> Result<(), AnalyzerError> {
        self.send("uci").await?;
        self.wait_for("uciok").await?;

        self.send(&format!("setoption name Threads value {}", config.threads))
            .await?;
        self.send(&format!("setoption name Hash value {}", config.hash_mb))
            .await?;
        self.send("isready").await?;
        self.wait_for("readyok").await
    }

    /// Send a command to Stockfish
    async fn send(&mut self, cmd: &str) -> Result<(), AnalyzerError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| AnalyzerError::Engine(format!("Failed to write to engine: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| AnalyzerError::Engine(format!("Failed to flush engine stdin: {e}")))?;
        Ok(())
    }

    /// Read one trimmed line; EOF means the engine went away.
    async fn read_line(&mut self, line: &mut String) -> Result<(), AnalyzerError> {
        line.clear();
        let read = self
            .stdout
            .read_line(line)
            .await
            .map_err(|e| AnalyzerError::Engine(format!("Failed to read from engine: {e}")))?;
        if read == 0 {
            return Err(AnalyzerError::Engine("Engine closed its output".into()));
        }
        debug!(line = line.trim(), "SF >");
        Ok(())
    }

    /// Wait for a specific response line
    async fn wait_for(&mut self, expected: &str) -> Result<(), AnalyzerError> {
        let mut line = String::new();
        loop {
            self.read_line(&mut line).await?;
            if line.trim() == expected {
                return Ok(());
            }
        }
    }

    /// Search a position for `move_time` and report the last score seen.
    pub async fn evaluate_position(
        &mut self,
        fen: &str,
        move_time: Duration,
    ) -> Result<EvalResult, AnalyzerError> {
        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go movetime {}", move_time.as_millis()))
            .await?;

        let mut result = EvalResult::default();
        let mut line = String::new();
        loop {
            self.read_line(&mut line).await?;
            let trimmed = line.trim();

            if trimmed.starts_with("info") && trimmed.contains(" score ") {
                if let Some(cp) = parse_cp(trimmed) {
                    result.cp = Some(cp);
                    result.mate = None;
                }
                if let Some(mate) = parse_mate(trimmed) {
                    result.mate = Some(mate);
                    result.cp = None;
                }
            } else if trimmed.starts_with("bestmove") {
                break;
            }
        }

        Ok(result)
    }

    /// Send quit command and wait for process to exit
    pub async fn shutdown(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}

#[async_trait]
impl Evaluator for StockfishEngine {
    async fn evaluate(
        &mut self,
        fen: &str,
        move_time: Duration,
    ) -> Result<Option<i32>, AnalyzerError> {
        Ok(self.evaluate_position(fen, move_time).await?.cp)
    }

    async fn quit(&mut self) {
        self.shutdown().await;
    }
}

/// Launches a fresh Stockfish process per analysis.
#[derive(Clone, Debug)]
pub struct StockfishLauncher {
    config: EngineConfig,
}

impl StockfishLauncher {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl EngineLauncher for StockfishLauncher {
    async fn launch(&self) -> Result<Box<dyn Evaluator>, AnalyzerError> {
        let engine = StockfishEngine::spawn(&self.config).await?;
        Ok(Box::new(engine))
    }
}

/// Value following `key` in a whitespace-separated UCI line
fn parse_after<T: std::str::FromStr>(line: &str, key: &str) -> Option<T> {
    let mut parts = line.split_whitespace();
    while let Some(part) = parts.next() {
        if part == key {
            return parts.next()?.parse().ok();
        }
    }
    None
}

/// Parse centipawn score from info line
fn parse_cp(line: &str) -> Option<i32> {
    parse_after(line, "cp")
}

/// Parse mate score from info line
fn parse_mate(line: &str) -> Option<i32> {
    parse_after(line, "mate")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cp() {
        let line = "info depth 20 seldepth 25 multipv 1 score cp 35 nodes 100000 pv e2e4";
        assert_eq!(parse_cp(line), Some(35));
        assert_eq!(parse_mate(line), None);
    }

    #[test]
    fn test_parse_negative_cp_with_bound() {
        let line = "info depth 12 score cp -142 upperbound nodes 5000 pv d7d5";
        assert_eq!(parse_cp(line), Some(-142));
    }

    #[test]
    fn test_parse_mate() {
        let line = "info depth 20 score mate 3 nodes 100000 pv e2e4";
        assert_eq!(parse_mate(line), Some(3));
        assert_eq!(parse_cp(line), None);
    }

    #[test]
    fn test_parse_terminal_position() {
        assert_eq!(parse_mate("info depth 0 score mate 0"), Some(0));
    }

    /// Minimal UCI engine as a shell script that answers every `go` with
    /// `search_output` and then `bestmove`.
    #[cfg(unix)]
    fn fake_engine(dir: &tempfile::TempDir, name: &str, search_output: &str) -> EngineConfig {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join(name);
        let script = format!(
            r#"#!/bin/sh
while read -r cmd; do
  case "$cmd" in
    uci) echo "id name Fake"; echo "uciok" ;;
    isready) echo "readyok" ;;
    go*)
{search_output}
      ;;
    quit) exit 0 ;;
  esac
done
"#
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        EngineConfig {
            stockfish_path: path.to_string_lossy().into_owned(),
            startup_timeout: Duration::from_secs(10),
            ..EngineConfig::default()
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_last_score_before_bestmove_wins() {
        const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
        let dir = tempfile::tempdir().unwrap();

        // cp then mate: the mate score replaces the centipawn score
        let config = fake_engine(
            &dir,
            "cp_then_mate.sh",
            r#"      echo "info depth 1 score cp 40 nodes 10 pv e2e4"
      echo "info depth 2 score mate 2 nodes 20 pv e2e4"
      echo "bestmove e2e4 ponder e7e5""#,
        );
        let mut engine = StockfishEngine::spawn(&config).await.unwrap();
        let result = engine.evaluate_position(START, Duration::from_millis(5)).await.unwrap();
        assert_eq!(result.cp, None);
        assert_eq!(result.mate, Some(2));
        // The search ended at bestmove, so the engine takes the next position
        assert_eq!(engine.evaluate(START, Duration::from_millis(5)).await.unwrap(), None);
        engine.shutdown().await;

        // mate then cp: the centipawn score replaces the mate score
        let config = fake_engine(
            &dir,
            "mate_then_cp.sh",
            r#"      echo "info depth 1 score mate 3 nodes 10 pv e2e4"
      echo "info depth 2 score cp -75 upperbound nodes 20 pv d2d4"
      echo "bestmove d2d4""#,
        );
        let mut engine = StockfishEngine::spawn(&config).await.unwrap();
        assert_eq!(
            engine.evaluate(START, Duration::from_millis(5)).await.unwrap(),
            Some(-75)
        );
        engine.shutdown().await;
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_engine_exiting_mid_search_is_engine_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = fake_engine(
            &dir,
            "crashes.sh",
            r#"      echo "info depth 1 score cp 10 nodes 10 pv e2e4"
      exit 1"#,
        );

        let mut engine = StockfishEngine::spawn(&config).await.unwrap();
        let result = engine
            .evaluate("8/8/8/8/8/8/8/K6k w - - 0 1", Duration::from_millis(5))
            .await;
        match result {
            Err(AnalyzerError::Engine(_)) => {}
            other => panic!("expected engine error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_engine_exiting_before_handshake_is_engine_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exits.sh");
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        let config = EngineConfig {
            stockfish_path: path.to_string_lossy().into_owned(),
            ..EngineConfig::default()
        };

        match StockfishEngine::spawn(&config).await {
            Err(AnalyzerError::Engine(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("handshake should fail"),
        }
    }

    #[tokio::test]
    async fn test_spawn_missing_binary_is_engine_error() {
        let config = EngineConfig {
            stockfish_path: "/nonexistent/path/to/stockfish".to_string(),
            ..EngineConfig::default()
        };
        match StockfishEngine::spawn(&config).await {
            Err(AnalyzerError::Engine(msg)) => assert!(msg.contains("Failed to spawn")),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("spawn should fail"),
        }
    }
}
