//! Bridge runtime: drives a controller from line-delimited JSON.
//!
//! Input lines and a fixed tick are multiplexed on one task, so the controller
//! is never touched concurrently.

use std::time::Duration;

use anyhow::Result;
use match_drop_core::MatchPolicy;
use match_drop_engine::{AssetCatalog, RoundController};
use match_drop_types::{Command, TICK_MS};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::protocol::{parse_inbound, ErrorCode, Inbound, Outbound};

/// Bridge configuration
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub tick_ms: u32,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self { tick_ms: TICK_MS }
    }
}

impl BridgeConfig {
    /// Create from environment variables (`MATCH_DROP_TICK_MS`)
    pub fn from_env() -> Self {
        let tick_ms = std::env::var("MATCH_DROP_TICK_MS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .filter(|&ms: &u32| ms > 0)
            .unwrap_or(TICK_MS);
        Self { tick_ms }
    }
}

/// Serializes outbound lines into a reusable buffer.
struct LineWriter<W> {
    writer: W,
    buf: Vec<u8>,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    fn new(writer: W) -> Self {
        Self {
            writer,
            buf: Vec::with_capacity(4096),
        }
    }

    async fn send(&mut self, msg: &Outbound) -> Result<()> {
        self.buf.clear();
        serde_json::to_writer(&mut self.buf, msg)?;
        self.buf.push(b'\n');
        self.writer.write_all(&self.buf).await?;
        Ok(())
    }

    async fn send_commands(&mut self, out: &mut Vec<Command>) -> Result<()> {
        for command in out.drain(..) {
            self.send(&Outbound::Command { command }).await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    async fn send_error(&mut self, code: ErrorCode, message: String) -> Result<()> {
        self.send(&Outbound::error(code, message)).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// Run a session until `quit` or end of input.
///
/// The controller is initialized first; its commands are the first lines written.
pub async fn run<V, C, R, W>(
    controller: &mut RoundController<V, C>,
    reader: R,
    writer: W,
    config: BridgeConfig,
) -> Result<()>
where
    V: MatchPolicy,
    C: AssetCatalog,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(reader).lines();
    let mut writer = LineWriter::new(writer);
    let mut out: Vec<Command> = Vec::new();

    if let Err(e) = controller.initialize(&mut out) {
        writer.send_commands(&mut out).await?;
        writer
            .send_error(ErrorCode::from_error(&e), e.to_string())
            .await?;
        return Err(e.into());
    }
    writer.send_commands(&mut out).await?;
    info!(seed = controller.seed(), "session started");

    let tick = Duration::from_millis(u64::from(config.tick_ms.max(1)));
    let mut interval = time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("input closed");
                    break;
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_inbound(trimmed) {
                    Ok(Inbound::Input { event }) => {
                        if let Err(e) = controller.on_input(event, &mut out) {
                            warn!(error = %e, "input failed");
                            writer.send_commands(&mut out).await?;
                            writer.send_error(ErrorCode::from_error(&e), e.to_string()).await?;
                        }
                    }
                    Ok(Inbound::Restart) => {
                        if let Err(e) = controller.restart(&mut out) {
                            writer.send_commands(&mut out).await?;
                            writer.send_error(ErrorCode::from_error(&e), e.to_string()).await?;
                        }
                    }
                    Ok(Inbound::Snapshot) => {
                        writer.send(&Outbound::Snapshot(controller.snapshot())).await?;
                    }
                    Ok(Inbound::Quit) => {
                        writer.send_commands(&mut out).await?;
                        info!("quit requested");
                        break;
                    }
                    Err((code, message)) => {
                        debug!(line = trimmed, "malformed line");
                        writer.send_error(code, message).await?;
                    }
                }
                writer.send_commands(&mut out).await?;
            }
            _ = interval.tick() => {
                // whole milliseconds only; the remainder carries into the next tick
                let elapsed = last_tick.elapsed().as_millis().min(u128::from(u32::MAX)) as u32;
                last_tick += Duration::from_millis(u64::from(elapsed));
                if elapsed > 0 {
                    controller.tick(elapsed, &mut out);
                    if !out.is_empty() {
                        writer.send_commands(&mut out).await?;
                    }
                }
            }
        }
    }

    Ok(())
}
