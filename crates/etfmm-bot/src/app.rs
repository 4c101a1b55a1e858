//! Replay application.
//!
//! A reader task parses venue events and sends them over a bounded channel;
//! the engine loop is the only owner of the `MarketMaker`, so quoting state
//! has exactly one writer. Commands are written in emission order.

use std::future::Future;

use crate::config::AppConfig;
use crate::error::AppResult;
use etfmm_core::{OrderCommand, VenueEvent};
use etfmm_quoter::{LayerKind, MarketMaker, QuoterError, RecordingGateway, SessionStats};
use etfmm_telemetry::Metrics;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Counts from the reader task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadSummary {
    pub lines: u64,
    pub events: u64,
    pub skipped: u64,
}

/// Outcome of a replay.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    pub read: ReadSummary,
    pub commands_written: u64,
    pub stats: SessionStats,
    pub positions: [i64; 3],
}

pub struct Application {
    config: AppConfig,
    maker: MarketMaker,
    gateway: RecordingGateway,
    commands_written: u64,
}

impl Application {
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let maker = MarketMaker::new(config.quoter.clone())?;
        Ok(Self {
            config,
            maker,
            gateway: RecordingGateway::new(),
            commands_written: 0,
        })
    }

    /// Replay the configured input into the configured output.
    pub async fn run(self) -> AppResult<ReplayReport> {
        let input: Box<dyn AsyncBufRead + Unpin + Send> = match self.config.replay.input_path() {
            Some(path) => {
                info!(path, "Reading venue events from file");
                Box::new(BufReader::new(tokio::fs::File::open(path).await?))
            }
            None => {
                info!("Reading venue events from stdin");
                Box::new(BufReader::new(tokio::io::stdin()))
            }
        };

        let output: Box<dyn AsyncWrite + Unpin + Send> = match self.config.replay.output_path() {
            Some(path) => {
                info!(path, "Writing order commands to file");
                Box::new(tokio::fs::File::create(path).await?)
            }
            None => Box::new(tokio::io::stdout()),
        };

        let metrics_output = self.config.telemetry.metrics_output.clone();
        let report = self.replay(input, output).await?;

        if let Some(path) = metrics_output {
            tokio::fs::write(&path, Metrics::gather_text()?).await?;
            info!(path = %path, "Metrics written");
        }
        Ok(report)
    }

    /// Replay events from `input`, writing commands to `output`, until the
    /// input ends or Ctrl-C is received.
    pub async fn replay<R, W>(self, input: R, output: W) -> AppResult<ReplayReport>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin,
    {
        let ctrl_c = async {
            // Without a signal handler there is nothing to wait for.
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };
        self.replay_until(input, output, ctrl_c).await
    }

    /// Replay until the input ends or `shutdown` completes.
    pub async fn replay_until<R, W, S>(
        mut self,
        input: R,
        output: W,
        shutdown: S,
    ) -> AppResult<ReplayReport>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin,
        S: Future<Output = ()>,
    {
        let (event_tx, mut event_rx) =
            mpsc::channel::<VenueEvent>(self.config.replay.channel_capacity);
        let reader = tokio::spawn(read_events(input, event_tx));
        let mut writer = BufWriter::new(output);
        tokio::pin!(shutdown);

        info!("Entering replay loop");
        loop {
            tokio::select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break;
                    };
                    self.process(&event);
                    self.flush_commands(&mut writer).await?;
                }

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }
        writer.flush().await?;

        // The reader watches for the receiver closing, even while idle on input.
        drop(event_rx);
        let read = reader.await?;

        let stats = self.maker.stats().clone();
        info!(
            lines = read.lines,
            events = read.events,
            skipped = read.skipped,
            commands = self.commands_written,
            "Replay finished"
        );
        stats.log_summary();

        Ok(ReplayReport {
            read,
            commands_written: self.commands_written,
            stats,
            positions: self.maker.positions(),
        })
    }

    /// Run one event through the engine. Errors are logged, never fatal.
    fn process(&mut self, event: &VenueEvent) {
        let metrics = self.config.telemetry.metrics_enabled;
        if metrics {
            Metrics::venue_event(event.kind());
        }

        match self.maker.handle(event, &mut self.gateway) {
            Ok(()) => {}
            Err(QuoterError::Snapshot(e)) => {
                warn!(error = %e, kind = event.kind(), "Skipping malformed event");
                if metrics {
                    if let VenueEvent::OrderBookUpdate(snapshot) = event {
                        Metrics::snapshot_rejected(snapshot.instrument.as_str());
                    }
                }
            }
            Err(e) => error!(error = %e, kind = event.kind(), "Event handling failed"),
        }

        if metrics {
            if matches!(event, VenueEvent::Error { .. }) {
                Metrics::venue_error();
            }
            for kind in LayerKind::ALL {
                Metrics::position(kind.as_str(), self.maker.layer(kind).position());
            }
        }
    }

    async fn flush_commands<W: AsyncWrite + Unpin>(
        &mut self,
        writer: &mut BufWriter<W>,
    ) -> AppResult<()> {
        for command in self.gateway.drain() {
            if self.config.telemetry.metrics_enabled {
                record_command(&command);
            }
            let mut line = serde_json::to_vec(&command)?;
            line.push(b'\n');
            writer.write_all(&line).await?;
            self.commands_written += 1;
        }
        Ok(())
    }
}

fn record_command(command: &OrderCommand) {
    match command {
        OrderCommand::Insert { side, lifespan, .. } => {
            Metrics::order_inserted(side.as_str(), lifespan.as_str())
        }
        OrderCommand::Cancel { .. } => Metrics::order_cancelled(),
        OrderCommand::Hedge { side, volume, .. } => {
            // A hedge answers a fill on the opposite side.
            Metrics::fill(side.opposite().as_str());
            Metrics::hedge_sent(side.as_str(), volume.lots());
        }
    }
}

/// Parse JSON-lines events and forward them until EOF or the engine stops.
///
/// Lines that are not UTF-8 or not a valid event are counted and skipped. A
/// read error ends the input like EOF does.
async fn read_events<R>(mut input: R, events: mpsc::Sender<VenueEvent>) -> ReadSummary
where
    R: AsyncBufRead + Unpin,
{
    let mut summary = ReadSummary::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let read = tokio::select! {
            read = input.read_until(b'\n', &mut buf) => read,
            _ = events.closed() => {
                debug!("Engine stopped, closing reader");
                break;
            }
        };
        match read {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Input read failed, ending replay input");
                break;
            }
        }

        summary.lines += 1;
        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line.trim(),
            Err(e) => {
                summary.skipped += 1;
                warn!(line = summary.lines, error = %e, "Skipping non UTF-8 line");
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<VenueEvent>(line) {
            Ok(event) => {
                summary.events += 1;
                if events.send(event).await.is_err() {
                    debug!("Engine stopped, closing reader");
                    break;
                }
            }
            Err(e) => {
                summary.skipped += 1;
                warn!(line = summary.lines, error = %e, "Skipping unparseable event");
            }
        }
    }
    summary
}
