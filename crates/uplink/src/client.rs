//! Line-delimited JSON link to the simulator.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::{Context, Result};

use crate::messages::{Inbound, Outbound};

/// Simulator link. A background thread reads and parses inbound lines
/// into a channel; [`UplinkClient::poll`] drains it on the main thread.
/// Writes happen inline on the caller's thread and are non-fatal on
/// failure: a broken pipe flips the connected flag and the console keeps
/// rendering last-known state.
pub struct UplinkClient {
    writer: TcpStream,
    inbound: Receiver<Inbound>,
    connected: Arc<AtomicBool>,
    reader_thread: Option<JoinHandle<()>>,
}

impl UplinkClient {
    /// Connect to the simulator at `addr` and spawn the reader thread.
    pub fn connect(addr: &str) -> Result<Self> {
        let stream =
            TcpStream::connect(addr).with_context(|| format!("connecting to simulator at {addr}"))?;
        stream.set_nodelay(true).ok();
        let writer = stream
            .try_clone()
            .context("cloning simulator stream for writes")?;

        let connected = Arc::new(AtomicBool::new(true));
        let (tx, rx) = channel();
        let flag = connected.clone();
        let reader_thread = std::thread::Builder::new()
            .name("uplink-reader".to_string())
            .spawn(move || read_loop(stream, tx, flag))
            .context("spawning uplink reader thread")?;

        log::info!("Uplink connected to {}", addr);
        Ok(Self {
            writer,
            inbound: rx,
            connected,
            reader_thread: Some(reader_thread),
        })
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Drain every message received since the last poll. Called once per
    /// frame from the main thread.
    pub fn poll(&self) -> Vec<Inbound> {
        let mut messages = Vec::new();
        loop {
            match self.inbound.try_recv() {
                Ok(msg) => messages.push(msg),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.connected.store(false, Ordering::Relaxed);
                    break;
                }
            }
        }
        messages
    }

    /// Send a command. A write failure marks the link down; it never
    /// propagates as an error because loss of transport must not stop
    /// the render or sampler loops.
    pub fn send(&mut self, cmd: &Outbound) {
        if !self.is_connected() {
            return;
        }
        let line = match serde_json::to_string(cmd) {
            Ok(s) => s,
            Err(e) => {
                log::error!("Could not encode command: {}", e);
                return;
            }
        };
        if let Err(e) = writeln!(self.writer, "{}", line) {
            log::warn!("Uplink write failed: {}", e);
            self.connected.store(false, Ordering::Relaxed);
        }
    }

    /// Tear down the link. Idempotent: shutting down twice is a no-op.
    pub fn shutdown(&mut self) {
        self.connected.store(false, Ordering::Relaxed);
        // Closing the write half unblocks the reader's blocking read.
        self.writer.shutdown(std::net::Shutdown::Both).ok();
        if let Some(handle) = self.reader_thread.take() {
            if handle.join().is_err() {
                log::warn!("Uplink reader thread panicked during shutdown");
            }
        }
    }
}

impl Drop for UplinkClient {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn read_loop(stream: TcpStream, tx: Sender<Inbound>, connected: Arc<AtomicBool>) {
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                if connected.load(Ordering::Relaxed) {
                    log::warn!("Uplink read failed: {}", e);
                }
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Inbound>(&line) {
            Ok(msg) => {
                if tx.send(msg).is_err() {
                    // Console side dropped the receiver.
                    break;
                }
            }
            // Malformed lines are discarded; the link stays up.
            Err(e) => log::warn!("Discarding malformed message: {}", e),
        }
    }
    connected.store(false, Ordering::Relaxed);
}
