//! ELM327 OBD-II adapter over a serial line.
//!
//! # Protocol
//!
//! The adapter speaks a line-oriented text protocol. Each request is a hex
//! mode/PID pair terminated by CR; the adapter answers with zero or more
//! lines and finishes with a `>` prompt (no newline after it):
//!
//! ```text
//! > 01 05\r
//! < 01 05\r          (echo, until ATE0 turns it off)
//! < 41 05 7B\r       (mode + 0x40, PID, data bytes A B ...)
//! < \r
//! < >
//! ```
//!
//! The last non-empty, non-echo line is the answer. `NO DATA`, error
//! replies and lines whose header does not match the request all read as
//! [`Reading::NoData`].
//!
//! # Session Reset
//!
//! On open the adapter is reset with `ATZ` and echo is turned off with
//! `ATE0`. If either command never reaches a prompt the adapter is not
//! usable and opening fails.

use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};

use super::{Reading, ValueSource};
use crate::channel::Channel;
use crate::error::SourceError;

/// Commands sent once after opening the port.
const HANDSHAKE: [&str; 2] = ["ATZ", "ATE0"];

/// Give up on a response that has not reached a prompt after this many bytes.
const MAX_RESPONSE: usize = 512;

// =============================================================================
// Transport
// =============================================================================

/// Byte-level link to the adapter.
pub trait Transport: Send {
    /// Send one command line. The CR terminator is added here.
    fn send(&mut self, command: &str) -> Result<(), SourceError>;

    /// Read everything up to (not including) the `>` prompt.
    fn read_until_prompt(&mut self) -> Result<String, SourceError>;
}

/// Serial port transport.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open `device` at `baud_rate`. Pseudo-terminals (e.g. an `obdsim`
    /// session) ignore the rate.
    pub fn open(device: &str, baud_rate: u32, timeout: Duration) -> Result<Self, SourceError> {
        let port = serialport::new(device, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|source| SourceError::Open { device: device.to_owned(), source })?;
        tracing::info!(device, baud_rate, "serial port opened");
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, command: &str) -> Result<(), SourceError> {
        // Drop anything left over from a previous timed-out exchange
        self.port.clear(ClearBuffer::Input).map_err(io::Error::from)?;
        self.port.write_all(command.as_bytes())?;
        self.port.write_all(b"\r")?;
        self.port.flush()?;
        Ok(())
    }

    fn read_until_prompt(&mut self) -> Result<String, SourceError> {
        let mut response = Vec::with_capacity(64);
        let mut buf = [0u8; 64];
        loop {
            match self.port.read(&mut buf) {
                Ok(0) => return Err(SourceError::Timeout),
                Ok(n) => {
                    response.extend_from_slice(&buf[..n]);
                    if let Some(pos) = response.iter().position(|&b| b == b'>') {
                        response.truncate(pos);
                        return Ok(String::from_utf8_lossy(&response).into_owned());
                    }
                    if response.len() > MAX_RESPONSE {
                        return Err(io::Error::new(io::ErrorKind::InvalidData, "no prompt in adapter response").into());
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut => return Err(SourceError::Timeout),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e.into()),
            }
        }
    }
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Pick the answer line out of a raw response: the last non-empty line that
/// is not the echoed command.
fn answer_line<'a>(response: &'a str, command: &str) -> Option<&'a str> {
    response
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|line| !line.is_empty() && *line != command)
        .last()
}

/// Parse the `n`th hex byte of a response line.
#[inline]
fn hex_byte(fields: &[&str], n: usize) -> Option<u8> { u8::from_str_radix(fields.get(n)?, 16).ok() }

/// Decode a response line for `channel` into a reading.
///
/// The line must echo the request header (mode + 0x40, PID) before the data
/// bytes, otherwise it is not an answer to this request.
pub fn decode_response(channel: Channel, line: &str) -> Reading {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let request: Vec<&str> = channel.command().split_whitespace().collect();

    let header_ok = match (hex_byte(&fields, 0), hex_byte(&fields, 1), hex_byte(&request, 0), hex_byte(&request, 1)) {
        (Some(mode), Some(pid), Some(req_mode), Some(req_pid)) => mode == req_mode.wrapping_add(0x40) && pid == req_pid,
        _ => false,
    };
    if !header_ok {
        return Reading::NoData;
    }

    let Some(a) = hex_byte(&fields, 2).map(f64::from) else {
        return Reading::NoData;
    };
    match channel {
        Channel::Coolant | Channel::OilTemp => Reading::Value(a - 40.0),
        // 3 kPa per count, 100 kPa per bar
        Channel::FuelPressure => Reading::Value(a * 0.03),
        Channel::AirFlow => match hex_byte(&fields, 3) {
            Some(b) => Reading::Value(a.mul_add(256.0, f64::from(b)) / 100.0),
            None => Reading::NoData,
        },
    }
}

// =============================================================================
// Value Source
// =============================================================================

/// Live readings from an ELM327 adapter.
pub struct ObdSource<T: Transport> {
    transport: T,
}

impl ObdSource<SerialTransport> {
    /// Open the serial device and reset the adapter session.
    pub fn open(device: &str, baud_rate: u32, timeout: Duration) -> Result<Self, SourceError> {
        Self::with_transport(SerialTransport::open(device, baud_rate, timeout)?)
    }
}

impl<T: Transport> ObdSource<T> {
    /// Wrap an open transport and reset the adapter session.
    pub fn with_transport(transport: T) -> Result<Self, SourceError> {
        let mut source = Self { transport };
        source.handshake()?;
        Ok(source)
    }

    fn handshake(&mut self) -> Result<(), SourceError> {
        for command in HANDSHAKE {
            self.transport
                .send(command)
                .and_then(|()| self.transport.read_until_prompt())
                .map_err(|e| SourceError::Handshake(format!("{command}: {e}")))?;
            tracing::debug!(command, "adapter acknowledged");
        }
        Ok(())
    }

    /// Send a request and return the answer line, if any.
    fn query(&mut self, command: &str) -> Result<Option<String>, SourceError> {
        self.transport.send(command)?;
        let response = self.transport.read_until_prompt()?;
        Ok(answer_line(&response, command).filter(|line| !line.contains("NO DATA")).map(str::to_owned))
    }
}

impl<T: Transport> ValueSource for ObdSource<T> {
    fn read(&mut self, channel: Channel) -> Result<Reading, SourceError> {
        let Some(line) = self.query(channel.command())? else {
            tracing::trace!(%channel, "no data");
            return Ok(Reading::NoData);
        };
        let reading = decode_response(channel, &line);
        tracing::trace!(%channel, line = %line, ?reading, "adapter answered");
        Ok(reading)
    }

    fn name(&self) -> &'static str { "obd" }
}

// =============================================================================
// Unit Tests
// =============================================================================
