//! Phone pairing for the trolley: a short-lived QR payload and the connection
//! state shown on the navigation bar.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const PAIRING_TTL_SECS: u32 = 180;
pub const SERVICE_UUID: &str = "ble-smart-trolley";
const TOKEN_LEN: usize = 12;
const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const URGENT_BELOW_SECS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PairingData {
    pub trolley_id: String,
    pub pairing_token: String,
    pub service_uuid: String,
    pub timestamp: i64,
    pub expires_at: i64,
}

impl PairingData {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, now: DateTime<Utc>) -> Self {
        let lane: u32 = rng.gen_range(0..100);
        let pairing_token: String = (0..TOKEN_LEN)
            .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
            .collect();
        let timestamp = now.timestamp();

        Self {
            trolley_id: format!("TRL-402-{lane:02}"),
            pairing_token,
            service_uuid: SERVICE_UUID.to_string(),
            timestamp,
            expires_at: timestamp + i64::from(PAIRING_TTL_SECS),
        }
    }

    /// Text encoded into the QR code.
    pub fn qr_payload(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    QrDisplay,
    Connecting,
    Connected,
    Error,
}

impl ConnectionState {
    /// Colour and icon classes of the navigation entry.
    pub fn icon(self) -> (&'static str, &'static str) {
        match self {
            ConnectionState::Disconnected => ("text-gray-400", "fa-bluetooth"),
            ConnectionState::QrDisplay | ConnectionState::Connecting => {
                ("text-blue-500", "fa-bluetooth-b")
            }
            ConnectionState::Connected => ("text-green-500", "fa-check-circle"),
            ConnectionState::Error => ("text-orange-500", "fa-exclamation-triangle"),
        }
    }
}

/// Result of a simulated handshake: how long it takes and whether it works.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairingAttempt {
    pub delay: Duration,
    pub succeeds: bool,
}

impl PairingAttempt {
    /// 2–5 s handshake, nine in ten succeed.
    pub fn simulate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            delay: Duration::from_millis(rng.gen_range(2_000..5_000)),
            succeeds: rng.gen_bool(0.9),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PairingSession {
    state: ConnectionState,
    data: Option<PairingData>,
    seconds_left: u32,
}

impl PairingSession {
    /// Restores the navigation state from the session flag.
    pub fn restored(phone_connected: bool) -> Self {
        Self {
            state: if phone_connected {
                ConnectionState::Connected
            } else {
                ConnectionState::Disconnected
            },
            ..Self::default()
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn data(&self) -> Option<&PairingData> {
        self.data.as_ref()
    }

    pub fn open<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) -> &PairingData {
        self.state = ConnectionState::QrDisplay;
        self.refresh(rng, now)
    }

    pub fn refresh<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) -> &PairingData {
        self.seconds_left = PAIRING_TTL_SECS;
        self.data.insert(PairingData::generate(rng, now))
    }

    /// One second of the QR countdown. At zero a fresh code is issued;
    /// returns whether that happened.
    pub fn tick_second<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) -> bool {
        if self.state != ConnectionState::QrDisplay {
            return false;
        }
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left == 0 {
            self.refresh(rng, now);
            return true;
        }
        false
    }

    pub fn countdown_label(&self) -> String {
        format!("{}:{:02}", self.seconds_left / 60, self.seconds_left % 60)
    }

    pub fn countdown_class(&self) -> &'static str {
        if self.seconds_left < URGENT_BELOW_SECS {
            "text-red-600"
        } else {
            "text-orange-600"
        }
    }

    /// The phone scanned the code. Only meaningful while the code is shown.
    pub fn begin_connecting(&mut self) -> bool {
        if self.state != ConnectionState::QrDisplay {
            return false;
        }
        self.state = ConnectionState::Connecting;
        true
    }

    pub fn finish(&mut self, succeeded: bool) {
        if self.state == ConnectionState::Connecting {
            self.state = if succeeded {
                ConnectionState::Connected
            } else {
                ConnectionState::Error
            };
        }
    }

    pub fn retry<R: Rng + ?Sized>(&mut self, rng: &mut R, now: DateTime<Utc>) {
        self.open(rng, now);
    }

    /// Closing the dialog keeps an established connection only.
    pub fn close(&mut self) {
        if self.state != ConnectionState::Connected {
            self.state = ConnectionState::Disconnected;
        }
        self.seconds_left = 0;
    }
}
