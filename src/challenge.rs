//! Countdown challenge page
//!
//! A fixed window starts when the process starts. Until it closes the page
//! shows a countdown and the SHA-256 commitment of the secret; afterwards it
//! reveals the secret. Incoming payments are never checked, so the page has
//! no "paid" state.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::ChallengeConfig;

/// State of one challenge window
#[derive(Debug, Clone)]
pub struct Challenge {
    wallet: String,
    required_sol: f64,
    started_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    secret: String,
    secret_hash: String,
}

/// Body of `GET /challenge/status`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengeStatus {
    /// Window has closed
    pub expired: bool,
    /// Whole seconds until close, 0 once expired
    pub remaining_seconds: u64,
    /// SHA-256 hex of the secret
    pub secret_hash: String,
    /// Wallet named in the rules
    pub wallet: String,
    /// Amount named in the rules, SOL
    pub required_sol: f64,
}

impl Challenge {
    /// Start a window now
    pub fn new(config: &ChallengeConfig) -> Self {
        Self::starting_at(config, Utc::now())
    }

    /// Start a window at `started_at`
    pub fn starting_at(config: &ChallengeConfig, started_at: DateTime<Utc>) -> Self {
        let secret = config.resolve_secret();
        let secret_hash = hex::encode(Sha256::digest(secret.as_bytes()));
        let expires_at = TimeDelta::from_std(config.duration)
            .ok()
            .and_then(|window| started_at.checked_add_signed(window))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            wallet: config.wallet.clone(),
            required_sol: config.required_sol,
            started_at,
            expires_at,
            secret,
            secret_hash,
        }
    }

    /// SHA-256 hex of the secret
    pub fn secret_hash(&self) -> &str {
        &self.secret_hash
    }

    /// When the window closes
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Time left at `now`; zero once expired
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at() - now).to_std().unwrap_or(Duration::ZERO)
    }

    /// Status snapshot at `now`
    pub fn status(&self, now: DateTime<Utc>) -> ChallengeStatus {
        let remaining = self.remaining(now);
        ChallengeStatus {
            expired: remaining.is_zero(),
            remaining_seconds: remaining.as_secs(),
            secret_hash: self.secret_hash.clone(),
            wallet: self.wallet.clone(),
            required_sol: self.required_sol,
        }
    }

    /// Render the HTML page at `now`
    pub fn render(&self, now: DateTime<Utc>) -> String {
        let remaining = self.remaining(now);
        let expired = remaining.is_zero();
        let countdown = if expired {
            "EXPIRED".to_string()
        } else {
            format_countdown(remaining)
        };
        let timer_color = if expired { "#ff4444" } else { "#ffaa00" };

        let panel = if expired {
            format!(
                r#"<div class="secret"><h2>SECRET REVEALED</h2><p style="margin-top:15px">{}</p></div>"#,
                escape_html(&self.secret)
            )
        } else {
            r#"<div class="locked"><h2>SECRET LOCKED</h2><p>The clock is ticking. Pay or the secret drops.</p></div>"#
                .to_string()
        };

        let script = if expired {
            String::new()
        } else {
            format!(
                r"<script>
    const end = {end};
    setInterval(() => {{
      const r = end - Date.now();
      if (r <= 0) {{ document.getElementById('countdown').textContent = 'EXPIRED'; location.reload(); return; }}
      const h = Math.floor(r / 3600000);
      const m = Math.floor((r % 3600000) / 60000);
      const s = Math.floor((r % 60000) / 1000);
      document.getElementById('countdown').textContent = h + 'h ' + m + 'm ' + s + 's';
    }}, 1000);
  </script>",
                end = self.expires_at().timestamp_millis()
            )
        };

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <title>The Challenge</title>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <style>
    * {{ margin: 0; padding: 0; box-sizing: border-box; }}
    body {{ background: #0a0a0a; color: #e0e0e0; font-family: 'Courier New', monospace; min-height: 100vh; display: flex; justify-content: center; align-items: center; }}
    .container {{ max-width: 700px; padding: 40px; text-align: center; }}
    h1 {{ color: #00ff88; font-size: 2em; margin-bottom: 20px; }}
    .timer {{ font-size: 3em; color: {timer_color}; margin: 30px 0; font-weight: bold; }}
    .status {{ background: #1a1a2e; padding: 20px; border-radius: 10px; margin: 20px 0; border: 1px solid #333; }}
    .hash {{ word-break: break-all; color: #888; font-size: 0.8em; margin: 10px 0; }}
    .secret {{ background: #001a00; border: 2px solid #00ff88; padding: 20px; border-radius: 10px; margin: 20px 0; color: #00ff88; text-align: left; line-height: 1.6; }}
    .locked {{ background: #1a0000; border: 2px solid #ff4444; padding: 20px; border-radius: 10px; margin: 20px 0; }}
    .info {{ color: #888; font-size: 0.9em; margin: 10px 0; }}
    .wallet {{ color: #ffaa00; word-break: break-all; }}
  </style>
</head>
<body>
  <div class="container">
    <h1>THE CHALLENGE</h1>
    <div class="timer" id="countdown">{countdown}</div>
    <div class="status">
      <p><strong>Rules:</strong> If exactly <strong>{required} SOL</strong> reaches the wallet below within the window, the secret stays locked. If not, it's revealed.</p>
      <p class="wallet" style="margin-top:15px">{wallet}</p>
    </div>
    <div class="info">
      <p>Challenge started: {started}</p>
      <p>Expires: {expires}</p>
      <p>Secret SHA-256 hash (verify later):</p>
      <p class="hash">{hash}</p>
    </div>
    {panel}
  </div>
  {script}
</body>
</html>"#,
            required = self.required_sol,
            wallet = escape_html(&self.wallet),
            started = iso_millis(self.started_at),
            expires = iso_millis(self.expires_at()),
            hash = self.secret_hash,
        )
    }
}

/// "{h}h {m}m {s}s"
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}

fn iso_millis(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
