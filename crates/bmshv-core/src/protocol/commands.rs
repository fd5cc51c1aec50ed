//! BMS Command Tokens
//!
//! Commands are short ASCII tokens of the form `!<CATEGORY>-<ACTION>@`,
//! for example `!C-ON@` to start charging or `!I-12@` to set the charge
//! current to 12 A. The token bound to each user action comes from the
//! [`CommandTokens`] table so front-ends for other firmware revisions can
//! remap them.

use crate::error::{ConfigError, ProtocolError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const TOKEN_START: char = '!';
const TOKEN_END: char = '@';
const TOKEN_SEPARATOR: char = '-';

/// Charge current set points supported by the charger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChargeCurrent {
    OneAmp,
    TwoAmps,
    FourAmps,
    EightAmps,
    TwelveAmps,
}

impl ChargeCurrent {
    /// All set points in ascending order
    pub const ALL: [ChargeCurrent; 5] = [
        ChargeCurrent::OneAmp,
        ChargeCurrent::TwoAmps,
        ChargeCurrent::FourAmps,
        ChargeCurrent::EightAmps,
        ChargeCurrent::TwelveAmps,
    ];

    /// Current in amperes
    pub fn amps(&self) -> u8 {
        match self {
            Self::OneAmp => 1,
            Self::TwoAmps => 2,
            Self::FourAmps => 4,
            Self::EightAmps => 8,
            Self::TwelveAmps => 12,
        }
    }
}

/// Operator actions that send a command to the BMS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserAction {
    /// Tell the BMS the pack is full (force SoC to 100%)
    FullBatterySoc,
    /// Enable the charger
    StartCharging,
    /// Disable the charger
    StopCharging,
    /// Enable cell balancing
    StartBalance,
    /// Disable cell balancing
    StopBalance,
    /// Change the charge current set point
    SetChargeCurrent(ChargeCurrent),
}

impl UserAction {
    /// All actions in control-panel order
    pub const ALL: [UserAction; 10] = [
        UserAction::FullBatterySoc,
        UserAction::StartCharging,
        UserAction::StopCharging,
        UserAction::StartBalance,
        UserAction::StopBalance,
        UserAction::SetChargeCurrent(ChargeCurrent::OneAmp),
        UserAction::SetChargeCurrent(ChargeCurrent::TwoAmps),
        UserAction::SetChargeCurrent(ChargeCurrent::FourAmps),
        UserAction::SetChargeCurrent(ChargeCurrent::EightAmps),
        UserAction::SetChargeCurrent(ChargeCurrent::TwelveAmps),
    ];

    /// Button label
    pub fn label(&self) -> String {
        match self {
            Self::FullBatterySoc => "Full Battery Soc".to_string(),
            Self::StartCharging => "Start Charging".to_string(),
            Self::StopCharging => "Stop Charging".to_string(),
            Self::StartBalance => "Start Balance".to_string(),
            Self::StopBalance => "Stop Balance".to_string(),
            Self::SetChargeCurrent(current) => {
                format!("Set Charge Current to {}A", current.amps())
            }
        }
    }

    /// Short key used on the console
    pub fn key(&self) -> String {
        match self {
            Self::FullBatterySoc => "full-soc".to_string(),
            Self::StartCharging => "start-charging".to_string(),
            Self::StopCharging => "stop-charging".to_string(),
            Self::StartBalance => "start-balance".to_string(),
            Self::StopBalance => "stop-balance".to_string(),
            Self::SetChargeCurrent(current) => format!("current-{}a", current.amps()),
        }
    }
}

impl fmt::Display for UserAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

fn normalize(text: &str) -> String {
    text.trim()
        .to_ascii_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

impl FromStr for UserAction {
    type Err = ProtocolError;

    /// Accepts either the console key (`start-charging`) or the button label
    /// (`Start Charging`), ignoring case and separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        UserAction::ALL
            .into_iter()
            .find(|action| {
                normalize(&action.key()) == wanted || normalize(&action.label()) == wanted
            })
            .ok_or_else(|| ProtocolError::UnknownAction {
                input: s.trim().to_string(),
            })
    }
}

/// A validated command token ready to be written to the link
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutboundCommand(String);

impl OutboundCommand {
    /// Validate a token of the form `!<CATEGORY>-<ACTION>@`
    pub fn parse(token: &str) -> Result<Self, ProtocolError> {
        let invalid = |reason: &'static str| ProtocolError::InvalidToken {
            token: token.to_string(),
            reason,
        };

        let inner = token
            .strip_prefix(TOKEN_START)
            .ok_or_else(|| invalid("must start with '!'"))?
            .strip_suffix(TOKEN_END)
            .ok_or_else(|| invalid("must end with '@'"))?;
        let (category, action) = inner
            .split_once(TOKEN_SEPARATOR)
            .ok_or_else(|| invalid("missing '-' between category and action"))?;

        if category.is_empty() || action.is_empty() {
            return Err(invalid("category and action must not be empty"));
        }
        if !category
            .chars()
            .chain(action.chars())
            .all(|c| c.is_ascii_alphanumeric())
        {
            return Err(invalid("category and action must be ASCII alphanumeric"));
        }

        Ok(Self(token.to_string()))
    }

    /// The token text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The token as UTF-8 bytes for the link
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for OutboundCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Token bound to each user action, plus the keep-alive probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandTokens {
    pub full_soc: String,
    pub start_charging: String,
    pub stop_charging: String,
    pub start_balance: String,
    pub stop_balance: String,
    pub current_1a: String,
    pub current_2a: String,
    pub current_4a: String,
    pub current_8a: String,
    pub current_12a: String,
    pub keep_alive: String,
}

impl Default for CommandTokens {
    fn default() -> Self {
        Self {
            full_soc: "!B-FC@".to_string(),
            start_charging: "!C-ON@".to_string(),
            stop_charging: "!C-OF@".to_string(),
            start_balance: "!B-ON@".to_string(),
            stop_balance: "!B-OF@".to_string(),
            current_1a: "!I-1A@".to_string(),
            current_2a: "!I-2A@".to_string(),
            current_4a: "!I-4A@".to_string(),
            current_8a: "!I-8A@".to_string(),
            current_12a: "!I-12@".to_string(),
            keep_alive: "!C-CC@".to_string(),
        }
    }
}

impl CommandTokens {
    /// Raw token for an action
    pub fn token(&self, action: UserAction) -> &str {
        match action {
            UserAction::FullBatterySoc => &self.full_soc,
            UserAction::StartCharging => &self.start_charging,
            UserAction::StopCharging => &self.stop_charging,
            UserAction::StartBalance => &self.start_balance,
            UserAction::StopBalance => &self.stop_balance,
            UserAction::SetChargeCurrent(ChargeCurrent::OneAmp) => &self.current_1a,
            UserAction::SetChargeCurrent(ChargeCurrent::TwoAmps) => &self.current_2a,
            UserAction::SetChargeCurrent(ChargeCurrent::FourAmps) => &self.current_4a,
            UserAction::SetChargeCurrent(ChargeCurrent::EightAmps) => &self.current_8a,
            UserAction::SetChargeCurrent(ChargeCurrent::TwelveAmps) => &self.current_12a,
        }
    }

    /// Validated command for an action
    pub fn command(&self, action: UserAction) -> Result<OutboundCommand, ProtocolError> {
        OutboundCommand::parse(self.token(action))
    }

    /// Validated keep-alive command
    pub fn keep_alive_command(&self) -> Result<OutboundCommand, ProtocolError> {
        OutboundCommand::parse(&self.keep_alive)
    }

    /// Check every token in the table
    pub fn validate(&self) -> Result<(), ConfigError> {
        for action in UserAction::ALL {
            self.command(action)
                .map_err(|source| ConfigError::InvalidCommandToken {
                    action: action.key(),
                    source,
                })?;
        }
        self.keep_alive_command()
            .map_err(|source| ConfigError::InvalidCommandToken {
                action: "keep-alive".to_string(),
                source,
            })?;
        Ok(())
    }
}
