use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// One ONU reported by the backend for a queried client
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceRecord {
    #[serde(default)]
    pub description: String,
    pub olt_ip: String,
    pub fsp: String,
    #[serde(deserialize_with = "string_or_number")]
    pub ont_id: String,
    #[serde(default)]
    pub run_state: Option<String>,
    #[serde(default)]
    pub rx_power: Option<RxPower>,
    #[serde(default)]
    pub alarm: Option<String>,
    #[serde(default)]
    pub sn: Option<String>,
}

impl DeviceRecord {
    pub fn key(&self) -> OnuKey {
        OnuKey {
            olt_ip: self.olt_ip.clone(),
            fsp: self.fsp.clone(),
            ont_id: self.ont_id.clone(),
        }
    }
}

// Optical receive level, sent as a number by the backend but tolerated as text
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RxPower {
    Dbm(f64),
    Text(String),
}

impl fmt::Display for RxPower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RxPower::Dbm(value) => write!(f, "{}", value),
            RxPower::Text(text) => f.write_str(text),
        }
    }
}

/// Identity of a terminal on its OLT: line terminal, attachment point and index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OnuKey {
    pub olt_ip: String,
    pub fsp: String,
    pub ont_id: String,
}

impl OnuKey {
    /// Composite form understood by the backend: `olt_ip,fsp ont_id`.
    pub fn legacy_id(&self) -> String {
        format!("{},{} {}", self.olt_ip, self.fsp, self.ont_id)
    }
}

impl fmt::Display for OnuKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.legacy_id())
    }
}

// Enum to represent the rendered status of a terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Online,
    Offline,
    Other,
}

impl StatusClass {
    pub fn from_run_state(run_state: Option<&str>) -> Self {
        match run_state {
            Some("online") => StatusClass::Online,
            Some("offline") => StatusClass::Offline,
            _ => StatusClass::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusClass::Online => "online",
            StatusClass::Offline => "offline",
            StatusClass::Other => "other",
        }
    }
}

/// Result of a status query once the transport has classified the body.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Empty,
    Records(Vec<DeviceRecord>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub olt: String,
    pub cliente: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnuCommandRequest {
    pub onu: String,
    pub olt_ip: String,
    pub fsp: String,
    pub ont_id: String,
}

impl From<&OnuKey> for OnuCommandRequest {
    fn from(key: &OnuKey) -> Self {
        Self {
            onu: key.legacy_id(),
            olt_ip: key.olt_ip.clone(),
            fsp: key.fsp.clone(),
            ont_id: key.ont_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnlockResult {
    pub status: String,
    #[serde(default)]
    pub mensagem: Option<String>,
}

impl UnlockResult {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

// Commands the backend can run against a selected terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnuCommand {
    Unlock,
    Reboot,
}

impl OnuCommand {
    pub fn path(&self) -> &'static str {
        match self {
            OnuCommand::Unlock => "/olt/unlocked/",
            OnuCommand::Reboot => "/olt/reboot/",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OnuCommand::Unlock => "unlock",
            OnuCommand::Reboot => "reboot",
        }
    }

    pub fn success_text(&self) -> &'static str {
        match self {
            OnuCommand::Unlock => "Liberação da ONU foi realizada.",
            OnuCommand::Reboot => "Reboot da ONU foi realizado.",
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Int(value) => value.to_string(),
        Raw::Float(value) => value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_accepts_numeric_and_textual_ont_id() {
        let numeric: DeviceRecord = serde_json::from_value(json!({
            "description": "Maria Silva", "olt_ip": "10.0.0.1", "fsp": "0/1/2",
            "ont_id": 3, "run_state": "online", "rx_power": -18.3, "alarm": null, "sn": "ABC123"
        }))
        .unwrap();
        let textual: DeviceRecord = serde_json::from_value(json!({
            "olt_ip": "10.0.0.1", "fsp": "0/1/2", "ont_id": "3"
        }))
        .unwrap();

        assert_eq!(numeric.ont_id, "3");
        assert_eq!(textual.ont_id, "3");
        assert_eq!(textual.description, "");
        assert_eq!(textual.run_state, None);
        assert_eq!(numeric.rx_power, Some(RxPower::Dbm(-18.3)));
    }

    #[test]
    fn rx_power_keeps_text_verbatim() {
        let record: DeviceRecord = serde_json::from_value(json!({
            "olt_ip": "10.0.0.1", "fsp": "0/1/2", "ont_id": 3, "rx_power": "-18.3"
        }))
        .unwrap();
        assert_eq!(record.rx_power.unwrap().to_string(), "-18.3");
    }

    #[test]
    fn key_renders_legacy_composite() {
        let key = OnuKey {
            olt_ip: "10.0.0.1".into(),
            fsp: "0/1/2".into(),
            ont_id: "3".into(),
        };
        assert_eq!(key.legacy_id(), "10.0.0.1,0/1/2 3");

        let body = serde_json::to_value(OnuCommandRequest::from(&key)).unwrap();
        assert_eq!(
            body,
            json!({ "onu": "10.0.0.1,0/1/2 3", "olt_ip": "10.0.0.1", "fsp": "0/1/2", "ont_id": "3" })
        );
    }

    #[test]
    fn status_class_only_matches_exact_states() {
        assert_eq!(StatusClass::from_run_state(Some("online")), StatusClass::Online);
        assert_eq!(StatusClass::from_run_state(Some("offline")), StatusClass::Offline);
        assert_eq!(StatusClass::from_run_state(Some("Online")), StatusClass::Other);
        assert_eq!(StatusClass::from_run_state(Some("")), StatusClass::Other);
        assert_eq!(StatusClass::from_run_state(None), StatusClass::Other);
    }

    #[test]
    fn unlock_result_status_must_be_exactly_ok() {
        let ok: UnlockResult = serde_json::from_value(json!({ "status": "ok" })).unwrap();
        let failed: UnlockResult =
            serde_json::from_value(json!({ "status": "erro", "mensagem": "timeout" })).unwrap();
        assert!(ok.is_ok());
        assert!(!failed.is_ok());
        assert_eq!(failed.mensagem.as_deref(), Some("timeout"));
    }
}
