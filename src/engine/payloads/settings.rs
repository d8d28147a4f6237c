// Evolution Client: Instance-level payloads
// Labels, privacy, proxy, behaviour settings, templates, socket config, calls.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::atoms::constants::{
    DEFAULT_CALL_DURATION_SECS, PRIVACY_AUDIENCE, PRIVACY_GROUPADD, PRIVACY_ONLINE, PRIVACY_READRECEIPTS,
};
use crate::atoms::error::{EvolutionError, EvolutionResult};

// ── Instance creation ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Webhook {
    pub url: String,
    pub events: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstance {
    pub instance_name: String,
    pub token: String,
    pub qrcode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<Webhook>,
}

// ── Labels ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelAction {
    Add,
    Remove,
}

impl LabelAction {
    pub fn as_str(self) -> &'static str {
        match self {
            LabelAction::Add => "add",
            LabelAction::Remove => "remove",
        }
    }
}

impl fmt::Display for LabelAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelAction {
    type Err = EvolutionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(LabelAction::Add),
            "remove" => Ok(LabelAction::Remove),
            other => Err(EvolutionError::validation(format!(
                "invalid label action '{}': expected 'add' or 'remove'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandleLabel {
    pub number: String,
    pub label_id: String,
    pub action: LabelAction,
}

// ── Privacy ────────────────────────────────────────────────────────────

/// Who may see or do what. Values are checked by [`PrivacySettings::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacySettings {
    pub readreceipts: String,
    pub profile: String,
    pub status: String,
    pub online: String,
    pub last: String,
    pub groupadd: String,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        PrivacySettings {
            readreceipts: "all".into(),
            profile: "all".into(),
            status: "contacts".into(),
            online: "all".into(),
            last: "contacts".into(),
            groupadd: "contacts".into(),
        }
    }
}

impl PrivacySettings {
    pub fn validate(&self) -> EvolutionResult<()> {
        check_choice("readreceipts", &self.readreceipts, PRIVACY_READRECEIPTS)?;
        check_choice("profile", &self.profile, PRIVACY_AUDIENCE)?;
        check_choice("status", &self.status, PRIVACY_AUDIENCE)?;
        check_choice("online", &self.online, PRIVACY_ONLINE)?;
        check_choice("last", &self.last, PRIVACY_AUDIENCE)?;
        check_choice("groupadd", &self.groupadd, PRIVACY_GROUPADD)
    }
}

fn check_choice(field: &str, value: &str, allowed: &[&str]) -> EvolutionResult<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(EvolutionError::validation(format!(
        "invalid value '{}' for {}: expected one of {}",
        value,
        field,
        allowed.join(", ")
    )))
}

// ── Proxy ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub enabled: bool,
    pub host: String,
    /// Sent as a string; the service rejects numeric ports.
    pub port: String,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ProxyConfig {
    pub fn new(host: impl Into<String>, port: u16, protocol: impl Into<String>) -> Self {
        ProxyConfig {
            enabled: true,
            host: host.into(),
            port: port.to_string(),
            protocol: protocol.into(),
            username: None,
            password: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

// ── Behaviour settings ─────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSettings {
    pub reject_call: bool,
    pub groups_ignore: bool,
    pub always_online: bool,
    pub read_messages: bool,
    pub sync_full_history: bool,
    pub read_status: bool,
    /// Auto-reply sent when a call is rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg_call: Option<String>,
}

// ── Templates ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    pub name: String,
    pub category: String,
    pub allow_category_change: bool,
    pub language: String,
    pub components: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

// ── Event socket ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebSocketConfig {
    pub enabled: bool,
    pub events: Vec<String>,
}

// ── Calls ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOffer {
    pub number: String,
    pub is_video: bool,
    pub call_duration: u32,
}

impl CallOffer {
    pub fn voice(number: impl Into<String>) -> Self {
        CallOffer { number: number.into(), is_video: false, call_duration: DEFAULT_CALL_DURATION_SECS }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn label_action_parses_only_add_and_remove() {
        assert_eq!("add".parse::<LabelAction>().unwrap(), LabelAction::Add);
        assert_eq!("remove".parse::<LabelAction>().unwrap(), LabelAction::Remove);
        assert!("delete".parse::<LabelAction>().unwrap_err().is_validation());
        assert!("ADD".parse::<LabelAction>().is_err());
    }

    #[test]
    fn handle_label_body_is_camel_case() {
        let body = HandleLabel { number: "5511999999999@c.us".into(), label_id: "L1".into(), action: LabelAction::Add };
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({"number": "5511999999999@c.us", "labelId": "L1", "action": "add"})
        );
    }

    #[test]
    fn default_privacy_settings_are_valid() {
        assert!(PrivacySettings::default().validate().is_ok());
    }

    #[test]
    fn privacy_vocabularies_differ_per_field() {
        let online_none = PrivacySettings { online: "none".into(), ..Default::default() };
        assert!(online_none.validate().unwrap_err().is_validation());

        let groupadd_none = PrivacySettings { groupadd: "none".into(), ..Default::default() };
        assert!(groupadd_none.validate().is_err());

        let last_none = PrivacySettings { last: "none".into(), ..Default::default() };
        assert!(last_none.validate().is_ok());
    }

    #[test]
    fn proxy_port_is_a_string() {
        let proxy = ProxyConfig::new("proxy.local", 3128, "http");
        let value = serde_json::to_value(&proxy).unwrap();
        assert_eq!(value, json!({"enabled": true, "host": "proxy.local", "port": "3128", "protocol": "http"}));

        let value = serde_json::to_value(proxy.with_credentials("u", "p")).unwrap();
        assert_eq!(value["username"], "u");
        assert_eq!(value["password"], "p");
    }

    #[test]
    fn settings_omit_msg_call_when_unset() {
        let value = serde_json::to_value(InstanceSettings { reject_call: true, ..Default::default() }).unwrap();
        assert_eq!(
            value,
            json!({
                "rejectCall": true,
                "groupsIgnore": false,
                "alwaysOnline": false,
                "readMessages": false,
                "syncFullHistory": false,
                "readStatus": false,
            })
        );
    }

    #[test]
    fn voice_call_defaults() {
        assert_eq!(
            serde_json::to_value(CallOffer::voice("5511999999999@c.us")).unwrap(),
            json!({"number": "5511999999999@c.us", "isVideo": false, "callDuration": 45})
        );
    }
}
