//! Configuration types and structures.
//!
//! Field keys follow the YAML spelling (`firstCheckNotif`, `webhookURL`, ...);
//! upper-casing a key gives its environment variable segment. String and
//! number leaves use their zero value for "not set", booleans use [`TriBool`]
//! and durations use `Option`.

use super::tribool::TriBool;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub db: Db,

    #[serde(default)]
    pub watch: Watch,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notif: Option<Notif>,

    /// Registry options, in matching priority order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regopts: Vec<RegOpt>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub providers: Option<Providers>,
}

/// Database configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Db {
    /// Path to the bolt-style database file.
    #[serde(default)]
    pub path: String,
}

/// Scheduling parameters for the watcher.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct Watch {
    /// Maximum number of images analyzed concurrently.
    #[serde(default)]
    pub workers: i64,

    /// Cron expression driving each run.
    #[serde(default)]
    pub schedule: String,

    /// Send a notification the first time an image is analyzed.
    #[serde(default, skip_serializing_if = "TriBool::is_unset")]
    pub first_check_notif: TriBool,
}

/// Notification channels. Each channel is present only when configured.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Notif {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amqp: Option<NotifAmqp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<NotifDiscord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gotify: Option<NotifGotify>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mail: Option<NotifMail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<NotifMatrix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rocketchat: Option<NotifRocketChat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<NotifScript>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slack: Option<NotifSlack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<NotifTeams>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram: Option<NotifTelegram>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook: Option<NotifWebhook>,
}

impl Notif {
    /// Names of the configured channels, in declaration order.
    pub fn channels(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut push = |present: bool, name: &'static str| {
            if present {
                names.push(name);
            }
        };
        push(self.amqp.is_some(), "amqp");
        push(self.discord.is_some(), "discord");
        push(self.gotify.is_some(), "gotify");
        push(self.mail.is_some(), "mail");
        push(self.matrix.is_some(), "matrix");
        push(self.rocketchat.is_some(), "rocketchat");
        push(self.script.is_some(), "script");
        push(self.slack.is_some(), "slack");
        push(self.teams.is_some(), "teams");
        push(self.telegram.is_some(), "telegram");
        push(self.webhook.is_some(), "webhook");
        names
    }

    pub fn is_empty(&self) -> bool {
        self.channels().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct NotifAmqp {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(default, skip_serializing_if = "is_zero_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username_file: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password_file: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub exchange: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub queue: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct NotifDiscord {
    #[serde(default, rename = "webhookURL", skip_serializing_if = "String::is_empty")]
    pub webhook_url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mentions: Vec<String>,
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct NotifGotify {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(default)]
    pub priority: i64,
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct NotifMail {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub host: String,
    #[serde(default, skip_serializing_if = "is_zero_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "TriBool::is_unset")]
    pub ssl: TriBool,
    #[serde(default, skip_serializing_if = "TriBool::is_unset")]
    pub insecure_skip_verify: TriBool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub local_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username_file: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password_file: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub from: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub to: String,
}

/// Message type used when posting to a Matrix room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixMsgType {
    Notice,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct NotifMatrix {
    #[serde(default, rename = "homeserverURL", skip_serializing_if = "String::is_empty")]
    pub homeserver_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password_file: String,
    #[serde(default, rename = "roomID", skip_serializing_if = "String::is_empty")]
    pub room_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msg_type: Option<MatrixMsgType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct NotifRocketChat {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub channel: String,
    #[serde(default, rename = "userID", skip_serializing_if = "String::is_empty")]
    pub user_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifScript {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cmd: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifSlack {
    #[serde(default, rename = "webhookURL", skip_serializing_if = "String::is_empty")]
    pub webhook_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifTeams {
    #[serde(default, rename = "webhookURL", skip_serializing_if = "String::is_empty")]
    pub webhook_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifTelegram {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(default, rename = "chatIDs", skip_serializing_if = "Vec::is_empty")]
    pub chat_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotifWebhook {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

/// How a registry option is matched against a watched image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegOptSelector {
    /// Match on the registry option name.
    Name,
    /// Match when the image reference starts with the name.
    Image,
}

/// Registry options for one registry (or image prefix).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RegOpt {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<RegOptSelector>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub username_file: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub password_file: String,
    #[serde(default, rename = "insecureTLS", skip_serializing_if = "TriBool::is_unset")]
    pub insecure_tls: TriBool,
    #[serde(
        default,
        with = "humantime_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
}

/// Image providers. Each provider is present only when configured.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Providers {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docker: Option<PrdDocker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swarm: Option<PrdSwarm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes: Option<PrdKubernetes>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PrdFile>,
}

impl Providers {
    /// Names of the enabled providers, in declaration order.
    pub fn enabled(&self) -> Vec<&'static str> {
        [
            (self.docker.is_some(), "docker"),
            (self.swarm.is_some(), "swarm"),
            (self.kubernetes.is_some(), "kubernetes"),
            (self.file.is_some(), "file"),
        ]
        .into_iter()
        .filter_map(|(present, name)| present.then_some(name))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PrdDocker {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tls_certs_path: String,
    #[serde(default, skip_serializing_if = "TriBool::is_unset")]
    pub tls_verify: TriBool,
    #[serde(default, skip_serializing_if = "TriBool::is_unset")]
    pub watch_by_default: TriBool,
    #[serde(default, skip_serializing_if = "TriBool::is_unset")]
    pub watch_stopped: TriBool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PrdSwarm {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tls_certs_path: String,
    #[serde(default, skip_serializing_if = "TriBool::is_unset")]
    pub tls_verify: TriBool,
    #[serde(default, skip_serializing_if = "TriBool::is_unset")]
    pub watch_by_default: TriBool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct PrdKubernetes {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub endpoint: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token_file: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cert_auth_file_path: String,
    #[serde(default, skip_serializing_if = "TriBool::is_unset")]
    pub tls_insecure: TriBool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub namespaces: Vec<String>,
    #[serde(default, skip_serializing_if = "TriBool::is_unset")]
    pub watch_by_default: TriBool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrdFile {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub filename: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub directory: String,
}

fn is_zero_port(port: &u16) -> bool {
    *port == 0
}
