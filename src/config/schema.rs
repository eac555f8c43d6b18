//! Static field table for the configuration tree.
//!
//! Every field of [`Config`](super::Config) appears here once with its YAML
//! key and the way a flat environment value is coerced into it. The
//! environment binder and the env renderer both walk this table; nothing
//! inspects the Rust types at runtime. Keys must match the serde names in
//! `types.rs` exactly.

/// How a raw environment string is turned into a document value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Bool,
    Int,
    Port,
    Duration,
    /// Comma-separated strings.
    StringList,
    /// Comma-separated integers.
    IntList,
    /// One of a fixed set of lower-case words.
    Choice(&'static [&'static str]),
}

impl Kind {
    /// Human readable type name used in coercion errors.
    pub fn expected(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Bool => "boolean (true or false)",
            Kind::Int => "integer",
            Kind::Port => "port number (0-65535)",
            Kind::Duration => "duration (e.g. 10s, 1m30s)",
            Kind::StringList => "comma-separated strings",
            Kind::IntList => "comma-separated integers",
            Kind::Choice(_) => "one of the allowed values",
        }
    }
}

/// Shape of a node in the configuration tree.
#[derive(Debug, Clone, Copy)]
pub enum Node {
    Leaf(Kind),
    /// Always present; defaults fill its leaves.
    Section(&'static [Field]),
    /// Absent until some source mentions it.
    Optional(&'static [Field]),
    /// Ordered list of structs, addressed by index.
    List(&'static [Field]),
    /// String-keyed map of scalars.
    Map(Kind),
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub key: &'static str,
    pub node: Node,
}

impl Field {
    const fn leaf(key: &'static str, kind: Kind) -> Self {
        Self {
            key,
            node: Node::Leaf(kind),
        }
    }

    const fn new(key: &'static str, node: Node) -> Self {
        Self { key, node }
    }

    /// Environment segment for this field.
    pub fn segment(&self) -> String {
        self.key.to_ascii_uppercase()
    }
}

/// Find the field whose key matches an environment segment, ignoring case.
pub fn lookup<'a>(fields: &'a [Field], segment: &str) -> Option<&'a Field> {
    fields.iter().find(|f| f.key.eq_ignore_ascii_case(segment))
}

const SELECTORS: &[&str] = &["name", "image"];
const MSG_TYPES: &[&str] = &["notice", "text"];

const DB: &[Field] = &[Field::leaf("path", Kind::String)];

const WATCH: &[Field] = &[
    Field::leaf("workers", Kind::Int),
    Field::leaf("schedule", Kind::String),
    Field::leaf("firstCheckNotif", Kind::Bool),
];

const AMQP: &[Field] = &[
    Field::leaf("host", Kind::String),
    Field::leaf("port", Kind::Port),
    Field::leaf("username", Kind::String),
    Field::leaf("usernameFile", Kind::String),
    Field::leaf("password", Kind::String),
    Field::leaf("passwordFile", Kind::String),
    Field::leaf("exchange", Kind::String),
    Field::leaf("queue", Kind::String),
];

const DISCORD: &[Field] = &[
    Field::leaf("webhookURL", Kind::String),
    Field::leaf("mentions", Kind::StringList),
    Field::leaf("timeout", Kind::Duration),
];

const GOTIFY: &[Field] = &[
    Field::leaf("endpoint", Kind::String),
    Field::leaf("token", Kind::String),
    Field::leaf("priority", Kind::Int),
    Field::leaf("timeout", Kind::Duration),
];

const MAIL: &[Field] = &[
    Field::leaf("host", Kind::String),
    Field::leaf("port", Kind::Port),
    Field::leaf("ssl", Kind::Bool),
    Field::leaf("insecureSkipVerify", Kind::Bool),
    Field::leaf("localName", Kind::String),
    Field::leaf("username", Kind::String),
    Field::leaf("usernameFile", Kind::String),
    Field::leaf("password", Kind::String),
    Field::leaf("passwordFile", Kind::String),
    Field::leaf("from", Kind::String),
    Field::leaf("to", Kind::String),
];

const MATRIX: &[Field] = &[
    Field::leaf("homeserverURL", Kind::String),
    Field::leaf("user", Kind::String),
    Field::leaf("password", Kind::String),
    Field::leaf("passwordFile", Kind::String),
    Field::leaf("roomID", Kind::String),
    Field::leaf("msgType", Kind::Choice(MSG_TYPES)),
];

const ROCKETCHAT: &[Field] = &[
    Field::leaf("endpoint", Kind::String),
    Field::leaf("channel", Kind::String),
    Field::leaf("userID", Kind::String),
    Field::leaf("token", Kind::String),
    Field::leaf("timeout", Kind::Duration),
];

const SCRIPT: &[Field] = &[
    Field::leaf("cmd", Kind::String),
    Field::leaf("args", Kind::StringList),
    Field::leaf("dir", Kind::String),
];

const WEBHOOK_URL_ONLY: &[Field] = &[Field::leaf("webhookURL", Kind::String)];

const TELEGRAM: &[Field] = &[
    Field::leaf("token", Kind::String),
    Field::leaf("chatIDs", Kind::IntList),
];

const WEBHOOK: &[Field] = &[
    Field::leaf("endpoint", Kind::String),
    Field::leaf("method", Kind::String),
    Field::new("headers", Node::Map(Kind::String)),
    Field::leaf("timeout", Kind::Duration),
];

const NOTIF: &[Field] = &[
    Field::new("amqp", Node::Optional(AMQP)),
    Field::new("discord", Node::Optional(DISCORD)),
    Field::new("gotify", Node::Optional(GOTIFY)),
    Field::new("mail", Node::Optional(MAIL)),
    Field::new("matrix", Node::Optional(MATRIX)),
    Field::new("rocketchat", Node::Optional(ROCKETCHAT)),
    Field::new("script", Node::Optional(SCRIPT)),
    Field::new("slack", Node::Optional(WEBHOOK_URL_ONLY)),
    Field::new("teams", Node::Optional(WEBHOOK_URL_ONLY)),
    Field::new("telegram", Node::Optional(TELEGRAM)),
    Field::new("webhook", Node::Optional(WEBHOOK)),
];

const REGOPT: &[Field] = &[
    Field::leaf("name", Kind::String),
    Field::leaf("selector", Kind::Choice(SELECTORS)),
    Field::leaf("username", Kind::String),
    Field::leaf("usernameFile", Kind::String),
    Field::leaf("password", Kind::String),
    Field::leaf("passwordFile", Kind::String),
    Field::leaf("insecureTLS", Kind::Bool),
    Field::leaf("timeout", Kind::Duration),
];

const DOCKER: &[Field] = &[
    Field::leaf("endpoint", Kind::String),
    Field::leaf("apiVersion", Kind::String),
    Field::leaf("tlsCertsPath", Kind::String),
    Field::leaf("tlsVerify", Kind::Bool),
    Field::leaf("watchByDefault", Kind::Bool),
    Field::leaf("watchStopped", Kind::Bool),
];

const SWARM: &[Field] = &[
    Field::leaf("endpoint", Kind::String),
    Field::leaf("apiVersion", Kind::String),
    Field::leaf("tlsCertsPath", Kind::String),
    Field::leaf("tlsVerify", Kind::Bool),
    Field::leaf("watchByDefault", Kind::Bool),
];

const KUBERNETES: &[Field] = &[
    Field::leaf("endpoint", Kind::String),
    Field::leaf("token", Kind::String),
    Field::leaf("tokenFile", Kind::String),
    Field::leaf("certAuthFilePath", Kind::String),
    Field::leaf("tlsInsecure", Kind::Bool),
    Field::leaf("namespaces", Kind::StringList),
    Field::leaf("watchByDefault", Kind::Bool),
];

const FILE: &[Field] = &[
    Field::leaf("filename", Kind::String),
    Field::leaf("directory", Kind::String),
];

const PROVIDERS: &[Field] = &[
    Field::new("docker", Node::Optional(DOCKER)),
    Field::new("swarm", Node::Optional(SWARM)),
    Field::new("kubernetes", Node::Optional(KUBERNETES)),
    Field::new("file", Node::Optional(FILE)),
];

/// Top-level fields of the configuration tree.
pub const ROOT: &[Field] = &[
    Field::new("db", Node::Section(DB)),
    Field::new("watch", Node::Section(WATCH)),
    Field::new("notif", Node::Optional(NOTIF)),
    Field::new("regopts", Node::List(REGOPT)),
    Field::new("providers", Node::Optional(PROVIDERS)),
];
