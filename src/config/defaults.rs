//! Built-in defaults for every configuration section.

use super::types::*;
use std::time::Duration;

/// Default database file.
pub const DEFAULT_DB_PATH: &str = "regwatch.db";

/// Default number of concurrent workers.
pub const DEFAULT_WORKERS: i64 = 10;

/// Default watch schedule: hourly.
pub const DEFAULT_SCHEDULE: &str = "0 * * * *";

/// Default timeout for registry and notification requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A section with statically known defaults.
pub trait SectionDefaults: Sized {
    /// The section with every defaulted leaf set.
    fn defaults() -> Self;

    /// Set every unset leaf to its default. Explicit values are kept.
    fn fill_defaults(&mut self);
}

fn fill_str(slot: &mut String, default: &str) {
    if slot.is_empty() {
        *slot = default.to_string();
    }
}

fn fill_num<T: PartialEq + Default>(slot: &mut T, default: T) {
    if *slot == T::default() {
        *slot = default;
    }
}

fn fill_timeout(slot: &mut Option<Duration>) {
    slot.get_or_insert(DEFAULT_TIMEOUT);
}

/// Defaults for a section whose leaves are all optional without a default.
macro_rules! no_defaults {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SectionDefaults for $ty {
                fn defaults() -> Self {
                    Self::default()
                }

                fn fill_defaults(&mut self) {}
            }
        )*
    };
}

no_defaults!(NotifScript, NotifSlack, NotifTeams, NotifTelegram, PrdFile);

/// Generates `defaults()` from `fill_defaults()` on an empty section.
macro_rules! filled_defaults {
    () => {
        fn defaults() -> Self {
            let mut section = Self::default();
            section.fill_defaults();
            section
        }
    };
}

impl SectionDefaults for Db {
    filled_defaults!();

    fn fill_defaults(&mut self) {
        fill_str(&mut self.path, DEFAULT_DB_PATH);
    }
}

impl SectionDefaults for Watch {
    filled_defaults!();

    fn fill_defaults(&mut self) {
        fill_num(&mut self.workers, DEFAULT_WORKERS);
        fill_str(&mut self.schedule, DEFAULT_SCHEDULE);
        self.first_check_notif.fill(false);
    }
}

impl SectionDefaults for NotifAmqp {
    filled_defaults!();

    fn fill_defaults(&mut self) {
        fill_str(&mut self.host, "localhost");
        fill_num(&mut self.port, 5672);
    }
}

impl SectionDefaults for NotifDiscord {
    filled_defaults!();

    fn fill_defaults(&mut self) {
        fill_timeout(&mut self.timeout);
    }
}

impl SectionDefaults for NotifGotify {
    filled_defaults!();

    fn fill_defaults(&mut self) {
        fill_num(&mut self.priority, 1);
        fill_timeout(&mut self.timeout);
    }
}

impl SectionDefaults for NotifMail {
    filled_defaults!();

    fn fill_defaults(&mut self) {
        fill_str(&mut self.host, "localhost");
        fill_num(&mut self.port, 25);
        self.ssl.fill(false);
        self.insecure_skip_verify.fill(false);
        fill_str(&mut self.local_name, "localhost");
    }
}

impl SectionDefaults for NotifMatrix {
    filled_defaults!();

    fn fill_defaults(&mut self) {
        fill_str(&mut self.homeserver_url, "https://matrix.org");
        self.msg_type.get_or_insert(MatrixMsgType::Notice);
    }
}

impl SectionDefaults for NotifRocketChat {
    filled_defaults!();

    fn fill_defaults(&mut self) {
        fill_timeout(&mut self.timeout);
    }
}

impl SectionDefaults for NotifWebhook {
    filled_defaults!();

    fn fill_defaults(&mut self) {
        fill_str(&mut self.method, "GET");
        fill_timeout(&mut self.timeout);
    }
}

fn fill_present<T: SectionDefaults>(section: &mut Option<T>) {
    if let Some(section) = section.as_mut() {
        section.fill_defaults();
    }
}

impl SectionDefaults for Notif {
    /// No channel is enabled by default.
    fn defaults() -> Self {
        Self::default()
    }

    fn fill_defaults(&mut self) {
        fill_present(&mut self.amqp);
        fill_present(&mut self.discord);
        fill_present(&mut self.gotify);
        fill_present(&mut self.mail);
        fill_present(&mut self.matrix);
        fill_present(&mut self.rocketchat);
        fill_present(&mut self.script);
        fill_present(&mut self.slack);
        fill_present(&mut self.teams);
        fill_present(&mut self.telegram);
        fill_present(&mut self.webhook);
    }
}

impl SectionDefaults for RegOpt {
    filled_defaults!();

    fn fill_defaults(&mut self) {
        self.selector.get_or_insert(RegOptSelector::Name);
        self.insecure_tls.fill(false);
        fill_timeout(&mut self.timeout);
    }
}

impl SectionDefaults for PrdDocker {
    filled_defaults!();

    fn fill_defaults(&mut self) {
        self.tls_verify.fill(true);
        self.watch_by_default.fill(false);
        self.watch_stopped.fill(false);
    }
}

impl SectionDefaults for PrdSwarm {
    filled_defaults!();

    fn fill_defaults(&mut self) {
        self.tls_verify.fill(true);
        self.watch_by_default.fill(false);
    }
}

impl SectionDefaults for PrdKubernetes {
    filled_defaults!();

    fn fill_defaults(&mut self) {
        self.tls_insecure.fill(false);
        self.watch_by_default.fill(false);
    }
}

impl SectionDefaults for Providers {
    /// No provider is enabled by default.
    fn defaults() -> Self {
        Self::default()
    }

    fn fill_defaults(&mut self) {
        fill_present(&mut self.docker);
        fill_present(&mut self.swarm);
        fill_present(&mut self.kubernetes);
        fill_present(&mut self.file);
    }
}
