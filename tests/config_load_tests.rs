//! Integration tests for configuration resolution.
//!
//! Covers the three tiers end to end:
//! - file only
//! - environment only
//! - file and environment together

use regwatch::config::*;
use regwatch::error::ConfigError;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

/// Full configuration exercising every section.
fn full_yaml() -> &'static str {
    r##"
db:
  path: regwatch.db

watch:
  workers: 100
  schedule: "*/30 * * * *"
  firstCheckNotif: true

notif:
  amqp:
    host: localhost
    port: 5672
    username: guest
    password: guest
    queue: queue
  discord:
    webhookURL: https://discordapp.com/api/webhooks/1234567890/Abcd-eFgh-iJklmNo_pqr
  gotify:
    endpoint: http://gotify.foo.com
    token: Token123456
    priority: 1
    timeout: 10s
  mail:
    host: localhost
    port: 25
    ssl: false
    insecureSkipVerify: false
    from: regwatch@example.com
    to: webmaster@example.com
  matrix:
    homeserverURL: https://matrix.org
    user: "@foo:matrix.org"
    password: bar
    roomID: "!abcdefGHIjklmno:matrix.org"
  rocketchat:
    endpoint: http://rocket.foo.com:3000
    channel: "#general"
    userID: abcdEFGH012345678
    token: Token123456
    timeout: 10s
  script:
    cmd: uname
    args:
      - "-a"
  slack:
    webhookURL: https://hooks.slack.com/services/ABCD12EFG/HIJK34LMN/01234567890abcdefghij
  teams:
    webhookURL: https://outlook.office.com/webhook/ABCD12EFG/HIJK34LMN/01234567890abcdefghij
  telegram:
    token: abcdef123456
    chatIDs:
      - 8547439
      - 1234567
  webhook:
    endpoint: http://webhook.foo.com/sd54qad89azd5a
    method: GET
    headers:
      content-type: application/json
      authorization: Token123456
    timeout: 10s

regopts:
  - name: myregistry
    username: fii
    password: bor
    timeout: 5s
  - name: docker.io
    selector: image
    username: foo
    password: bar
  - name: docker.io/crazymax
    selector: image
    usernameFile: ./fixtures/run_secrets_username
    passwordFile: ./fixtures/run_secrets_password

providers:
  docker:
    watchStopped: true
    watchByDefault: true
  swarm:
    watchByDefault: false
  kubernetes:
    namespaces:
      - default
      - production
    watchByDefault: true
  file:
    filename: ./fixtures/file.yml
"##
}

fn docker_yaml() -> &'static str {
    r#"
providers:
  docker: {}
"#
}

fn file_provider_with_webhook_yaml() -> &'static str {
    r#"
notif:
  webhook:
    endpoint: http://webhook.foo.com/sd54qad89azd5a
    method: POST
    headers:
      content-type: application/json
      authorization: Token123456
    timeout: 10s

providers:
  file:
    filename: ./fixtures/file.yml
"#
}

fn invalid_yaml() -> &'static str {
    "watch:\n  workers: 100\n schedule: [oops\n"
}

struct Fixture {
    _dir: TempDir,
    path: PathBuf,
}

fn fixture(content: &str) -> Fixture {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("regwatch.yml");
    std::fs::write(&path, content).expect("Failed to write fixture");
    Fixture { _dir: dir, path }
}

fn environ(pairs: &[(&str, &str)]) -> Environ {
    pairs.iter().copied().collect()
}

fn load(file: Option<&Fixture>, env: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let options = LoadOptions {
        config_file: file.map(|f| f.path.clone()),
        test_notif: false,
    };
    resolve(&options, &environ(env))
}

fn docker_defaults() -> PrdDocker {
    PrdDocker {
        tls_verify: TriBool::True,
        watch_by_default: TriBool::False,
        watch_stopped: TriBool::False,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// File only
// ---------------------------------------------------------------------------

#[test]
fn missing_file_fails_with_not_found() {
    let dir = TempDir::new().unwrap();
    let options = LoadOptions::with_file(dir.path().join("missing.yml"));
    let err = resolve(&options, &Environ::default()).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }), "got {err:?}");
}

#[test]
fn invalid_file_fails_with_format_error() {
    let file = fixture(invalid_yaml());
    let err = load(Some(&file), &[]).unwrap_err();
    assert!(matches!(err, ConfigError::Format { .. }), "got {err:?}");
}

#[test]
fn full_file_resolves_with_leaf_defaults() {
    let file = fixture(full_yaml());
    let config = load(Some(&file), &[]).expect("full config should load");

    assert_eq!(config.db.path, "regwatch.db");
    assert_eq!(
        config.watch,
        Watch {
            workers: 100,
            schedule: "*/30 * * * *".into(),
            first_check_notif: TriBool::True,
        }
    );

    let notif = config.notif.as_ref().expect("notif present");
    assert_eq!(notif.channels().len(), 11);
    assert_eq!(
        notif.discord.as_ref().unwrap().timeout,
        Some(Duration::from_secs(10))
    );
    let mail = notif.mail.as_ref().unwrap();
    assert_eq!(mail.local_name, "localhost");
    assert_eq!(mail.ssl, TriBool::False);
    assert_eq!(
        notif.matrix.as_ref().unwrap().msg_type,
        Some(MatrixMsgType::Notice)
    );
    assert_eq!(
        notif.telegram.as_ref().unwrap().chat_ids,
        vec![8547439, 1234567]
    );
    assert_eq!(notif.script.as_ref().unwrap().args, vec!["-a".to_string()]);

    assert_eq!(config.regopts.len(), 3);
    assert_eq!(config.regopts[0].selector, Some(RegOptSelector::Name));
    assert_eq!(config.regopts[0].timeout, Some(Duration::from_secs(5)));
    assert_eq!(config.regopts[1].selector, Some(RegOptSelector::Image));
    assert_eq!(config.regopts[1].timeout, Some(Duration::from_secs(10)));
    assert_eq!(config.regopts[2].insecure_tls, TriBool::False);
    assert_eq!(config.regopts[2].password_file, "./fixtures/run_secrets_password");

    let providers = config.providers.as_ref().expect("providers present");
    assert_eq!(
        providers.docker,
        Some(PrdDocker {
            tls_verify: TriBool::True,
            watch_by_default: TriBool::True,
            watch_stopped: TriBool::True,
            ..Default::default()
        })
    );
    assert_eq!(
        providers.swarm,
        Some(PrdSwarm {
            tls_verify: TriBool::True,
            watch_by_default: TriBool::False,
            ..Default::default()
        })
    );
    let kubernetes = providers.kubernetes.as_ref().unwrap();
    assert_eq!(kubernetes.tls_insecure, TriBool::False);
    assert_eq!(kubernetes.namespaces, vec!["default", "production"]);
    assert_eq!(providers.file.as_ref().unwrap().filename, "./fixtures/file.yml");

    let rendered = render(&config, RenderFormat::Yaml).unwrap();
    assert!(!rendered.is_empty());
}

#[test]
fn unknown_top_level_key_is_rejected() {
    let file = fixture("providers:\n  docker: {}\nnotifications:\n  slack: {}\n");
    let err = load(Some(&file), &[]).unwrap_err();
    match err {
        ConfigError::Format { message, .. } => assert!(message.contains("notifications")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn null_section_in_file_stays_absent() {
    let file = fixture("providers:\n  docker: {}\n  swarm:\n");
    let config = load(Some(&file), &[]).unwrap();
    assert_eq!(config.providers.unwrap().enabled(), vec!["docker"]);
}

// ---------------------------------------------------------------------------
// Environment only
// ---------------------------------------------------------------------------

#[test]
fn nothing_configured_fails() {
    let err = load(None, &[]).unwrap_err();
    match err {
        ConfigError::Validation(v) => assert_eq!(v.rule, "provider_required"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn docker_provider_from_env() {
    let config = load(None, &[("REGWATCH_PROVIDERS_DOCKER", "true")]).unwrap();
    assert_eq!(
        config,
        Config {
            db: Db::defaults(),
            watch: Watch::defaults(),
            notif: None,
            regopts: vec![],
            providers: Some(Providers {
                docker: Some(docker_defaults()),
                ..Default::default()
            }),
        }
    );
}

#[test]
fn docker_provider_and_regopts_from_env() {
    let config = load(
        None,
        &[
            ("REGWATCH_REGOPTS_0_NAME", "docker.io"),
            ("REGWATCH_REGOPTS_0_SELECTOR", "image"),
            ("REGWATCH_REGOPTS_0_USERNAMEFILE", "./fixtures/run_secrets_username"),
            ("REGWATCH_REGOPTS_0_PASSWORDFILE", "./fixtures/run_secrets_password"),
            ("REGWATCH_REGOPTS_0_TIMEOUT", "30s"),
            ("REGWATCH_PROVIDERS_DOCKER", "true"),
        ],
    )
    .unwrap();

    assert_eq!(
        config.regopts,
        vec![RegOpt {
            name: "docker.io".into(),
            selector: Some(RegOptSelector::Image),
            username_file: "./fixtures/run_secrets_username".into(),
            password_file: "./fixtures/run_secrets_password".into(),
            insecure_tls: TriBool::False,
            timeout: Some(Duration::from_secs(30)),
            ..Default::default()
        }]
    );
    assert_eq!(config.providers.unwrap().docker, Some(docker_defaults()));
}

#[test]
fn sparse_regopt_indices_are_compacted() {
    let config = load(
        None,
        &[
            ("REGWATCH_REGOPTS_0_NAME", "first"),
            ("REGWATCH_REGOPTS_2_NAME", "second"),
            ("REGWATCH_PROVIDERS_DOCKER", "true"),
        ],
    )
    .unwrap();
    let names: Vec<&str> = config.regopts.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn swarm_provider_and_telegram_from_env() {
    let config = load(
        None,
        &[
            ("REGWATCH_NOTIF_TELEGRAM_TOKEN", "abcdef123456"),
            ("REGWATCH_NOTIF_TELEGRAM_CHATIDS", "8547439,1234567"),
            ("REGWATCH_PROVIDERS_SWARM", "true"),
        ],
    )
    .unwrap();

    assert_eq!(
        config.notif,
        Some(Notif {
            telegram: Some(NotifTelegram {
                token: "abcdef123456".into(),
                chat_ids: vec![8547439, 1234567],
            }),
            ..Default::default()
        })
    );
    assert_eq!(
        config.providers,
        Some(Providers {
            swarm: Some(PrdSwarm {
                tls_verify: TriBool::True,
                watch_by_default: TriBool::False,
                ..Default::default()
            }),
            ..Default::default()
        })
    );
}

#[test]
fn file_provider_and_script_from_env() {
    let config = load(
        None,
        &[
            ("REGWATCH_NOTIF_SCRIPT_CMD", "uname"),
            ("REGWATCH_NOTIF_SCRIPT_ARGS", "-a"),
            ("REGWATCH_PROVIDERS_FILE_DIRECTORY", "./fixtures"),
        ],
    )
    .unwrap();

    assert_eq!(
        config.notif.unwrap().script,
        Some(NotifScript {
            cmd: "uname".into(),
            args: vec!["-a".into()],
            dir: String::new(),
        })
    );
    assert_eq!(
        config.providers.unwrap().file,
        Some(PrdFile {
            filename: String::new(),
            directory: "./fixtures".into(),
        })
    );
}

#[test]
fn malformed_env_value_fails_with_coercion_error() {
    let err = load(
        None,
        &[
            ("REGWATCH_PROVIDERS_DOCKER", "true"),
            ("REGWATCH_REGOPTS_0_TIMEOUT", "thirty"),
        ],
    )
    .unwrap_err();
    match err {
        ConfigError::Coercion { var, .. } => assert_eq!(var, "REGWATCH_REGOPTS_0_TIMEOUT"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_notif_mode_skips_provider_requirement() {
    let options = LoadOptions {
        config_file: None,
        test_notif: true,
    };
    let env = environ(&[("REGWATCH_NOTIF_SLACK_WEBHOOKURL", "https://hooks.slack.com/x")]);
    let config = resolve(&options, &env).unwrap();
    assert!(config.providers.is_none());
    assert_eq!(config.notif.unwrap().channels(), vec!["slack"]);
}

// ---------------------------------------------------------------------------
// File and environment
// ---------------------------------------------------------------------------

#[test]
fn env_does_not_rescue_invalid_file() {
    let file = fixture(invalid_yaml());
    let err = load(Some(&file), &[("REGWATCH_PROVIDERS_DOCKER", "true")]).unwrap_err();
    assert!(matches!(err, ConfigError::Format { .. }), "got {err:?}");
}

#[test]
fn docker_from_file_and_mail_from_env() {
    let file = fixture(docker_yaml());
    let config = load(
        Some(&file),
        &[
            ("REGWATCH_NOTIF_MAIL_HOST", "127.0.0.1"),
            ("REGWATCH_NOTIF_MAIL_PORT", "25"),
            ("REGWATCH_NOTIF_MAIL_SSL", "false"),
            ("REGWATCH_NOTIF_MAIL_INSECURESKIPVERIFY", "true"),
            ("REGWATCH_NOTIF_MAIL_FROM", "regwatch@foo.com"),
            ("REGWATCH_NOTIF_MAIL_TO", "webmaster@foo.com"),
            ("REGWATCH_NOTIF_MAIL_LOCALNAME", "foo.com"),
        ],
    )
    .unwrap();

    assert_eq!(
        config,
        Config {
            db: Db::defaults(),
            watch: Watch::defaults(),
            notif: Some(Notif {
                mail: Some(NotifMail {
                    host: "127.0.0.1".into(),
                    port: 25,
                    ssl: TriBool::False,
                    insecure_skip_verify: TriBool::True,
                    local_name: "foo.com".into(),
                    from: "regwatch@foo.com".into(),
                    to: "webmaster@foo.com".into(),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            regopts: vec![],
            providers: Some(Providers {
                docker: Some(docker_defaults()),
                ..Default::default()
            }),
        }
    );
}

#[test]
fn webhook_headers_overridden_from_env() {
    let file = fixture(file_provider_with_webhook_yaml());
    let config = load(
        Some(&file),
        &[
            ("REGWATCH_NOTIF_WEBHOOK_HEADERS_AUTHORIZATION", "Token78910"),
            ("REGWATCH_NOTIF_WEBHOOK_HEADERS_CONTENT-TYPE", "text/plain"),
            ("REGWATCH_NOTIF_WEBHOOK_METHOD", "GET"),
            ("REGWATCH_NOTIF_WEBHOOK_TIMEOUT", "1m"),
        ],
    )
    .unwrap();

    let expected_headers = BTreeMap::from([
        ("content-type".to_string(), "text/plain".to_string()),
        ("authorization".to_string(), "Token78910".to_string()),
    ]);
    assert_eq!(
        config.notif.unwrap().webhook,
        Some(NotifWebhook {
            endpoint: "http://webhook.foo.com/sd54qad89azd5a".into(),
            method: "GET".into(),
            headers: expected_headers,
            timeout: Some(Duration::from_secs(60)),
        })
    );
    assert_eq!(
        config.providers.unwrap().file,
        Some(PrdFile {
            filename: "./fixtures/file.yml".into(),
            directory: String::new(),
        })
    );
}

#[test]
fn env_index_overrides_existing_file_entry() {
    let file = fixture(full_yaml());
    let config = load(
        Some(&file),
        &[
            ("REGWATCH_REGOPTS_1_PASSWORD", "rotated"),
            ("REGWATCH_REGOPTS_9_NAME", "ghcr.io"),
        ],
    )
    .unwrap();

    assert_eq!(config.regopts.len(), 4);
    assert_eq!(config.regopts[1].name, "docker.io");
    assert_eq!(config.regopts[1].username, "foo");
    assert_eq!(config.regopts[1].password, "rotated");
    assert_eq!(config.regopts[3].name, "ghcr.io");
    assert_eq!(config.regopts[3].timeout, Some(Duration::from_secs(10)));
}

#[test]
fn explicit_false_survives_default_fill() {
    let file = fixture("providers:\n  docker:\n    tlsVerify: false\n");
    let config = load(Some(&file), &[]).unwrap();
    assert_eq!(
        config.providers.unwrap().docker.unwrap().tls_verify,
        TriBool::False
    );

    let config = load(
        Some(&file),
        &[("REGWATCH_PROVIDERS_DOCKER_TLSVERIFY", "TRUE")],
    )
    .unwrap();
    assert_eq!(
        config.providers.unwrap().docker.unwrap().tls_verify,
        TriBool::True
    );
}

#[test]
fn schedule_must_parse_as_cron() {
    for schedule in ["foo bar baz qux quux", "99 99 99 99 99", "@every never"] {
        let err = load(
            None,
            &[
                ("REGWATCH_PROVIDERS_DOCKER", "true"),
                ("REGWATCH_WATCH_SCHEDULE", schedule),
            ],
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(v) => assert_eq!(v.field.as_deref(), Some("watch.schedule")),
            other => panic!("unexpected error for {schedule:?}: {other:?}"),
        }
    }

    for schedule in ["@every 6h", "@hourly", "0 0 * * 0"] {
        let config = load(
            None,
            &[
                ("REGWATCH_PROVIDERS_DOCKER", "true"),
                ("REGWATCH_WATCH_SCHEDULE", schedule),
            ],
        )
        .unwrap();
        assert_eq!(config.watch.schedule, schedule);
    }
}
