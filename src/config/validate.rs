//! Structural validation of a resolved configuration.
//!
//! Checks run in a fixed order and stop at the first violation.

use super::schedule::parse_schedule;
use super::types::*;
use crate::error::ValidationError;
use std::collections::HashSet;

/// Knobs that relax validation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateOptions {
    /// Test-notification mode: providers are not needed, but at least one
    /// notification channel is.
    pub test_notif: bool,
}

type Check = Result<(), ValidationError>;

/// Validate a finalized configuration.
pub fn validate(config: &Config, options: ValidateOptions) -> Check {
    validate_db(&config.db)?;
    validate_watch(&config.watch)?;
    validate_sources(config, options)?;
    validate_regopts(&config.regopts)?;
    if let Some(providers) = &config.providers {
        validate_providers(providers)?;
    }
    if let Some(notif) = &config.notif {
        validate_notif(notif)?;
    }
    Ok(())
}

fn validate_db(db: &Db) -> Check {
    require("db.path", &db.path)
}

fn validate_watch(watch: &Watch) -> Check {
    if watch.workers < 1 {
        return Err(ValidationError::invalid_value(
            "watch.workers",
            format!("watch.workers must be at least 1, got {}", watch.workers),
        ));
    }
    if let Err(reason) = parse_schedule(&watch.schedule) {
        return Err(ValidationError::invalid_value(
            "watch.schedule",
            format!("watch.schedule {:?} is not a valid schedule: {}", watch.schedule, reason),
        ));
    }
    Ok(())
}

fn validate_sources(config: &Config, options: ValidateOptions) -> Check {
    if options.test_notif {
        let has_channel = config.notif.as_ref().is_some_and(|n| !n.is_empty());
        if !has_channel {
            return Err(ValidationError::new(
                "notif_required",
                "no notification channel configured to test",
            ));
        }
        return Ok(());
    }

    let has_provider = config.providers.as_ref().is_some_and(|p| !p.is_empty());
    if !has_provider {
        return Err(ValidationError::new(
            "provider_required",
            "no provider enabled; configure at least one of docker, swarm, kubernetes or file",
        ));
    }
    Ok(())
}

fn validate_regopts(regopts: &[RegOpt]) -> Check {
    let mut seen = HashSet::new();
    for (index, regopt) in regopts.iter().enumerate() {
        let field = format!("regopts[{}]", index);
        require(&format!("{}.name", field), &regopt.name)?;
        if !seen.insert(regopt.name.as_str()) {
            return Err(ValidationError::new(
                "unique_name",
                format!("{}: duplicate registry option name {:?}", field, regopt.name),
            )
            .with_field(format!("{}.name", field)));
        }
        exclusive(&field, ("username", &regopt.username), ("usernameFile", &regopt.username_file))?;
        exclusive(&field, ("password", &regopt.password), ("passwordFile", &regopt.password_file))?;
    }
    Ok(())
}

fn validate_providers(providers: &Providers) -> Check {
    if let Some(kubernetes) = &providers.kubernetes {
        exclusive(
            "providers.kubernetes",
            ("token", &kubernetes.token),
            ("tokenFile", &kubernetes.token_file),
        )?;
    }
    if let Some(file) = &providers.file {
        exclusive(
            "providers.file",
            ("filename", &file.filename),
            ("directory", &file.directory),
        )?;
        if file.filename.is_empty() && file.directory.is_empty() {
            return Err(ValidationError::new(
                "required_field",
                "providers.file: one of filename or directory is required",
            )
            .with_field("providers.file"));
        }
    }
    Ok(())
}

fn validate_notif(notif: &Notif) -> Check {
    if let Some(amqp) = &notif.amqp {
        require("notif.amqp.queue", &amqp.queue)?;
        exclusive("notif.amqp", ("username", &amqp.username), ("usernameFile", &amqp.username_file))?;
        exclusive("notif.amqp", ("password", &amqp.password), ("passwordFile", &amqp.password_file))?;
    }
    if let Some(discord) = &notif.discord {
        require("notif.discord.webhookURL", &discord.webhook_url)?;
    }
    if let Some(gotify) = &notif.gotify {
        require("notif.gotify.endpoint", &gotify.endpoint)?;
        require("notif.gotify.token", &gotify.token)?;
    }
    if let Some(mail) = &notif.mail {
        require("notif.mail.from", &mail.from)?;
        require("notif.mail.to", &mail.to)?;
        exclusive("notif.mail", ("username", &mail.username), ("usernameFile", &mail.username_file))?;
        exclusive("notif.mail", ("password", &mail.password), ("passwordFile", &mail.password_file))?;
    }
    if let Some(matrix) = &notif.matrix {
        require("notif.matrix.user", &matrix.user)?;
        require("notif.matrix.roomID", &matrix.room_id)?;
        exclusive("notif.matrix", ("password", &matrix.password), ("passwordFile", &matrix.password_file))?;
        if matrix.password.is_empty() && matrix.password_file.is_empty() {
            return Err(ValidationError::new(
                "required_field",
                "notif.matrix: one of password or passwordFile is required",
            )
            .with_field("notif.matrix"));
        }
    }
    if let Some(rocketchat) = &notif.rocketchat {
        require("notif.rocketchat.endpoint", &rocketchat.endpoint)?;
        require("notif.rocketchat.channel", &rocketchat.channel)?;
        require("notif.rocketchat.userID", &rocketchat.user_id)?;
        require("notif.rocketchat.token", &rocketchat.token)?;
    }
    if let Some(script) = &notif.script {
        require("notif.script.cmd", &script.cmd)?;
    }
    if let Some(slack) = &notif.slack {
        require("notif.slack.webhookURL", &slack.webhook_url)?;
    }
    if let Some(teams) = &notif.teams {
        require("notif.teams.webhookURL", &teams.webhook_url)?;
    }
    if let Some(telegram) = &notif.telegram {
        require("notif.telegram.token", &telegram.token)?;
        if telegram.chat_ids.is_empty() {
            return Err(ValidationError::missing_field("notif.telegram.chatIDs"));
        }
    }
    if let Some(webhook) = &notif.webhook {
        require("notif.webhook.endpoint", &webhook.endpoint)?;
    }
    Ok(())
}

fn require(field: &str, value: &str) -> Check {
    if value.trim().is_empty() {
        Err(ValidationError::missing_field(field))
    } else {
        Ok(())
    }
}

fn exclusive(field: &str, a: (&str, &str), b: (&str, &str)) -> Check {
    if !a.1.is_empty() && !b.1.is_empty() {
        Err(ValidationError::mutually_exclusive(field, a.0, b.0))
    } else {
        Ok(())
    }
}
