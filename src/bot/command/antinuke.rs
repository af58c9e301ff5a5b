//! The `/antinuke` command.
//!
//! Only the guild owner may configure anti-nuke protection. Validation lives in
//! [`AntiNukeSettingsService`]; this module parses options and renders replies.

use sea_orm::DatabaseConnection;
use serenity::all::{
    ChannelId, ChannelType, CommandInteraction, CommandOptionType, Context, CreateCommand,
    CreateCommandOption, GuildId, Permissions, ResolvedOption, ResolvedValue,
};

use crate::{
    bot::command::Reply,
    error::AppError,
    model::antinuke::{GuildProtectionConfig, MitigationAction, ProtectionKind},
    service::antinuke::settings::{
        describe_rule, describe_whitelist, AntiNukeSettingsService, ProtectionUpdate,
        SettingsError, WhitelistEntry, MAX_HISTORY_LIMIT,
    },
};

pub const NAME: &str = "antinuke";

const OWNER_NOTE: &str = "The server owner is always whitelisted by default.";

/// A parsed `/antinuke` invocation.
#[derive(Debug, Clone)]
pub enum AntiNukeCommand {
    Enable,
    Disable,
    Status,
    Settings {
        protection: String,
        update: ProtectionUpdate,
    },
    WhitelistAdd(WhitelistEntry),
    WhitelistRemove(WhitelistEntry),
    WhitelistList,
    Log(ChannelId),
    History { limit: Option<usize> },
    Reset,
}

pub fn definition() -> CreateCommand {
    let protection = ProtectionKind::ALL.into_iter().fold(
        CreateCommandOption::new(
            CommandOptionType::String,
            "protection",
            "Protection to configure",
        )
        .required(true),
        |option, kind| option.add_string_choice(kind.display_name(), kind.key()),
    );
    let action = [
        MitigationAction::Ban,
        MitigationAction::Kick,
        MitigationAction::Derank,
        MitigationAction::Delete,
    ]
    .into_iter()
    .fold(
        CreateCommandOption::new(
            CommandOptionType::String,
            "action",
            "Action taken when the protection triggers",
        ),
        |option, action| option.add_string_choice(action.as_str(), action.as_str()),
    );

    let target_subcommand = |name: &str, description: &str| {
        CreateCommandOption::new(CommandOptionType::SubCommand, name, description)
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::User,
                "user",
                "User to whitelist",
            ))
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::Role,
                "role",
                "Role to whitelist",
            ))
    };

    CreateCommand::new(NAME)
        .description("Configure anti-nuke protection for the server")
        .default_member_permissions(Permissions::ADMINISTRATOR)
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "enable",
            "Enable anti-nuke protection",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "disable",
            "Disable anti-nuke protection",
        ))
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "status",
            "View current anti-nuke settings",
        ))
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "settings",
                "Configure an anti-nuke protection",
            )
            .add_sub_option(protection)
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::Boolean,
                "enabled",
                "Whether the protection is active",
            ))
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::Integer,
                "threshold",
                "Actions allowed within the time window",
            ))
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::Integer,
                "window_seconds",
                "Length of the time window in seconds",
            ))
            .add_sub_option(action),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommandGroup,
                "whitelist",
                "Manage the anti-nuke whitelist",
            )
            .add_sub_option(target_subcommand(
                "add",
                "Add a user or role to the whitelist",
            ))
            .add_sub_option(target_subcommand(
                "remove",
                "Remove a user or role from the whitelist",
            ))
            .add_sub_option(CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "list",
                "List all whitelisted users and roles",
            )),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "log",
                "Set the log channel for anti-nuke actions",
            )
            .add_sub_option(
                CreateCommandOption::new(CommandOptionType::Channel, "channel", "Log channel")
                    .required(true)
                    .channel_types(vec![ChannelType::Text]),
            ),
        )
        .add_option(
            CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "history",
                "View recent anti-nuke actions",
            )
            .add_sub_option(
                CreateCommandOption::new(
                    CommandOptionType::Integer,
                    "limit",
                    "Number of entries to show",
                )
                .min_int_value(1)
                .max_int_value(MAX_HISTORY_LIMIT as u64),
            ),
        )
        .add_option(CreateCommandOption::new(
            CommandOptionType::SubCommand,
            "reset",
            "Restore default settings and clear the action history",
        ))
}

/// Answers an `/antinuke` interaction.
pub async fn run(
    db: &DatabaseConnection,
    ctx: &Context,
    cmd: &CommandInteraction,
) -> Result<(), AppError> {
    let Some(guild_id) = cmd.guild_id else {
        return Reply::error("Server Only Command", "Use this command in a server.")
            .send(ctx, cmd)
            .await;
    };

    let guild = guild_id.to_partial_guild(&ctx.http).await?;
    if guild.owner_id != cmd.user.id {
        return Reply::error(
            "Owner Only Command",
            "Only the server owner can use the anti-nuke system for security reasons.",
        )
        .send(ctx, cmd)
        .await;
    }

    let reply = match parse(&cmd.data.options()) {
        Ok(command) => {
            tracing::info!(
                "{} ran /antinuke {:?} in guild {}",
                cmd.user.id,
                command,
                guild_id
            );
            execute(db, guild_id, command).await?
        }
        Err(reply) => reply,
    };

    reply.send(ctx, cmd).await
}

/// Parses the resolved options of an `/antinuke` interaction.
///
/// Returns the reply to show instead when the options do not form a command.
pub fn parse(options: &[ResolvedOption<'_>]) -> Result<AntiNukeCommand, Reply> {
    let Some(option) = options.first() else {
        return Err(invalid_subcommand(""));
    };

    match (option.name, &option.value) {
        ("enable", _) => Ok(AntiNukeCommand::Enable),
        ("disable", _) => Ok(AntiNukeCommand::Disable),
        ("status", _) => Ok(AntiNukeCommand::Status),
        ("reset", _) => Ok(AntiNukeCommand::Reset),
        ("settings", ResolvedValue::SubCommand(args)) => Ok(AntiNukeCommand::Settings {
            protection: string_arg(args, "protection")
                .unwrap_or_default()
                .to_string(),
            update: ProtectionUpdate {
                enabled: bool_arg(args, "enabled"),
                threshold: int_arg(args, "threshold"),
                window_seconds: int_arg(args, "window_seconds"),
                action: string_arg(args, "action").map(str::to_string),
            },
        }),
        ("whitelist", ResolvedValue::SubCommandGroup(group)) => parse_whitelist(group),
        ("log", ResolvedValue::SubCommand(args)) => match find(args, "channel") {
            Some(ResolvedValue::Channel(channel)) => Ok(AntiNukeCommand::Log(channel.id)),
            _ => Err(Reply::error(
                "Missing Channel",
                "Please mention a channel to set as the anti-nuke log channel.",
            )),
        },
        ("history", ResolvedValue::SubCommand(args)) => Ok(AntiNukeCommand::History {
            limit: int_arg(args, "limit").map(|n| usize::try_from(n).unwrap_or(0)),
        }),
        (name, _) => Err(invalid_subcommand(name)),
    }
}

fn parse_whitelist(group: &[ResolvedOption<'_>]) -> Result<AntiNukeCommand, Reply> {
    let Some(option) = group.first() else {
        return Err(invalid_subcommand("whitelist"));
    };

    let target = match &option.value {
        ResolvedValue::SubCommand(args) => whitelist_target(args),
        _ => None,
    };

    match (option.name, target) {
        ("list", _) => Ok(AntiNukeCommand::WhitelistList),
        ("add", Some(entry)) => Ok(AntiNukeCommand::WhitelistAdd(entry)),
        ("remove", Some(entry)) => Ok(AntiNukeCommand::WhitelistRemove(entry)),
        ("add" | "remove", None) => Err(Reply::error(
            "Missing Mention",
            "Please specify a user or role.",
        )),
        (name, _) => Err(invalid_subcommand(name)),
    }
}

/// The user option wins when both a user and a role are given.
fn whitelist_target(args: &[ResolvedOption<'_>]) -> Option<WhitelistEntry> {
    if let Some(ResolvedValue::User(user, _)) = find(args, "user") {
        return Some(WhitelistEntry::User(user.id));
    }
    if let Some(ResolvedValue::Role(role)) = find(args, "role") {
        return Some(WhitelistEntry::Role(role.id));
    }
    None
}

fn find<'a>(args: &'a [ResolvedOption<'a>], name: &str) -> Option<&'a ResolvedValue<'a>> {
    args.iter()
        .find(|option| option.name == name)
        .map(|option| &option.value)
}

fn string_arg<'a>(args: &'a [ResolvedOption<'a>], name: &str) -> Option<&'a str> {
    match find(args, name) {
        Some(ResolvedValue::String(value)) => Some(*value),
        _ => None,
    }
}

fn int_arg(args: &[ResolvedOption<'_>], name: &str) -> Option<i64> {
    match find(args, name) {
        Some(ResolvedValue::Integer(value)) => Some(*value),
        _ => None,
    }
}

fn bool_arg(args: &[ResolvedOption<'_>], name: &str) -> Option<bool> {
    match find(args, name) {
        Some(ResolvedValue::Boolean(value)) => Some(*value),
        _ => None,
    }
}

fn invalid_subcommand(name: &str) -> Reply {
    Reply::error(
        "Invalid Subcommand",
        format!("\"{}\" is not a valid anti-nuke subcommand.", name),
    )
    .field(
        "Available Subcommands",
        "enable, disable, status, settings, whitelist, log, history, reset",
        false,
    )
}

/// Applies a parsed command and builds the reply.
///
/// Rejected changes become error replies; only failures to reach the settings
/// store are returned as errors.
///
/// # Returns
/// - `Ok(Reply)` - Reply to show, including validation errors
/// - `Err(AppError::StoreErr)` - Settings could not be loaded or saved
pub async fn execute(
    db: &DatabaseConnection,
    guild_id: GuildId,
    command: AntiNukeCommand,
) -> Result<Reply, AppError> {
    let settings = AntiNukeSettingsService::new(db);

    let result = match command {
        AntiNukeCommand::Enable => settings.set_enabled(guild_id, true).await.map(|config| {
            Reply::success(
                "Anti-Nuke Enabled",
                "Anti-nuke protection has been enabled for this server.",
            )
            .field(
                "Important",
                "Make sure to whitelist trusted staff members and bots to prevent false positives.",
                false,
            )
            .field(
                "Log Channel",
                config.log_channel_id.map_or_else(
                    || "Not set - use `/antinuke log` to set one".to_string(),
                    |channel| format!("<#{}>", channel),
                ),
                false,
            )
        }),
        AntiNukeCommand::Disable => settings.set_enabled(guild_id, false).await.map(|_| {
            Reply::success(
                "Anti-Nuke Disabled",
                "Anti-nuke protection has been disabled for this server.",
            )
        }),
        AntiNukeCommand::Status => settings.get(guild_id).await.map(|config| status(&config)),
        AntiNukeCommand::Settings { protection, update } => settings
            .update_protection(guild_id, &protection, update)
            .await
            .map(|(kind, rule)| {
                Reply::success(
                    "Setting Updated",
                    format!("The {} protection has been updated.", kind.display_name()),
                )
                .field("Current Setting", describe_rule(kind, &rule), false)
            }),
        AntiNukeCommand::WhitelistAdd(entry) => {
            settings.add_to_whitelist(guild_id, entry).await.map(|_| {
                let title = match entry {
                    WhitelistEntry::User(_) => "User Whitelisted",
                    WhitelistEntry::Role(_) => "Role Whitelisted",
                };
                Reply::success(
                    title,
                    format!("{} has been added to the anti-nuke whitelist.", entry),
                )
            })
        }
        AntiNukeCommand::WhitelistRemove(entry) => {
            settings.remove_from_whitelist(guild_id, entry).await.map(|_| {
                let title = match entry {
                    WhitelistEntry::User(_) => "User Removed",
                    WhitelistEntry::Role(_) => "Role Removed",
                };
                Reply::success(
                    title,
                    format!("{} has been removed from the anti-nuke whitelist.", entry),
                )
            })
        }
        AntiNukeCommand::WhitelistList => settings.get(guild_id).await.map(|config| {
            let (users, roles) = describe_whitelist(&config);
            Reply::info(
                "Anti-Nuke Whitelist",
                "Users and roles exempt from anti-nuke detection:",
            )
            .field("Whitelisted Users", users, false)
            .field("Whitelisted Roles", roles, false)
            .field("Note", OWNER_NOTE, false)
        }),
        AntiNukeCommand::Log(channel_id) => {
            settings.set_log_channel(guild_id, channel_id).await.map(|_| {
                Reply::success(
                    "Log Channel Updated",
                    format!("Anti-nuke logs will now be sent to <#{}>.", channel_id),
                )
            })
        }
        AntiNukeCommand::History { limit } => settings.history(guild_id, limit).await.map(|records| {
            if records.is_empty() {
                return Reply::info(
                    "Anti-Nuke History",
                    "No anti-nuke actions have been taken yet.",
                );
            }

            records.iter().fold(
                Reply::info("Anti-Nuke History", "Most recent anti-nuke actions:"),
                |reply, record| {
                    reply.field(
                        format!("{} ({})", record.display_name, record.user_id),
                        format!(
                            "{}: {} (trigger count: {}) <t:{}:R>",
                            record.protection_kind.display_name(),
                            record.mitigation_description,
                            record.trigger_count,
                            record.timestamp_ms.div_euclid(1000)
                        ),
                        false,
                    )
                },
            )
        }),
        AntiNukeCommand::Reset => settings.reset(guild_id).await.map(|_| {
            Reply::success(
                "Anti-Nuke Reset",
                "Anti-nuke settings have been restored to their defaults and the action history was cleared.",
            )
        }),
    };

    match result {
        Ok(reply) => Ok(reply),
        Err(SettingsError::Store(e)) => Err(e.into()),
        Err(e) => Ok(rejected(&e)),
    }
}

fn status(config: &GuildProtectionConfig) -> Reply {
    let (users, roles) = describe_whitelist(config);

    let reply = Reply::info(
        "Anti-Nuke Status",
        "Current anti-nuke settings for this server:",
    )
    .field(
        "Status",
        if config.enabled { "Enabled" } else { "Disabled" },
        true,
    )
    .field(
        "Log Channel",
        config
            .log_channel_id
            .map_or_else(|| "Not set".to_string(), |channel| format!("<#{}>", channel)),
        true,
    )
    .field(
        "Actions Taken",
        config.action_history.len().to_string(),
        true,
    );

    ProtectionKind::ALL
        .into_iter()
        .fold(reply, |reply, kind| {
            reply.field(
                kind.display_name(),
                describe_rule(kind, &config.rule(kind)),
                false,
            )
        })
        .field("Whitelisted Users", users, false)
        .field("Whitelisted Roles", roles, false)
}

/// Error reply for a rejected settings change.
fn rejected(error: &SettingsError) -> Reply {
    let title = match error {
        SettingsError::UnknownProtection(_) => "Invalid Protection",
        SettingsError::NothingToUpdate => "Missing Parameters",
        SettingsError::NotRateBased { .. } => "Unsupported Setting",
        SettingsError::InvalidThreshold(_) | SettingsError::InvalidWindow(_) => "Invalid Value",
        SettingsError::UnknownAction(_) | SettingsError::InvalidAction { .. } => "Invalid Action",
        SettingsError::AlreadyWhitelisted(_) => "Already Whitelisted",
        SettingsError::NotWhitelisted(_) => "Not Whitelisted",
        SettingsError::Store(_) => "Settings Unavailable",
    };

    Reply::error(title, error.to_string())
}
