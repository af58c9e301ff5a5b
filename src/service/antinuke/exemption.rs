use serenity::all::{RoleId, UserId};

use crate::model::antinuke::GuildProtectionConfig;

/// Result of checking an actor against the guild's exemptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exemption {
    Owner,
    WhitelistedUser,
    WhitelistedRole(RoleId),
    NotExempt,
}

impl Exemption {
    pub fn exempts(self) -> bool {
        !matches!(self, Self::NotExempt)
    }
}

/// Checks owner, user whitelist and role whitelist, in that order.
///
/// `owner_id` is `None` when the guild owner could not be fetched and
/// `member_roles` is `None` when the actor's membership could not be resolved;
/// either check is then skipped.
pub fn is_exempt(
    actor: UserId,
    owner_id: Option<UserId>,
    config: &GuildProtectionConfig,
    member_roles: Option<&[RoleId]>,
) -> Exemption {
    if owner_id == Some(actor) {
        return Exemption::Owner;
    }

    if config.whitelisted_users.contains(&actor) {
        return Exemption::WhitelistedUser;
    }

    member_roles
        .into_iter()
        .flatten()
        .find(|role| config.whitelisted_roles.contains(role))
        .map(|role| Exemption::WhitelistedRole(*role))
        .unwrap_or(Exemption::NotExempt)
}
