use std::collections::BTreeSet;
use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

snowflake!(
    /// A platform user.
    UserId
);
snowflake!(
    /// A guild (server).
    GuildId
);
snowflake!(
    /// A text channel, thread, or DM.
    ChannelId
);
snowflake!(
    /// A message within a channel.
    MessageId
);
snowflake!(
    /// A guild role.
    RoleId
);
snowflake!(InteractionId);

// ---------------------------------------------------------------------------
// Actors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Automated accounts (bots, webhooks) never trigger text commands.
    #[serde(default)]
    pub bot: bool,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into(), bot: false }
    }

    pub fn bot(mut self) -> Self {
        self.bot = true;
        self
    }
}

/// A user resolved within a guild, with the roles and capability flags
/// used for permission checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub user: User,
    pub guild_id: GuildId,
    #[serde(default)]
    pub roles: BTreeSet<RoleId>,
    #[serde(default)]
    pub permissions: Permissions,
}

impl Member {
    pub fn new(user: User, guild_id: impl Into<GuildId>) -> Self {
        Self {
            user,
            guild_id: guild_id.into(),
            roles: BTreeSet::new(),
            permissions: Permissions::empty(),
        }
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = RoleId>) -> Self {
        self.roles.extend(roles);
        self
    }

    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn has_any_role<'a>(&self, roles: impl IntoIterator<Item = &'a RoleId>) -> bool {
        roles.into_iter().any(|r| self.roles.contains(r))
    }
}

// ---------------------------------------------------------------------------
// Capability flags
// ---------------------------------------------------------------------------

bitflags! {
    /// Coarse platform capability flags, using the platform's bit positions.
    ///
    /// Serialises as `"KICK_MEMBERS | MANAGE_GUILD"` in human-readable formats.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Permissions: u64 {
        const CREATE_INSTANT_INVITE = 1 << 0;
        const KICK_MEMBERS = 1 << 1;
        const BAN_MEMBERS = 1 << 2;
        const ADMINISTRATOR = 1 << 3;
        const MANAGE_CHANNELS = 1 << 4;
        const MANAGE_GUILD = 1 << 5;
        const ADD_REACTIONS = 1 << 6;
        const VIEW_AUDIT_LOG = 1 << 7;
        const VIEW_CHANNEL = 1 << 10;
        const SEND_MESSAGES = 1 << 11;
        const MANAGE_MESSAGES = 1 << 13;
        const MENTION_EVERYONE = 1 << 17;
        const MANAGE_NICKNAMES = 1 << 27;
        const MANAGE_ROLES = 1 << 28;
        const MANAGE_WEBHOOKS = 1 << 29;
        const MODERATE_MEMBERS = 1 << 40;
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::empty()
    }
}

impl Permissions {
    /// Look up a flag by its platform name, ignoring case and surrounding
    /// whitespace: `"manage_guild"` resolves to [`Permissions::MANAGE_GUILD`].
    pub fn parse_name(name: &str) -> Option<Self> {
        Self::from_name(&name.trim().to_ascii_uppercase())
    }

    /// Names of the flags set on `self`, in bit order.
    pub fn names(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

// ---------------------------------------------------------------------------
// Rule sets
// ---------------------------------------------------------------------------

/// Who may invoke a command.
///
/// Non-empty `flags` decide on their own; otherwise the role lists apply,
/// with `deny_roles` taking precedence over `allow_roles`. A rule set with
/// everything empty places no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionRules {
    #[serde(default)]
    pub flags: Permissions,
    #[serde(default)]
    pub allow_roles: BTreeSet<RoleId>,
    #[serde(default)]
    pub deny_roles: BTreeSet<RoleId>,
}

impl PermissionRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_any(mut self, flags: Permissions) -> Self {
        self.flags |= flags;
        self
    }

    pub fn allow(mut self, role: impl Into<RoleId>) -> Self {
        self.allow_roles.insert(role.into());
        self
    }

    pub fn deny(mut self, role: impl Into<RoleId>) -> Self {
        self.deny_roles.insert(role.into());
        self
    }

    pub fn is_unrestricted(&self) -> bool {
        self.flags.is_empty() && self.allow_roles.is_empty() && self.deny_roles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_names_resolve_case_insensitively() {
        assert_eq!(Permissions::parse_name("manage_guild"), Some(Permissions::MANAGE_GUILD));
        assert_eq!(Permissions::parse_name(" Ban_Members "), Some(Permissions::BAN_MEMBERS));
        assert_eq!(Permissions::parse_name("FLY"), None);
    }

    #[test]
    fn intersects_needs_a_shared_bit() {
        let held = Permissions::SEND_MESSAGES | Permissions::KICK_MEMBERS;
        assert!(held.intersects(Permissions::KICK_MEMBERS | Permissions::BAN_MEMBERS));
        assert!(!held.intersects(Permissions::ADMINISTRATOR));
        assert!(!held.intersects(Permissions::empty()));
    }

    #[test]
    fn names_list_set_flags_in_bit_order() {
        let held = Permissions::MANAGE_GUILD | Permissions::KICK_MEMBERS;
        assert_eq!(held.names(), vec!["KICK_MEMBERS", "MANAGE_GUILD"]);
        assert!(Permissions::empty().names().is_empty());
    }

    #[test]
    fn rules_deserialize_from_camel_case() {
        let rules: PermissionRules =
            serde_json::from_str(r#"{"allowRoles":[1,2],"denyRoles":[3]}"#).unwrap();
        assert!(rules.flags.is_empty());
        assert_eq!(rules.allow_roles.len(), 2);
        assert!(rules.deny_roles.contains(&RoleId::new(3)));
        assert!(PermissionRules::new().is_unrestricted());
    }

    #[test]
    fn rule_flags_read_and_write_as_flag_names() {
        let rules: PermissionRules =
            serde_json::from_str(r#"{"flags":"BAN_MEMBERS | MANAGE_GUILD"}"#).unwrap();
        assert_eq!(rules.flags, Permissions::BAN_MEMBERS | Permissions::MANAGE_GUILD);

        let json = serde_json::to_value(&rules).unwrap();
        assert_eq!(json["flags"], "BAN_MEMBERS | MANAGE_GUILD");
    }

    #[test]
    fn unknown_platform_bits_are_dropped() {
        let p = Permissions::from_bits_truncate((1 << 3) | (1 << 9));
        assert_eq!(p, Permissions::ADMINISTRATOR);
        assert!(Permissions::from_bits(1 << 9).is_none());
    }
}
