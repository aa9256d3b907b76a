//! Permission evaluator: decides whether a member may invoke a command.
//!
//! Pure and synchronous. The router runs it for text commands, and for
//! interactions when `RouterSettings::check_interaction_permissions` is set.

use switchboard_core::{Member, PermissionRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

impl Access {
    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }

    fn from_bool(allowed: bool) -> Self {
        if allowed { Self::Allow } else { Self::Deny }
    }
}

/// Evaluate `rules` against `actor`, short-circuiting in order:
///
/// 1. no rule set, or an empty one, allows;
/// 2. capability flags, when present, decide alone (any held flag allows);
/// 3. a held role on the deny list denies;
/// 4. a held role on the allow list allows;
/// 5. anything else denies.
pub fn evaluate(actor: &Member, rules: Option<&PermissionRules>) -> Access {
    let Some(rules) = rules else {
        return Access::Allow;
    };
    if rules.is_unrestricted() {
        return Access::Allow;
    }

    if !rules.flags.is_empty() {
        return Access::from_bool(actor.permissions.intersects(rules.flags));
    }

    if actor.has_any_role(&rules.deny_roles) {
        return Access::Deny;
    }
    if actor.has_any_role(&rules.allow_roles) {
        return Access::Allow;
    }

    // A list was present and the actor matched neither.
    Access::Deny
}
