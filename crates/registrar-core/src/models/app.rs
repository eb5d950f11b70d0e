//! Application metadata: dashboard modules and outgoing mail.

use serde::{Deserialize, Serialize};

use super::person::Role;
use super::wire::present;

/// A dashboard module and the roles allowed to open it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct ModuleInfo {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub href: String,
    pub roles: Vec<Role>,
}

impl ModuleInfo {
    /// Visible when the module lists `any` or shares a role with `roles`.
    pub fn is_visible_to(&self, roles: &[Role]) -> bool {
        self.roles
            .iter()
            .any(|r| *r == Role::Any || roles.contains(r))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct MailgunOptions {
    pub to: String,
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub cc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub bcc: Option<String>,
    pub subject: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub html: Option<String>,
}
