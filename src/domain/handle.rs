use crate::error::{Result, TempletError};
use std::fmt;
use std::str::FromStr;

/// Top-level template category, the first part of every handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Domain {
    Cli,
    Web,
    Gui,
    Pub,
    Lib,
}

impl Domain {
    pub const ALL: [Domain; 5] = [
        Domain::Cli,
        Domain::Web,
        Domain::Gui,
        Domain::Pub,
        Domain::Lib,
    ];

    /// Handle prefix for this domain
    pub fn name(&self) -> &'static str {
        match self {
            Domain::Cli => "cli",
            Domain::Web => "web",
            Domain::Gui => "gui",
            Domain::Pub => "pub",
            Domain::Lib => "lib",
        }
    }

    /// One-line description shown by `list` and `info`
    pub fn description(&self) -> &'static str {
        match self {
            Domain::Cli => "Command line applications",
            Domain::Web => "Websites and web services",
            Domain::Gui => "Desktop applications with a graphical interface",
            Domain::Pub => "Publications such as theses and articles",
            Domain::Lib => "Reusable libraries",
        }
    }
}

impl FromStr for Domain {
    type Err = TempletError;

    fn from_str(s: &str) -> Result<Self> {
        Domain::ALL
            .iter()
            .copied()
            .find(|domain| domain.name() == s)
            .ok_or_else(|| TempletError::registry(format!("Unknown template domain: '{}'", s)))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Dash-delimited template identifier such as `cli-python` or
/// `web-website-python`.
///
/// Holds 1 to 3 non-empty parts. Whether the parts name a known template
/// is decided by the registry, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle {
    parts: Vec<String>,
}

impl Handle {
    pub fn parse(text: &str) -> Result<Self> {
        let parts: Vec<String> = text.split('-').map(str::to_string).collect();
        if parts.len() > 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(TempletError::registry(format!(
                "Invalid handle '{}': expected <domain>[-<subdomain>][-<language>]",
                text
            )));
        }
        Ok(Handle { parts })
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// First part of the handle, e.g. `web` for `web-website-python`
    pub fn domain_part(&self) -> &str {
        &self.parts[0]
    }

    /// Resolve the first part to a known domain
    pub fn domain(&self) -> Result<Domain> {
        self.domain_part().parse()
    }

    /// Every proper prefix of the handle, shortest first.
    /// `web-website-python` yields `web` and `web-website`.
    pub fn prefixes(&self) -> Vec<String> {
        (1..self.parts.len())
            .map(|n| self.parts[..n].join("-"))
            .collect()
    }

    pub fn is_prefix_of(&self, other: &Handle) -> bool {
        self.parts.len() <= other.parts.len() && other.parts[..self.parts.len()] == self.parts[..]
    }
}

impl FromStr for Handle {
    type Err = TempletError;

    fn from_str(s: &str) -> Result<Self> {
        Handle::parse(s)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("-"))
    }
}
