//! Catalogue of available templates.
//!
//! The built-in catalogue is compiled into the binary; a user copy at
//! `<config dir>/templet/available_templates.toml` replaces it when present.

use crate::domain::{Domain, Handle, SemanticVersion};
use crate::error::{Result, TempletError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::PathBuf;

const BUILTIN_TEMPLATES: &str = include_str!("templates/available_templates.toml");

/// One template as listed in the catalogue
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TemplateInfo {
    pub name: String,
    pub handle: String,
    pub version: String,
    pub short_description: String,
    #[serde(default)]
    pub long_description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Registry {
    templates: Vec<TemplateInfo>,
}

/// Location of the user override, if a config directory exists
pub fn user_registry_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("templet").join("available_templates.toml"))
}

fn collect_templates(table: &toml::Table, out: &mut Vec<TemplateInfo>) -> Result<()> {
    for (key, value) in table {
        let Some(inner) = value.as_table() else {
            continue;
        };
        if inner.contains_key("handle") {
            let info: TemplateInfo = value.clone().try_into().map_err(|e| {
                TempletError::registry(format!("Invalid template entry '{}': {}", key, e))
            })?;
            out.push(info);
        } else {
            collect_templates(inner, out)?;
        }
    }
    Ok(())
}

impl Registry {
    /// Load the user catalogue when present, the built-in one otherwise
    pub fn load() -> Result<Self> {
        if let Some(path) = user_registry_path() {
            if path.is_file() {
                debug!("Loading template catalogue from {}", path.display());
                return Registry::from_toml(&fs::read_to_string(&path)?);
            }
        }
        Registry::builtin()
    }

    pub fn builtin() -> Result<Self> {
        Registry::from_toml(BUILTIN_TEMPLATES)
    }

    /// Parse a catalogue. Every entry must carry a valid handle with a known
    /// domain and a valid version.
    pub fn from_toml(content: &str) -> Result<Self> {
        let table: toml::Table = toml::from_str(content)?;
        let mut templates = Vec::new();
        collect_templates(&table, &mut templates)?;

        for info in &templates {
            Handle::parse(&info.handle)?.domain()?;
            SemanticVersion::parse(&info.version).map_err(|e| {
                TempletError::registry(format!("Template '{}': {}", info.handle, e))
            })?;
        }

        templates.sort_by(|a, b| a.handle.cmp(&b.handle));
        debug!("Template catalogue holds {} templates", templates.len());
        Ok(Registry { templates })
    }

    pub fn templates(&self) -> &[TemplateInfo] {
        &self.templates
    }

    /// Exact lookup by full handle
    pub fn find(&self, handle: &str) -> Option<&TemplateInfo> {
        self.templates.iter().find(|t| t.handle == handle)
    }

    /// All templates whose handle starts with the parts of `prefix`
    pub fn matching(&self, prefix: &Handle) -> Vec<&TemplateInfo> {
        self.templates
            .iter()
            .filter(|t| {
                Handle::parse(&t.handle)
                    .map(|h| prefix.is_prefix_of(&h))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Every full handle plus each of its prefixes. This is the set of
    /// strings `info` accepts and suggestions are drawn from.
    pub fn vocabulary(&self) -> BTreeSet<String> {
        let mut vocabulary = BTreeSet::new();
        for info in &self.templates {
            if let Ok(handle) = Handle::parse(&info.handle) {
                vocabulary.extend(handle.prefixes());
            }
            vocabulary.insert(info.handle.clone());
        }
        vocabulary
    }

    /// Current version of the template behind `handle`
    pub fn template_version(&self, handle: &str) -> Result<SemanticVersion> {
        let info = self
            .find(handle)
            .ok_or_else(|| TempletError::registry(format!("Unknown template handle '{}'", handle)))?;
        Ok(SemanticVersion::parse(&info.version)?)
    }

    /// Templates grouped by domain, in declaration order of [`Domain::ALL`]
    pub fn by_domain(&self) -> BTreeMap<Domain, Vec<&TemplateInfo>> {
        let mut grouped: BTreeMap<Domain, Vec<&TemplateInfo>> = BTreeMap::new();
        for info in &self.templates {
            if let Ok(domain) = Handle::parse(&info.handle).and_then(|h| h.domain()) {
                grouped.entry(domain).or_default().push(info);
            }
        }
        grouped
    }
}
