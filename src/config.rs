// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Views configuration document.
//!
//! The document is YAML and is re-read at the start of every reconciliation pass,
//! so edits take effect without a restart:
//!
//! ```yaml
//! managed_only: true
//! views:
//!   vpn:
//!     priority: 0
//!     networks:
//!       - 10.1.0.0/16
//!   aws:
//!     priority: 1
//!     url: https://example.com/aws-ranges.txt
//!   office: ~
//! ```
//!
//! View order matters: priority ties keep the order the views appear in the
//! document, so [`ViewSet`] preserves it instead of collecting into a hash map.

use crate::errors::ConfigError;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Parsed views configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SyncConfig {
    /// Configured views in document order
    #[serde(default, deserialize_with = "null_as_default")]
    pub views: ViewSet,

    /// Reset unconfigured networks to `default` and delete unconfigured views
    #[serde(default, deserialize_with = "null_as_default")]
    pub managed_only: bool,
}

/// One view entry. An empty or `null` entry is the same as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ViewConfig {
    /// Lower priorities are processed first; later views win overlapping networks
    #[serde(default, deserialize_with = "null_as_default")]
    pub priority: i64,

    /// Static CIDR list
    #[serde(default)]
    pub networks: Option<Vec<String>>,

    /// Remote plaintext list of networks, one per line
    #[serde(default)]
    pub url: Option<String>,
}

impl ViewConfig {
    /// View with a static network list and no remote source.
    #[must_use]
    pub fn with_networks<I, S>(priority: i64, networks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            priority,
            networks: Some(networks.into_iter().map(Into::into).collect()),
            url: None,
        }
    }

    /// View sourced from a remote list only.
    #[must_use]
    pub fn with_url(priority: i64, url: impl Into<String>) -> Self {
        Self {
            priority,
            networks: None,
            url: Some(url.into()),
        }
    }
}

/// Ordered collection of configured views, keyed by unique name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSet(Vec<(String, ViewConfig)>);

impl ViewSet {
    /// Insert or replace a view. A replaced view keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, view: ViewConfig) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = view,
            None => self.0.push((name, view)),
        }
    }

    /// Look up a view by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ViewConfig> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, view)| view)
    }

    /// `true` when a view with this name is configured.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of configured views.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when no views are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Views in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ViewConfig)> {
        self.0.iter().map(|(name, view)| (name.as_str(), view))
    }

    /// Views sorted ascending by priority.
    ///
    /// The sort is stable: equal priorities keep document order.
    #[must_use]
    pub fn by_priority(&self) -> Vec<(&str, &ViewConfig)> {
        let mut views: Vec<_> = self.iter().collect();
        views.sort_by_key(|(_, view)| view.priority);
        views
    }
}

impl<S: Into<String>> FromIterator<(S, ViewConfig)> for ViewSet {
    fn from_iter<T: IntoIterator<Item = (S, ViewConfig)>>(iter: T) -> Self {
        let mut set = Self::default();
        for (name, view) in iter {
            set.insert(name, view);
        }
        set
    }
}

impl<'de> Deserialize<'de> for ViewSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ViewSetVisitor;

        impl<'de> Visitor<'de> for ViewSetVisitor {
            type Value = ViewSet;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a mapping of view name to view settings")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut views = ViewSet::default();
                while let Some((name, view)) = map.next_entry::<String, Option<ViewConfig>>()? {
                    views.insert(name, view.unwrap_or_default());
                }
                Ok(views)
            }
        }

        deserializer.deserialize_map(ViewSetVisitor)
    }
}

/// Deserialize `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a views document. An empty document is an empty configuration.
///
/// # Errors
///
/// Returns the YAML error if the document is not a valid views mapping.
pub fn parse_sync_config(text: &str) -> Result<SyncConfig, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(SyncConfig::default());
    }

    let value: serde_yaml::Value = serde_yaml::from_str(text)?;
    if value.is_null() {
        return Ok(SyncConfig::default());
    }

    serde_yaml::from_value(value)
}

/// Load the views document from disk.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when the file does not exist, [`ConfigError::Read`]
/// for other I/O failures and [`ConfigError::Parse`] for invalid YAML.
pub async fn load_sync_config(path: &Path) -> Result<SyncConfig, ConfigError> {
    let display = path.display().to_string();

    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound { path: display });
        }
        Err(e) => {
            return Err(ConfigError::Read {
                path: display,
                reason: e.to_string(),
            });
        }
    };

    parse_sync_config(&text).map_err(|e| ConfigError::Parse {
        path: display,
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
