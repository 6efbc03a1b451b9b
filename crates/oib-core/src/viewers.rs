//! External "open with" viewers.
//!
//! A viewer is either a web service or a browser extension that renders a
//! document from its URL. Definitions are validated and compiled once into a
//! [`ViewerRegistry`]; the engine only looks viewers up by id and MIME type.

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::percent::encode_uri_component;

/// Viewer definition as written in config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Identifier used in remembered actions (`+<id>`). `[A-Za-z0-9_]+`.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ViewerType,
    pub name: String,
    /// URL template. Variables: `${url}`, `${rawurl}`, and for extensions `${extensionid}`.
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extension_ids: Vec<String>,
    /// MIME patterns; `*` matches one or more characters.
    pub mime_types: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerType {
    Web,
    Extension,
}

/// Compiled viewer target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerKind {
    Web,
    Extension { extension_ids: Vec<String> },
}

#[derive(Debug, Clone)]
pub struct ExternalViewer {
    pub id: String,
    pub name: String,
    pub kind: ViewerKind,
    url_template: String,
    mime_types: Vec<String>,
    mime_pattern: Regex,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewerError {
    #[error("viewer id {0:?} may only contain A-Z a-z 0-9 _")]
    InvalidId(String),
    #[error("viewer {id}: invalid MIME pattern {pattern:?}")]
    InvalidMimePattern { id: String, pattern: String },
    #[error("viewer {0}: at least one MIME pattern is required")]
    NoMimePatterns(String),
    #[error("viewer {id}: unknown URL variable {variable:?}")]
    UnknownVariable { id: String, variable: String },
    #[error("viewer {0}: extension viewers need at least one extension id")]
    MissingExtensionIds(String),
    #[error("viewer {id}: invalid extension id {extension_id:?}")]
    InvalidExtensionId { id: String, extension_id: String },
    #[error("viewer {0}: extension ids are only valid for extension viewers")]
    UnexpectedExtensionIds(String),
    #[error("duplicate viewer id {0:?}")]
    DuplicateId(String),
}

impl ExternalViewer {
    /// Validate and compile a definition.
    pub fn compile(config: &ViewerConfig) -> Result<Self, ViewerError> {
        let id = config.id.clone();
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(ViewerError::InvalidId(id));
        }

        let kind = match config.kind {
            ViewerType::Web => {
                if !config.extension_ids.is_empty() {
                    return Err(ViewerError::UnexpectedExtensionIds(id));
                }
                ViewerKind::Web
            }
            ViewerType::Extension => {
                if config.extension_ids.is_empty() {
                    return Err(ViewerError::MissingExtensionIds(id));
                }
                if let Some(bad) = config.extension_ids.iter().find(|e| !is_extension_id(e)) {
                    return Err(ViewerError::InvalidExtensionId {
                        id,
                        extension_id: bad.clone(),
                    });
                }
                ViewerKind::Extension {
                    extension_ids: config.extension_ids.clone(),
                }
            }
        };

        for variable in template_variables(&config.url) {
            let allowed = matches!(variable, "url" | "rawurl")
                || (variable == "extensionid" && config.kind == ViewerType::Extension);
            if !allowed {
                return Err(ViewerError::UnknownVariable {
                    id,
                    variable: variable.to_string(),
                });
            }
        }

        if config.mime_types.is_empty() {
            return Err(ViewerError::NoMimePatterns(id));
        }
        if let Some(bad) = config.mime_types.iter().find(|m| !is_mime_pattern(m)) {
            return Err(ViewerError::InvalidMimePattern {
                id,
                pattern: bad.clone(),
            });
        }
        let mime_pattern = compile_mime_patterns(&config.mime_types).map_err(|_| {
            ViewerError::InvalidMimePattern {
                id: id.clone(),
                pattern: config.mime_types.join(", "),
            }
        })?;

        Ok(Self {
            id,
            name: config.name.clone(),
            kind,
            url_template: config.url.clone(),
            mime_types: config.mime_types.clone(),
            mime_pattern,
        })
    }

    /// True when this viewer accepts `mime_type` (case-insensitive).
    pub fn accepts(&self, mime_type: &str) -> bool {
        self.mime_pattern.is_match(mime_type)
    }

    pub fn mime_types(&self) -> &[String] {
        &self.mime_types
    }

    /// Target URL for opening `url` in this viewer.
    pub fn target_url(&self, url: &str) -> String {
        let extension_id = match &self.kind {
            ViewerKind::Extension { extension_ids } => extension_ids.first().map(String::as_str),
            ViewerKind::Web => None,
        };
        self.url_template
            .replace("${url}", &encode_uri_component(url))
            .replace("${rawurl}", url)
            .replace("${extensionid}", extension_id.unwrap_or(""))
    }
}

fn template_variables(template: &str) -> impl Iterator<Item = &str> {
    template.split("${").skip(1).filter_map(|s| s.split_once('}').map(|(v, _)| v))
}

/// Chromium extension ids: 32 characters in `a..=p`.
fn is_extension_id(s: &str) -> bool {
    s.len() == 32 && s.bytes().all(|b| (b'a'..=b'p').contains(&b))
}

/// `token/token` with the RFC 2045 token characters plus `*` wildcards.
fn is_mime_pattern(s: &str) -> bool {
    fn is_token(t: &str) -> bool {
        !t.is_empty()
            && t.chars().all(|c| {
                c.is_ascii_alphanumeric() || ".*-_%'`#&~!$^+{}|".contains(c)
            })
    }
    match s.split_once('/') {
        Some((ty, sub)) => is_token(ty) && is_token(sub),
        None => false,
    }
}

fn compile_mime_patterns(patterns: &[String]) -> Result<Regex, regex::Error> {
    let alternatives: Vec<String> = patterns
        .iter()
        .map(|p| format!("(?:{})", regex::escape(p).replace(r"\*", ".+")))
        .collect();
    Regex::new(&format!("(?i)^(?:{})$", alternatives.join("|")))
}

/// Viewer definitions shipped with the crate.
pub fn builtin_viewer_configs() -> Vec<ViewerConfig> {
    vec![ViewerConfig {
        id: "google_docs".to_string(),
        kind: ViewerType::Web,
        name: "Google Docs Viewer".to_string(),
        url: "https://docs.google.com/viewer?url=${url}".to_string(),
        extension_ids: Vec::new(),
        mime_types: vec!["*/*".to_string()],
    }]
}

/// Compiled, immutable set of viewers.
#[derive(Debug, Clone, Default)]
pub struct ViewerRegistry {
    viewers: Vec<ExternalViewer>,
}

impl ViewerRegistry {
    pub fn from_configs<'a, I>(configs: I) -> Result<Self, ViewerError>
    where
        I: IntoIterator<Item = &'a ViewerConfig>,
    {
        let mut viewers: Vec<ExternalViewer> = Vec::new();
        for config in configs {
            let viewer = ExternalViewer::compile(config)?;
            if viewers.iter().any(|v| v.id == viewer.id) {
                return Err(ViewerError::DuplicateId(viewer.id));
            }
            viewers.push(viewer);
        }
        Ok(Self { viewers })
    }

    /// Built-in viewers followed by `extra`.
    pub fn with_builtin(extra: &[ViewerConfig]) -> Result<Self, ViewerError> {
        let builtin = builtin_viewer_configs();
        Self::from_configs(builtin.iter().chain(extra.iter()))
    }

    pub fn get(&self, id: &str) -> Option<&ExternalViewer> {
        self.viewers.iter().find(|v| v.id == id)
    }

    /// Viewers accepting `mime_type`, in registration order.
    pub fn for_mime<'a>(&'a self, mime_type: &'a str) -> impl Iterator<Item = &'a ExternalViewer> {
        self.viewers.iter().filter(move |v| v.accepts(mime_type))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExternalViewer> {
        self.viewers.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.viewers.is_empty()
    }
}
