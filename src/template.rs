//! Placeholder substitution for resource templates.
//!
//! A placeholder is an `@NAME@` token whose name consists of ASCII uppercase
//! letters, digits and underscores. Only the names in [`Placeholder`] are
//! accepted; any other token, or a known token without a value, fails the
//! render instead of leaking into the written resource. Text that does not
//! form a token (e-mail addresses, lone `@`) is copied unchanged.
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::TemplateError;

/// The closed set of supported placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    /// Absolute path of the installed checkout.
    TargetDir,
}

impl Placeholder {
    /// Every supported placeholder.
    pub const ALL: &'static [Self] = &[Self::TargetDir];

    /// Name between the `@` delimiters.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TargetDir => "TARGET_DIR",
        }
    }

    /// The literal token as it appears in templates.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::TargetDir => "@TARGET_DIR@",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }
}

/// Values substituted for each placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitutions(BTreeMap<Placeholder, String>);

impl Substitutions {
    /// An empty substitution set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitutions used by install: the checkout's absolute path.
    #[must_use]
    pub fn for_install(root: &Path) -> Self {
        Self::new().with(Placeholder::TargetDir, root.to_string_lossy())
    }

    /// Set the value for `placeholder`.
    #[must_use]
    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.0.insert(placeholder, value.into());
        self
    }

    /// Value for `placeholder`, if set.
    #[must_use]
    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.0.get(&placeholder).map(String::as_str)
    }
}

fn is_token_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Substitute every placeholder in `template`.
///
/// Pure: the result is only returned, never written.
///
/// # Errors
///
/// Returns [`TemplateError::UnknownPlaceholder`] for a token outside the
/// supported set, or [`TemplateError::Unresolved`] for a supported token
/// with no value in `substitutions`.
///
/// # Examples
///
/// ```
/// use turing_setup::template::{render, Placeholder, Substitutions};
///
/// let subs = Substitutions::new().with(Placeholder::TargetDir, "/opt/turing");
/// let out = render("ExecStart=@TARGET_DIR@/venv/bin/python3.11", &subs).unwrap();
/// assert_eq!(out, "ExecStart=/opt/turing/venv/bin/python3.11");
/// ```
pub fn render(template: &str, substitutions: &Substitutions) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((before, after)) = rest.split_once('@') {
        out.push_str(before);
        match after.split_once('@') {
            Some((name, tail)) if is_token_name(name) => {
                let placeholder =
                    Placeholder::from_name(name).ok_or_else(|| TemplateError::UnknownPlaceholder {
                        token: format!("@{name}@"),
                    })?;
                let value =
                    substitutions
                        .get(placeholder)
                        .ok_or_else(|| TemplateError::Unresolved {
                            token: placeholder.token().to_string(),
                        })?;
                out.push_str(value);
                rest = tail;
            }
            _ => {
                out.push('@');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}
