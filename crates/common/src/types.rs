//! Core types for MeshInvite

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A tinc node name.
///
/// Tinc only accepts `[a-zA-Z0-9_]` in node names and treats them as case
/// sensitive, so a `NodeName` is never empty and never holds anything else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeName(String);

impl NodeName {
    /// Validate a node name
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_name(&name, "name is empty"));
        }
        if let Some((position, c)) = name
            .char_indices()
            .find(|(_, c)| !is_node_name_char(*c))
        {
            return Err(Error::invalid_name(
                &name,
                format!("character {:?} at position {} is not allowed", c, position),
            ));
        }
        Ok(Self(name))
    }

    /// The same name with one more trailing underscore
    pub fn suffixed(&self) -> Self {
        Self(format!("{}_", self.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodeName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for NodeName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<NodeName> for String {
    fn from(name: NodeName) -> Self {
        name.0
    }
}

/// Characters tinc accepts in a node name
pub fn is_node_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A pending invitation as reported by `tinc dump invitations`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteRecord {
    /// Opaque invitation handle issued by the daemon
    pub token: String,
    /// Node name the invitation was issued for
    pub owner: String,
}

/// A node the daemon currently holds a live connection to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachableNode {
    pub name: String,
    /// `host:port`
    pub address: String,
}

/// Normalized outcome of one control-channel invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub succeeded: bool,
}

impl CommandResult {
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            succeeded: true,
        }
    }

    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            succeeded: false,
        }
    }

    /// The stream a caller should read: stdout on success, stderr otherwise.
    pub fn text(&self) -> &str {
        if self.succeeded {
            &self.stdout
        } else {
            &self.stderr
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_node_names() {
        assert_eq!(NodeName::new("alice").unwrap().as_str(), "alice");
        assert_eq!(NodeName::new("_Bob_42").unwrap().as_str(), "_Bob_42");
        assert_eq!(NodeName::new("123456789").unwrap().as_str(), "123456789");
    }

    #[test]
    fn test_invalid_node_names() {
        assert!(matches!(NodeName::new(""), Err(Error::InvalidName { .. })));
        assert!(matches!(NodeName::new("alice bob"), Err(Error::InvalidName { .. })));
        assert!(matches!(NodeName::new("alice-bob"), Err(Error::InvalidName { .. })));
        assert!(matches!(NodeName::new("zoë"), Err(Error::InvalidName { .. })));
    }

    #[test]
    fn test_suffixed() {
        let name = NodeName::new("alice").unwrap();
        assert_eq!(name.suffixed().as_str(), "alice_");
        assert_eq!(name.suffixed().suffixed().as_str(), "alice__");
    }

    #[test]
    fn test_node_name_deserialize_validates() {
        #[derive(Deserialize)]
        struct Entry {
            name: NodeName,
        }

        let ok: Entry = toml::from_str(r#"name = "carol""#).unwrap();
        assert_eq!(ok.name.as_str(), "carol");

        assert!(toml::from_str::<Entry>(r#"name = "carol smith""#).is_err());
    }

    #[test]
    fn test_command_result_text() {
        assert_eq!(CommandResult::success("out").text(), "out");
        assert_eq!(CommandResult::failure("err").text(), "err");
    }
}
