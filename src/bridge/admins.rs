//! Admin directory: remote identity to in-game login.
//!
//! Rebuilt wholesale from the admin setting on every reload. An entry with
//! an empty login may relay plain chat but cannot run commands as a player.

/// Separator between admin entries.
const ENTRY_SEPARATOR: char = ',';

/// Separator between the remote identity and the bound login.
const LOGIN_SEPARATOR: char = '=';

/// One allow-listed remote identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminEntry {
    pub remote_identity: String,
    /// Empty when the admin has no bound player.
    pub in_game_login: String,
}

impl AdminEntry {
    pub fn new(remote_identity: impl Into<String>, in_game_login: impl Into<String>) -> Self {
        Self {
            remote_identity: remote_identity.into(),
            in_game_login: in_game_login.into(),
        }
    }

    pub fn has_login(&self) -> bool {
        !self.in_game_login.is_empty()
    }
}

/// Ordered, immutable list of admins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminDirectory {
    entries: Vec<AdminEntry>,
}

impl AdminDirectory {
    /// Parse `identity[=login]` entries separated by commas.
    ///
    /// Whitespace around both parts is ignored. Entries that do not split
    /// into one or two parts, or whose identity is empty, are skipped. A
    /// repeated identity keeps its first entry.
    pub fn parse(input: &str) -> Self {
        let mut entries: Vec<AdminEntry> = Vec::new();

        for raw in input.split(ENTRY_SEPARATOR) {
            let parts: Vec<&str> = raw.trim().split(LOGIN_SEPARATOR).map(str::trim).collect();
            let (identity, login) = match parts.as_slice() {
                [identity] => (*identity, ""),
                [identity, login] => (*identity, *login),
                _ => continue,
            };
            if identity.is_empty() {
                continue;
            }
            if entries.iter().any(|e| e.remote_identity == identity) {
                continue;
            }
            entries.push(AdminEntry::new(identity, login));
        }

        Self { entries }
    }

    pub fn entries(&self) -> &[AdminEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, identity: &str) -> Option<&AdminEntry> {
        self.entries.iter().find(|e| e.remote_identity == identity)
    }

    pub fn is_admin(&self, identity: &str) -> bool {
        self.get(identity).is_some()
    }

    /// Bound login of `identity`, if it is an admin with a bound player.
    pub fn resolve_login(&self, identity: &str) -> Option<&str> {
        self.get(identity)
            .filter(|e| e.has_login())
            .map(|e| e.in_game_login.as_str())
    }
}
