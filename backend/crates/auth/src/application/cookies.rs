//! Cookie Changes
//!
//! Application services never touch HTTP responses. They record which token
//! cookies should be set or cleared, and the presentation layer turns the
//! record into `Set-Cookie` headers.

/// The two token cookies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCookie {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieChange {
    Set(TokenCookie, String),
    Clear(TokenCookie),
}

impl CookieChange {
    pub fn cookie(&self) -> TokenCookie {
        match self {
            CookieChange::Set(cookie, _) | CookieChange::Clear(cookie) => *cookie,
        }
    }
}

/// Pending cookie changes for one response. The last change per cookie wins.
#[derive(Debug, Default)]
pub struct CookieChanges {
    changes: Vec<CookieChange>,
}

impl CookieChanges {
    pub fn set(&mut self, cookie: TokenCookie, value: impl Into<String>) {
        self.push(CookieChange::Set(cookie, value.into()));
    }

    pub fn clear(&mut self, cookie: TokenCookie) {
        self.push(CookieChange::Clear(cookie));
    }

    pub fn clear_all(&mut self) {
        self.clear(TokenCookie::Access);
        self.clear(TokenCookie::Refresh);
    }

    fn push(&mut self, change: CookieChange) {
        self.changes.retain(|c| c.cookie() != change.cookie());
        self.changes.push(change);
    }

    /// Value being set for `cookie`, if any
    pub fn value_of(&self, cookie: TokenCookie) -> Option<&str> {
        self.changes.iter().find_map(|c| match c {
            CookieChange::Set(target, value) if *target == cookie => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn is_cleared(&self, cookie: TokenCookie) -> bool {
        self.changes.contains(&CookieChange::Clear(cookie))
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CookieChange> {
        self.changes.iter()
    }
}
