/// The acting user of a request.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum User {
    Anonymous,
    Authenticated(String),
}

impl User {
    /// Build a user from a raw header value. Blank values count as anonymous.
    pub fn from_header_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(name) if !name.is_empty() => User::Authenticated(name.to_string()),
            _ => User::Anonymous,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, User::Authenticated(_))
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            User::Authenticated(name) => Some(name),
            User::Anonymous => None,
        }
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            User::Anonymous => write!(f, "<anonymous>"),
            User::Authenticated(name) => write!(f, "{}", name),
        }
    }
}
