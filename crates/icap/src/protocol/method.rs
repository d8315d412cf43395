use std::fmt;

/// ICAP request methods.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// Request modification
    Reqmod,
    /// Response modification
    Respmod,
    /// Capability query
    Options,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Reqmod => "REQMOD",
            Method::Respmod => "RESPMOD",
            Method::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_token() {
        assert_eq!(Method::Reqmod.to_string(), "REQMOD");
        assert_eq!(Method::Respmod.to_string(), "RESPMOD");
        assert_eq!(Method::Options.to_string(), "OPTIONS");
    }
}
