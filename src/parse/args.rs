/// Argument prefixes understood by field-taking commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    Statement,
    Description,
    Tag,
    Link,
    Remark,
}

impl Prefix {
    pub const ALL: [Prefix; 5] = [
        Prefix::Statement,
        Prefix::Description,
        Prefix::Tag,
        Prefix::Link,
        Prefix::Remark,
    ];

    pub fn marker(self) -> &'static str {
        match self {
            Prefix::Statement => "s/",
            Prefix::Description => "d/",
            Prefix::Tag => "t/",
            Prefix::Link => "l/",
            Prefix::Remark => "r/",
        }
    }

    fn strip(token: &str) -> Option<(Prefix, &str)> {
        Prefix::ALL
            .into_iter()
            .find_map(|p| token.strip_prefix(p.marker()).map(|rest| (p, rest)))
    }
}

/// Arguments split into the text before the first prefix and the
/// prefixed values, in the order they were given.
///
/// Whitespace inside a value collapses to single spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgMap {
    pub preamble: String,
    values: Vec<(Prefix, String)>,
}

impl ArgMap {
    pub fn tokenize(args: &str) -> ArgMap {
        let mut map = ArgMap::default();
        for token in args.split_whitespace() {
            if let Some((prefix, rest)) = Prefix::strip(token) {
                map.values.push((prefix, rest.to_string()));
                continue;
            }
            let current = match map.values.last_mut() {
                Some((_, value)) => value,
                None => &mut map.preamble,
            };
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(token);
        }
        map
    }

    /// Every value given for `prefix`
    pub fn all(&self, prefix: Prefix) -> Vec<&str> {
        self.values
            .iter()
            .filter(|(p, _)| *p == prefix)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// The last value given for `prefix`
    pub fn last(&self, prefix: Prefix) -> Option<&str> {
        self.values
            .iter()
            .rev()
            .find(|(p, _)| *p == prefix)
            .map(|(_, v)| v.as_str())
    }

    pub fn has(&self, prefix: Prefix) -> bool {
        self.values.iter().any(|(p, _)| *p == prefix)
    }

    /// First prefix present that is not in `allowed`
    pub fn unexpected(&self, allowed: &[Prefix]) -> Option<Prefix> {
        self.values
            .iter()
            .map(|(p, _)| *p)
            .find(|p| !allowed.contains(p))
    }
}
