/// One row of an ordered keyword table.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule<T> {
    pub keywords: &'static [&'static str],
    pub outcome: T,
}

/// Ordered keyword rules: the first rule with any keyword contained in the
/// lower-cased text wins, otherwise `default`.
#[derive(Debug, Clone)]
pub struct KeywordRules<T> {
    rules: Vec<KeywordRule<T>>,
    default: T,
}

impl<T: Copy> KeywordRules<T> {
    pub fn new(rules: Vec<KeywordRule<T>>, default: T) -> Self {
        Self { rules, default }
    }

    pub fn classify(&self, text: &str) -> T {
        self.first_match(text).unwrap_or(self.default)
    }

    pub fn first_match(&self, text: &str) -> Option<T> {
        let lowered = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|kw| lowered.contains(kw)))
            .map(|rule| rule.outcome)
    }
}

/// Builds a rule table from `(keywords, outcome)` pairs.
pub fn rules<T: Copy>(pairs: &[(&'static [&'static str], T)], default: T) -> KeywordRules<T> {
    KeywordRules::new(
        pairs
            .iter()
            .map(|&(keywords, outcome)| KeywordRule { keywords, outcome })
            .collect(),
        default,
    )
}
