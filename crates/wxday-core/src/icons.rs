//! Condition code to display icon lookup

use std::collections::HashMap;
use tracing::debug;

/// Maps provider condition codes (`"01d"`, `"10n"`, ...) to icon identifiers
///
/// The table is handed in at construction. A code missing from the table
/// is not an error: the caller's fallback is returned instead.
#[derive(Debug, Clone, Default)]
pub struct ConditionIconMapper {
    table: HashMap<String, String>,
}

impl ConditionIconMapper {
    pub fn new(table: HashMap<String, String>) -> Self {
        Self { table }
    }

    pub fn icon_for(&self, code: &str, fallback: &str) -> String {
        match self.table.get(code) {
            Some(icon) => icon.clone(),
            None => {
                debug!(code, fallback, "unknown condition code, using fallback icon");
                fallback.to_string()
            }
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.table.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ConditionIconMapper
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(code, icon)| (code.into(), icon.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> ConditionIconMapper {
        ConditionIconMapper::from_iter([
            ("01d", "sun.max.fill"),
            ("09d", "cloud.heavyrain.fill"),
            ("10n", "cloud.moon.rain.fill"),
        ])
    }

    #[test]
    fn test_known_code() {
        let icons = mapper();
        assert_eq!(icons.icon_for("09d", "cloud.sun.fill"), "cloud.heavyrain.fill");
        assert_eq!(icons.icon_for("10n", "cloud.sun.fill"), "cloud.moon.rain.fill");
        assert!(icons.contains("01d"));
        assert_eq!(icons.len(), 3);
    }

    #[test]
    fn test_unknown_code_uses_fallback() {
        let icons = mapper();
        assert_eq!(icons.icon_for("zz", "cloud.sun.fill"), "cloud.sun.fill");
        assert_eq!(icons.icon_for("", "moon.stars.fill"), "moon.stars.fill");
    }

    #[test]
    fn test_empty_table() {
        let icons = ConditionIconMapper::default();
        assert!(icons.is_empty());
        assert_eq!(icons.icon_for("01d", "fallback"), "fallback");
    }
}
