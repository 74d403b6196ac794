//! 厂商名称匹配
//!
//! 所有扫描器共用同一个 [`PatternMatcher`]，保证"属于该厂商"的判定处处一致。
//! 关键字按字面子串匹配，不区分大小写，不要求单词边界。

use regex::{Regex, RegexBuilder};

use crate::modules::common::error::UninstallerError;

#[derive(Debug, Clone)]
pub struct PatternMatcher {
    tokens: Vec<String>,
    regex: Regex,
}

impl PatternMatcher {
    pub fn new<I, S>(tokens: I) -> Result<Self, UninstallerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokens: Vec<String> = tokens
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if tokens.is_empty() {
            return Err(UninstallerError::Pattern("匹配关键字不能为空".to_string()));
        }

        let alternation = tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");

        let regex = RegexBuilder::new(&alternation)
            .case_insensitive(true)
            .build()?;

        Ok(Self { tokens, regex })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> PatternMatcher {
        PatternMatcher::new(["Beckhoff", "TwinCAT", "TcXaeShell"]).unwrap()
    }

    #[test]
    fn matches_vendor_paths() {
        let m = matcher();
        assert!(m.matches(r"C:\Program Files\Beckhoff\Foo"));
        assert!(!m.matches(r"C:\Program Files\OtherVendor"));
    }

    #[test]
    fn matching_ignores_case() {
        assert!(matcher().matches("twincat"));
        assert!(matcher().matches("TCXAESHELL.EXE-1A2B3C4D.pf"));
    }

    #[test]
    fn tokens_are_literal_text() {
        let m = PatternMatcher::new(["Tc.Ads+"]).unwrap();
        assert!(m.matches("Beckhoff.Tc.Ads+.dll"));
        assert!(!m.matches("TcXAdss"));
    }

    #[test]
    fn empty_pattern_set_is_rejected() {
        assert!(PatternMatcher::new(Vec::<String>::new()).is_err());
        assert!(PatternMatcher::new(["  "]).is_err());
    }
}
