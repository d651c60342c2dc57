//! Finding explanations
//!
//! A [`Reason`] is a run of text parts, some flagged for emphasis. The HTML
//! report highlights those parts; everywhere else the reason reads as the
//! plain concatenation (its `Display`).

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonPart {
    pub text: String,
    pub emphasis: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reason {
    parts: Vec<ReasonPart>,
}

impl Reason {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append plain text
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.push(text.into(), false);
        self
    }

    /// Append highlighted text
    pub fn emphasis(mut self, text: impl Into<String>) -> Self {
        self.push(text.into(), true);
        self
    }

    fn push(&mut self, text: String, emphasis: bool) {
        if !text.is_empty() {
            self.parts.push(ReasonPart { text, emphasis });
        }
    }

    pub fn parts(&self) -> &[ReasonPart] {
        &self.parts
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for part in &self.parts {
            f.write_str(&part.text)?;
        }
        Ok(())
    }
}

impl From<String> for Reason {
    fn from(text: String) -> Self {
        Self::new().text(text)
    }
}

impl From<&str> for Reason {
    fn from(text: &str) -> Self {
        Self::new().text(text)
    }
}

impl PartialEq<&str> for Reason {
    fn eq(&self, other: &&str) -> bool {
        let mut rest = *other;
        for part in &self.parts {
            match rest.strip_prefix(part.text.as_str()) {
                Some(tail) => rest = tail,
                None => return false,
            }
        }
        rest.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_flattens_parts() {
        let reason = Reason::new()
            .text("would break ")
            .emphasis("Champs")
            .text(" standard");
        assert_eq!(reason.to_string(), "would break Champs standard");
        assert_eq!(reason, "would break Champs standard");
        assert!(reason != "would break Champs");

        let flags: Vec<bool> = reason.parts().iter().map(|p| p.emphasis).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[test]
    fn test_plain_conversion() {
        let reason = Reason::from("Its a relay");
        assert_eq!(reason.parts().len(), 1);
        assert!(!reason.parts()[0].emphasis);
        assert!(Reason::from(String::new()).parts().is_empty());
    }
}
