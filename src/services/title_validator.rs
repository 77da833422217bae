use log::{debug, warn};
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::config::TitleMode;
use crate::errors::WikiError;

/// Paths a title may be addressed under
pub const VALID_PATH_PATTERN: &str = r"^/(edit|save|view)/([a-zA-Z0-9]+)$";

const HANDLER_PREFIXES: [&str; 3] = ["/view/", "/edit/", "/save/"];

/// Extracts page titles from request paths
#[derive(Debug, Clone)]
pub enum TitleValidator {
    /// Title must be alphanumeric and the path must match exactly
    Validated(Regex),
    /// Everything after the handler prefix is the title.
    ///
    /// Titles may contain `/` or `..`, which escape the data directory.
    Prefix,
}

impl TitleValidator {
    /// Build the validator for `mode`, compiling the path pattern once
    pub fn new(mode: TitleMode) -> Result<Self, WikiError> {
        match mode {
            TitleMode::Validated => {
                let pattern = Regex::new(VALID_PATH_PATTERN)
                    .map_err(|e| WikiError::Config(format!("bad title pattern: {}", e)))?;
                Ok(TitleValidator::Validated(pattern))
            }
            TitleMode::Prefix => {
                warn!("Title validation disabled; page titles are taken verbatim from request paths");
                Ok(TitleValidator::Prefix)
            }
        }
    }

    /// Title addressed by a request path such as `/view/FrontPage`
    ///
    /// Both modes see the percent-decoded path, so `/view/%54est` is `Test`.
    pub fn title_from_path(&self, path: &str) -> Result<String, WikiError> {
        let decoded = percent_decode_str(path).decode_utf8_lossy();
        let title = match self {
            TitleValidator::Validated(pattern) => pattern
                .captures(&decoded)
                .and_then(|caps| caps.get(2))
                .map(|m| m.as_str().to_string()),
            TitleValidator::Prefix => HANDLER_PREFIXES
                .iter()
                .find_map(|prefix| decoded.strip_prefix(prefix))
                .filter(|rest| !rest.is_empty())
                .map(str::to_string),
        };

        match title {
            Some(title) => {
                debug!("Path '{}' addresses title '{}'", path, title);
                Ok(title)
            }
            None => {
                warn!("Rejected request path '{}'", path);
                Err(WikiError::InvalidTitle)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validated() -> TitleValidator {
        TitleValidator::new(TitleMode::Validated).unwrap()
    }

    fn prefix() -> TitleValidator {
        TitleValidator::new(TitleMode::Prefix).unwrap()
    }

    #[test]
    fn validated_accepts_alphanumeric_titles() {
        let titles = validated();
        assert_eq!(titles.title_from_path("/view/FrontPage").unwrap(), "FrontPage");
        assert_eq!(titles.title_from_path("/edit/Page2").unwrap(), "Page2");
        assert_eq!(titles.title_from_path("/save/x").unwrap(), "x");
    }

    #[test]
    fn validated_rejects_traversal_and_odd_characters() {
        let titles = validated();
        for path in [
            "/view/../etc",
            "/view/a/b",
            "/view/",
            "/view/with space",
            "/view/dash-ed",
            "/view/Test.txt",
            "/view/%2E%2E",
            "/view/..%2Fetc",
            "/view/a%2Fb",
            "/delete/Page",
            "/view/Page/",
            "view/Page",
        ] {
            assert!(
                matches!(titles.title_from_path(path), Err(WikiError::InvalidTitle)),
                "accepted {path}"
            );
        }
    }

    #[test]
    fn validated_matches_the_decoded_path() {
        let titles = validated();
        assert_eq!(titles.title_from_path("/view/%54est").unwrap(), "Test");
        assert_eq!(titles.title_from_path("/%65dit/Page").unwrap(), "Page");
    }

    #[test]
    fn prefix_takes_remainder_verbatim() {
        let titles = prefix();
        assert_eq!(titles.title_from_path("/view/Test").unwrap(), "Test");
        assert_eq!(titles.title_from_path("/edit/../etc").unwrap(), "../etc");
        assert_eq!(titles.title_from_path("/save/a/b").unwrap(), "a/b");
    }

    #[test]
    fn prefix_decodes_percent_escapes() {
        let titles = prefix();
        assert_eq!(titles.title_from_path("/view/My%20Page").unwrap(), "My Page");
    }

    #[test]
    fn prefix_still_needs_a_title() {
        let titles = prefix();
        assert!(titles.title_from_path("/view/").is_err());
        assert!(titles.title_from_path("/other/Page").is_err());
    }
}
