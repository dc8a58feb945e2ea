use crate::error::{KpiError, Result};
use crate::model::{RepoRef, FORGE_HOST};
use url::Url;

/// Resolve `<scheme>://github.com/<owner>/<repo>` into a [`RepoRef`].
///
/// Matching is literal: the host must equal the forge host byte for byte
/// and owner and repo are returned exactly as written. Case variants,
/// backslashes, dot segments, whitespace, control characters, trailing
/// slashes, ports, credentials, queries and fragments are all rejected.
pub fn resolve_url(input: &str) -> Result<RepoRef> {
    let invalid = || KpiError::InvalidUrl(input.to_string());

    if input.chars().any(|c| c.is_whitespace() || c.is_control() || c == '\\') {
        return Err(invalid());
    }

    let (scheme, rest) = input.split_once("://").ok_or_else(invalid)?;
    if !is_scheme(scheme) {
        return Err(invalid());
    }

    let parts: Vec<&str> = rest.split('/').collect();
    let [host, owner, repo] = parts.as_slice() else {
        return Err(invalid());
    };
    if *host != FORGE_HOST || !is_segment(owner) || !is_segment(repo) {
        return Err(invalid());
    }

    // The parser must agree with the literal split without rewriting it.
    let parsed = Url::parse(input).map_err(|_| invalid())?;
    let segments: Vec<&str> = parsed.path_segments().ok_or_else(invalid)?.collect();
    if parsed.host_str() != Some(FORGE_HOST)
        || parsed.port().is_some()
        || !parsed.username().is_empty()
        || parsed.query().is_some()
        || parsed.fragment().is_some()
        || segments != [*owner, *repo]
    {
        return Err(invalid());
    }

    Ok(RepoRef::new(*owner, *repo))
}

fn is_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn is_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['?', '#', '@', ':', '%'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn resolves_owner_and_repo() {
        let repo = resolve_url("https://github.com/UCL-RITS/RSD-Dashboard").unwrap();
        assert_eq!(repo, RepoRef::new("UCL-RITS", "RSD-Dashboard"));
    }

    #[test]
    fn rejects_other_shapes() {
        for bad in [
            "",
            "github.com/owner/repo",
            "https://gitlab.com/owner/repo",
            "https://github.com/owner",
            "https://github.com/owner/repo/",
            "https://github.com/owner/repo/tree/main",
            "https://github.com//repo",
            "https://github.com:8443/owner/repo",
            "https://github.com/owner/repo?tab=readme",
            "https://github.com/owner/repo#readme",
            "https://user@github.com/owner/repo",
            "https://GITHUB.COM/owner/repo",
            "https:\\\\github.com\\owner\\repo",
            "https://github.com/x/../owner/repo",
            "https://github.com/./repo",
            "https://github.com/ow\tner/repo",
            "https://github.com/owner/repo\n",
            " https://github.com/owner/repo",
            "https://github.com/a b/repo",
            "https://github.com/a%20b/repo",
            "://github.com/owner/repo",
            "not a url at all",
        ] {
            match resolve_url(bad) {
                Err(KpiError::InvalidUrl(s)) => assert_eq!(s, bad),
                other => panic!("expected InvalidUrl for {bad:?}, got {other:?}"),
            }
        }
    }

    proptest! {
        #[test]
        fn extracts_last_two_segments(
            scheme in prop::sample::select(vec!["http", "https"]),
            owner in "[A-Za-z0-9_-][A-Za-z0-9_.-]{0,20}",
            repo in "[A-Za-z0-9_-][A-Za-z0-9_.-]{0,20}",
        ) {
            let url = format!("{scheme}://github.com/{owner}/{repo}");
            let resolved = resolve_url(&url).unwrap();
            prop_assert_eq!(resolved.owner, owner);
            prop_assert_eq!(resolved.name, repo);
        }

        #[test]
        fn rewritten_forms_are_rejected(
            owner in "[A-Za-z0-9_-]{1,10}",
            repo in "[A-Za-z0-9_-]{1,10}",
            noise in prop::sample::select(vec![" ", "\t", "\n", "\\", "%20"]),
        ) {
            let url = format!("https://github.com/{owner}{noise}/{repo}");
            prop_assert!(matches!(resolve_url(&url), Err(KpiError::InvalidUrl(u)) if u == url));
            let upper = format!("https://GitHub.com/{owner}/{repo}");
            prop_assert!(matches!(resolve_url(&upper), Err(KpiError::InvalidUrl(_))));
        }

        #[test]
        fn wrong_host_is_rejected(
            host in "[a-z]{3,10}\\.(org|net|io)",
            owner in "[A-Za-z0-9]{1,10}",
            repo in "[A-Za-z0-9]{1,10}",
        ) {
            let url = format!("https://{host}/{owner}/{repo}");
            prop_assert!(matches!(resolve_url(&url), Err(KpiError::InvalidUrl(_))));
        }
    }
}
