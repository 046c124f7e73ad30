// src/github/request.rs
// =============================================================================
// What we ask GitHub for, and where.
//
// A tag invocation looks like `octo, demo, v2` (README) or
// `octo, demo, Getting-Started` (wiki). We split that once into a
// FetchRequest and never touch it again.
//
// URLs:
//   README: {api_base}/repos/{owner}/{repo}/readme?ref={ref}
//   Wiki:   {raw_base}/wiki/{owner}/{repo}/{page}.md
//
// Wiki pages live in a separate git repository that the JSON API does not
// expose, so they come straight from the raw content host.
// =============================================================================

use url::Url;

use crate::cache::derive_key;
use crate::error::ParamError;

pub const DEFAULT_REF: &str = "main";
pub const DEFAULT_WIKI_PAGE: &str = "Home";

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_WEB_BASE: &str = "https://github.com";

/// One document to fetch. Owner and repo are always non-empty and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub owner: String,
    pub repo: String,
    /// Branch or tag (README requests)
    pub git_ref: String,
    /// Wiki page name; `Some` marks a wiki request
    pub page: Option<String>,
}

impl FetchRequest {
    // Parses "owner, repo[, ref]" for the README tag.
    pub fn parse_readme(params: &str) -> Result<Self, ParamError> {
        let (owner, repo, git_ref) = split_params(params, "ref")?;
        Ok(Self {
            owner,
            repo,
            git_ref: git_ref.unwrap_or_else(|| DEFAULT_REF.to_string()),
            page: None,
        })
    }

    // Parses "owner, repo[, page]" for the wiki tag.
    pub fn parse_wiki(params: &str) -> Result<Self, ParamError> {
        let (owner, repo, page) = split_params(params, "page")?;
        Ok(Self {
            owner,
            repo,
            git_ref: DEFAULT_REF.to_string(),
            page: Some(page.unwrap_or_else(|| DEFAULT_WIKI_PAGE.to_string())),
        })
    }

    pub fn is_wiki(&self) -> bool {
        self.page.is_some()
    }

    /// "owner/repo", used in headers and messages
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    pub fn cache_key(&self) -> String {
        derive_key(&self.owner, &self.repo, &self.git_ref)
    }
}

// Splits the comma separated tag parameters.
//
// Returns: (owner, repo, optional third value)
// An empty third value counts as absent; anything after it is ignored.
fn split_params(
    params: &str,
    expected: &'static str,
) -> Result<(String, String, Option<String>), ParamError> {
    let parts: Vec<&str> = params.split(',').map(str::trim).collect();

    let malformed = || ParamError::Malformed {
        expected,
        got: params.to_string(),
    };

    let owner = parts.first().filter(|s| !s.is_empty()).ok_or_else(malformed)?;
    let repo = parts.get(1).filter(|s| !s.is_empty()).ok_or_else(malformed)?;
    let third = parts
        .get(2)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    Ok((owner.to_string(), repo.to_string(), third))
}

/// Where the forge lives. Defaults to github.com; overridable for
/// enterprise hosts and for tests against a local server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub api_base: Url,
    pub raw_base: Url,
    pub web_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, DEFAULT_RAW_BASE, DEFAULT_WEB_BASE)
            .expect("default endpoints are valid URLs")
    }
}

impl Endpoints {
    pub fn new(api_base: &str, raw_base: &str, web_base: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            api_base: parse_base(api_base)?,
            raw_base: parse_base(raw_base)?,
            web_base: web_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn readme_url(&self, req: &FetchRequest) -> Url {
        let mut url = with_segments(
            &self.api_base,
            &["repos", &req.owner, &req.repo, "readme"],
        );
        url.query_pairs_mut().append_pair("ref", &req.git_ref);
        url
    }

    pub fn wiki_url(&self, req: &FetchRequest) -> Url {
        let page = req.page.as_deref().unwrap_or(DEFAULT_WIKI_PAGE);
        with_segments(
            &self.raw_base,
            &["wiki", &req.owner, &req.repo, &format!("{}.md", page)],
        )
    }

    pub fn url_for(&self, req: &FetchRequest) -> Url {
        if req.is_wiki() {
            self.wiki_url(req)
        } else {
            self.readme_url(req)
        }
    }

    // Where relative README paths point when GitHub gives us no download_url.
    // A ref like "feature/x" names a nested path on the raw host, so each
    // part is its own segment instead of one "feature%2Fx" segment.
    pub fn raw_tree_url(&self, req: &FetchRequest) -> String {
        let mut segments = vec![req.owner.as_str(), req.repo.as_str()];
        segments.extend(req.git_ref.split('/').filter(|part| !part.is_empty()));
        with_segments(&self.raw_base, &segments).to_string()
    }

    pub fn repo_page(&self, req: &FetchRequest) -> String {
        format!("{}/{}/{}", self.web_base, req.owner, req.repo)
    }
}

// Parses a base URL and rejects things like "mailto:x" that cannot carry
// path segments.
fn parse_base(raw: &str) -> Result<Url, url::ParseError> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
    }
    Ok(url)
}

// Appends percent-encoded path segments to a base URL.
fn with_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // cannot fail: parse_base only accepts URLs that can be a base
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}
