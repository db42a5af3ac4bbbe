use serde::{Deserialize, Serialize};

/// Page size used by paginated endpoints and by the number of entries in a
/// top list.
pub const DEFAULT_LIMIT: usize = 12;

/// Audience marker substack puts on subscriber-only posts.
pub const AUDIENCE_ONLY_PAID: &str = "only_paid";

/// Lightweight pointer to a post, as found in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReference {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl PostReference {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            slug: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Markdown link to the post.
    pub fn link(&self) -> String {
        format!("[{}]({})", self.title, self.url)
    }
}

/// A post together with its raw body markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDetail {
    pub reference: PostReference,
    pub html: String,
}

impl PostDetail {
    pub fn new(reference: PostReference, html: impl Into<String>) -> Self {
        Self {
            reference,
            html: html.into(),
        }
    }

    pub fn title(&self) -> &str {
        &self.reference.title
    }

    pub fn url(&self) -> &str {
        &self.reference.url
    }
}

/// Entry of the substack archive and post endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubstackPost {
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub canonical_url: String,
    pub body_html: String,
    pub audience: String,
}

impl SubstackPost {
    pub fn is_paid(&self) -> bool {
        self.audience == AUDIENCE_ONLY_PAID
    }

    pub fn to_reference(&self) -> PostReference {
        PostReference::new(
            html_escape::decode_html_entities(&self.title),
            self.canonical_url.clone(),
        )
        .with_slug(self.slug.clone())
    }

    pub fn into_detail(self) -> PostDetail {
        let reference = self.to_reference();
        PostDetail::new(reference, self.body_html)
    }
}

/// `{data:{posts:{results:[...]}}}` answer of the GraphQL endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GraphqlResponse {
    pub data: GraphqlData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GraphqlData {
    pub posts: GraphqlPosts,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GraphqlPosts {
    pub results: Vec<GraphqlPost>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GraphqlPost {
    pub title: String,
    #[serde(rename = "pageUrl")]
    pub page_url: String,
    #[serde(rename = "htmlBody")]
    pub html_body: String,
    pub user: GraphqlUser,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GraphqlUser {
    #[serde(rename = "displayName")]
    pub display_name: String,
}

impl GraphqlResponse {
    pub fn into_results(self) -> Vec<GraphqlPost> {
        self.data.posts.results
    }
}

impl GraphqlPost {
    pub fn into_detail(self) -> PostDetail {
        PostDetail::new(PostReference::new(self.title, self.page_url), self.html_body)
    }
}
