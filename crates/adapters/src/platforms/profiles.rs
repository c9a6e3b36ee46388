//! The eight platform profiles and their payload builders

use crosspost_domain::Post;
use serde_json::{Value, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::http::{
    AuthScheme, BaseUrl, CredField, Endpoint, HttpMethod, Operation, PayloadEncoding,
    PlatformProfile, ResponsePaths, UserLookup,
};

/// Canonical-URL base for platforms that accept one
const CANONICAL_BASE: &str = "https://your-site.com";

fn canonical_url(post: &Post) -> String {
    format!("{}/posts/{}", CANONICAL_BASE, post.frontmatter.slug)
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

// --- Dev.to -----------------------------------------------------------------

fn devto_create(post: &Post, profile: &PlatformProfile, _id: Option<&str>) -> Value {
    json!({
        "article": {
            "title": post.frontmatter.title,
            "body_markdown": post.body,
            "published": true,
            "description": post.frontmatter.description,
            "tags": post.capped_tags(profile.tag_limit),
            "canonical_url": canonical_url(post),
        }
    })
}

fn devto_update(post: &Post, profile: &PlatformProfile, _id: Option<&str>) -> Value {
    json!({
        "article": {
            "title": post.frontmatter.title,
            "body_markdown": post.body,
            "description": post.frontmatter.description,
            "tags": post.capped_tags(profile.tag_limit),
        }
    })
}

pub static DEVTO: PlatformProfile = PlatformProfile {
    name: "devto",
    tag_limit: Some(4),
    base_url: BaseUrl::Fixed("https://dev.to"),
    auth: AuthScheme::ApiKeyHeader("api-key"),
    site_id_header: None,
    user_lookup: None,
    encoding: PayloadEncoding::Json,
    create: Operation {
        endpoint: Endpoint {
            method: HttpMethod::Post,
            path: "/api/articles",
        },
        payload: devto_create,
        response: ResponsePaths {
            id: "/id",
            url: Some("/url"),
        },
    },
    update: Some(Operation {
        endpoint: Endpoint {
            method: HttpMethod::Put,
            path: "/api/articles/{id}",
        },
        payload: devto_update,
        response: ResponsePaths {
            id: "/id",
            url: Some("/url"),
        },
    }),
    required: &[CredField::Token],
    credential_hint: "Dev.to API key not configured",
};

// --- Hashnode ---------------------------------------------------------------

const HASHNODE_CREATE_MUTATION: &str = "\
mutation createPublicationStory($input: CreateStoryInput!) {
  createPublicationStory(input: $input) {
    post { _id slug url }
  }
}";

const HASHNODE_UPDATE_MUTATION: &str = "\
mutation updatePost($input: UpdatePostInput!) {
  updatePost(input: $input) {
    post { _id slug url }
  }
}";

fn hashnode_tags(post: &Post, profile: &PlatformProfile) -> Value {
    post.capped_tags(profile.tag_limit)
        .iter()
        .map(|tag| json!({"_id": tag, "name": tag, "slug": tag}))
        .collect()
}

fn hashnode_create(post: &Post, profile: &PlatformProfile, _id: Option<&str>) -> Value {
    json!({
        "query": HASHNODE_CREATE_MUTATION,
        "variables": {
            "input": {
                "title": post.frontmatter.title,
                "contentMarkdown": post.body,
                "tags": hashnode_tags(post, profile),
                "coverImageURL": "",
                "isRepublished": false,
            }
        }
    })
}

fn hashnode_update(post: &Post, profile: &PlatformProfile, id: Option<&str>) -> Value {
    json!({
        "query": HASHNODE_UPDATE_MUTATION,
        "variables": {
            "input": {
                "id": id.unwrap_or_default(),
                "title": post.frontmatter.title,
                "contentMarkdown": post.body,
                "tags": hashnode_tags(post, profile),
            }
        }
    })
}

pub static HASHNODE: PlatformProfile = PlatformProfile {
    name: "hashnode",
    tag_limit: Some(5),
    base_url: BaseUrl::Fixed("https://api.hashnode.com"),
    auth: AuthScheme::RawToken,
    site_id_header: None,
    user_lookup: None,
    encoding: PayloadEncoding::Json,
    create: Operation {
        endpoint: Endpoint {
            method: HttpMethod::Post,
            path: "",
        },
        payload: hashnode_create,
        response: ResponsePaths {
            id: "/data/createPublicationStory/post/_id",
            url: Some("/data/createPublicationStory/post/url"),
        },
    },
    update: Some(Operation {
        endpoint: Endpoint {
            method: HttpMethod::Post,
            path: "",
        },
        payload: hashnode_update,
        response: ResponsePaths {
            id: "/data/updatePost/post/_id",
            url: Some("/data/updatePost/post/url"),
        },
    }),
    required: &[CredField::Token],
    credential_hint: "Hashnode token not configured",
};

// --- Medium -----------------------------------------------------------------

fn medium_create(post: &Post, profile: &PlatformProfile, _id: Option<&str>) -> Value {
    json!({
        "title": post.frontmatter.title,
        "contentFormat": "markdown",
        "content": post.body,
        "canonicalUrl": canonical_url(post),
        "tags": post.capped_tags(profile.tag_limit),
        "publishStatus": "public",
    })
}

pub static MEDIUM: PlatformProfile = PlatformProfile {
    name: "medium",
    tag_limit: Some(5),
    base_url: BaseUrl::Fixed("https://api.medium.com"),
    auth: AuthScheme::Bearer,
    site_id_header: None,
    user_lookup: Some(UserLookup {
        path: "/v1/me",
        id: "/data/id",
    }),
    encoding: PayloadEncoding::Json,
    create: Operation {
        endpoint: Endpoint {
            method: HttpMethod::Post,
            path: "/v1/users/{user_id}/posts",
        },
        payload: medium_create,
        response: ResponsePaths {
            id: "/data/id",
            url: Some("/data/url"),
        },
    },
    update: None,
    required: &[CredField::Token],
    credential_hint: "Medium integration token not configured",
};

// --- WordPress --------------------------------------------------------------

fn wordpress_create(post: &Post, _profile: &PlatformProfile, _id: Option<&str>) -> Value {
    json!({
        "title": post.frontmatter.title,
        "content": post.rendered_html,
        "excerpt": post.frontmatter.description,
        "slug": post.frontmatter.slug,
        "status": "publish",
        "categories": [],
        "tags": post.frontmatter.tags,
    })
}

fn wordpress_update(post: &Post, _profile: &PlatformProfile, _id: Option<&str>) -> Value {
    json!({
        "title": post.frontmatter.title,
        "content": post.rendered_html,
        "excerpt": post.frontmatter.description,
        "tags": post.frontmatter.tags,
    })
}

pub static WORDPRESS: PlatformProfile = PlatformProfile {
    name: "wordpress",
    tag_limit: None,
    base_url: BaseUrl::HttpsSite,
    auth: AuthScheme::Bearer,
    site_id_header: None,
    user_lookup: None,
    encoding: PayloadEncoding::Json,
    create: Operation {
        endpoint: Endpoint {
            method: HttpMethod::Post,
            path: "/wp-json/wp/v2/posts",
        },
        payload: wordpress_create,
        response: ResponsePaths {
            id: "/id",
            url: Some("/link"),
        },
    },
    update: Some(Operation {
        endpoint: Endpoint {
            method: HttpMethod::Put,
            path: "/wp-json/wp/v2/posts/{id}",
        },
        payload: wordpress_update,
        response: ResponsePaths {
            id: "/id",
            url: Some("/link"),
        },
    }),
    required: &[CredField::Token, CredField::Site],
    credential_hint: "WordPress access token or site not configured",
};

// --- Ghost ------------------------------------------------------------------

fn ghost_tags(post: &Post) -> Value {
    post.frontmatter
        .tags
        .iter()
        .map(|tag| json!({"name": tag}))
        .collect()
}

fn ghost_create(post: &Post, _profile: &PlatformProfile, _id: Option<&str>) -> Value {
    json!({
        "posts": [{
            "title": post.frontmatter.title,
            "html": post.rendered_html,
            "status": "published",
            "tags": ghost_tags(post),
        }]
    })
}

fn ghost_update(post: &Post, _profile: &PlatformProfile, _id: Option<&str>) -> Value {
    json!({
        "posts": [{
            "title": post.frontmatter.title,
            "html": post.rendered_html,
            "updated_at": now_rfc3339(),
            "tags": ghost_tags(post),
        }]
    })
}

pub static GHOST: PlatformProfile = PlatformProfile {
    name: "ghost",
    tag_limit: None,
    base_url: BaseUrl::SiteUrl,
    auth: AuthScheme::GhostAdmin,
    site_id_header: None,
    user_lookup: None,
    encoding: PayloadEncoding::Json,
    create: Operation {
        endpoint: Endpoint {
            method: HttpMethod::Post,
            path: "/ghost/api/admin/posts/",
        },
        payload: ghost_create,
        response: ResponsePaths {
            id: "/posts/0/id",
            url: Some("/posts/0/url"),
        },
    },
    update: Some(Operation {
        endpoint: Endpoint {
            method: HttpMethod::Put,
            path: "/ghost/api/admin/posts/{id}/",
        },
        payload: ghost_update,
        response: ResponsePaths {
            id: "/posts/0/id",
            url: Some("/posts/0/url"),
        },
    }),
    required: &[CredField::Token, CredField::Site],
    credential_hint: "Ghost admin API key or URL not configured",
};

// --- Blogger ----------------------------------------------------------------

fn blogger_create(post: &Post, _profile: &PlatformProfile, _id: Option<&str>) -> Value {
    json!({
        "kind": "blogger#post",
        "title": post.frontmatter.title,
        "content": post.rendered_html,
        "labels": post.frontmatter.tags,
    })
}

fn blogger_update(post: &Post, _profile: &PlatformProfile, _id: Option<&str>) -> Value {
    json!({
        "title": post.frontmatter.title,
        "content": post.rendered_html,
        "labels": post.frontmatter.tags,
    })
}

pub static BLOGGER: PlatformProfile = PlatformProfile {
    name: "blogger",
    tag_limit: None,
    base_url: BaseUrl::Fixed("https://www.googleapis.com/blogger/v3"),
    auth: AuthScheme::Bearer,
    site_id_header: None,
    user_lookup: None,
    encoding: PayloadEncoding::Json,
    create: Operation {
        endpoint: Endpoint {
            method: HttpMethod::Post,
            path: "/blogs/{blog_id}/posts",
        },
        payload: blogger_create,
        response: ResponsePaths {
            id: "/id",
            url: Some("/url"),
        },
    },
    update: Some(Operation {
        endpoint: Endpoint {
            method: HttpMethod::Put,
            path: "/blogs/{blog_id}/posts/{id}",
        },
        payload: blogger_update,
        response: ResponsePaths {
            id: "/id",
            url: Some("/url"),
        },
    }),
    required: &[CredField::Token, CredField::BlogId],
    credential_hint: "Blogger OAuth token or blog ID not configured",
};

// --- Tumblr -----------------------------------------------------------------

fn tumblr_create(post: &Post, _profile: &PlatformProfile, _id: Option<&str>) -> Value {
    json!({
        "type": "text",
        "title": post.frontmatter.title,
        "body": post.rendered_html,
        "tags": post.frontmatter.tags.join(","),
        "state": "published",
    })
}

pub static TUMBLR: PlatformProfile = PlatformProfile {
    name: "tumblr",
    tag_limit: None,
    base_url: BaseUrl::Fixed("https://api.tumblr.com"),
    auth: AuthScheme::OAuth1,
    site_id_header: None,
    user_lookup: None,
    encoding: PayloadEncoding::Form,
    create: Operation {
        endpoint: Endpoint {
            method: HttpMethod::Post,
            path: "/v2/blog/{blog_id}/post",
        },
        payload: tumblr_create,
        response: ResponsePaths {
            id: "/response/id",
            url: Some("/response/url"),
        },
    },
    update: None,
    required: &[
        CredField::ConsumerKey,
        CredField::ConsumerSecret,
        CredField::Token,
        CredField::TokenSecret,
        CredField::BlogId,
    ],
    credential_hint: "Tumblr OAuth credentials not configured",
};

// --- Wix --------------------------------------------------------------------

fn wix_create(post: &Post, _profile: &PlatformProfile, _id: Option<&str>) -> Value {
    json!({
        "title": post.frontmatter.title,
        "content": post.rendered_html,
        "excerpt": post.frontmatter.description,
        "slug": post.frontmatter.slug,
        "tags": post.frontmatter.tags,
        "published": true,
        "publishedDate": now_rfc3339(),
    })
}

fn wix_update(post: &Post, _profile: &PlatformProfile, _id: Option<&str>) -> Value {
    json!({
        "title": post.frontmatter.title,
        "content": post.rendered_html,
        "excerpt": post.frontmatter.description,
        "tags": post.frontmatter.tags,
    })
}

pub static WIX: PlatformProfile = PlatformProfile {
    name: "wix",
    tag_limit: None,
    base_url: BaseUrl::Fixed("https://www.wixapis.com/blog/v3"),
    auth: AuthScheme::RawToken,
    site_id_header: Some("wix-site-id"),
    user_lookup: None,
    encoding: PayloadEncoding::Json,
    create: Operation {
        endpoint: Endpoint {
            method: HttpMethod::Post,
            path: "/sites/{site_id}/posts",
        },
        payload: wix_create,
        response: ResponsePaths {
            id: "/post/id",
            url: Some("/post/url"),
        },
    },
    update: Some(Operation {
        endpoint: Endpoint {
            method: HttpMethod::Patch,
            path: "/sites/{site_id}/posts/{id}",
        },
        payload: wix_update,
        response: ResponsePaths {
            id: "/post/id",
            url: Some("/post/url"),
        },
    }),
    required: &[CredField::Token, CredField::Site],
    credential_hint: "Wix API token or site ID not configured",
};

/// All profiles in publish order
pub fn all() -> [&'static PlatformProfile; 8] {
    [
        &DEVTO, &HASHNODE, &MEDIUM, &WORDPRESS, &GHOST, &BLOGGER, &TUMBLR, &WIX,
    ]
}
