//! Where a catalog's documents live relative to its base url

/// Url of one catalog document under a base url
pub fn document_url(base: &str, file: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), file)
}

/// Last path segment of the base url, used when no bike.json is published
pub fn slug_from_base(base: &str) -> String {
    let path = base.split(['?', '#']).next().unwrap_or("");
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
        .to_string()
}
