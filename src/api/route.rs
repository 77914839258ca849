use std::fmt;

use reqwest::Url;

use super::ApiError;

/// A path relative to the server base URL, kept as unencoded segments so keys
/// containing spaces or `?` survive the trip.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    segments: Vec<String>,
    query: Vec<(String, String)>,
}

impl Route {
    pub fn login() -> Self {
        Self::default().segment("login")
    }

    pub fn api() -> Self {
        Self::default().segment("api")
    }

    pub fn buckets() -> Self {
        Self::api().segment("buckets")
    }

    pub fn objects(bucket: &str) -> Self {
        Self::api().segment(bucket).segment("objects")
    }

    pub fn rollback(bucket: &str, key: &str, version_id: &str) -> Self {
        Self::api()
            .segment(bucket)
            .segment("rollback")
            .query("key", key)
            .query("version_id", version_id)
    }

    /// Raw storage path `/{bucket}`.
    pub fn bucket(bucket: &str) -> Self {
        Self::default().segment(bucket)
    }

    /// Raw storage path `/{bucket}/{key}`; `/` inside the key stays a path separator.
    pub fn object(bucket: &str, key: &str) -> Self {
        let mut route = Self::bucket(bucket);
        route.segments.extend(key.split('/').map(str::to_string));
        route
    }

    pub fn object_version(bucket: &str, key: &str, version_id: Option<&str>) -> Self {
        let route = Self::object(bucket, key);
        match version_id {
            Some(v) => route.query("versionId", v),
            None => route,
        }
    }

    pub fn segment(mut self, s: impl Into<String>) -> Self {
        self.segments.push(s.into());
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn resolve(&self, base: &Url) -> Result<Url, ApiError> {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        {
            let mut segs = url.path_segments_mut().map_err(|_| ApiError::InvalidUrl {
                url: base.to_string(),
                reason: "not a hierarchical url".to_string(),
            })?;
            segs.pop_if_empty();
            segs.extend(self.segments.iter());
        }
        if !self.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                self.query
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }
        Ok(url)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.segments {
            write!(f, "/{}", s)?;
        }
        for (i, (k, v)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", sep, k, v)?;
        }
        Ok(())
    }
}
