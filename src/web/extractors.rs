//! # Custom Axum Extractors

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use crate::models::FilterCriteria;

/// Raw result-filter query parameters
///
/// `port` and `service` are comma-joined lists; `regexp` is a single
/// pattern. When a key repeats, the first occurrence wins. An unparseable
/// query string yields no parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterParams {
    pub port: Option<String>,
    pub service: Option<String>,
    pub regexp: Option<String>,
}

impl FilterParams {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "port" => &mut params.port,
                "service" => &mut params.service,
                "regexp" => &mut params.regexp,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Combine with the optional IP path segment into filter criteria
    pub fn into_criteria(self, ip: Option<&str>) -> FilterCriteria {
        FilterCriteria::from_request_values(
            ip,
            self.port.as_deref(),
            self.service.as_deref(),
            self.regexp.as_deref(),
        )
    }
}

impl<S> FromRequestParts<S> for FilterParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_default();
        Ok(Self::from_pairs(pairs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_value_wins() {
        let params = FilterParams::from_pairs(pairs(&[
            ("port", "22"),
            ("port", "80"),
            ("regexp", "ssh"),
        ]));
        assert_eq!(params.port.as_deref(), Some("22"));
        assert_eq!(params.regexp.as_deref(), Some("ssh"));
        assert_eq!(params.service, None);
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let params = FilterParams::from_pairs(pairs(&[("limit", "10")]));
        assert_eq!(params, FilterParams::default());
    }

    #[test]
    fn test_into_criteria() {
        let criteria = FilterParams::from_pairs(pairs(&[("port", "80,,443"), ("regexp", "")]))
            .into_criteria(Some("10.0.0.1"));

        assert_eq!(criteria.ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(criteria.ports, vec!["80", "", "443"]);
        assert_eq!(criteria.regexp, None);
    }
}
