//! Request target: a relative path template plus query values, mutated by
//! independent steps before being resolved against the client's base URL.

use url::{Url, form_urlencoded};

#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    #[error("path template `{template}` has {expected} placeholders, got {actual} parameters")]
    PathParamCount {
        template: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    path: String,
    query: Vec<(String, String)>,
}

pub trait RequestOption {
    fn update_target(&self, target: &mut RequestTarget) -> Result<(), TargetError>;
}

impl RequestTarget {
    /// Start from a path relative to the base URL; `{}` marks path parameters.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Apply request options in order.
    pub fn with(mut self, options: &[&dyn RequestOption]) -> Result<Self, TargetError> {
        for option in options {
            option.update_target(&mut self)?;
        }
        Ok(self)
    }

    /// Resolve against `base`, which must end with `/` for its path to be kept.
    pub fn resolve(&self, base: &Url) -> Result<Url, TargetError> {
        let mut url = base.join(&self.path)?;
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// Substitutes each `{}` placeholder, in order, with a query-escaped parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParams(Vec<String>);

impl PathParams {
    pub fn new<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(params.into_iter().map(Into::into).collect())
    }
}

impl RequestOption for PathParams {
    fn update_target(&self, target: &mut RequestTarget) -> Result<(), TargetError> {
        let expected = target.path.matches("{}").count();
        if expected != self.0.len() {
            return Err(TargetError::PathParamCount {
                template: target.path.clone(),
                expected,
                actual: self.0.len(),
            });
        }

        let mut path = String::with_capacity(target.path.len());
        let mut rest = target.path.as_str();
        for param in &self.0 {
            if let Some((head, tail)) = rest.split_once("{}") {
                path.push_str(head);
                path.extend(form_urlencoded::byte_serialize(param.as_bytes()));
                rest = tail;
            }
        }
        path.push_str(rest);

        target.path = path;
        Ok(())
    }
}

/// Appends query pairs; repeated keys accumulate rather than overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryValues(Vec<(String, String)>);

impl QueryValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push((key.into(), value.into()));
        self
    }
}

impl RequestOption for QueryValues {
    fn update_target(&self, target: &mut RequestTarget) -> Result<(), TargetError> {
        target.query.extend(self.0.iter().cloned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://rest-api.example.invalid/").unwrap()
    }

    #[test]
    fn path_params_are_escaped_and_interpolated_in_order() {
        let target = RequestTarget::new("v2/template/{}/version/{}")
            .with(&[&PathParams::new(["a b/c", "2"])])
            .unwrap();
        assert_eq!(
            target.resolve(&base()).unwrap().as_str(),
            "https://rest-api.example.invalid/v2/template/a+b%2Fc/version/2"
        );
    }

    #[test]
    fn path_param_count_mismatch_is_rejected() {
        let err = RequestTarget::new("v2/template/{}")
            .with(&[&PathParams::new(["a", "b"])])
            .unwrap_err();
        assert!(matches!(
            err,
            TargetError::PathParamCount {
                expected: 1,
                actual: 2,
                ..
            }
        ));
    }

    #[test]
    fn query_values_accumulate() {
        let target = RequestTarget::new("v2/templates")
            .with(&[
                &QueryValues::new().add("type", "sms"),
                &QueryValues::new().add("type", "email").add("page", "2"),
            ])
            .unwrap();
        let url = target.resolve(&base()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://rest-api.example.invalid/v2/templates?type=sms&type=email&page=2"
        );
    }

    #[test]
    fn resolve_without_query_has_no_question_mark() {
        let url = RequestTarget::new("v2/notifications/sms")
            .resolve(&base())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://rest-api.example.invalid/v2/notifications/sms"
        );
    }

    #[test]
    fn resolve_keeps_base_path_prefix() {
        let base = Url::parse("http://127.0.0.1:8080/notify/").unwrap();
        let url = RequestTarget::new("v2/templates").resolve(&base).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/notify/v2/templates");
    }
}
