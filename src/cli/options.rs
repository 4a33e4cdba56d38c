//! Query options given on the command line
//!
//! `--filter key=value` selects the seed set, `--complementation dep=N` or
//! `rdep=N` expands it. Without a filter every visible component is a seed;
//! without a complementation the seed set is expanded along all
//! dependencies.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::{
    AllPassFilter, Complementer, Components, DependenciesComplementer, Depth, Filter,
    LabelsFilter, Query, ReverseDependenciesComplementer,
};

#[derive(Debug, Error, PartialEq)]
pub enum PredicateError {
    #[error("filter is malformed; got: {0}")]
    MalformedFilter(String),

    #[error("complementation is malformed; got: {0}")]
    MalformedComplementation(String),

    #[error("invalid complementation; got: {0}")]
    InvalidComplementation(String),

    #[error("invalid depth; got: {0}")]
    InvalidDepth(String),
}

/// Splits `key=value`, trimming both sides; `None` unless there is exactly one `=`
fn split_pair(s: &str) -> Option<(&str, &str)> {
    let mut parts = s.split('=');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(key), Some(value), None) => Some((key.trim(), value.trim())),
        _ => None,
    }
}

/// Exact-match label predicate, `key=value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPredicate {
    pub key: String,
    pub value: String,
}

impl FromStr for LabelPredicate {
    type Err = PredicateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) =
            split_pair(s).ok_or_else(|| PredicateError::MalformedFilter(s.to_string()))?;
        Ok(Self {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

impl fmt::Display for LabelPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Direction and depth of the closure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complementation {
    Dependencies(Depth),
    ReverseDependencies(Depth),
}

impl Default for Complementation {
    fn default() -> Self {
        Complementation::Dependencies(Depth::Unbounded)
    }
}

impl FromStr for Complementation {
    type Err = PredicateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, value) = split_pair(s)
            .ok_or_else(|| PredicateError::MalformedComplementation(s.to_string()))?;

        let depth = |value: &str| {
            value
                .parse::<i64>()
                .map(Depth::from)
                .map_err(|_| PredicateError::InvalidDepth(value.to_string()))
        };

        match key {
            "dep" => Ok(Complementation::Dependencies(depth(value)?)),
            "rdep" => Ok(Complementation::ReverseDependencies(depth(value)?)),
            other => Err(PredicateError::InvalidComplementation(other.to_string())),
        }
    }
}

impl fmt::Display for Complementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (key, depth) = match self {
            Complementation::Dependencies(depth) => ("dep", depth),
            Complementation::ReverseDependencies(depth) => ("rdep", depth),
        };
        match depth {
            Depth::Unbounded => write!(f, "{}=-1", key),
            Depth::Limited(n) => write!(f, "{}={}", key, n),
        }
    }
}

/// Explicit query configuration handed to the commands
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub filter: Option<LabelPredicate>,
    pub complementation: Complementation,
}

impl QueryOptions {
    /// Parses the raw `--filter` and `--complementation` values
    pub fn parse(filter: Option<&str>, complementation: Option<&str>) -> Result<Self, PredicateError> {
        Ok(Self {
            filter: filter.map(str::parse::<LabelPredicate>).transpose()?,
            complementation: complementation
                .map(str::parse::<Complementation>)
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// Builds the query over a resolved collection
    pub fn query<'a>(&self, components: &'a Components) -> Query<'a> {
        let filter: Box<dyn Filter + 'a> = match &self.filter {
            Some(predicate) => Box::new(LabelsFilter::new([(
                predicate.key.clone(),
                predicate.value.clone(),
            )])),
            None => Box::new(AllPassFilter),
        };

        let complementer: Box<dyn Complementer<'a> + 'a> = match self.complementation {
            Complementation::Dependencies(depth) => {
                Box::new(DependenciesComplementer::new(components, depth))
            }
            Complementation::ReverseDependencies(depth) => {
                Box::new(ReverseDependenciesComplementer::new(components, depth))
            }
        };

        Query::new(components, filter).with_complementer(complementer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Component, ComponentId, Relation};

    #[test]
    fn parses_label_predicate_with_whitespace() {
        let predicate: LabelPredicate = " env = prod ".parse().unwrap();
        assert_eq!(predicate.key, "env");
        assert_eq!(predicate.value, "prod");
    }

    #[test]
    fn rejects_label_predicate_without_single_equals() {
        assert_eq!(
            "env".parse::<LabelPredicate>(),
            Err(PredicateError::MalformedFilter("env".to_string()))
        );
        assert!("a=b=c".parse::<LabelPredicate>().is_err());
    }

    #[test]
    fn parses_complementations() {
        assert_eq!(
            "dep=2".parse::<Complementation>(),
            Ok(Complementation::Dependencies(Depth::Limited(2)))
        );
        assert_eq!(
            "rdep = -1".parse::<Complementation>(),
            Ok(Complementation::ReverseDependencies(Depth::Unbounded))
        );
    }

    #[test]
    fn rejects_bad_complementations() {
        assert_eq!(
            "dep".parse::<Complementation>(),
            Err(PredicateError::MalformedComplementation("dep".to_string()))
        );
        assert_eq!(
            "up=1".parse::<Complementation>(),
            Err(PredicateError::InvalidComplementation("up".to_string()))
        );
        assert_eq!(
            "dep=x".parse::<Complementation>(),
            Err(PredicateError::InvalidDepth("x".to_string()))
        );
    }

    #[test]
    fn complementation_display_round_trips() {
        for raw in ["dep=-1", "dep=0", "rdep=3"] {
            let parsed: Complementation = raw.parse().unwrap();
            assert_eq!(parsed.to_string(), raw);
        }
    }

    #[test]
    fn defaults_to_unbounded_dependencies_of_everything() {
        let options = QueryOptions::parse(None, None).unwrap();
        assert_eq!(options.filter, None);
        assert_eq!(
            options.complementation,
            Complementation::Dependencies(Depth::Unbounded)
        );
    }

    #[test]
    fn query_applies_filter_and_complementation() {
        let mut cs = Components::new();
        let mut web = Component::new(None, ComponentId::new("web"));
        web.add_label("tier", "front");
        web.depend_on(ComponentId::new("api"), Relation::default());
        let mut api = Component::new(None, ComponentId::new("api"));
        api.depend_on(ComponentId::new("db"), Relation::default());
        cs.add(web);
        cs.add(api);
        cs.add(Component::new(None, ComponentId::new("db")));
        cs.complement().unwrap();

        let options = QueryOptions::parse(Some("tier=front"), Some("dep=1")).unwrap();
        let ids: Vec<String> = options.query(&cs).run().ids().map(|id| id.to_string()).collect();
        assert_eq!(ids, vec!["web", "api"]);

        let options = QueryOptions::parse(None, Some("rdep=-1")).unwrap();
        assert_eq!(options.query(&cs).run().len(), 3);
    }
}
