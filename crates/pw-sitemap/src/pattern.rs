//! Url mask patterns.
//!
//! A mask is a slash-separated pattern where each segment is either a
//! literal, a `:name` parameter matching exactly one path segment, or `*`
//! matching the remainder of the path. Empty segments are ignored on both
//! sides, so trailing and doubled slashes do not affect matching.

use std::collections::BTreeMap;

/// Parameters captured while matching a mask. The splat is stored under `"*"`.
pub type Params = BTreeMap<String, String>;

/// Key under which a `*` segment stores the unmatched remainder.
pub const SPLAT_KEY: &str = "*";

#[derive(Clone, Debug, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Splat,
}

/// Compiled url mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlPattern {
    segments: Vec<Segment>,
}

impl UrlPattern {
    /// Compile a mask. Segments after a `*` are unreachable and dropped.
    #[must_use]
    pub fn parse(mask: &str) -> Self {
        let mut segments = Vec::new();
        for part in split_segments(mask) {
            if part == SPLAT_KEY {
                segments.push(Segment::Splat);
                break;
            }
            segments.push(match part.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_owned()),
                None => Segment::Literal(part.to_owned()),
            });
        }
        Self { segments }
    }

    /// Match a navigated path, returning captured parameters on success.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<Params> {
        let mut parts = split_segments(path);
        let mut params = Params::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(literal) => {
                    if parts.next()? != literal.as_str() {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = parts.next()?;
                    params.insert(name.clone(), value.to_owned());
                }
                Segment::Splat => {
                    let rest: Vec<&str> = parts.collect();
                    params.insert(SPLAT_KEY.to_owned(), rest.join("/"));
                    return Some(params);
                }
            }
        }

        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }

    /// True if the pattern has no parameter or splat segments.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}
