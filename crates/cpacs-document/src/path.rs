//! Slash-separated element paths with optional 1-based `[index]` selectors,
//! e.g. `/cpacs/vehicles/aircraft/model/analyses/aeroPerformance/aeroMap[2]`.

use crate::error::{DocumentError, Result};

/// One step of an element path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub name: &'a str,
    /// 1-based position among same-named siblings.
    pub index: usize,
}

/// Split an absolute path into segments.
pub fn parse(path: &str) -> Result<Vec<Segment<'_>>> {
    let Some(rest) = path.strip_prefix('/') else {
        return Err(DocumentError::invalid_path(
            path,
            "path must start with '/'",
        ));
    };
    if rest.is_empty() {
        return Err(DocumentError::invalid_path(path, "path names no element"));
    }
    let mut segments = Vec::new();
    for raw in rest.split('/') {
        if raw.is_empty() {
            return Err(DocumentError::invalid_path(path, "empty path segment"));
        }
        let segment = if let Some((name, selector)) = raw.split_once('[') {
            let Some(number) = selector.strip_suffix(']') else {
                return Err(DocumentError::invalid_path(
                    path,
                    "unterminated '[' selector",
                ));
            };
            let index: usize = number.parse().map_err(|_| {
                DocumentError::invalid_path(path, format!("bad index '{number}'"))
            })?;
            if index == 0 {
                return Err(DocumentError::invalid_path(path, "indices are 1-based"));
            }
            if name.is_empty() {
                return Err(DocumentError::invalid_path(path, "empty element name"));
            }
            Segment { name, index }
        } else {
            Segment {
                name: raw,
                index: 1,
            }
        };
        segments.push(segment);
    }
    Ok(segments)
}

/// The parent segments of a path plus its final segment.
pub fn split_last(path: &str) -> Result<(Vec<Segment<'_>>, Segment<'_>)> {
    let mut segments = parse(path)?;
    let last = segments
        .pop()
        .ok_or_else(|| DocumentError::invalid_path(path, "path names no element"))?;
    Ok((segments, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_and_indexed() {
        let segments = parse("/cpacs/vehicles/aircraft[2]/model").unwrap();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].name, "cpacs");
        assert_eq!(segments[0].index, 1);
        assert_eq!(segments[2].name, "aircraft");
        assert_eq!(segments[2].index, 2);
        assert_eq!(segments[3].name, "model");
    }

    #[test]
    fn test_parse_rejects_bad_paths() {
        assert!(parse("cpacs/vehicles").is_err());
        assert!(parse("/").is_err());
        assert!(parse("/cpacs//model").is_err());
        assert!(parse("/cpacs/aeroMap[0]").is_err());
        assert!(parse("/cpacs/aeroMap[").is_err());
        assert!(parse("/cpacs/aeroMap[x]").is_err());
    }

    #[test]
    fn test_split_last() {
        let (parent, last) = split_last("/cpacs/vehicles/aircraft").unwrap();
        assert_eq!(parent.len(), 2);
        assert_eq!(last.name, "aircraft");

        let (parent, last) = split_last("/cpacs").unwrap();
        assert!(parent.is_empty());
        assert_eq!(last.name, "cpacs");
    }
}
