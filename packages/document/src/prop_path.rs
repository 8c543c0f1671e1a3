//! # Prop Paths
//!
//! Dot-separated addresses into a component's prop tree, e.g.
//! `cta.items.0.label`.
//!
//! A segment is interpreted by the container it lands on: objects treat it as
//! a key (so `"0"` is a valid key), arrays require an index.
//!
//! ## Setting
//!
//! - object: assign the key; missing intermediate keys become empty objects
//! - array: `index < len` replaces, `index == len` appends
//! - anything else along the way is an error

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::PathError;

/// Parsed dot path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropPath {
    raw: String,
    segments: Vec<String>,
}

impl PropPath {
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::Empty);
        }

        let segments: Vec<String> = raw.split('.').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::invalid(raw, "empty segment"));
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolve the path against `root`
    pub fn get<'a>(&self, root: &'a Value) -> Option<&'a Value> {
        self.segments
            .iter()
            .try_fold(root, |node, segment| match node {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            })
    }

    /// Write `value` at this path inside `root`
    ///
    /// On error `root` may have gained empty intermediate objects; callers
    /// wanting atomicity should set on a copy.
    pub fn set(&self, root: &mut Value, value: Value) -> Result<(), PathError> {
        let (last, parents) = self
            .segments
            .split_last()
            .ok_or(PathError::Empty)?;

        let mut node = root;
        for segment in parents {
            node = self.descend(node, segment)?;
        }

        match node {
            Value::Object(map) => {
                map.insert(last.clone(), value);
                Ok(())
            }
            Value::Array(items) => {
                let index = self.index(last)?;
                if index < items.len() {
                    items[index] = value;
                    Ok(())
                } else if index == items.len() {
                    items.push(value);
                    Ok(())
                } else {
                    Err(PathError::invalid(
                        &self.raw,
                        format!("index {} out of bounds (len {})", index, items.len()),
                    ))
                }
            }
            other => Err(PathError::invalid(
                &self.raw,
                format!("cannot assign '{}' on {}", last, kind_name(other)),
            )),
        }
    }

    fn descend<'a>(&self, node: &'a mut Value, segment: &str) -> Result<&'a mut Value, PathError> {
        match node {
            Value::Object(map) => Ok(map
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()))),
            Value::Array(items) => {
                let index = self.index(segment)?;
                let len = items.len();
                if index == len {
                    items.push(Value::Object(Map::new()));
                }
                items.get_mut(index).ok_or_else(|| {
                    PathError::invalid(
                        &self.raw,
                        format!("index {} out of bounds (len {})", index, len),
                    )
                })
            }
            other => Err(PathError::invalid(
                &self.raw,
                format!("cannot traverse '{}' through {}", segment, kind_name(other)),
            )),
        }
    }

    fn index(&self, segment: &str) -> Result<usize, PathError> {
        segment
            .parse()
            .map_err(|_| PathError::invalid(&self.raw, format!("'{}' is not an array index", segment)))
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl FromStr for PropPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropPath::parse(s)
    }
}

impl TryFrom<&str> for PropPath {
    type Error = PathError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        PropPath::parse(s)
    }
}

impl fmt::Display for PropPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for PropPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for PropPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        PropPath::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(raw: &str) -> PropPath {
        PropPath::parse(raw).unwrap()
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        assert_eq!(PropPath::parse(""), Err(PathError::Empty));
        assert!(matches!(PropPath::parse("a..b"), Err(PathError::Invalid { .. })));
        assert!(matches!(PropPath::parse(".a"), Err(PathError::Invalid { .. })));
        assert!(matches!(PropPath::parse("a."), Err(PathError::Invalid { .. })));
        assert_eq!(path("cta.items.0.label").segments().len(), 4);
    }

    #[test]
    fn test_set_nested_array_item_field() {
        let mut props = json!({"cta": {"items": [{"label": "Old"}, {"label": "Other"}]}});
        path("cta.items.0.label").set(&mut props, json!("New")).unwrap();

        assert_eq!(props["cta"]["items"][0]["label"], "New");
        assert_eq!(props["cta"]["items"].as_array().unwrap().len(), 2);
        assert_eq!(props["cta"]["items"][1]["label"], "Other");
    }

    #[test]
    fn test_set_creates_missing_objects() {
        let mut props = json!({});
        path("colors.background.hex").set(&mut props, json!("#fff")).unwrap();
        assert_eq!(props, json!({"colors": {"background": {"hex": "#fff"}}}));
    }

    #[test]
    fn test_set_replaces_whole_array() {
        let mut props = json!({"items": [{"q": "a"}]});
        path("items").set(&mut props, json!([{"q": "a"}, {"q": "b"}])).unwrap();
        assert_eq!(props["items"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_set_appends_at_array_end() {
        let mut props = json!({"items": ["a"]});
        path("items.1").set(&mut props, json!("b")).unwrap();
        assert_eq!(props["items"], json!(["a", "b"]));

        let err = path("items.5").set(&mut props, json!("c")).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
    }

    #[test]
    fn test_set_appends_object_for_inner_index_at_end() {
        let mut props = json!({"cta": {"items": [{"label": "a"}]}});
        path("cta.items.1.label").set(&mut props, json!("b")).unwrap();
        assert_eq!(props["cta"]["items"], json!([{"label": "a"}, {"label": "b"}]));

        let err = path("cta.items.3.label").set(&mut props, json!("c")).unwrap_err();
        assert!(err.to_string().contains("out of bounds"));
        assert_eq!(props["cta"]["items"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_set_through_scalar_fails() {
        let mut props = json!({"title": "Hi"});
        let err = path("title.label").set(&mut props, json!("x")).unwrap_err();
        assert!(matches!(err, PathError::Invalid { .. }));
        assert_eq!(props, json!({"title": "Hi"}));
    }

    #[test]
    fn test_non_numeric_segment_on_array_fails() {
        let mut props = json!({"items": [{"label": "a"}]});
        assert!(path("items.first.label").set(&mut props, json!("b")).is_err());
    }

    #[test]
    fn test_numeric_segment_on_object_is_a_key() {
        let mut props = json!({"grid": {}});
        path("grid.0").set(&mut props, json!(true)).unwrap();
        assert_eq!(props["grid"]["0"], true);
    }

    #[test]
    fn test_get_resolves_objects_and_arrays() {
        let props = json!({"cta": {"items": [{"label": "Go"}]}});
        assert_eq!(path("cta.items.0.label").get(&props), Some(&json!("Go")));
        assert_eq!(path("cta.items.3.label").get(&props), None);
        assert_eq!(path("cta.missing").get(&props), None);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: PropPath = serde_json::from_str("\"a.b\"").unwrap();
        assert_eq!(ok.as_str(), "a.b");
        assert!(serde_json::from_str::<PropPath>("\"a..b\"").is_err());
    }
}
