//! Property value encoding
//!
//! Values are written the way a JSON-LD processor reads them back without
//! extra context: native JSON for strings, numbers and booleans, `@id`
//! objects for URIs, and `@value`/`@type` objects for everything whose
//! datatype JSON cannot carry.

use crate::error::{CodecError, Result};
use kgraph_db_core::{ClassRegistry, PropertyValue, ValueKind};
use kgraph_graph_json_ld::{expand, ParsedContext, TypeValue};
use kgraph_vocab::{geo, jsonld, xsd};
use serde_json::{Map, Number, Value as JsonValue};

/// Encode one value.
pub fn encode_value(value: &PropertyValue) -> JsonValue {
    match value {
        PropertyValue::String(s) => JsonValue::String(s.clone()),
        PropertyValue::Integer(i) => JsonValue::from(*i),
        PropertyValue::Boolean(b) => JsonValue::Bool(*b),
        PropertyValue::Double(d) => match Number::from_f64(*d) {
            Some(n) => JsonValue::Number(n),
            None => typed(non_finite_lexical(*d), xsd::DOUBLE),
        },
        PropertyValue::DateTime(dt) => typed(PropertyValue::date_time_lexical(dt), xsd::DATE_TIME),
        PropertyValue::Uri(u) => {
            let mut node = Map::new();
            node.insert(jsonld::ID.to_string(), JsonValue::String(u.clone()));
            JsonValue::Object(node)
        }
        PropertyValue::Geo(p) => typed(p.to_wkt(), geo::WKT_LITERAL),
    }
}

/// Encode all values of a property: a scalar for one, an array for several.
pub fn encode_values(values: &[PropertyValue]) -> JsonValue {
    match values {
        [single] => encode_value(single),
        many => JsonValue::Array(many.iter().map(encode_value).collect()),
    }
}

fn typed(lexical: String, datatype: &str) -> JsonValue {
    let mut node = Map::new();
    node.insert(jsonld::VALUE.to_string(), JsonValue::String(lexical));
    node.insert(jsonld::TYPE.to_string(), JsonValue::String(datatype.to_string()));
    JsonValue::Object(node)
}

fn non_finite_lexical(d: f64) -> String {
    if d.is_nan() {
        "NaN".to_string()
    } else if d.is_sign_positive() {
        "INF".to_string()
    } else {
        "-INF".to_string()
    }
}

/// Decodes the values of one object's properties
pub(crate) struct ValueDecoder<'a> {
    pub ctx: &'a ParsedContext,
    pub classes: &'a ClassRegistry,
    /// Identifier of the object being decoded, for error reporting
    pub id: &'a str,
}

impl ValueDecoder<'_> {
    /// Decode every value of `property`, flattening one level of array.
    pub fn decode_all(
        &self,
        property: &str,
        coercion: Option<&TypeValue>,
        value: &JsonValue,
    ) -> Result<Vec<PropertyValue>> {
        match value {
            JsonValue::Array(items) => items
                .iter()
                .filter(|item| !item.is_null())
                .map(|item| {
                    if item.is_array() {
                        Err(self.invalid(property, "nested arrays are not supported"))
                    } else {
                        self.decode(property, coercion, item)
                    }
                })
                .collect(),
            JsonValue::Null => Ok(Vec::new()),
            single => Ok(vec![self.decode(property, coercion, single)?]),
        }
    }

    fn decode(
        &self,
        property: &str,
        coercion: Option<&TypeValue>,
        value: &JsonValue,
    ) -> Result<PropertyValue> {
        match value {
            JsonValue::String(s) => self.decode_string(property, coercion, s),
            JsonValue::Bool(b) => Ok(PropertyValue::Boolean(*b)),
            JsonValue::Number(n) => self.decode_number(property, n),
            JsonValue::Object(map) => {
                if let Some(id) = map.get(jsonld::ID) {
                    let id = id
                        .as_str()
                        .ok_or_else(|| self.invalid(property, "@id must be a string"))?;
                    return Ok(PropertyValue::Uri(self.expand_reference(id)));
                }
                let Some(inner) = map.get(jsonld::VALUE) else {
                    return Err(self.invalid(property, "nested node objects are not supported"));
                };
                match map.get(jsonld::TYPE) {
                    Some(JsonValue::String(datatype)) => {
                        let datatype = expand::try_iri(datatype, self.ctx, true).map_err(|_| {
                            CodecError::UnresolvableContext {
                                key: datatype.clone(),
                            }
                        })?;
                        match inner {
                            JsonValue::String(lexical) => self.typed(property, lexical, &datatype),
                            other => self.decode(property, None, other),
                        }
                    }
                    Some(_) => Err(self.invalid(property, "@type must be a string")),
                    None => self.decode(property, coercion, inner),
                }
            }
            JsonValue::Array(_) | JsonValue::Null => {
                Err(self.invalid(property, format!("unexpected value {value}")))
            }
        }
    }

    fn decode_string(
        &self,
        property: &str,
        coercion: Option<&TypeValue>,
        s: &str,
    ) -> Result<PropertyValue> {
        match coercion {
            Some(TypeValue::Id) | Some(TypeValue::Vocab) => {
                return Ok(PropertyValue::Uri(self.expand_reference(s)))
            }
            Some(TypeValue::Iri(datatype)) => return self.typed(property, s, datatype),
            None => {}
        }
        match self.classes.property_range(property) {
            Some(ValueKind::Uri) => Ok(PropertyValue::Uri(self.expand_reference(s))),
            Some(kind) => PropertyValue::parse_as(kind, s, property)
                .map_err(|e| self.invalid(property, e.to_string())),
            None => Ok(PropertyValue::String(s.to_string())),
        }
    }

    fn decode_number(&self, property: &str, n: &Number) -> Result<PropertyValue> {
        let range = self.classes.property_range(property);
        if let Some(i) = n.as_i64() {
            return match range {
                Some(ValueKind::Double) => Ok(PropertyValue::Double(i as f64)),
                None | Some(ValueKind::Integer) => Ok(PropertyValue::Integer(i)),
                Some(other) => Err(self.invalid(property, format!("number where {other} expected"))),
            };
        }
        let d = n
            .as_f64()
            .ok_or_else(|| self.invalid(property, format!("{n} out of range")))?;
        match range {
            None | Some(ValueKind::Double) => Ok(PropertyValue::Double(d)),
            Some(other) => Err(self.invalid(property, format!("number where {other} expected"))),
        }
    }

    fn typed(&self, property: &str, lexical: &str, datatype: &str) -> Result<PropertyValue> {
        PropertyValue::from_typed_lexical(lexical, datatype, property)
            .map_err(|e| self.invalid(property, e.to_string()))
    }

    /// Expand a node reference; compact IRIs resolve against the context.
    fn expand_reference(&self, reference: &str) -> String {
        expand::iri(reference, self.ctx, false)
    }

    fn invalid(&self, property: &str, message: impl Into<String>) -> CodecError {
        CodecError::invalid_value(self.id, property, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use kgraph_db_core::GeoPoint;
    use kgraph_vocab::kg;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn decoder_parts() -> (ParsedContext, ClassRegistry) {
        let ctx = ParsedContext::parse(None, &json!({"ex": "http://example.org/"})).unwrap();
        (ctx, ClassRegistry::with_core_classes())
    }

    #[test]
    fn test_encode_values() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(encode_values(&[PropertyValue::string("a")]), json!("a"));
        assert_eq!(
            encode_values(&[PropertyValue::Integer(1), PropertyValue::Integer(2)]),
            json!([1, 2])
        );
        assert_eq!(
            encode_value(&PropertyValue::uri("urn:kg:rel:worksFor")),
            json!({"@id": "urn:kg:rel:worksFor"})
        );
        assert_eq!(
            encode_value(&PropertyValue::DateTime(dt)),
            json!({"@value": "2024-01-02T03:04:05Z", "@type": xsd::DATE_TIME})
        );
        assert_eq!(
            encode_value(&PropertyValue::Geo(GeoPoint::new(1.5, 2.5))),
            json!({"@value": "POINT(2.5 1.5)", "@type": geo::WKT_LITERAL})
        );
        assert_eq!(
            encode_value(&PropertyValue::Double(f64::NEG_INFINITY)),
            json!({"@value": "-INF", "@type": xsd::DOUBLE})
        );
    }

    #[test]
    fn test_bare_string_promoted_by_range() {
        let (ctx, classes) = decoder_parts();
        let decoder = ValueDecoder {
            ctx: &ctx,
            classes: &classes,
            id: "http://example.org/r1",
        };
        assert_eq!(
            decoder.decode_all(kg::SOURCE, None, &json!("ex:e1")).unwrap(),
            vec![PropertyValue::uri("http://example.org/e1")]
        );
        assert_eq!(
            decoder.decode_all(kg::NAME, None, &json!("ex:e1")).unwrap(),
            vec![PropertyValue::string("ex:e1")]
        );
    }

    #[test]
    fn test_coercion_and_typed_values() {
        let (ctx, classes) = decoder_parts();
        let decoder = ValueDecoder {
            ctx: &ctx,
            classes: &classes,
            id: "http://example.org/r1",
        };
        let p = "http://example.org/p";
        assert_eq!(
            decoder
                .decode_all(p, Some(&TypeValue::Id), &json!("http://example.org/x"))
                .unwrap(),
            vec![PropertyValue::uri("http://example.org/x")]
        );
        assert_eq!(
            decoder
                .decode_all(p, None, &json!({"@value": "7", "@type": xsd::INTEGER}))
                .unwrap(),
            vec![PropertyValue::Integer(7)]
        );
        assert_eq!(
            decoder.decode_all(p, None, &json!([1.5, null, true])).unwrap(),
            vec![PropertyValue::Double(1.5), PropertyValue::Boolean(true)]
        );
    }

    #[test]
    fn test_invalid_values_name_object_and_property() {
        let (ctx, classes) = decoder_parts();
        let decoder = ValueDecoder {
            ctx: &ctx,
            classes: &classes,
            id: "http://example.org/r1",
        };
        let err = decoder
            .decode_all(kg::NAME, None, &json!({"nested": true}))
            .unwrap_err();
        match err {
            CodecError::InvalidValue { id, property, .. } => {
                assert_eq!(id, "http://example.org/r1");
                assert_eq!(property, kg::NAME);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
