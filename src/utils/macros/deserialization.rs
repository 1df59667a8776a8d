//! Case-insensitive deserialization of `{"type": ..., "value": ...}` enums.

/// Implements `Deserialize` for an enum whose variants each wrap a value built from a string.
///
/// The `type` tag is matched case-insensitively, so `"plain"`, `"Plain"` and `"PLAIN"`
/// all select the same variant. Unknown keys besides `type` and `value` are ignored.
#[macro_export]
macro_rules! impl_case_insensitive_enum {
	($enum_name:ident, { $($variant_str:expr => $variant:ident),* $(,)? }) => {
		impl<'de> ::serde::Deserialize<'de> for $enum_name {
			fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
			where
				D: ::serde::Deserializer<'de>,
			{
				use ::serde::de::{self, MapAccess, Visitor};
				use std::fmt;

				struct TaggedVisitor;

				impl<'de> Visitor<'de> for TaggedVisitor {
					type Value = $enum_name;

					fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
						formatter.write_str(concat!(
							"an object with `type` and `value` fields for ",
							stringify!($enum_name)
						))
					}

					fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
					where
						M: MapAccess<'de>,
					{
						let mut tag: Option<String> = None;
						let mut value: Option<String> = None;

						while let Some(key) = map.next_key::<String>()? {
							match key.as_str() {
								"type" => tag = Some(map.next_value()?),
								"value" => value = Some(map.next_value()?),
								_ => {
									let _: ::serde_json::Value = map.next_value()?;
								}
							}
						}

						let tag = tag.ok_or_else(|| de::Error::missing_field("type"))?;
						let value = value.ok_or_else(|| de::Error::missing_field("value"))?;

						match tag.to_lowercase().as_str() {
							$(
								$variant_str => Ok($enum_name::$variant(value.into())),
							)*
							_ => Err(de::Error::unknown_variant(&tag, &[$($variant_str),*])),
						}
					}
				}

				deserializer.deserialize_map(TaggedVisitor)
			}
		}
	};
}
