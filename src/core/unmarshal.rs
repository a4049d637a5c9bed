//! Custom per-type unmarshal hook
//!
//! Some field types carry their own text syntax (money amounts, durations,
//! codes). They implement [`UnmarshalForm`] and are wired into serde either
//! per field:
//!
//! ```rust,ignore
//! #[serde(default, deserialize_with = "this_binder::core::unmarshal::unmarshal_form")]
//! price: Price,
//! ```
//!
//! or once per type with [`impl_unmarshal_form!`](crate::impl_unmarshal_form).
//!
//! The hook receives the raw text for form, query and XML input. JSON strings
//! are passed as-is and JSON numbers are passed in their textual form, so the
//! same hook serves every body format. XML elements reach the visitor as a
//! map; their text content is what the hook sees.

use serde::Deserialize;
use serde::de::{self, Deserializer, Visitor};
use std::fmt;
use std::marker::PhantomData;

/// Parse a value from its textual form
pub trait UnmarshalForm: Sized {
    /// Build the value from `text`; the error message is reported to the caller
    fn unmarshal_form(text: &str) -> Result<Self, String>;
}

/// serde `deserialize_with` adapter for [`UnmarshalForm`] types
pub fn unmarshal_form<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: UnmarshalForm,
{
    deserializer.deserialize_any(TextVisitor(PhantomData))
}

/// Like [`unmarshal_form`] for optional fields; `null` decodes to `None`
pub fn unmarshal_form_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: UnmarshalForm,
{
    let value: Option<Hooked<T>> = Option::deserialize(deserializer)?;
    Ok(value.map(|Hooked(inner)| inner))
}

struct Hooked<T>(T);

impl<'de, T: UnmarshalForm> Deserialize<'de> for Hooked<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        unmarshal_form(deserializer).map(Hooked)
    }
}

struct TextVisitor<T>(PhantomData<T>);

impl<T: UnmarshalForm> TextVisitor<T> {
    fn hook<E: de::Error>(text: &str) -> Result<T, E> {
        T::unmarshal_form(text).map_err(E::custom)
    }
}

impl<'de, T: UnmarshalForm> Visitor<'de> for TextVisitor<T> {
    type Value = T;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, a number or an element with text content")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
        Self::hook(v)
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<T, E> {
        let text = std::str::from_utf8(v).map_err(E::custom)?;
        Self::hook(text)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
        Self::hook(&v.to_string())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
        Self::hook(&v.to_string())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<T, E> {
        Self::hook(&v.to_string())
    }

    fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<T, A::Error> {
        let mut text = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == "$text" || key == "$value" {
                text = Some(map.next_value::<String>()?);
            } else {
                map.next_value::<de::IgnoredAny>()?;
            }
        }
        Self::hook(text.as_deref().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Amount in cents, written as `12`, `12.5` or `12.50`
    #[derive(Debug, Default, PartialEq)]
    struct Cents(i64);

    impl UnmarshalForm for Cents {
        fn unmarshal_form(text: &str) -> Result<Self, String> {
            if text.is_empty() {
                return Err("amount must not be empty".to_string());
            }
            let (whole, frac) = text.split_once('.').unwrap_or((text, ""));
            let frac = match frac.len() {
                0 => "00".to_string(),
                1 => format!("{}0", frac),
                2 => frac.to_string(),
                _ => return Err(format!("invalid amount: {}", text)),
            };
            format!("{}{}", whole, frac)
                .parse()
                .map(Cents)
                .map_err(|_| format!("invalid amount: {}", text))
        }
    }

    #[derive(Debug, Deserialize)]
    struct Order {
        #[serde(default, deserialize_with = "unmarshal_form")]
        total: Cents,
        #[serde(default, deserialize_with = "unmarshal_form_opt")]
        discount: Option<Cents>,
    }

    #[test]
    fn test_hook_runs_for_form_text() {
        let order: Order = serde_urlencoded::from_str("total=0.01&discount=2.5").unwrap();
        assert_eq!(order.total, Cents(1));
        assert_eq!(order.discount, Some(Cents(250)));
    }

    #[test]
    fn test_hook_runs_for_json_numbers_and_strings() {
        let order: Order = serde_json::from_str(r#"{"total": 3, "discount": "0.10"}"#).unwrap();
        assert_eq!(order.total, Cents(300));
        assert_eq!(order.discount, Some(Cents(10)));

        let order: Order = serde_json::from_str(r#"{"total": 1.25}"#).unwrap();
        assert_eq!(order.total, Cents(125));
    }

    #[test]
    fn test_missing_and_null_fields() {
        let order: Order = serde_json::from_str(r#"{"discount": null}"#).unwrap();
        assert_eq!(order.total, Cents(0));
        assert_eq!(order.discount, None);
    }

    #[test]
    fn test_hook_error_is_reported() {
        let err = serde_urlencoded::from_str::<Order>("total=1.234").unwrap_err();
        assert!(err.to_string().contains("invalid amount: 1.234"));

        let err = serde_urlencoded::from_str::<Order>("total=").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    /// Upper-cased currency code
    #[derive(Debug, PartialEq)]
    struct Currency(String);

    impl UnmarshalForm for Currency {
        fn unmarshal_form(text: &str) -> Result<Self, String> {
            if text.len() != 3 {
                return Err(format!("invalid currency: {}", text));
            }
            Ok(Currency(text.to_ascii_uppercase()))
        }
    }

    crate::impl_unmarshal_form!(Currency);

    #[derive(Debug, Deserialize)]
    struct Payment {
        currency: Currency,
        fallback: Option<Currency>,
    }

    #[test]
    fn test_macro_deserializes_through_hook() {
        let payment: Payment = serde_urlencoded::from_str("currency=eur").unwrap();
        assert_eq!(payment.currency, Currency("EUR".to_string()));
        assert_eq!(payment.fallback, None);

        let payment: Payment =
            serde_json::from_str(r#"{"currency": "usd", "fallback": "gbp"}"#).unwrap();
        assert_eq!(payment.fallback, Some(Currency("GBP".to_string())));

        let err = serde_json::from_str::<Payment>(r#"{"currency": "euro"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid currency: euro"));
    }

    #[test]
    fn test_non_text_input_rejected() {
        let err = serde_json::from_str::<Order>(r#"{"total": [1]}"#).unwrap_err();
        assert!(err.to_string().contains("a string, a number"));
    }

    #[test]
    fn test_hook_runs_for_xml_elements() {
        let order: Order =
            quick_xml::de::from_str("<order><total>0.01</total><discount>1.5</discount></order>")
                .unwrap();
        assert_eq!(order.total, Cents(1));
        assert_eq!(order.discount, Some(Cents(150)));

        let payment: Payment =
            quick_xml::de::from_str("<payment><currency>chf</currency></payment>").unwrap();
        assert_eq!(payment.currency, Currency("CHF".to_string()));

        let err = quick_xml::de::from_str::<Order>("<order><total>1.234</total></order>")
            .unwrap_err();
        assert!(err.to_string().contains("invalid amount: 1.234"));
    }
}
