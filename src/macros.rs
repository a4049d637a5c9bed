//! Macros for reducing boilerplate when declaring bindable types
//!
//! These macros generate the trait implementations the binder needs for
//! each destination type: the XSS walk and the custom unmarshal hook.

/// Implement [`Sanitize`](crate::core::xss::Sanitize) for a struct
///
/// Every field of the struct must be listed. Fields marked `: xss` must
/// implement [`XssField`](crate::core::xss::XssField) (`String`,
/// `Option<String>`, `Vec<String>`, ...) and are replaced by the sanitized
/// output. Every other field is walked through `Sanitize`, so nested structs
/// are always visited. The generated code destructures `Self` without `..`:
/// a field missing from the list is a compile error.
///
/// Types with nothing to walk (newtypes, enums, scalar wrappers) are declared
/// with the `leaf` form.
///
/// # Example
/// ```rust,ignore
/// impl_sanitize!(leaf Price, Status);
///
/// impl_sanitize!(Post {
///     title: xss,
///     body: xss,
///     author,
///     price,
/// });
/// ```
#[macro_export]
macro_rules! impl_sanitize {
    (@field $field:ident $policy:ident xss) => {
        $crate::core::xss::XssField::filter_xss($field, $policy)
    };

    (@field $field:ident $policy:ident) => {
        $crate::core::xss::Sanitize::sanitize($field, $policy)
    };

    (leaf $($type:ty),+ $(,)?) => {
        $(
            impl $crate::core::xss::Sanitize for $type {
                fn sanitize(&mut self, _policy: &$crate::core::xss::XssPolicy) {}
            }
        )+
    };

    ($type:ty { $($field:ident $(: $flag:ident)?),* $(,)? }) => {
        impl $crate::core::xss::Sanitize for $type {
            #[allow(unused_variables)]
            fn sanitize(&mut self, policy: &$crate::core::xss::XssPolicy) {
                let Self { $($field),* } = self;
                $(
                    $crate::impl_sanitize!(@field $field policy $($flag)?);
                )*
            }
        }
    };
}

/// Implement `serde::Deserialize` for a type through its
/// [`UnmarshalForm`](crate::core::unmarshal::UnmarshalForm) hook
///
/// The type then decodes from a form/query/XML text value or a JSON
/// string or number without a `deserialize_with` attribute on every field.
///
/// # Example
/// ```rust,ignore
/// #[derive(Default)]
/// struct Price(i64);
///
/// impl UnmarshalForm for Price {
///     fn unmarshal_form(text: &str) -> Result<Self, String> { ... }
/// }
///
/// impl_unmarshal_form!(Price);
/// ```
#[macro_export]
macro_rules! impl_unmarshal_form {
    ($type:ty) => {
        impl<'de> ::serde::Deserialize<'de> for $type {
            fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::core::unmarshal::unmarshal_form(deserializer)
            }
        }
    };
}
