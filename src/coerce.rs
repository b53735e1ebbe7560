//! Conversions tried when no handler takes a thrown value's exact type.
//!
//! The table is closed: numeric primitives convert into each other with `as` semantics, and text
//! (`&'static str`, `String`, `Box<str>`, `Cow<'static, str>`, `char`) converts into `String` and
//! into boxed errors.

use alloc::borrow::Cow;
use core::any::Any;
use core::error::Error;

type BoxError = Box<dyn Error + Send + Sync>;

/// Convert `cause` into a `T`, if the conversion table allows it.
pub(crate) fn coerce<T: Any>(cause: &(dyn Any + Send)) -> Option<T> {
    let mut slot: Option<T> = None;
    let out: &mut dyn Any = &mut slot;
    let _ = numeric(cause, out) || textual(cause, out) || boxed_error(cause, out);
    slot
}

macro_rules! cast_from {
    ($cause:expr => $target:ty) => {
        cast_from!(
            $cause => $target;
            i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
        )
    };
    ($cause:expr => $target:ty; $($source:ty),*) => {{
        let cause: &(dyn Any + Send) = $cause;
        None $(.or_else(|| cause.downcast_ref::<$source>().map(|value| *value as $target)))*
    }};
}

macro_rules! numeric_into {
    ($cause:expr, $out:expr; $($target:ty),*) => {
        $(
            if let Some(out) = $out.downcast_mut::<Option<$target>>() {
                *out = cast_from!($cause => $target);
                return out.is_some();
            }
        )*
    };
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    reason = "conversions follow `as` semantics"
)]
fn numeric(cause: &(dyn Any + Send), out: &mut dyn Any) -> bool {
    numeric_into!(
        cause, out;
        i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
    );
    false
}

fn textual(cause: &(dyn Any + Send), out: &mut dyn Any) -> bool {
    let Some(out) = out.downcast_mut::<Option<String>>() else {
        return false;
    };
    *out = text(cause);
    out.is_some()
}

fn boxed_error(cause: &(dyn Any + Send), out: &mut dyn Any) -> bool {
    let Some(out) = out.downcast_mut::<Option<BoxError>>() else {
        return false;
    };
    *out = text(cause).map(BoxError::from);
    out.is_some()
}

fn text(cause: &(dyn Any + Send)) -> Option<String> {
    cause
        .downcast_ref::<&'static str>()
        .map(|text| (*text).to_owned())
        .or_else(|| cause.downcast_ref::<String>().cloned())
        .or_else(|| cause.downcast_ref::<Box<str>>().map(|text| String::from(&**text)))
        .or_else(|| {
            cause
                .downcast_ref::<Cow<'static, str>>()
                .map(|text| text.clone().into_owned())
        })
        .or_else(|| cause.downcast_ref::<char>().map(char::to_string))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn integers_widen_and_wrap() {
        assert_eq!(coerce::<i64>(&3i32), Some(3));
        assert_eq!(coerce::<u8>(&300u16), Some(44));
        assert_eq!(coerce::<i32>(&-1i8), Some(-1));
    }

    #[test]
    fn floats_and_integers() {
        assert_eq!(coerce::<f64>(&2u32), Some(2.0));
        assert_eq!(coerce::<i32>(&2.9f32), Some(2));
    }

    #[test]
    fn text_into_string() {
        assert_eq!(coerce::<String>(&"hi").as_deref(), Some("hi"));
        assert_eq!(coerce::<String>(&Box::<str>::from("boxed")).as_deref(), Some("boxed"));
        assert_eq!(
            coerce::<String>(&Cow::<'static, str>::Borrowed("cow")).as_deref(),
            Some("cow"),
        );
        assert_eq!(coerce::<String>(&'x').as_deref(), Some("x"));
    }

    #[test]
    fn text_into_boxed_error() {
        let err = coerce::<BoxError>(&"broken").unwrap();
        assert_eq!(err.to_string(), "broken");
    }

    #[test]
    fn unrelated_types_do_not_convert() {
        assert_eq!(coerce::<String>(&1i32), None);
        assert_eq!(coerce::<i32>(&"1"), None);
        assert_eq!(coerce::<bool>(&1u8), None);
        assert_eq!(coerce::<&'static str>(&String::from("owned")), None);
        assert!(coerce::<BoxError>(&1i32).is_none());
    }
}
