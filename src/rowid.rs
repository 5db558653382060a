//! Row-id derivation for cart items.
//!
//! A row id is the content-derived identity of a line item: a digest of
//! the product identifier plus the normalized option set. Two items with
//! the same identifier and the same options always land in the same row,
//! whatever order the options were supplied in.

use crate::item::{CartItemOptions, ItemId, OptionValue};

/// Strategy for deriving a cart item's row id from its identity inputs.
///
/// Implementations must be deterministic and pure: the same
/// `(id, options)` pair always yields the same string, with no ambient
/// state involved. The default scheme is [`DefaultRowId`]; a custom
/// generator can be injected per cart for alternate keying schemes.
pub trait RowIdGenerator: Send + Sync {
    fn row_id(&self, id: &ItemId, options: &CartItemOptions) -> String;
}

impl<F> RowIdGenerator for F
where
    F: Fn(&ItemId, &CartItemOptions) -> String + Send + Sync,
{
    fn row_id(&self, id: &ItemId, options: &CartItemOptions) -> String {
        self(id, options)
    }
}

/// The canonical content-addressing scheme.
///
/// Options are sorted by name (byte order), serialized into a canonical
/// byte sequence together with the identifier, and hashed with MD5. The
/// digest is content-addressing only; collision resistance against
/// adversarial input is not a goal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRowId;

impl RowIdGenerator for DefaultRowId {
    fn row_id(&self, id: &ItemId, options: &CartItemOptions) -> String {
        format!("{:x}", md5::compute(canonical_bytes(id, options)))
    }
}

/// Serialize `(id, sorted options)` into the canonical byte sequence the
/// default digest is computed over.
fn canonical_bytes(id: &ItemId, options: &CartItemOptions) -> Vec<u8> {
    let mut entries: Vec<(&str, &OptionValue)> = options.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let mut buf = id.to_string().into_bytes();
    buf.extend_from_slice(format!("a:{}:{{", entries.len()).as_bytes());
    for (name, value) in entries {
        push_str(&mut buf, name);
        push_value(&mut buf, value);
    }
    buf.push(b'}');
    buf
}

fn push_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(format!("s:{}:\"{}\";", s.len(), s).as_bytes());
}

fn push_value(buf: &mut Vec<u8>, value: &OptionValue) {
    match value {
        OptionValue::Str(s) => push_str(buf, s),
        OptionValue::Int(n) => buf.extend_from_slice(format!("i:{n};").as_bytes()),
        OptionValue::Float(n) => buf.extend_from_slice(format!("d:{n};").as_bytes()),
        OptionValue::Bool(b) => {
            buf.extend_from_slice(format!("b:{};", u8::from(*b)).as_bytes())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_id(id: impl Into<ItemId>, options: CartItemOptions) -> String {
        DefaultRowId.row_id(&id.into(), &options)
    }

    #[test]
    fn test_canonical_digest_without_options() {
        assert_eq!(
            row_id(1, CartItemOptions::new()),
            "027c91341fd5cf4d2579b49c4b6a90da"
        );
        assert_eq!(
            row_id(2, CartItemOptions::new()),
            "370d08585360f5c568b18d1f2e4ca1df"
        );
    }

    #[test]
    fn test_canonical_digest_with_options() {
        assert_eq!(
            row_id(1, CartItemOptions::from_iter([("color", "red")])),
            "ea65e0bdcd1967c4b3149e9e780177c0"
        );
        assert_eq!(
            row_id(1, CartItemOptions::from_iter([("color", "blue")])),
            "7e70a1e9aaadd18c72921a07aae5d011"
        );
        assert_eq!(
            row_id(1, CartItemOptions::from_iter([("size", "XL"), ("color", "red")])),
            "07d5da5550494c62daf9993cf954303f"
        );
    }

    #[test]
    fn test_invariant_under_option_permutation() {
        let forward = CartItemOptions::from_iter([("size", "XL"), ("color", "red")]);
        let backward = CartItemOptions::from_iter([("color", "red"), ("size", "XL")]);
        let id = ItemId::Int(1);
        assert_eq!(DefaultRowId.row_id(&id, &forward), DefaultRowId.row_id(&id, &backward));
    }

    #[test]
    fn test_distinct_ids_produce_distinct_keys() {
        let options = CartItemOptions::from_iter([("color", "red")]);
        assert_ne!(
            row_id(1, options.clone()),
            row_id("1x", options)
        );
    }

    #[test]
    fn test_int_and_string_form_of_same_id_share_a_row() {
        // "1" and 1 concatenate identically, so they address the same row.
        assert_eq!(
            row_id(1, CartItemOptions::new()),
            row_id("1", CartItemOptions::new())
        );
    }

    #[test]
    fn test_closure_generator() {
        let generator = |id: &ItemId, options: &CartItemOptions| format!("{id}#{}", options.len());
        let id = ItemId::Int(5);
        assert_eq!(
            generator.row_id(&id, &CartItemOptions::from_iter([("color", "red")])),
            "5#1"
        );
    }
}
