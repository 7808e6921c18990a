/// Lowercase, underscore-separated form of an identifier used for file names
/// and `require_relative` targets.
///
/// An underscore is inserted only where an ASCII lowercase letter is directly
/// followed by an ASCII uppercase letter, so acronyms stay joined:
/// - `CustomerOrder` → `customer_order`
/// - `HTTPServer` → `httpserver`
/// - `order_line` → `order_line`
pub fn file_stem(identifier: &str) -> String {
    let mut stem = String::with_capacity(identifier.len() + 4);
    let mut prev_lower = false;

    for ch in identifier.chars() {
        if prev_lower && ch.is_ascii_uppercase() {
            stem.push('_');
        }
        prev_lower = ch.is_ascii_lowercase();
        stem.extend(ch.to_lowercase());
    }

    stem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case() {
        assert_eq!(file_stem("CustomerOrder"), "customer_order");
    }

    #[test]
    fn test_single_word() {
        assert_eq!(file_stem("Cart"), "cart");
        assert_eq!(file_stem("cart"), "cart");
    }

    #[test]
    fn test_acronym_stays_joined() {
        assert_eq!(file_stem("HTTPServer"), "httpserver");
        assert_eq!(file_stem("parseHTTP"), "parse_http");
    }

    #[test]
    fn test_digits_do_not_split() {
        assert_eq!(file_stem("Vector3D"), "vector3d");
        assert_eq!(file_stem("item2Price"), "item2price");
    }

    #[test]
    fn test_already_snake() {
        assert_eq!(file_stem("order_line"), "order_line");
    }

    #[test]
    fn test_dotted_package_path() {
        assert_eq!(file_stem("Shop.BillingCenter"), "shop.billing_center");
    }
}
