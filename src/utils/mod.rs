pub mod ip;
pub mod url_validator;

pub use url_validator::validate_target_url;

const BASE62: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// 生成指定长度的 base62 随机码
pub fn generate_random_code(length: usize) -> String {
    std::iter::repeat_with(|| BASE62[rand::random_range(0..BASE62.len())] as char)
        .take(length)
        .collect()
}

/// 短码字符集：字母、数字、`-`、`_`
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty()
        && code
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_random_code_shape() {
        let code = generate_random_code(8);
        assert_eq!(code.len(), 8);
        assert!(code.bytes().all(|b| b.is_ascii_alphanumeric()));
        assert!(generate_random_code(0).is_empty());
    }

    #[test]
    fn test_generate_random_code_spread() {
        let codes: HashSet<String> = (0..200).map(|_| generate_random_code(8)).collect();
        assert_eq!(codes.len(), 200);
    }

    #[test]
    fn test_is_valid_short_code() {
        assert!(is_valid_short_code("my-launch_2026"));
        assert!(!is_valid_short_code(""));
        assert!(!is_valid_short_code("has space"));
        assert!(!is_valid_short_code("slash/y"));
        assert!(!is_valid_short_code("ünicode"));
    }
}
