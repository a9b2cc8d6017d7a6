//! Percent-encoding helpers for share links

/// Percent-encodes everything except the RFC 3986 unreserved set
/// (`A-Z a-z 0-9 - _ . ~`).
///
/// # Examples
/// ```
/// use reality_link::utils::url::url_encode;
///
/// assert_eq!(url_encode("reality 443/eu"), "reality%20443%2Feu");
/// ```
pub fn url_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// Decodes a percent-encoded string, returning the input unchanged if it does
/// not decode to UTF-8.
pub fn url_decode(input: &str) -> String {
    urlencoding::decode(input)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| input.to_string())
}

/// Joins `key=value` pairs with `&`, encoding both sides and keeping the
/// given order.
pub fn encode_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", url_encode(key), url_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}
