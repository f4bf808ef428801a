use itertools::Itertools;

/// Group used when a decoded name carries no group segment.
pub const DEFAULT_GROUP: &str = "default";

const NAME_DELIMITER: &str = "::";

/// Object name for an identity triple: `lib::group::prop`, with spaces
/// replaced so the name survives hosts that dislike them.
pub fn encode_object_name(library: &str, group: &str, prop: &str) -> String {
    format!("{library}{NAME_DELIMITER}{group}{NAME_DELIMITER}{prop}").replace(' ', "_")
}

/// Strips the host's duplicate-name disambiguation suffix (a trailing
/// `.NNN`). That suffix is a host artifact, not part of the identity.
pub fn strip_duplicate_suffix(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, digits)) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            stem
        }
        _ => name,
    }
}

/// Decodes an object name back into `(library, group, prop)`.
///
/// Grammar, in decreasing precedence: `lib::group::prop`, then `lib::prop`
/// (group defaults), then `lib_prop` (underscore split, group defaults).
/// Anything else is undecodable. Names that coincidentally contain the
/// delimiter are inherently ambiguous; the precedence above is the contract.
pub fn decode_object_name(name: &str) -> Option<(String, String, String)> {
    let parts = name.split(NAME_DELIMITER).collect_vec();
    if parts.len() >= 3 {
        return Some((
            parts[0].to_string(),
            parts[1].to_string(),
            strip_duplicate_suffix(parts[2]).to_string(),
        ));
    }
    if parts.len() == 2 {
        return Some((
            parts[0].to_string(),
            DEFAULT_GROUP.to_string(),
            strip_duplicate_suffix(parts[1]).to_string(),
        ));
    }

    let (library, prop) = name.split_once('_')?;
    Some((
        library.to_string(),
        DEFAULT_GROUP.to_string(),
        strip_duplicate_suffix(prop).to_string(),
    ))
}
