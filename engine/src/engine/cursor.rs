//! Entry-list cursor: the backend cursor plus the deletion-filter flag, so
//! later pages keep the filter the first page was issued with.

const FLAG_SEPARATOR: char = '|';
const INCLUDE_DELETED_FLAG: &str = "true";

/// Compose the outward cursor. `None` when the backend has no more pages.
pub(super) fn encode(backend: Option<&str>, include_deleted: bool) -> Option<String> {
    backend.map(|cursor| {
        if include_deleted {
            format!("{cursor}{FLAG_SEPARATOR}{INCLUDE_DELETED_FLAG}")
        } else {
            cursor.to_owned()
        }
    })
}

/// Split an outward cursor into the backend cursor and, when present, the
/// deletion-filter flag that overrides the caller's option.
pub(super) fn decode(cursor: Option<&str>) -> (Option<String>, Option<bool>) {
    let Some(cursor) = cursor else {
        return (None, None);
    };
    match cursor.rsplit_once(FLAG_SEPARATOR) {
        Some((backend, flag)) => {
            let backend = (!backend.is_empty()).then(|| backend.to_owned());
            let flag = (!flag.is_empty()).then(|| flag == INCLUDE_DELETED_FLAG);
            (backend, flag)
        }
        None => ((!cursor.is_empty()).then(|| cursor.to_owned()), None),
    }
}
