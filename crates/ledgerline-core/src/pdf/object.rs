//! Small helpers over `lopdf` objects.

use lopdf::{Dictionary, Document, Object, ObjectId};

/// Follow an indirect reference, returning the object itself otherwise.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Numeric value of an integer or real object.
pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

/// Look up `key` on a page, walking up the page tree for inherited attributes.
pub(crate) fn inherited<'a>(
    doc: &'a Document,
    node_id: ObjectId,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = doc.get_dictionary(node_id).ok()?;
    // Page trees are shallow; the bound guards against reference cycles.
    for _ in 0..32 {
        if let Ok(value) = current.get(key) {
            return Some(resolve(doc, value));
        }
        let parent = match current.get(b"Parent") {
            Ok(Object::Reference(id)) => *id,
            _ => return None,
        };
        current = doc.get_dictionary(parent).ok()?;
    }
    None
}

/// Inherited `/Resources` dictionary of a page.
pub(crate) fn page_resources<'a>(doc: &'a Document, page_id: ObjectId) -> Option<&'a Dictionary> {
    inherited(doc, page_id, b"Resources").and_then(|o| o.as_dict().ok())
}

/// A named entry of a resource category, e.g. `/Font /F1`.
pub(crate) fn resource_entry<'a>(
    doc: &'a Document,
    resources: Option<&'a Dictionary>,
    category: &[u8],
    name: &[u8],
) -> Option<&'a Dictionary> {
    let category = resolve(doc, resources?.get(category).ok()?).as_dict().ok()?;
    resolve(doc, category.get(name).ok()?).as_dict().ok()
}
