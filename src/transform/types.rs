use crate::field::FieldType;
use crate::schema::TypeDecl;

/// JSON-Schema `type` → field type tag.
///
/// Unions are not resolved: any `["a", "b", ...]` maps to `null`.
pub fn map_type(decl: &TypeDecl) -> FieldType {
    match decl {
        TypeDecl::Single(name) => FieldType::from(*name),
        TypeDecl::Union(_) => FieldType::Null,
    }
}
