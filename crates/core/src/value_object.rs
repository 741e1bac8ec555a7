//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. A `Sku` built from
/// the same text is the same SKU; nothing else distinguishes two instances.
///
/// The trait requires:
/// - **Clone**: values are cheap to copy around request-scoped code
/// - **PartialEq**: compared by their attribute values
/// - **Debug**: helpful for logging and test failures
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
