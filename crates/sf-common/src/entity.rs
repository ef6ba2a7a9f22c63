//! Entity trait
//!
//! Ties a canonical entity to its nullable change-capture record and the
//! pure transforms the routers need: full restructure for create/update,
//! key-only construction for delete.

use std::fmt::Debug;

use serde::de::DeserializeOwned;

/// A canonical, repository-ready business entity.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Nullable shape of the entity as it appears in `before`/`after`/`payload`.
    type Record: DeserializeOwned + Default + Debug + Send + Sync + 'static;

    /// Short entity name, used in topic names, logs and metrics.
    const KIND: &'static str;

    /// Restructure a record into the canonical shape. Missing fields become zero values.
    fn restructure(record: Self::Record) -> Self;

    /// Canonical entity carrying only the primary key of `record`.
    fn key_only(record: &Self::Record) -> Self;

    /// Primary key rendered as a string.
    fn key(&self) -> String;
}

/// Declares a canonical entity, its record twin and the [`Entity`] impl
/// for the common case where every column restructures by `unwrap_or_default`.
macro_rules! canonical_entity {
    (
        $(#[$meta:meta])*
        $name:ident, $record:ident, $kind:literal,
        key: $key:ident: $key_ty:ty,
        { $($field:ident: $ty:ty),* $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $name {
            pub $key: $key_ty,
            $(pub $field: $ty,)*
        }

        #[doc = concat!("Nullable change-capture record of [`", stringify!($name), "`].")]
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $record {
            pub $key: Option<$key_ty>,
            $(pub $field: Option<$ty>,)*
        }

        impl $crate::entity::Entity for $name {
            type Record = $record;

            const KIND: &'static str = $kind;

            fn restructure(record: Self::Record) -> Self {
                Self {
                    $key: record.$key.unwrap_or_default(),
                    $($field: record.$field.unwrap_or_default(),)*
                }
            }

            fn key_only(record: &Self::Record) -> Self {
                Self {
                    $key: record.$key.clone().unwrap_or_default(),
                    ..Self::default()
                }
            }

            fn key(&self) -> String {
                self.$key.to_string()
            }
        }
    };
}

pub(crate) use canonical_entity;
